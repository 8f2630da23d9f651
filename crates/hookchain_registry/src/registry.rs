//! Hook registry.
//!
//! A [`HookRegistry`] is the set of hooks one entity type (or one entity)
//! exposes. Class-level registries are built once with
//! [`define_hook`](HookRegistry::define_hook); subclasses and instances
//! derive their own view with [`specialize`](HookRegistry::specialize), so
//! callbacks registered on the class stay visible downstream while callbacks
//! registered downstream never leak back up.
//!
//! # Usage
//!
//! ```
//! use hookchain_core::{Callable, HookError};
//! use hookchain_registry::HookRegistry;
//! use serde_json::Value;
//!
//! struct Sensor;
//!
//! let mut class = HookRegistry::<Sensor>::new();
//! class.define_hook("on_signal", &["color", "flavor"])?;
//!
//! // Two declared parameters: a one-parameter callback cannot fit.
//! let err = class
//!     .add_callback("on_signal", Callable::new(1usize, |_| Ok(Value::Null)))
//!     .unwrap_err();
//! assert!(err.is_arity_mismatch());
//!
//! class.add_callback("on_signal", Callable::new(2usize, |_| Ok(Value::Null)))?;
//!
//! let instance = class.specialize();
//! instance.execute_hook(&Sensor, "on_signal", ("purple", "grape"))?;
//! # Ok::<(), HookError>(())
//! ```

use hookchain_core::{
    Arity, Callable, Callback, CallbackSpec, CallbackVariant, Event, Handle, Hook, HookError,
    HookName, IntoArguments, ResolveMethod,
};
use indexmap::IndexMap;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// HookDefinition
// ─────────────────────────────────────────────────────────────────────────────

/// A hook together with its declared parameter names.
pub struct HookDefinition<S> {
    hook: Arc<Hook<S>>,
    params: Vec<String>,
}

impl<S: 'static> HookDefinition<S> {
    fn new(hook: Hook<S>, params: Vec<String>) -> Self {
        Self {
            hook: Arc::new(hook),
            params,
        }
    }

    /// Returns the hook.
    #[must_use]
    pub fn hook(&self) -> &Arc<Hook<S>> {
        &self.hook
    }

    /// Returns the hook name.
    #[must_use]
    pub fn name(&self) -> &HookName {
        self.hook.name()
    }

    /// Returns the declared parameter names.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Checks that a callback built from `spec` can be projected onto this
    /// hook's parameters.
    ///
    /// Context-rebound callbacks always fit. Anything else must accept
    /// exactly the parameters, the parameters preceded by the event, or be
    /// variadic.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ArityMismatch`] if the arity cannot fit.
    pub fn check(&self, spec: &CallbackSpec<S>) -> Result<(), HookError> {
        if spec.variant() == CallbackVariant::ContextRebound {
            return Ok(());
        }
        let arity = spec.arity();
        let expected = self.params.len();
        match arity {
            Arity::Variadic => Ok(()),
            Arity::Fixed(n) if n == expected || n == expected + 1 => Ok(()),
            Arity::Fixed(_) => Err(HookError::ArityMismatch {
                arity,
                arguments: expected,
            }),
        }
    }

    fn specialize(&self) -> Self {
        Self {
            hook: Arc::new(self.hook.duplicate()),
            params: self.params.clone(),
        }
    }
}

impl<S> Clone for HookDefinition<S> {
    fn clone(&self) -> Self {
        Self {
            hook: Arc::clone(&self.hook),
            params: self.params.clone(),
        }
    }
}

impl<S> core::fmt::Debug for HookDefinition<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HookDefinition")
            .field("hook", &self.hook)
            .field("params", &self.params)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Registry of the hooks an entity exposes, in definition order.
///
/// Adding and removing callbacks only needs `&self`; hooks guard their own
/// callback sets. Defining hooks and managing wildcard callbacks changes the
/// registry itself and needs `&mut self`.
pub struct HookRegistry<S> {
    hooks: IndexMap<HookName, HookDefinition<S>>,
    wildcards: IndexMap<Handle, Callable<S>>,
}

impl<S> Default for HookRegistry<S> {
    fn default() -> Self {
        Self {
            hooks: IndexMap::new(),
            wildcards: IndexMap::new(),
        }
    }
}

impl<S> core::fmt::Debug for HookRegistry<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.names())
            .field("wildcards", &self.wildcards.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<S> HookRegistry<S> {
    /// Returns the number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns `true` if no hook is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Returns the hook names in definition order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.hooks.keys().map(HookName::as_str).collect()
    }

    /// Returns whether a hook called `name` is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Returns the handles of the wildcard callbacks.
    #[must_use]
    pub fn wildcard_handles(&self) -> Vec<&Handle> {
        self.wildcards.keys().collect()
    }
}

impl<S: 'static> HookRegistry<S> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines hook `name` with the given parameter names and returns it.
    ///
    /// Redefining an existing name leaves the registry unchanged and returns
    /// the existing hook. A new hook receives every wildcard callback of
    /// this registry.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvalidHookName`] if `name` is not a symbolic
    /// token, or [`HookError::ArityMismatch`] if a wildcard callback cannot
    /// be projected onto the declared parameters. Nothing is defined on
    /// error.
    pub fn define_hook<N>(&mut self, name: N, params: &[&str]) -> Result<&Arc<Hook<S>>, HookError>
    where
        N: TryInto<HookName, Error = HookError>,
    {
        let name = name.try_into()?;
        if self.hooks.contains_key(&name) {
            tracing::debug!(hook = %name, "hook already defined");
            return Ok(self.hooks[&name].hook());
        }

        let params = params.iter().map(|param| (*param).to_owned()).collect();
        let definition = HookDefinition::new(Hook::new(&name)?, params);
        for (handle, callable) in &self.wildcards {
            let spec = CallbackSpec::new(callable.clone()).named(handle.clone());
            definition.check(&spec)?;
            definition.hook.add_callback(spec)?;
        }

        tracing::debug!(hook = %name, params = ?definition.params, "hook defined");
        Ok(self.hooks.entry(name).or_insert(definition).hook())
    }

    /// Returns the hook called `name`.
    #[must_use]
    pub fn hook(&self, name: &str) -> Option<&Arc<Hook<S>>> {
        self.hooks.get(name).map(HookDefinition::hook)
    }

    /// Returns the definition of hook `name`.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&HookDefinition<S>> {
        self.hooks.get(name)
    }

    /// Iterates definitions in definition order.
    pub fn definitions(&self) -> impl Iterator<Item = &HookDefinition<S>> {
        self.hooks.values()
    }

    fn require(&self, name: &str) -> Result<&HookDefinition<S>, HookError> {
        self.hooks
            .get(name)
            .ok_or_else(|| HookError::UnknownHook(name.to_owned()))
    }

    /// Adds a callback to hook `name` and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::UnknownHook`] if no such hook is defined, or
    /// [`HookError::ArityMismatch`] if the callback cannot be projected onto
    /// the hook's parameters.
    pub fn add_callback(
        &self,
        name: &str,
        spec: impl Into<CallbackSpec<S>>,
    ) -> Result<Handle, HookError> {
        let definition = self.require(name)?;
        let spec = spec.into();
        definition.check(&spec)?;
        definition.hook.add_callback(spec)
    }

    /// Adds a bound-method callback for `method` to hook `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::UnknownHook`], [`HookError::UnknownMethod`] if
    /// `resolver` does not know `method`, or [`HookError::ArityMismatch`].
    pub fn add_method_callback(
        &self,
        name: &str,
        resolver: &impl ResolveMethod<S>,
        method: &str,
    ) -> Result<Handle, HookError> {
        let definition = self.require(name)?;
        let resolved = resolver
            .resolve_method(method)
            .ok_or_else(|| HookError::UnknownMethod {
                method: method.to_owned(),
                type_name: core::any::type_name::<S>(),
            })?;
        let spec = CallbackSpec::method(resolved);
        definition.check(&spec)?;
        definition.hook.add_callback(spec)
    }

    /// Removes the callback matching `key` from hook `name`'s own set.
    pub fn remove_callback(&self, name: &str, key: impl Into<Handle>) -> Option<Callback<S>> {
        self.hooks.get(name)?.hook.remove_callback(key)
    }

    /// Triggers hook `name` on behalf of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::UnknownHook`], [`HookError::ArgumentCount`] if
    /// the number of arguments differs from the declared parameters, or the
    /// first error raised along the chain.
    pub fn execute_hook(
        &self,
        source: &S,
        name: &str,
        args: impl IntoArguments,
    ) -> Result<(), HookError> {
        let definition = self.require(name)?;
        let args = args.into_arguments();
        if args.len() != definition.params.len() {
            return Err(HookError::ArgumentCount {
                hook: name.to_owned(),
                expected: definition.params.len(),
                actual: args.len(),
            });
        }

        let event = Event::new(source, definition.name().clone(), args);
        tracing::debug!(hook = %name, total = definition.hook.total_callbacks(), "executing hook");
        definition.hook.execute_callbacks(&event)
    }

    /// Derives the registry of a subclass or instance: one duplicate per
    /// hook, delegating to this registry's hooks.
    ///
    /// The derived registry inherits the wildcard list, so hooks it defines
    /// later receive the same wildcard callbacks.
    #[must_use]
    pub fn specialize(&self) -> Self {
        tracing::debug!(hooks = self.hooks.len(), "registry specialized");
        Self {
            hooks: self
                .hooks
                .iter()
                .map(|(name, definition)| (name.clone(), definition.specialize()))
                .collect(),
            wildcards: self.wildcards.clone(),
        }
    }

    /// Adds `callable` under `handle` to every hook in this registry, and to
    /// every hook defined here later.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ArityMismatch`] if the callable cannot be
    /// projected onto some hook, or [`HookError::DuplicateHandle`] if some
    /// hook already owns a callback under `handle` that is not this
    /// wildcard. Nothing is added on error.
    pub fn add_wildcard_callback(
        &mut self,
        handle: impl Into<Handle>,
        callable: Callable<S>,
    ) -> Result<Handle, HookError> {
        let handle = handle.into();
        let replacing = self.wildcards.contains_key(&handle);
        let spec = || CallbackSpec::new(callable.clone()).named(handle.clone());
        for definition in self.hooks.values() {
            definition.check(&spec())?;
            if !replacing && definition.hook.callbacks().contains(&handle) {
                return Err(HookError::DuplicateHandle {
                    hook: definition.name().to_string(),
                    handle,
                });
            }
        }
        for definition in self.hooks.values() {
            definition.hook.add_callback(spec())?;
        }

        tracing::debug!(handle = %handle, hooks = self.hooks.len(), "wildcard callback added");
        self.wildcards.insert(handle.clone(), callable);
        Ok(handle)
    }

    /// Removes wildcard callback `handle` from this registry and from the
    /// own set of every hook in it. Returns `false` if it was not registered.
    ///
    /// Copies inherited by hooks further up the delegation chain are not
    /// touched.
    pub fn remove_wildcard_callback(&mut self, handle: impl Into<Handle>) -> bool {
        let handle = handle.into();
        if self.wildcards.shift_remove(&handle).is_none() {
            tracing::debug!(handle = %handle, "no such wildcard callback");
            return false;
        }
        for definition in self.hooks.values() {
            definition.hook.remove_callback(&handle);
        }
        tracing::debug!(handle = %handle, "wildcard callback removed");
        true
    }
}
