//! Named extension points with parent delegation.
//!
//! A [`Hook`] owns a [`CallbackSet`] and a parent link. Executing a hook
//! runs the whole delegation chain root-first: the parent's callbacks (and
//! its parent's, recursively) before the hook's own, and the hook's own in
//! ascending index order. The chain always ends in [`NullHook`].
//!
//! Chains grow only through [`Hook::duplicate`], which is how a subclass or
//! instance gets its own view of a hook: callbacks added to the original
//! stay visible from the duplicate, while callbacks added to the duplicate
//! are invisible from the original.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use hookchain_core::{Callable, Event, Hook};
//! use serde_json::Value;
//!
//! struct Widget;
//!
//! let class_hook = Arc::new(Hook::<Widget>::new("on_signal")?);
//! class_hook.add_plain_callback(Callable::variadic(|_| Ok(Value::Null)));
//!
//! let instance_hook = class_hook.duplicate();
//! assert_eq!(instance_hook.callback_count(), 0);
//! assert_eq!(instance_hook.total_callbacks(), 1);
//!
//! let widget = Widget;
//! let event = Event::new(&widget, instance_hook.name().clone(), ());
//! instance_hook.execute_callbacks(&event)?;
//! # Ok::<(), hookchain_core::HookError>(())
//! ```

use crate::callable::Callable;
use crate::callback::{Callback, CallbackSpec};
use crate::callback_set::CallbackSet;
use crate::error::HookError;
use crate::event::Event;
use crate::handle::Handle;
use crate::method::ResolveMethod;
use crate::name::HookName;
use core::fmt;
use core::hash::{Hash, Hasher};
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// HookChain
// ─────────────────────────────────────────────────────────────────────────────

/// Capabilities shared by every link of a delegation chain.
pub trait HookChain<S>: Send + Sync {
    /// Returns the hook name, or `None` for the terminal sentinel.
    fn name(&self) -> Option<&HookName>;

    /// Returns the parent link, or `None` at the end of the chain.
    fn parent(&self) -> Option<&Arc<dyn HookChain<S>>>;

    /// Returns the number of callbacks owned by this link alone.
    fn callback_count(&self) -> usize;

    /// Returns the number of callbacks along the whole chain.
    fn total_callbacks(&self) -> usize;

    /// Runs the chain's callbacks root-first for `event`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a callback; later callbacks do not run.
    fn execute_callbacks(&self, event: &Event<'_, S>) -> Result<(), HookError>;

    /// Returns this link as a [`Hook`], if it is one.
    fn as_hook(&self) -> Option<&Hook<S>> {
        None
    }

    /// Returns `true` for the terminal sentinel.
    fn is_null(&self) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// NullHook
// ─────────────────────────────────────────────────────────────────────────────

/// Terminal link of every delegation chain: no callbacks, no parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullHook;

impl<S> HookChain<S> for NullHook {
    fn name(&self) -> Option<&HookName> {
        None
    }

    fn parent(&self) -> Option<&Arc<dyn HookChain<S>>> {
        None
    }

    fn callback_count(&self) -> usize {
        0
    }

    fn total_callbacks(&self) -> usize {
        0
    }

    fn execute_callbacks(&self, _event: &Event<'_, S>) -> Result<(), HookError> {
        Ok(())
    }

    fn is_null(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hook
// ─────────────────────────────────────────────────────────────────────────────

/// A named extension point.
///
/// The name and parent are fixed at construction; only the owned
/// [`CallbackSet`] changes afterwards. Two hooks are equal, and hash alike,
/// when their names match.
///
/// # Thread Safety
///
/// The callback set sits behind a [`RwLock`]. Execution takes a snapshot of
/// the callbacks before running them, so a callback may add or remove
/// callbacks on the hook that is running it; the change applies to the next
/// execution.
pub struct Hook<S> {
    name: HookName,
    parent: Arc<dyn HookChain<S>>,
    callbacks: RwLock<CallbackSet<S>>,
}

impl<S: 'static> Hook<S> {
    /// Creates a root hook whose parent is [`NullHook`].
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvalidHookName`] if `name` is not a symbolic token.
    pub fn new<N>(name: N) -> Result<Self, HookError>
    where
        N: TryInto<HookName, Error = HookError>,
    {
        Self::with_parent(name, Arc::new(NullHook))
    }

    /// Creates a hook that delegates to `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvalidHookName`] if `name` is not a symbolic token.
    pub fn with_parent<N>(name: N, parent: Arc<dyn HookChain<S>>) -> Result<Self, HookError>
    where
        N: TryInto<HookName, Error = HookError>,
    {
        let name = name.try_into()?;
        tracing::debug!(hook = %name, parent = ?parent.name(), "hook created");
        Ok(Self {
            name,
            parent,
            callbacks: RwLock::new(CallbackSet::new()),
        })
    }

    /// Derives a hook with the same name, an empty callback set and `self`
    /// as its parent.
    #[must_use]
    pub fn duplicate(self: &Arc<Self>) -> Self {
        tracing::debug!(hook = %self.name, "hook duplicated");
        let parent: Arc<dyn HookChain<S>> = Arc::clone(self) as Arc<dyn HookChain<S>>;
        Self {
            name: self.name.clone(),
            parent,
            callbacks: RwLock::new(CallbackSet::new()),
        }
    }

    /// Returns the hook name.
    #[must_use]
    pub fn name(&self) -> &HookName {
        &self.name
    }

    /// Returns the parent link.
    #[must_use]
    pub fn parent(&self) -> &Arc<dyn HookChain<S>> {
        &self.parent
    }

    /// Returns the parent if it is a [`Hook`] rather than the sentinel.
    #[must_use]
    pub fn parent_hook(&self) -> Option<&Hook<S>> {
        self.parent.as_hook()
    }

    /// Returns `true` if `other` is this hook's parent (by identity).
    #[must_use]
    pub fn is_child_of(&self, other: &Hook<S>) -> bool {
        self.parent_hook()
            .is_some_and(|parent| core::ptr::eq(parent, other))
    }

    /// Returns a read-only view of this hook's own callbacks.
    ///
    /// The view holds a read lock; drop it before adding or removing callbacks.
    pub fn callbacks(&self) -> RwLockReadGuard<'_, CallbackSet<S>> {
        self.callbacks.read()
    }

    /// Returns a copy of the own callback matching `key`.
    #[must_use]
    pub fn callback(&self, key: impl Into<Handle>) -> Option<Callback<S>> {
        self.callbacks.read().get(key).cloned()
    }

    /// Returns the number of callbacks owned by this hook alone.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Returns the number of callbacks along the whole chain.
    #[must_use]
    pub fn total_callbacks(&self) -> usize {
        self.parent.total_callbacks() + self.callback_count()
    }

    /// Adds a callback built from `spec` and returns its handle.
    ///
    /// The callback's index comes from this hook's own counter, independent
    /// of the parent chain. Without an explicit handle, the handle is the
    /// index (or the method name for method callbacks).
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ContextArity`] for a context-rebound spec whose
    /// callable declares parameters.
    pub fn add_callback(&self, spec: impl Into<CallbackSpec<S>>) -> Result<Handle, HookError> {
        let spec = spec.into();
        let mut callbacks = self.callbacks.write();
        let callback = spec.into_callback(callbacks.next_index())?;
        tracing::debug!(
            hook = %self.name,
            handle = %callback.handle(),
            index = callback.index(),
            variant = ?callback.variant(),
            "callback added"
        );
        Ok(callbacks.insert(callback))
    }

    /// Adds an anonymous plain callback and returns its handle.
    pub fn add_plain_callback(&self, callable: Callable<S>) -> Handle {
        let mut callbacks = self.callbacks.write();
        let index = callbacks.next_index();
        tracing::debug!(hook = %self.name, index, "plain callback added");
        callbacks.insert(Callback::plain(None, callable, index))
    }

    /// Adds an anonymous context-rebound callback and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ContextArity`] if `callable` declares parameters.
    pub fn add_context_callback(&self, callable: Callable<S>) -> Result<Handle, HookError> {
        self.add_callback(CallbackSpec::context(callable))
    }

    /// Resolves `method` through `resolver` and adds it as a bound-method
    /// callback whose handle is the method name.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::UnknownMethod`] if the resolver has no such method.
    pub fn add_method_callback(
        &self,
        resolver: &impl ResolveMethod<S>,
        method: &str,
    ) -> Result<Handle, HookError> {
        let resolved = resolver
            .resolve_method(method)
            .ok_or_else(|| HookError::UnknownMethod {
                method: method.to_owned(),
                type_name: core::any::type_name::<S>(),
            })?;
        self.add_callback(CallbackSpec::method(resolved))
    }

    /// Inserts a pre-built callback as is and returns its handle.
    pub fn insert_callback(&self, callback: Callback<S>) -> Handle {
        tracing::debug!(hook = %self.name, handle = %callback.handle(), "callback inserted");
        self.callbacks.write().insert(callback)
    }

    /// Removes the own callback matching `key`. Never reaches into the parent
    /// chain; absent keys are a no-op.
    pub fn remove_callback(&self, key: impl Into<Handle>) -> Option<Callback<S>> {
        let key = key.into();
        let removed = self.callbacks.write().remove(key.clone());
        tracing::debug!(
            hook = %self.name,
            key = %key,
            removed = removed.is_some(),
            "remove callback"
        );
        removed
    }

    /// Runs the parent chain, then this hook's own callbacks in ascending
    /// index order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised along the chain, unchanged; the
    /// remaining callbacks do not run.
    pub fn execute_callbacks(&self, event: &Event<'_, S>) -> Result<(), HookError> {
        self.parent.execute_callbacks(event)?;

        let snapshot: Vec<Callback<S>> = self.callbacks.read().iter().cloned().collect();
        for callback in &snapshot {
            tracing::trace!(
                hook = %self.name,
                handle = %callback.handle(),
                index = callback.index(),
                "invoking callback"
            );
            callback.call(event)?;
        }
        Ok(())
    }
}

impl<S: 'static> HookChain<S> for Hook<S> {
    fn name(&self) -> Option<&HookName> {
        Some(&self.name)
    }

    fn parent(&self) -> Option<&Arc<dyn HookChain<S>>> {
        Some(&self.parent)
    }

    fn callback_count(&self) -> usize {
        Hook::callback_count(self)
    }

    fn total_callbacks(&self) -> usize {
        Hook::total_callbacks(self)
    }

    fn execute_callbacks(&self, event: &Event<'_, S>) -> Result<(), HookError> {
        Hook::execute_callbacks(self, event)
    }

    fn as_hook(&self) -> Option<&Hook<S>> {
        Some(self)
    }
}

impl<S> PartialEq for Hook<S> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<S> Eq for Hook<S> {}

impl<S> Hash for Hook<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<S> fmt::Debug for Hook<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("parent", &self.parent.name())
            .field("callbacks", &*self.callbacks.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::CallbackVariant;
    use crate::method::Method;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Source {
        log: Log,
    }

    impl Source {
        fn new() -> Self {
            Self {
                log: Arc::default(),
            }
        }

        fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    fn ping(label: &'static str) -> Callable<Source> {
        Callable::<Source>::variadic(move |call| {
            let source = call.event().map(Event::source).expect("event first");
            source.log.lock().unwrap().push(label.to_owned());
            Ok(Value::Null)
        })
    }

    fn event<'s>(source: &'s Source, hook: &Hook<Source>) -> Event<'s, Source> {
        Event::new(source, hook.name().clone(), ())
    }

    #[test]
    fn requires_symbolic_name() {
        assert!(matches!(
            Hook::<Source>::new("foo bar"),
            Err(HookError::InvalidHookName(_))
        ));
    }

    #[test]
    fn new_hook_is_empty_with_null_parent() {
        let hook = Hook::<Source>::new("foo").unwrap();
        assert_eq!(hook.name().as_str(), "foo");
        assert_eq!(hook.callback_count(), 0);
        assert!(hook.parent().is_null());
        assert!(hook.parent_hook().is_none());
        assert_eq!(hook.total_callbacks(), 0);
    }

    #[test]
    fn equal_to_any_hook_with_same_name() {
        use core::hash::BuildHasher;

        let parent = Arc::new(Hook::<Source>::new("parent").unwrap());
        let hook = Hook::<Source>::new("foo").unwrap();
        let other = Hook::with_parent("foo", parent as Arc<dyn HookChain<Source>>).unwrap();
        other.add_plain_callback(ping("x"));

        assert_eq!(hook, other);
        let state = hashbrown::DefaultHashBuilder::default();
        assert_eq!(state.hash_one(&hook), state.hash_one(&other));
        assert_ne!(hook, Hook::new("bar").unwrap());
    }

    #[test]
    fn add_callback_returns_handle() {
        let hook = Hook::<Source>::new("foo").unwrap();
        let handle = hook.insert_callback(Callback::plain(Some("cb".into()), ping("cb"), 123));
        assert_eq!(handle, Handle::from("cb"));
        assert_eq!(hook.callback("cb").unwrap().index(), 123);
    }

    #[test]
    fn mixed_callbacks_get_handles_variants_and_run_in_order() {
        let hook = Hook::<Source>::new("foo").unwrap();
        let method = Method::new(
            "my_method",
            Callable::<Source>::nullary(|call| {
                let source = call.receiver().expect("bound receiver");
                source.log.lock().unwrap().push("my_method".to_owned());
                Ok(Value::Null)
            }),
        );
        let resolver = move |name: &str| (name == "my_method").then(|| method.clone());

        let anon_plain = hook.add_plain_callback(ping("anon_plain"));
        let named_plain = hook
            .add_callback(CallbackSpec::plain(ping("named_plain")).named("my_plain"))
            .unwrap();
        let anon_context = hook
            .add_context_callback(Callable::<Source>::nullary(|call| {
                let source = call.receiver().expect("receiver");
                source.log.lock().unwrap().push("anon_context".to_owned());
                Ok(Value::Null)
            }))
            .unwrap();
        let named_context = hook
            .add_callback(
                CallbackSpec::new(Callable::<Source>::nullary(|call| {
                    let source = call.receiver().expect("receiver");
                    source.log.lock().unwrap().push("named_context".to_owned());
                    Ok(Value::Null)
                }))
                .named("my_context"),
            )
            .unwrap();
        let method_handle = hook.add_method_callback(&resolver, "my_method").unwrap();

        assert_eq!(hook.callback_count(), 5);
        assert_eq!(anon_plain, Handle::Index(0));
        assert_eq!(named_plain, Handle::from("my_plain"));
        assert_eq!(anon_context, Handle::Index(2));
        assert_eq!(named_context, Handle::from("my_context"));
        assert_eq!(method_handle, Handle::from("my_method"));

        assert_eq!(hook.callback(0usize).unwrap().handle(), &Handle::Index(0));
        assert_eq!(hook.callback(2usize).unwrap().handle(), &Handle::Index(2));

        let variant = |key: &Handle| hook.callback(key).unwrap().variant();
        assert_eq!(variant(&anon_plain), CallbackVariant::Plain);
        assert_eq!(variant(&named_plain), CallbackVariant::Plain);
        assert_eq!(variant(&anon_context), CallbackVariant::ContextRebound);
        assert_eq!(variant(&named_context), CallbackVariant::ContextRebound);
        assert_eq!(variant(&method_handle), CallbackVariant::BoundMethod);

        let source = Source::new();
        hook.execute_callbacks(&event(&source, &hook)).unwrap();
        assert_eq!(
            source.entries(),
            ["anon_plain", "named_plain", "anon_context", "named_context", "my_method"]
        );
    }

    #[test]
    fn unknown_method_is_an_error() {
        let hook = Hook::<Source>::new("foo").unwrap();
        let resolver = |_: &str| None::<Method<Source>>;
        let err = hook.add_method_callback(&resolver, "missing").unwrap_err();
        assert!(matches!(err, HookError::UnknownMethod { ref method, .. } if method == "missing"));
        assert_eq!(hook.callback_count(), 0);
    }

    #[test]
    fn parent_callbacks_run_first() {
        let parent = Arc::new(Hook::<Source>::new("parent_hook").unwrap());
        parent.add_plain_callback(ping("parent"));
        let child =
            Hook::with_parent("child_hook", Arc::clone(&parent) as Arc<dyn HookChain<Source>>)
                .unwrap();
        child.add_plain_callback(ping("child"));

        assert!(child.is_child_of(&parent));
        assert_eq!(child.total_callbacks(), 2);

        let source = Source::new();
        child.execute_callbacks(&event(&source, &child)).unwrap();
        assert_eq!(source.entries(), ["parent", "child"]);
    }

    #[test]
    fn duplicate_delegates_to_original() {
        let original = Arc::new(Hook::<Source>::new("parent").unwrap());
        original
            .add_callback(CallbackSpec::plain(ping("foo")).named("foo"))
            .unwrap();
        let derived = original.duplicate();

        assert!(derived.is_child_of(&original));
        assert_eq!(derived.name(), original.name());
        assert_eq!(derived.callback_count(), 0);
        assert_eq!(original.callback_count(), 1);

        derived.add_plain_callback(ping("derived"));
        assert_eq!(original.callback_count(), 1);
        assert_eq!(derived.total_callbacks(), 2);

        original.add_plain_callback(ping("late"));
        assert_eq!(derived.total_callbacks(), 3);
    }

    #[test]
    fn remove_only_touches_own_callbacks() {
        let original = Arc::new(Hook::<Source>::new("foo").unwrap());
        original.add_plain_callback(ping("a"));
        let derived = original.duplicate();

        assert!(derived.remove_callback(0usize).is_none());
        assert_eq!(original.callback_count(), 1);
        assert!(original.remove_callback(0usize).is_some());
        assert_eq!(derived.total_callbacks(), 0);
    }

    #[test]
    fn failure_aborts_remaining_callbacks() {
        let parent = Arc::new(Hook::<Source>::new("foo").unwrap());
        parent.add_plain_callback(ping("first"));
        parent.add_plain_callback(Callable::variadic(|_| Err(HookError::failed("boom"))));
        let child = parent.duplicate();
        child.add_plain_callback(ping("never"));

        let source = Source::new();
        let err = child.execute_callbacks(&event(&source, &child)).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(source.entries(), ["first"]);
    }

    #[test]
    fn indices_keep_counting_after_removal() {
        let hook = Hook::<Source>::new("foo").unwrap();
        hook.add_plain_callback(ping("a"));
        hook.add_plain_callback(ping("b"));
        hook.remove_callback(0usize);

        let handle = hook.add_plain_callback(ping("c"));
        assert_eq!(handle, Handle::Index(2));
        assert_eq!(hook.callbacks().handles(), [&Handle::Index(1), &Handle::Index(2)]);
    }

    #[test]
    fn callback_may_mutate_running_hook() {
        let hook = Arc::new(Hook::<Source>::new("foo").unwrap());
        let weak = Arc::downgrade(&hook);
        hook.add_plain_callback(Callable::variadic(move |_| {
            if let Some(hook) = weak.upgrade() {
                hook.add_plain_callback(Callable::variadic(|_| Ok(json!(null))));
            }
            Ok(Value::Null)
        }));

        let source = Source::new();
        hook.execute_callbacks(&event(&source, &hook)).unwrap();
        assert_eq!(hook.callback_count(), 2);
    }
}
