//! Callbacks: one registered unit of invocation logic.
//!
//! Every [`Callback`] carries a [`Handle`], an insertion `index` and one of
//! three invocation strategies:
//!
//! - [`PlainCallback`]: projects the event onto the callable's arity and
//!   calls it without a receiver.
//! - [`ContextCallback`]: calls a zero-arity callable with the event source
//!   as its receiver, so the body runs as though it were a method of the
//!   source.
//! - [`MethodCallback`]: binds a [`Method`] to the event source and calls it
//!   with the arguments projected onto the method's arity.
//!
//! [`CallbackSpec`] describes a callback before it has an index; the owning
//! hook turns it into a [`Callback`] when it is added.

use crate::callable::{Call, Callable};
use crate::error::{CallResult, HookError};
use crate::event::Event;
use crate::handle::Handle;
use crate::method::Method;
use core::cmp::Ordering;
use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Variants
// ─────────────────────────────────────────────────────────────────────────────

/// Free invocation of a callable with the projected event arguments.
pub struct PlainCallback<S> {
    callable: Callable<S>,
}

impl<S> PlainCallback<S> {
    /// Wraps `callable`.
    #[must_use]
    pub fn new(callable: Callable<S>) -> Self {
        Self { callable }
    }

    /// Returns the wrapped callable.
    #[must_use]
    pub fn callable(&self) -> &Callable<S> {
        &self.callable
    }

    /// Projects `event` onto the callable's arity and invokes it.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ArityMismatch`] if the arity does not fit the
    /// event, or the callable's own error.
    pub fn call(&self, event: &Event<'_, S>) -> CallResult {
        let args = event.to_args(self.callable.arity())?;
        self.callable.invoke(Call::new(None, args))
    }
}

/// Invocation of a zero-arity callable in the context of the event source.
pub struct ContextCallback<S> {
    callable: Callable<S>,
}

impl<S> ContextCallback<S> {
    /// Wraps `callable`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ContextArity`] if the callable declares any
    /// parameters.
    pub fn new(callable: Callable<S>) -> Result<Self, HookError> {
        let arity = callable.arity();
        if !arity.is_zero() {
            return Err(HookError::ContextArity(arity));
        }
        Ok(Self { callable })
    }

    /// Returns the wrapped callable.
    #[must_use]
    pub fn callable(&self) -> &Callable<S> {
        &self.callable
    }

    /// Invokes the callable with `event.source()` as its receiver and no
    /// positional arguments.
    ///
    /// # Errors
    ///
    /// Returns the callable's own error.
    pub fn call(&self, event: &Event<'_, S>) -> CallResult {
        self.callable
            .invoke(Call::new(Some(event.source()), Vec::new()))
    }
}

/// Invocation of a method bound to the event source.
pub struct MethodCallback<S> {
    method: Method<S>,
}

impl<S> MethodCallback<S> {
    /// Wraps `method`.
    #[must_use]
    pub fn new(method: Method<S>) -> Self {
        Self { method }
    }

    /// Returns the wrapped method descriptor.
    #[must_use]
    pub fn method(&self) -> &Method<S> {
        &self.method
    }

    /// Binds the method to `event.source()` and invokes it with the event
    /// projected onto the method's arity.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ArityMismatch`] if the arity does not fit the
    /// event, or the method's own error.
    pub fn call(&self, event: &Event<'_, S>) -> CallResult {
        let args = event.to_args(self.method.arity())?;
        self.method.bind(event.source()).call(args)
    }
}

/// The invocation strategy of a [`Callback`].
pub enum CallbackKind<S> {
    /// See [`PlainCallback`].
    Plain(PlainCallback<S>),
    /// See [`ContextCallback`].
    Context(ContextCallback<S>),
    /// See [`MethodCallback`].
    Method(MethodCallback<S>),
}

impl<S> CallbackKind<S> {
    /// Returns the variant tag.
    #[must_use]
    pub fn variant(&self) -> CallbackVariant {
        match self {
            Self::Plain(_) => CallbackVariant::Plain,
            Self::Context(_) => CallbackVariant::ContextRebound,
            Self::Method(_) => CallbackVariant::BoundMethod,
        }
    }

    fn call(&self, event: &Event<'_, S>) -> CallResult {
        match self {
            Self::Plain(callback) => callback.call(event),
            Self::Context(callback) => callback.call(event),
            Self::Method(callback) => callback.call(event),
        }
    }
}

impl<S> Clone for CallbackKind<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(callback) => Self::Plain(PlainCallback::new(callback.callable.clone())),
            Self::Context(callback) => Self::Context(ContextCallback {
                callable: callback.callable.clone(),
            }),
            Self::Method(callback) => Self::Method(MethodCallback::new(callback.method.clone())),
        }
    }
}

/// Tag identifying a callback's invocation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackVariant {
    /// Free invocation.
    Plain,
    /// Runs in the context of the source.
    ContextRebound,
    /// Method bound to the source.
    BoundMethod,
}

// ─────────────────────────────────────────────────────────────────────────────
// Callback
// ─────────────────────────────────────────────────────────────────────────────

/// One registered callback.
pub struct Callback<S> {
    handle: Handle,
    index: usize,
    kind: CallbackKind<S>,
}

impl<S> Callback<S> {
    /// Creates a callback. Without an explicit handle, the handle is the index.
    #[must_use]
    pub fn new(handle: Option<Handle>, index: usize, kind: CallbackKind<S>) -> Self {
        Self {
            handle: handle.unwrap_or(Handle::Index(index)),
            index,
            kind,
        }
    }

    /// Creates a [`PlainCallback`].
    #[must_use]
    pub fn plain(handle: Option<Handle>, callable: Callable<S>, index: usize) -> Self {
        Self::new(handle, index, CallbackKind::Plain(PlainCallback::new(callable)))
    }

    /// Creates a [`ContextCallback`].
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ContextArity`] if `callable` declares parameters.
    pub fn context(
        handle: Option<Handle>,
        callable: Callable<S>,
        index: usize,
    ) -> Result<Self, HookError> {
        let callback = ContextCallback::new(callable)?;
        Ok(Self::new(handle, index, CallbackKind::Context(callback)))
    }

    /// Creates a [`MethodCallback`]. Without an explicit handle, the handle
    /// is the method name.
    #[must_use]
    pub fn method(handle: Option<Handle>, method: Method<S>, index: usize) -> Self {
        let handle = handle.unwrap_or_else(|| Handle::Name(method.name().to_owned()));
        Self::new(Some(handle), index, CallbackKind::Method(MethodCallback::new(method)))
    }

    /// Returns the handle.
    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Returns the insertion index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the invocation strategy.
    #[must_use]
    pub fn kind(&self) -> &CallbackKind<S> {
        &self.kind
    }

    /// Returns the invocation strategy tag.
    #[must_use]
    pub fn variant(&self) -> CallbackVariant {
        self.kind.variant()
    }

    /// Invokes the callback for `event`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ArityMismatch`] on a projection failure, or the
    /// callback body's own error, unchanged.
    pub fn call(&self, event: &Event<'_, S>) -> CallResult {
        self.kind.call(event)
    }

    /// Sequence comparison: callbacks sharing a handle are equal regardless
    /// of index; otherwise they order by index.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        if self.handle == other.handle {
            Ordering::Equal
        } else {
            self.index.cmp(&other.index)
        }
    }

    pub(crate) fn replace_kind(&mut self, kind: CallbackKind<S>) {
        self.kind = kind;
    }

    pub(crate) fn into_kind(self) -> CallbackKind<S> {
        self.kind
    }
}

impl<S> Clone for Callback<S> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            index: self.index,
            kind: self.kind.clone(),
        }
    }
}

impl<S> fmt::Debug for Callback<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("handle", &self.handle)
            .field("index", &self.index)
            .field("variant", &self.variant())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CallbackSpec
// ─────────────────────────────────────────────────────────────────────────────

enum Target<S> {
    /// Variant chosen from the callable's arity.
    Auto(Callable<S>),
    Plain(Callable<S>),
    Context(Callable<S>),
    Method(Method<S>),
}

/// Description of a callback to add to a hook.
///
/// ```
/// use hookchain_core::{Callable, CallbackSpec};
/// use serde_json::Value;
///
/// struct Widget;
///
/// let spec = CallbackSpec::new(Callable::<Widget>::nullary(|_| Ok(Value::Null)))
///     .named("refresh");
/// assert_eq!(spec.handle().and_then(|h| h.as_name()), Some("refresh"));
/// ```
pub struct CallbackSpec<S> {
    handle: Option<Handle>,
    target: Target<S>,
}

impl<S> CallbackSpec<S> {
    /// Selects the variant from the callable's arity: zero parameters yield a
    /// [`ContextCallback`], anything else a [`PlainCallback`].
    #[must_use]
    pub fn new(callable: Callable<S>) -> Self {
        Self::with_target(Target::Auto(callable))
    }

    /// Always yields a [`PlainCallback`].
    #[must_use]
    pub fn plain(callable: Callable<S>) -> Self {
        Self::with_target(Target::Plain(callable))
    }

    /// Always yields a [`ContextCallback`]; adding it fails unless the
    /// callable has zero arity.
    #[must_use]
    pub fn context(callable: Callable<S>) -> Self {
        Self::with_target(Target::Context(callable))
    }

    /// Yields a [`MethodCallback`] whose handle defaults to the method name.
    #[must_use]
    pub fn method(method: Method<S>) -> Self {
        Self::with_target(Target::Method(method))
    }

    fn with_target(target: Target<S>) -> Self {
        Self {
            handle: None,
            target,
        }
    }

    /// Sets an explicit handle.
    #[must_use]
    pub fn named(mut self, handle: impl Into<Handle>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// Returns the explicit handle, if any.
    #[must_use]
    pub fn handle(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }

    /// Returns the arity the resulting callback will project events onto,
    /// or zero for a context-rebound callable.
    #[must_use]
    pub fn arity(&self) -> crate::Arity {
        match &self.target {
            Target::Auto(callable) | Target::Plain(callable) | Target::Context(callable) => {
                callable.arity()
            }
            Target::Method(method) => method.arity(),
        }
    }

    /// Returns the variant this spec produces.
    #[must_use]
    pub fn variant(&self) -> CallbackVariant {
        match &self.target {
            Target::Auto(callable) if callable.arity().is_zero() => {
                CallbackVariant::ContextRebound
            }
            Target::Auto(_) | Target::Plain(_) => CallbackVariant::Plain,
            Target::Context(_) => CallbackVariant::ContextRebound,
            Target::Method(_) => CallbackVariant::BoundMethod,
        }
    }

    /// Builds the callback at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ContextArity`] for a context spec whose callable
    /// declares parameters.
    pub fn into_callback(self, index: usize) -> Result<Callback<S>, HookError> {
        let Self { handle, target } = self;
        match target {
            Target::Auto(callable) if callable.arity().is_zero() => {
                Callback::context(handle, callable, index)
            }
            Target::Auto(callable) | Target::Plain(callable) => {
                Ok(Callback::plain(handle, callable, index))
            }
            Target::Context(callable) => Callback::context(handle, callable, index),
            Target::Method(method) => Ok(Callback::method(handle, method, index)),
        }
    }
}

impl<S> From<Callable<S>> for CallbackSpec<S> {
    fn from(callable: Callable<S>) -> Self {
        Self::new(callable)
    }
}

impl<S> From<Method<S>> for CallbackSpec<S> {
    fn from(method: Method<S>) -> Self {
        Self::method(method)
    }
}

impl<S> fmt::Debug for CallbackSpec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSpec")
            .field("handle", &self.handle)
            .field("variant", &self.variant())
            .field("arity", &self.arity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Arity;
    use crate::name::HookName;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    struct Source {
        label: &'static str,
    }

    fn noop(arity: usize) -> Callable<Source> {
        Callable::new(arity, |_| Ok(Value::Null))
    }

    fn bare(handle: &str, index: usize) -> Callback<Source> {
        Callback::plain(Some(handle.into()), noop(0), index)
    }

    #[test]
    fn sorts_after_lower_index() {
        assert_eq!(bare("cb1", 1).compare(&bare("cb2", 0)), Ordering::Greater);
    }

    #[test]
    fn sorts_before_higher_index() {
        assert_eq!(bare("cb1", 1).compare(&bare("cb2", 2)), Ordering::Less);
    }

    #[test]
    fn equal_index_compares_equal() {
        assert_eq!(bare("cb1", 1).compare(&bare("cb2", 1)), Ordering::Equal);
    }

    #[test]
    fn same_handle_compares_equal_regardless_of_index() {
        assert_eq!(bare("cb1", 1).compare(&bare("cb1", 2)), Ordering::Equal);
    }

    #[test]
    fn anonymous_handle_is_index() {
        let callback = Callback::plain(None, noop(0), 4);
        assert_eq!(callback.handle(), &Handle::Index(4));
    }

    #[test]
    fn plain_callback_receives_projected_arguments() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let callback = Callback::plain(
            None,
            Callable::new(2usize, move |call| {
                seen_clone
                    .lock()
                    .unwrap()
                    .extend(call.args().iter().filter_map(|a| a.as_value().cloned()));
                assert!(call.receiver().is_none());
                Ok(Value::Null)
            }),
            1,
        );

        let source = Source { label: "s" };
        let event = Event::new(&source, HookName::new("on_signal").unwrap(), ("a", "b"));
        callback.call(&event).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![json!("a"), json!("b")]);
    }

    #[test]
    fn plain_callback_with_wrong_arity_fails_at_dispatch() {
        let callback = Callback::plain(None, noop(1), 0);
        let source = Source { label: "s" };
        let event = Event::new(&source, HookName::new("on_signal").unwrap(), ("a", "b"));

        assert!(callback.call(&event).unwrap_err().is_arity_mismatch());
    }

    #[test]
    fn context_callback_runs_against_source() {
        let callback = Callback::context(
            Some("ctx".into()),
            Callable::<Source>::nullary(|call| {
                assert!(call.is_empty());
                Ok(json!(call.receiver().map(|s| s.label)))
            }),
            0,
        )
        .unwrap();

        let source = Source { label: "instance" };
        let event = Event::new(&source, HookName::new("on_signal").unwrap(), ("a", "b"));
        assert_eq!(callback.call(&event).unwrap(), json!("instance"));
        assert_eq!(callback.variant(), CallbackVariant::ContextRebound);
    }

    #[test]
    fn context_callback_rejects_parameters() {
        let err = Callback::context(None, noop(1), 0).unwrap_err();
        assert!(matches!(err, HookError::ContextArity(Arity::Fixed(1))));

        let variadic = Callable::<Source>::variadic(|_| Ok(Value::Null));
        assert!(matches!(
            Callback::context(None, variadic, 0),
            Err(HookError::ContextArity(Arity::Variadic))
        ));
    }

    #[test]
    fn method_callback_binds_source_and_defaults_handle() {
        let method = Method::new(
            "describe",
            Callable::<Source>::new(2usize, |call| {
                let label = call.receiver().map(|s| s.label).unwrap_or_default();
                let first = call.value(0).cloned().unwrap_or_default();
                Ok(json!([label, first]))
            }),
        );
        let callback = Callback::method(None, method, 3);
        assert_eq!(callback.handle(), &Handle::from("describe"));
        assert_eq!(callback.variant(), CallbackVariant::BoundMethod);

        let source = Source { label: "widget" };
        let event = Event::new(&source, HookName::new("on_signal").unwrap(), ("a", "b"));
        assert_eq!(callback.call(&event).unwrap(), json!(["widget", "a"]));
    }

    #[test]
    fn callback_errors_propagate_unchanged() {
        let callback = Callback::plain(
            None,
            Callable::<Source>::variadic(|_| Err(HookError::failed("boom"))),
            0,
        );
        let source = Source { label: "s" };
        let event = Event::new(&source, HookName::new("on_signal").unwrap(), ());

        match callback.call(&event) {
            Err(HookError::Callback(inner)) => assert_eq!(inner.to_string(), "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn spec_selects_variant_from_arity() {
        assert_eq!(
            CallbackSpec::new(noop(0)).variant(),
            CallbackVariant::ContextRebound
        );
        assert_eq!(CallbackSpec::new(noop(3)).variant(), CallbackVariant::Plain);
        assert_eq!(
            CallbackSpec::new(Callable::<Source>::variadic(|_| Ok(Value::Null))).variant(),
            CallbackVariant::Plain
        );
        assert_eq!(CallbackSpec::plain(noop(0)).variant(), CallbackVariant::Plain);

        let callback = CallbackSpec::new(noop(0)).named("n").into_callback(5).unwrap();
        assert_eq!(callback.handle(), &Handle::from("n"));
        assert_eq!(callback.index(), 5);
        assert_eq!(callback.variant(), CallbackVariant::ContextRebound);
    }

    #[test]
    fn forced_context_spec_checks_arity() {
        let err = CallbackSpec::context(noop(2)).into_callback(0).unwrap_err();
        assert!(err.is_arity_mismatch());
    }
}
