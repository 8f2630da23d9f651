//! Type-erased callback bodies with a declared arity.

use crate::error::CallResult;
use crate::event::{Arg, Arity, Event};
use crate::value::Value;
use core::fmt;
use std::sync::Arc;

/// The arguments a callback body is invoked with.
///
/// `receiver` is the entity the body runs against. It is set for
/// context-rebound and bound-method invocations and absent for plain ones,
/// which reach the source through the event argument instead.
pub struct Call<'a, S> {
    receiver: Option<&'a S>,
    args: Vec<Arg<'a, S>>,
}

impl<'a, S> Call<'a, S> {
    /// Creates a call with the given receiver and positional arguments.
    #[must_use]
    pub fn new(receiver: Option<&'a S>, args: Vec<Arg<'a, S>>) -> Self {
        Self { receiver, args }
    }

    /// Returns the receiver, if the body runs in the context of a source.
    #[must_use]
    pub fn receiver(&self) -> Option<&'a S> {
        self.receiver
    }

    /// Returns the positional arguments.
    #[must_use]
    pub fn args(&self) -> &[Arg<'a, S>] {
        &self.args
    }

    /// Returns the argument at `position`.
    #[must_use]
    pub fn arg(&self, position: usize) -> Option<Arg<'a, S>> {
        self.args.get(position).copied()
    }

    /// Returns the captured value at `position`.
    ///
    /// Returns `None` if the argument at that position is the event.
    #[must_use]
    pub fn value(&self, position: usize) -> Option<&'a Value> {
        self.arg(position).and_then(|arg| arg.as_value())
    }

    /// Returns the event if it was passed as the first argument.
    #[must_use]
    pub fn event(&self) -> Option<&'a Event<'a, S>> {
        self.arg(0).and_then(|arg| arg.as_event())
    }

    /// Returns the number of positional arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns `true` if no positional arguments were passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl<S> fmt::Debug for Call<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("has_receiver", &self.receiver.is_some())
            .field("args", &self.args)
            .finish()
    }
}

type Body<S> = dyn for<'a> Fn(Call<'a, S>) -> CallResult + Send + Sync;

/// A callback body together with the number of parameters it declares.
///
/// The declared arity decides both how the event is projected before the
/// call and, when registered through
/// [`CallbackSpec::new`](crate::CallbackSpec::new), which callback variant
/// wraps it: a zero-arity callable runs in the context of the source.
pub struct Callable<S> {
    arity: Arity,
    body: Arc<Body<S>>,
}

impl<S> Callable<S> {
    /// Wraps `body` with the declared `arity`.
    pub fn new<F>(arity: impl Into<Arity>, body: F) -> Self
    where
        F: Fn(Call<'_, S>) -> CallResult + Send + Sync + 'static,
    {
        Self {
            arity: arity.into(),
            body: Arc::new(body),
        }
    }

    /// Wraps a body that declares no parameters.
    pub fn nullary<F>(body: F) -> Self
    where
        F: Fn(Call<'_, S>) -> CallResult + Send + Sync + 'static,
    {
        Self::new(Arity::ZERO, body)
    }

    /// Wraps a body that accepts any number of parameters.
    pub fn variadic<F>(body: F) -> Self
    where
        F: Fn(Call<'_, S>) -> CallResult + Send + Sync + 'static,
    {
        Self::new(Arity::Variadic, body)
    }

    /// Returns the declared arity.
    #[must_use]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Runs the body.
    ///
    /// # Errors
    ///
    /// Returns whatever error the body returns, unchanged.
    pub fn invoke(&self, call: Call<'_, S>) -> CallResult {
        (self.body)(call)
    }
}

impl<S> Clone for Callable<S> {
    fn clone(&self) -> Self {
        Self {
            arity: self.arity,
            body: Arc::clone(&self.body),
        }
    }
}

impl<S> fmt::Debug for Callable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
