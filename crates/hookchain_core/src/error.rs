//! Error types for hook construction and dispatch.

use crate::event::Arity;
use crate::handle::Handle;
use thiserror::Error;

/// Boxed error raised from inside a callback body.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Result returned by every callback body.
pub type CallResult = Result<crate::Value, HookError>;

/// Errors that can occur while building hooks or dispatching events.
#[derive(Debug, Error)]
pub enum HookError {
    /// A hook name is not an atomic symbolic token.
    #[error("invalid hook name '{0}': expected an identifier such as `on_signal`")]
    InvalidHookName(String),

    /// A callback's declared arity does not fit the hook's argument shape.
    #[error("arity mismatch: callback declares {arity} parameter(s) but the hook passes {arguments}")]
    ArityMismatch {
        /// Arity declared by the callback.
        arity: Arity,
        /// Number of arguments carried by the event.
        arguments: usize,
    },

    /// A context-rebound callback was built from a callable that declares
    /// parameters.
    #[error("context-rebound callback must take no parameters, but declares {0}")]
    ContextArity(Arity),

    /// A declared arity that cannot be represented (negative, other than `-1`).
    #[error("invalid declared arity {0}: expected -1 or a non-negative count")]
    InvalidArity(i64),

    /// No hook with this name is defined on the entity.
    #[error("unknown hook: {0}")]
    UnknownHook(String),

    /// The method resolver has no method with this name.
    #[error("unknown method '{method}' on {type_name}")]
    UnknownMethod {
        /// Name of the requested method.
        method: String,
        /// Type the method was resolved against.
        type_name: &'static str,
    },

    /// A hook was triggered with a different number of arguments than it declares.
    #[error("hook '{hook}' declares {expected} argument(s) but was triggered with {actual}")]
    ArgumentCount {
        /// Name of the triggered hook.
        hook: String,
        /// Declared parameter count.
        expected: usize,
        /// Number of arguments supplied by the trigger.
        actual: usize,
    },

    /// A callback with this handle is already registered on the hook.
    #[error("hook '{hook}' already has a callback with handle {handle}")]
    DuplicateHandle {
        /// Name of the hook holding the existing callback.
        hook: String,
        /// The colliding handle.
        handle: Handle,
    },

    /// An error raised by a callback body. Propagated unchanged.
    #[error(transparent)]
    Callback(BoxError),
}

impl HookError {
    /// Creates a [`Callback`](Self::Callback) error from any error value.
    pub fn callback(err: impl Into<BoxError>) -> Self {
        Self::Callback(err.into())
    }

    /// Creates a [`Callback`](Self::Callback) error from a message.
    pub fn failed(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self::Callback(msg.into())
    }

    /// Returns `true` for [`ArityMismatch`](Self::ArityMismatch) and
    /// [`ContextArity`](Self::ContextArity).
    #[must_use]
    pub fn is_arity_mismatch(&self) -> bool {
        matches!(self, Self::ArityMismatch { .. } | Self::ContextArity(_))
    }
}
