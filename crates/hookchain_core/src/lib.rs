//! Ordered, delegating callback dispatch for hookchain (Layer 1).
//!
//! `hookchain_core` provides the primitives behind named hooks:
//!
//! - [`Event`] - one trigger of a hook, projected onto each callback's [`Arity`]
//! - [`Callable`] - a callback body with a declared arity
//! - [`Callback`] - a registered callable with a [`Handle`] and an insertion index
//! - [`CallbackSet`] - callbacks in insertion order, addressable by index or handle
//! - [`Hook`] - a named extension point delegating to a parent hook
//! - [`NullHook`] - the terminal link of every delegation chain
//!
//! # Architecture
//!
//! - **Layer 1** (`hookchain_core`): hooks, callbacks and events (this crate)
//! - **Layer 2** (`hookchain_registry`): per-entity hook registries, method
//!   tables and specialization
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use hookchain_core::{Callable, Event, Hook};
//! use serde_json::Value;
//!
//! struct Sensor;
//!
//! let hook = Arc::new(Hook::<Sensor>::new("on_signal")?);
//!
//! // Three parameters on a two-argument hook: the event comes first.
//! hook.add_plain_callback(Callable::new(3usize, |call| {
//!     let event = call.event().expect("event is the first argument");
//!     assert_eq!(event.name().as_str(), "on_signal");
//!     assert_eq!(call.value(1), Some(&Value::from("purple")));
//!     Ok(Value::Null)
//! }));
//!
//! let sensor = Sensor;
//! let event = Event::new(&sensor, hook.name().clone(), ("purple", "grape"));
//! hook.execute_callbacks(&event)?;
//! # Ok::<(), hookchain_core::HookError>(())
//! ```

/// Type-erased callback bodies.
pub mod callable;

/// Callbacks and their invocation strategies.
pub mod callback;

/// Ordered callback collection.
pub mod callback_set;

/// Error types.
pub mod error;

/// Hook invocation records and argument projection.
pub mod event;

/// Callback handles.
pub mod handle;

/// Hooks and the delegation chain.
pub mod hook;

/// Method descriptors and resolution.
pub mod method;

/// Hook names.
pub mod name;

/// Argument values.
pub mod value;

pub use callable::{Call, Callable};
pub use callback::{
    Callback, CallbackKind, CallbackSpec, CallbackVariant, ContextCallback, MethodCallback,
    PlainCallback,
};
pub use callback_set::CallbackSet;
pub use error::{BoxError, CallResult, HookError};
pub use event::{Arg, Arity, Event};
pub use handle::Handle;
pub use hook::{Hook, HookChain, NullHook};
pub use method::{BoundMethod, Method, ResolveMethod};
pub use name::HookName;
pub use value::{IntoArguments, Value};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::callable::*;
    pub use crate::callback::*;
    pub use crate::callback_set::*;
    pub use crate::error::*;
    pub use crate::event::*;
    pub use crate::handle::*;
    pub use crate::hook::*;
    pub use crate::method::*;
    pub use crate::name::*;
    pub use crate::value::*;
}
