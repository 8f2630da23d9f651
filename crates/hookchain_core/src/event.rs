//! Hook invocation records and argument projection.
//!
//! An [`Event`] captures one trigger of a hook: the source entity, the hook
//! name and the positional arguments. Before a callback runs, the event
//! projects itself onto the callback's declared [`Arity`] with
//! [`Event::to_args`]:
//!
//! | Declared arity | Arguments received |
//! |----------------|--------------------|
//! | variadic | `[event, args...]` |
//! | `N` (the hook's own argument count) | `[args...]` |
//! | `N + 1` | `[event, args...]` |
//! | anything else | [`HookError::ArityMismatch`] |

use crate::error::HookError;
use crate::name::HookName;
use crate::value::{IntoArguments, Value};
use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Arity
// ─────────────────────────────────────────────────────────────────────────────

/// Number of positional parameters a callback declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly this many parameters.
    Fixed(usize),
    /// Accepts any number of parameters; receives the event first.
    Variadic,
}

impl Arity {
    /// The zero-parameter arity.
    pub const ZERO: Self = Self::Fixed(0);

    /// Converts a declared parameter count, where `-1` means variadic.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvalidArity`] for negative counts other than `-1`.
    pub fn from_declared(declared: i64) -> Result<Self, HookError> {
        match declared {
            -1 => Ok(Self::Variadic),
            n if n >= 0 => usize::try_from(n)
                .map(Self::Fixed)
                .map_err(|_| HookError::InvalidArity(n)),
            n => Err(HookError::InvalidArity(n)),
        }
    }

    /// Returns the declared count, `-1` for variadic.
    #[must_use]
    pub fn declared(self) -> i64 {
        match self {
            Self::Fixed(n) => i64::try_from(n).unwrap_or(i64::MAX),
            Self::Variadic => -1,
        }
    }

    /// Returns `true` if the arity is exactly zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Returns `true` if a callback of this arity can receive `arguments`
    /// hook arguments.
    #[must_use]
    pub fn accepts(self, arguments: usize) -> bool {
        match self {
            Self::Variadic => true,
            Self::Fixed(n) => n == arguments || n == arguments + 1,
        }
    }
}

impl From<usize> for Arity {
    fn from(value: usize) -> Self {
        Self::Fixed(value)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Variadic => f.write_str("a variable number of"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Arg
// ─────────────────────────────────────────────────────────────────────────────

/// One positional argument handed to a callback.
pub enum Arg<'e, S> {
    /// The triggering event itself.
    Event(&'e Event<'e, S>),
    /// A value captured at trigger time.
    Value(&'e Value),
}

impl<'e, S> Arg<'e, S> {
    /// Returns the event if this argument is the event.
    #[must_use]
    pub fn as_event(&self) -> Option<&'e Event<'e, S>> {
        match self {
            Self::Event(event) => Some(event),
            Self::Value(_) => None,
        }
    }

    /// Returns the value if this argument is a captured value.
    #[must_use]
    pub fn as_value(&self) -> Option<&'e Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Event(_) => None,
        }
    }
}

impl<S> Clone for Arg<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Arg<'_, S> {}

impl<S> fmt::Debug for Arg<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(event) => f.debug_tuple("Event").field(&event.name()).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl<S> PartialEq<Value> for Arg<'_, S> {
    fn eq(&self, other: &Value) -> bool {
        self.as_value() == Some(other)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable record of one hook invocation.
pub struct Event<'s, S> {
    source: &'s S,
    name: HookName,
    arguments: Vec<Value>,
}

impl<'s, S> Event<'s, S> {
    /// Captures a trigger of hook `name` on behalf of `source`.
    pub fn new(source: &'s S, name: HookName, arguments: impl IntoArguments) -> Self {
        Self {
            source,
            name,
            arguments: arguments.into_arguments(),
        }
    }

    /// Returns the entity the hook fired for.
    #[must_use]
    pub fn source(&self) -> &'s S {
        self.source
    }

    /// Returns the name of the triggered hook.
    #[must_use]
    pub fn name(&self) -> &HookName {
        &self.name
    }

    /// Returns the captured arguments.
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Returns the captured argument at `position`.
    #[must_use]
    pub fn argument(&self, position: usize) -> Option<&Value> {
        self.arguments.get(position)
    }

    /// Projects the event onto a callback's declared arity.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ArityMismatch`] if `arity` is neither variadic,
    /// the argument count, nor the argument count plus one.
    pub fn to_args(&self, arity: Arity) -> Result<Vec<Arg<'_, S>>, HookError> {
        let count = self.arguments.len();
        let values = self.arguments.iter().map(Arg::Value);

        match arity {
            Arity::Fixed(n) if n == count => Ok(values.collect()),
            Arity::Variadic => Ok(core::iter::once(Arg::Event(self)).chain(values).collect()),
            Arity::Fixed(n) if n == count + 1 => {
                Ok(core::iter::once(Arg::Event(self)).chain(values).collect())
            }
            Arity::Fixed(_) => Err(HookError::ArityMismatch {
                arity,
                arguments: count,
            }),
        }
    }
}

impl<S> fmt::Debug for Event<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("source", &core::any::type_name::<S>())
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish()
    }
}
