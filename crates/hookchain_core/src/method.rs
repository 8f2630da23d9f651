//! Method descriptors and method resolution.
//!
//! A [`Method`] is the unbound form of a method declared on an entity type:
//! a name, the declaring type and a body that expects a receiver. Binding it
//! to a source yields a [`BoundMethod`], which is what a bound-method
//! callback invokes when its hook fires.

use crate::callable::{Call, Callable};
use crate::error::CallResult;
use crate::event::{Arg, Arity};
use core::fmt;

/// Unbound method descriptor.
pub struct Method<S> {
    name: String,
    declaring_type: &'static str,
    callable: Callable<S>,
}

impl<S> Method<S> {
    /// Declares method `name` on `S` with the given body.
    #[must_use]
    pub fn new(name: impl Into<String>, callable: Callable<S>) -> Self {
        Self {
            name: name.into(),
            declaring_type: core::any::type_name::<S>(),
            callable,
        }
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the declaring type.
    #[must_use]
    pub fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    /// Returns the declared arity.
    #[must_use]
    pub fn arity(&self) -> Arity {
        self.callable.arity()
    }

    /// Binds the method to `receiver`.
    #[must_use]
    pub fn bind<'a>(&'a self, receiver: &'a S) -> BoundMethod<'a, S> {
        BoundMethod {
            method: self,
            receiver,
        }
    }
}

impl<S> Clone for Method<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            declaring_type: self.declaring_type,
            callable: self.callable.clone(),
        }
    }
}

impl<S> fmt::Debug for Method<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type)
            .field("arity", &self.arity())
            .finish()
    }
}

/// A [`Method`] bound to a receiver.
pub struct BoundMethod<'a, S> {
    method: &'a Method<S>,
    receiver: &'a S,
}

impl<'a, S> BoundMethod<'a, S> {
    /// Returns the receiver this method is bound to.
    #[must_use]
    pub fn receiver(&self) -> &'a S {
        self.receiver
    }

    /// Invokes the method on its receiver with positional `args`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the method body returns, unchanged.
    pub fn call(&self, args: Vec<Arg<'a, S>>) -> CallResult {
        self.method
            .callable
            .invoke(Call::new(Some(self.receiver), args))
    }
}

/// Resolves method names against an entity type.
///
/// This is the capability bound-method callbacks are built from: given a
/// name, produce the descriptor (and thereby its arity) or nothing.
pub trait ResolveMethod<S> {
    /// Returns the method called `name`, if the type declares one.
    fn resolve_method(&self, name: &str) -> Option<Method<S>>;
}

impl<S, F> ResolveMethod<S> for F
where
    F: Fn(&str) -> Option<Method<S>>,
{
    fn resolve_method(&self, name: &str) -> Option<Method<S>> {
        self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Counter {
        step: i64,
    }

    fn advance() -> Method<Counter> {
        Method::new(
            "advance",
            Callable::<Counter>::new(1usize, |call| {
                let base = call.value(0).and_then(serde_json::Value::as_i64).unwrap_or(0);
                let step = call.receiver().map_or(0, |c| c.step);
                Ok(json!(base + step))
            }),
        )
    }

    #[test]
    fn descriptor_reports_name_type_and_arity() {
        let method = advance();
        assert_eq!(method.name(), "advance");
        assert!(method.declaring_type().ends_with("Counter"));
        assert_eq!(method.arity(), Arity::Fixed(1));
    }

    #[test]
    fn bound_method_runs_against_receiver() {
        let method = advance();
        let counter = Counter { step: 5 };
        let ten = json!(10);

        let bound = method.bind(&counter);
        assert!(core::ptr::eq(bound.receiver(), &counter));
        assert_eq!(bound.call(vec![Arg::Value(&ten)]).unwrap(), json!(15));
    }

    #[test]
    fn closures_resolve_methods() {
        let resolver = |name: &str| (name == "advance").then(advance);
        assert!(resolver.resolve_method("advance").is_some());
        assert!(resolver.resolve_method("retreat").is_none());
    }
}
