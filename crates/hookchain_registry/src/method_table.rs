//! Method tables.

use hookchain_core::{Callable, Method, ResolveMethod};
use indexmap::IndexMap;

/// The methods an entity type exposes to bound-method callbacks, keyed by
/// name in declaration order.
pub struct MethodTable<S> {
    methods: IndexMap<String, Method<S>>,
}

impl<S> Default for MethodTable<S> {
    fn default() -> Self {
        Self {
            methods: IndexMap::new(),
        }
    }
}

impl<S> MethodTable<S> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares method `name` and returns the table.
    #[must_use]
    pub fn with_method(mut self, name: impl Into<String>, callable: Callable<S>) -> Self {
        self.insert(Method::new(name, callable));
        self
    }

    /// Declares `method`, returning the descriptor it replaces.
    pub fn insert(&mut self, method: Method<S>) -> Option<Method<S>> {
        self.methods.insert(method.name().to_owned(), method)
    }

    /// Returns the method called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Method<S>> {
        self.methods.get(name)
    }

    /// Returns whether a method called `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Returns the method names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }

    /// Returns the number of methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if no method is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<S> ResolveMethod<S> for MethodTable<S> {
    fn resolve_method(&self, name: &str) -> Option<Method<S>> {
        self.methods.get(name).cloned()
    }
}

impl<S> core::fmt::Debug for MethodTable<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookchain_core::{Arity, Value};

    struct Robot;

    fn table() -> MethodTable<Robot> {
        MethodTable::new()
            .with_method("do_stuff", Callable::nullary(|_| Ok(Value::Null)))
            .with_method("beep", Callable::new(2usize, |_| Ok(Value::Null)))
    }

    #[test]
    fn resolves_declared_methods() {
        let table = table();
        let method = table.resolve_method("beep").unwrap();
        assert_eq!(method.name(), "beep");
        assert_eq!(method.arity(), Arity::Fixed(2));
        assert!(table.resolve_method("missing").is_none());
    }

    #[test]
    fn keeps_declaration_order() {
        assert_eq!(table().names(), ["do_stuff", "beep"]);
    }

    #[test]
    fn redeclaring_replaces() {
        let mut table = table();
        let previous = table.insert(Method::new("beep", Callable::variadic(|_| Ok(Value::Null))));
        assert_eq!(previous.as_ref().map(Method::arity), Some(Arity::Fixed(2)));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("beep").unwrap().arity(), Arity::Variadic);
    }
}
