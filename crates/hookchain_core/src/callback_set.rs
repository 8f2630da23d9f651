//! Ordered, dual-indexed callback collection.

use crate::callback::Callback;
use crate::handle::Handle;
use core::cmp::Ordering;
use core::fmt;
use hashbrown::HashMap;

/// Ordered collection of the callbacks owned by one hook.
///
/// Callbacks are kept in ascending `index` order and can be addressed by
/// index or by handle (see [`Handle`] for the key rules). Inserting a
/// callback whose handle is already present replaces the existing
/// callback's invocation logic in place: the first-inserted callback keeps
/// its index and position.
pub struct CallbackSet<S> {
    /// Sorted by `index`.
    entries: Vec<Callback<S>>,
    /// Handle to index.
    by_handle: HashMap<Handle, usize>,
    /// One past the highest index ever inserted.
    next_index: usize,
}

impl<S> Default for CallbackSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CallbackSet<S> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_handle: HashMap::new(),
            next_index: 0,
        }
    }

    /// Returns the index the next callback added through a hook receives.
    ///
    /// Equal to [`len`](Self::len) until a callback is removed; indices are
    /// never handed out twice.
    #[must_use]
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Inserts `callback` and returns its handle.
    pub fn insert(&mut self, callback: Callback<S>) -> Handle {
        let handle = callback.handle().clone();

        if let Some(position) = self.position_of_handle(&handle) {
            self.entries[position].replace_kind(callback.into_kind());
            return handle;
        }

        let index = callback.index();
        self.next_index = self.next_index.max(index.saturating_add(1));
        let position = self.entries.partition_point(|entry| entry.index() <= index);
        self.entries.insert(position, callback);
        self.by_handle.insert(handle.clone(), index);
        handle
    }

    /// Returns the callback matching `key`.
    ///
    /// [`Handle::Index`] keys match on `index`, not on position.
    #[must_use]
    pub fn get(&self, key: impl Into<Handle>) -> Option<&Callback<S>> {
        self.position(&key.into()).map(|position| &self.entries[position])
    }

    /// Returns `true` if a callback matches `key`.
    #[must_use]
    pub fn contains(&self, key: impl Into<Handle>) -> bool {
        self.position(&key.into()).is_some()
    }

    /// Removes and returns the callback matching `key`. Absent keys are a no-op.
    pub fn remove(&mut self, key: impl Into<Handle>) -> Option<Callback<S>> {
        let position = self.position(&key.into())?;
        let callback = self.entries.remove(position);
        self.by_handle.remove(callback.handle());
        Some(callback)
    }

    /// Returns the number of callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set holds no callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates callbacks in ascending index order.
    pub fn iter(&self) -> core::slice::Iter<'_, Callback<S>> {
        self.entries.iter()
    }

    /// Returns the handles in ascending index order.
    #[must_use]
    pub fn handles(&self) -> Vec<&Handle> {
        self.entries.iter().map(Callback::handle).collect()
    }

    /// Removes every callback. The index counter keeps counting.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_handle.clear();
    }

    /// Compares two callbacks the way this set orders them.
    #[must_use]
    pub fn compare(a: &Callback<S>, b: &Callback<S>) -> Ordering {
        a.compare(b)
    }

    fn position(&self, key: &Handle) -> Option<usize> {
        match key {
            Handle::Index(index) => self.position_of_index(*index),
            Handle::Name(_) => self.position_of_handle(key),
        }
    }

    fn position_of_index(&self, index: usize) -> Option<usize> {
        let position = self.entries.partition_point(|entry| entry.index() < index);
        self.entries
            .get(position)
            .filter(|entry| entry.index() == index)
            .map(|_| position)
    }

    fn position_of_handle(&self, handle: &Handle) -> Option<usize> {
        let index = *self.by_handle.get(handle)?;
        let start = self.entries.partition_point(|entry| entry.index() < index);
        self.entries[start..]
            .iter()
            .take_while(|entry| entry.index() == index)
            .position(|entry| entry.handle() == handle)
            .map(|offset| start + offset)
    }
}

impl<S> Clone for CallbackSet<S> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            by_handle: self.by_handle.clone(),
            next_index: self.next_index,
        }
    }
}

impl<'a, S> IntoIterator for &'a CallbackSet<S> {
    type Item = &'a Callback<S>;
    type IntoIter = core::slice::Iter<'a, Callback<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S> fmt::Debug for CallbackSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callable::Callable;
    use crate::callback::CallbackVariant;
    use proptest::prelude::*;
    use serde_json::Value;

    struct Source;

    fn bare(handle: &str, index: usize) -> Callback<Source> {
        Callback::plain(Some(handle.into()), Callable::new(0usize, |_| Ok(Value::Null)), index)
    }

    fn three_callbacks() -> CallbackSet<Source> {
        let mut set = CallbackSet::new();
        set.insert(bare("cb1", 1));
        set.insert(bare("cb3", 3));
        set.insert(bare("cb2", 2));
        set
    }

    #[test]
    fn sorts_callbacks() {
        let set = three_callbacks();
        let handles: Vec<String> = set.iter().map(|cb| cb.handle().to_string()).collect();
        assert_eq!(handles, ["cb1", "cb2", "cb3"]);
    }

    #[test]
    fn locates_callbacks_by_index() {
        let set = three_callbacks();
        assert_eq!(set.get(1usize).unwrap().handle(), &Handle::from("cb1"));
        assert_eq!(set.get(2usize).unwrap().handle(), &Handle::from("cb2"));
        assert_eq!(set.get(3usize).unwrap().handle(), &Handle::from("cb3"));
    }

    #[test]
    fn missing_index_is_not_found() {
        let set = three_callbacks();
        assert!(set.get(4usize).is_none());
        assert!(set.get(0usize).is_none());
    }

    #[test]
    fn locates_callbacks_by_handle() {
        let set = three_callbacks();
        assert_eq!(set.get("cb1").unwrap().index(), 1);
        assert_eq!(set.get("cb2").unwrap().index(), 2);
        assert_eq!(set.get("cb3").unwrap().index(), 3);
        assert!(set.get("cb4").is_none());
    }

    #[test]
    fn insert_returns_handle() {
        let mut set = CallbackSet::new();
        assert_eq!(set.insert(bare("named", 0)), Handle::from("named"));
        let anonymous = Callback::plain(None, Callable::new(1usize, |_| Ok(Value::Null)), 1);
        assert_eq!(set.insert(anonymous), Handle::Index(1));
    }

    #[test]
    fn remove_by_handle_and_index() {
        let mut set = three_callbacks();
        assert_eq!(set.remove("cb2").unwrap().index(), 2);
        assert_eq!(set.remove(3usize).unwrap().handle(), &Handle::from("cb3"));
        assert_eq!(set.len(), 1);
        assert!(!set.contains("cb2"));
        assert!(!set.contains(3usize));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut set = three_callbacks();
        assert!(set.remove("missing").is_none());
        assert!(set.remove(9usize).is_none());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn same_handle_replaces_logic_in_place() {
        let mut set = three_callbacks();
        let replacement = Callback::context(
            Some("cb1".into()),
            Callable::nullary(|_| Ok(Value::Bool(true))),
            7,
        )
        .unwrap();

        assert_eq!(set.insert(replacement), Handle::from("cb1"));
        assert_eq!(set.len(), 3);

        let first = set.iter().next().unwrap();
        assert_eq!(first.handle(), &Handle::from("cb1"));
        assert_eq!(first.index(), 1);
        assert_eq!(first.variant(), CallbackVariant::ContextRebound);
        assert_eq!(set.next_index(), 4);
    }

    #[test]
    fn next_index_never_reuses_removed_indices() {
        let mut set = CallbackSet::<Source>::new();
        for index in 0..3 {
            set.insert(Callback::plain(None, Callable::new(0usize, |_| Ok(Value::Null)), index));
        }
        assert_eq!(set.next_index(), 3);

        set.remove(0usize);
        assert_eq!(set.len(), 2);
        assert_eq!(set.next_index(), 3);

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.next_index(), 3);
    }

    #[test]
    fn highest_index_does_not_overflow_counter() {
        let mut set = CallbackSet::new();
        set.insert(bare("last", usize::MAX));
        set.insert(bare("first", 0));

        assert_eq!(set.next_index(), usize::MAX);
        assert_eq!(set.get(usize::MAX).unwrap().handle(), &Handle::from("last"));
        let handles: Vec<String> = set.iter().map(|cb| cb.handle().to_string()).collect();
        assert_eq!(handles, ["first", "last"]);
    }

    proptest! {
        #[test]
        fn iteration_is_always_ascending(
            indices in proptest::collection::hash_set(0usize..200, 0..40),
            removals in proptest::collection::vec(0usize..200, 0..20),
        ) {
            let mut set = CallbackSet::new();
            for (i, index) in indices.iter().enumerate() {
                set.insert(bare(&format!("cb{i}"), *index));
            }
            for index in &removals {
                set.remove(*index);
            }

            let ordered: Vec<usize> = set.iter().map(Callback::index).collect();
            prop_assert!(ordered.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(ordered.len(), set.len());

            for index in &ordered {
                prop_assert_eq!(set.get(*index).map(Callback::index), Some(*index));
            }
        }
    }
}
