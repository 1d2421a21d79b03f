use std::{borrow::Borrow, cmp::Ordering, fmt, mem};

use crate::{
    Color, Comparable, Diagnostic, Link, NodeId, OrderedMap, Sequence, Side, Sink, TracingSink,
    alloc::Arena,
};

impl<K, V> OrderedMap<K, V, TracingSink> {
    /// An empty map reporting through `tracing`.
    pub const fn new() -> Self {
        Self::with_sink(TracingSink)
    }
}

impl<K, V, S: Sink + Default> Default for OrderedMap<K, V, S> {
    fn default() -> Self {
        Self::with_sink(S::default())
    }
}

impl<K, V, S> Drop for OrderedMap<K, V, S> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    pub const fn with_sink(sink: S) -> Self {
        OrderedMap {
            arena: Arena::new(),
            root: None,
            len: 0,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nodes on the longest root-to-leaf path; zero when empty.
    pub fn height(&self) -> usize {
        self.arena.height(self.root)
    }

    /// Frees every entry, children before their parents, and leaves the map
    /// empty.
    pub fn clear(&mut self) {
        let mut cursor = self.root.take();
        while let Some(current) = cursor {
            let Some(node) = self.arena.get(Some(current)) else {
                break;
            };
            if node.left.is_some() {
                cursor = node.left;
                continue;
            }
            if node.right.is_some() {
                cursor = node.right;
                continue;
            }
            // A leaf: cut it loose from its parent and drop it.
            let parent = node.parent;
            if self.arena.left(parent) == Some(current) {
                self.arena.set_child(parent, Side::Left, None);
            } else {
                self.arena.set_child(parent, Side::Right, None);
            }
            drop(self.arena.release(current));
            cursor = parent;
        }
        self.arena.reset();
        self.len = 0;
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.arena.get(self.arena.first(self.root)).map(|n| (&n.key, &n.value))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.arena.get(self.arena.last(self.root)).map(|n| (&n.key, &n.value))
    }

    fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Comparable + ?Sized,
    {
        let mut cursor = self.root;
        while let Some(candidate) = self.arena.get(cursor) {
            let stored = candidate.key.borrow();
            if key.equals(stored) {
                break;
            }
            cursor = match key.compare(stored) {
                Ordering::Greater => candidate.right,
                _ => candidate.left,
            };
        }
        cursor
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Comparable + ?Sized,
    {
        self.find(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Comparable + ?Sized,
    {
        self.arena.get(self.find(key)).map(|n| &n.value)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Comparable + ?Sized,
    {
        self.arena.get(self.find(key)).map(|n| (&n.key, &n.value))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Comparable + ?Sized,
    {
        let found = self.find(key);
        self.arena.get_mut(found).map(|n| &mut n.value)
    }

    /// Swaps in `value` for an existing key and returns the previous value.
    /// Absent keys are left absent.
    pub fn replace<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Comparable + ?Sized,
    {
        self.get_mut(key).map(|slot| mem::replace(slot, value))
    }
}

impl<K, V, S: Sink> OrderedMap<K, V, S> {
    /// Adds a mapping. Returns `false`, leaving the map as it was, when an
    /// equal key is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool
    where
        K: Comparable,
    {
        if self.contains_key(&key) {
            return false;
        }

        let Some(mut parent) = self.root else {
            let id = self.arena.allocate(key, value, None, Color::Black);
            self.root = Some(id);
            self.len += 1;
            return true;
        };

        let side = loop {
            let candidate = &self.arena[parent];
            let side = if key.compare(&candidate.key) == Ordering::Less {
                Side::Left
            } else {
                if key.equals(&candidate.key) {
                    self.report(Diagnostic::KeyCollision);
                }
                Side::Right
            };
            match self.arena.child(Some(parent), side) {
                Some(next) => parent = next,
                None => break side,
            }
        };

        let id = self.arena.allocate(key, value, Some(parent), Color::Red);
        self.arena.set_child(Some(parent), side, Some(id));
        self.rebalance_insert(id);
        self.arena.set_color(self.root, Color::Black);
        self.len += 1;
        true
    }

    /// Removes the entry for `key`, dropping both key and value.
    pub fn delete_entry<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Comparable + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes the entry for `key` and returns its value. The stored key is
    /// dropped here; the caller's `key` is only borrowed.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Comparable + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes the entry for `key` and returns the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Comparable + ?Sized,
    {
        let found: NodeId = self.find(key)?;
        self.detach(found)
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.arena.first(self.root)?;
        self.detach(first)
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.arena.last(self.root)?;
        self.detach(last)
    }

    /// Appends every key to `keys` and every value to `values`, in ascending
    /// key order; either may be omitted. A traversal that does not visit
    /// exactly [`Self::len`] entries is reported as
    /// [`Diagnostic::CountMismatch`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::OrderedMap;
    ///
    /// let map: OrderedMap<_, _> = [(2, 'b'), (1, 'a')].into_iter().collect();
    /// let mut keys = Vec::new();
    /// let mut values = Vec::new();
    /// map.sorted_lists(Some(&mut keys), Some(&mut values));
    /// assert_eq!(keys, [&1, &2]);
    /// assert_eq!(values, [&'a', &'b']);
    /// ```
    pub fn sorted_lists<'a, KS, VS>(&'a self, mut keys: Option<&mut KS>, mut values: Option<&mut VS>)
    where
        KS: Sequence<&'a K> + ?Sized,
        VS: Sequence<&'a V> + ?Sized,
    {
        if self.root.is_none() && self.len == 0 {
            return;
        }
        let keys_before = keys.as_deref().map(|seq| seq.len());
        let values_before = values.as_deref().map(|seq| seq.len());

        let mut cursor = self.arena.first(self.root);
        while let Some(node) = self.arena.get(cursor) {
            if let Some(keys) = keys.as_deref_mut() {
                keys.append(&node.key);
            }
            if let Some(values) = values.as_deref_mut() {
                values.append(&node.value);
            }
            cursor = cursor.and_then(|id| self.arena.next(id));
        }

        let keys_listed = keys
            .as_deref()
            .zip(keys_before)
            .map(|(seq, before)| seq.len().saturating_sub(before));
        let values_listed = values
            .as_deref()
            .zip(values_before)
            .map(|(seq, before)| seq.len().saturating_sub(before));
        for listed in [keys_listed, values_listed].into_iter().flatten() {
            if listed != self.len {
                self.report(Diagnostic::CountMismatch {
                    listed,
                    len: self.len,
                });
            }
        }
    }

    pub fn sorted_keys<'a, KS>(&'a self, keys: &mut KS)
    where
        KS: Sequence<&'a K> + ?Sized,
    {
        self.sorted_lists(Some(keys), None::<&mut Vec<&'a V>>);
    }

    pub fn sorted_values<'a, VS>(&'a self, values: &mut VS)
    where
        VS: Sequence<&'a V> + ?Sized,
    {
        self.sorted_lists(None::<&mut Vec<&'a K>>, Some(values));
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for OrderedMap<K, V, S> {
    fn clone(&self) -> Self {
        OrderedMap {
            arena: self.arena.clone(),
            root: self.root,
            len: self.len,
            sink: self.sink.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for OrderedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
