pub(crate) mod map;

use std::{borrow::Borrow, ops::Index};

use crate::{Comparable, OrderedMap, Sink};

impl<K, Q: ?Sized, V, S> Index<&Q> for OrderedMap<K, V, S>
where
    K: Borrow<Q>,
    Q: Comparable,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `OrderedMap`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

/// Keeps the first value seen for each key; later duplicates are rejected
/// like any other duplicate insert.
impl<K: Comparable, V, S: Sink + Default> FromIterator<(K, V)> for OrderedMap<K, V, S> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> OrderedMap<K, V, S> {
        let mut map = OrderedMap::default();
        map.extend(iter);
        map
    }
}

impl<K: Comparable, V, S: Sink> Extend<(K, V)> for OrderedMap<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
