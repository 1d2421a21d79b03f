use std::collections::VecDeque;

/// An append-only output buffer, as filled by [`crate::OrderedMap::sorted_lists`].
pub trait Sequence<T> {
    fn append(&mut self, item: T);

    /// Everything the sequence holds, including what was there before the
    /// map appended to it. Only consulted by the count check in
    /// `sorted_lists`, which compares it before and after the walk; the map
    /// never reads any item back.
    fn len(&self) -> usize;
}

impl<T> Sequence<T> for Vec<T> {
    #[inline]
    fn append(&mut self, item: T) {
        self.push(item);
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<T> Sequence<T> for VecDeque<T> {
    #[inline]
    fn append(&mut self, item: T) {
        self.push_back(item);
    }

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }
}
