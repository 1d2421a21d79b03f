//! An ordered map kept on a red-black tree whose nodes live in an arena.
#![forbid(unsafe_code)]

mod alloc;
mod dump;
mod iter;
mod node;
mod root;
mod sequence;
mod sink;
mod tree;
mod verify;

use std::{cmp::Ordering, fmt};

use crate::alloc::Arena;

pub use dump::{Describe, Dump};
pub use iter::map::{IntoIter, IntoKeys, IntoValues, Iter, Keys, Values};
pub use sequence::Sequence;
pub use sink::{Diagnostic, Level, Recorder, Silent, Sink, TracingSink};
pub use verify::Violation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => f.write_str("RED"),
            Color::Black => f.write_str("BLACK"),
        }
    }
}

/// Which child slot of a parent a node occupies; also names a rotation
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline(always)]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Where a node hangs in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position {
    Root,
    Child(Side),
}

/// Index of a node slot inside a map's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) type Link = Option<NodeId>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    // Non-owning; `None` only at the root.
    pub(crate) parent: Link,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

/// Ordering capability for keys.
///
/// `compare` steers the tree walk and `equals` confirms a match. Every
/// [`Ord`] type gets both for free; a type that implements the trait by hand
/// should keep the two consistent, otherwise lookups may miss entries that
/// are present and inserts report [`Diagnostic::KeyCollision`].
pub trait Comparable {
    fn compare(&self, other: &Self) -> Ordering;

    fn equals(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl<T: Ord + ?Sized> Comparable for T {
    #[inline(always)]
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    #[inline(always)]
    fn equals(&self, other: &Self) -> bool {
        self == other
    }
}

/// An ordered map backed by a red-black tree.
///
/// Entries stay sorted by key; lookup, insertion and removal are
/// logarithmic. Structural surprises (rotation on a node missing the needed
/// child, a node that is not a child of its own parent, a traversal that
/// disagrees with [`OrderedMap::len`], a key collision found while walking)
/// are reported to the sink `S` and never abort the operation.
///
/// # Examples
///
/// ```
/// use rbmap::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// assert!(map.insert(5, "five"));
/// assert!(map.insert(3, "three"));
/// assert!(!map.insert(5, "cinq"));
///
/// assert_eq!(map.get(&5), Some(&"five"));
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 5]);
/// ```
pub struct OrderedMap<K, V, S = TracingSink> {
    arena: Arena<K, V>,
    root: Link,
    len: usize,
    sink: S,
}
