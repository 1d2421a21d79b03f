use std::{
    mem,
    ops::{Index, IndexMut},
};

use crate::{Color, Link, Node, NodeId};

/// Slot storage for tree nodes. A released slot is vacant until the next
/// allocation reuses it.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    vacant: Vec<NodeId>,
}

impl<K, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Arena<K, V> {
    pub(crate) const fn new() -> Self {
        Arena {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Places a detached node with no children and returns its id.
    pub(crate) fn allocate(&mut self, key: K, value: V, parent: Link, color: Color) -> NodeId {
        let node = Node {
            key,
            value,
            color,
            parent,
            left: None,
            right: None,
        };
        match self.vacant.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Vacates the slot and hands the node back; links held by other nodes
    /// are the caller's business.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<Node<K, V>> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.vacant.push(id);
        Some(node)
    }

    #[inline(always)]
    pub(crate) fn get(&self, link: Link) -> Option<&Node<K, V>> {
        self.slots.get(link?.0)?.as_ref()
    }

    #[inline(always)]
    pub(crate) fn get_mut(&mut self, link: Link) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(link?.0)?.as_mut()
    }

    /// Exchanges key and value between two nodes; identities, links and
    /// colors stay where they are.
    pub(crate) fn swap_payload(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (low, high) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.slots.split_at_mut(high);
        if let (Some(Some(x)), Some(Some(y))) = (head.get_mut(low), tail.first_mut()) {
            mem::swap(&mut x.key, &mut y.key);
            mem::swap(&mut x.value, &mut y.value);
        }
    }

    #[cfg(test)]
    pub(crate) fn occupied(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    /// Forgets every slot. Callers that care about drop order release the
    /// nodes first.
    pub(crate) fn reset(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    /// # Panics
    ///
    /// Panics if the slot is vacant.
    #[inline]
    fn index(&self, id: NodeId) -> &Node<K, V> {
        self.get(Some(id)).expect("vacant arena slot")
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.get_mut(Some(id)).expect("vacant arena slot")
    }
}
