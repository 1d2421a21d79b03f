use std::cmp::Ordering;

use thiserror::Error;

use crate::{Comparable, Link, NodeId, OrderedMap};

/// A broken tree invariant, as found by [`OrderedMap::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("root {node} is red")]
    RedRoot { node: NodeId },
    #[error("root {node} has a parent")]
    RootHasParent { node: NodeId },
    #[error("red node {node} has a red child {child}")]
    RedRed { node: NodeId, child: NodeId },
    #[error("black height under {node} is {left} on the left and {right} on the right")]
    BlackHeight {
        node: NodeId,
        left: usize,
        right: usize,
    },
    #[error("node {child} does not point back to its parent {parent}")]
    ParentLink { parent: NodeId, child: NodeId },
    #[error("key of {node} is not greater than the key before it")]
    OutOfOrder { node: NodeId },
    #[error("{reachable} nodes reachable from the root but the map holds {len}")]
    SizeMismatch { reachable: usize, len: usize },
}

impl<K: Comparable, V, S> OrderedMap<K, V, S> {
    /// Checks ordering, coloring, black-height, parent links and the entry
    /// count. Walks the whole tree.
    pub fn verify(&self) -> Result<(), Violation> {
        if let Some(root) = self.root {
            if self.arena.is_red(self.root) {
                return Err(Violation::RedRoot { node: root });
            }
            if self.arena.parent(self.root).is_some() {
                return Err(Violation::RootHasParent { node: root });
            }
        }

        let mut reachable = 0;
        self.black_height(self.root, &mut reachable)?;
        if reachable != self.len {
            return Err(Violation::SizeMismatch {
                reachable,
                len: self.len,
            });
        }

        let mut previous: Option<NodeId> = None;
        let mut cursor = self.arena.first(self.root);
        while let Some(id) = cursor {
            if let Some(prev) = previous {
                if self.arena[prev].key.compare(&self.arena[id].key) != Ordering::Less {
                    return Err(Violation::OutOfOrder { node: id });
                }
            }
            previous = Some(id);
            cursor = self.arena.next(id);
        }
        Ok(())
    }

    // Black nodes on every path below `link`, absent leaves excluded.
    fn black_height(&self, link: Link, reachable: &mut usize) -> Result<usize, Violation> {
        let Some(node) = link else {
            return Ok(0);
        };
        *reachable += 1;
        let left = self.arena.left(link);
        let right = self.arena.right(link);
        for child in [left, right].into_iter().flatten() {
            if self.arena.parent(Some(child)) != link {
                return Err(Violation::ParentLink {
                    parent: node,
                    child,
                });
            }
            if self.arena.is_red(link) && self.arena.is_red(Some(child)) {
                return Err(Violation::RedRed { node, child });
            }
        }
        let left_height = self.black_height(left, reachable)?;
        let right_height = self.black_height(right, reachable)?;
        if left_height != right_height {
            return Err(Violation::BlackHeight {
                node,
                left: left_height,
                right: right_height,
            });
        }
        Ok(left_height + usize::from(self.arena.is_black(link)))
    }
}
