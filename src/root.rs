use crate::{Color, Diagnostic, Link, NodeId, OrderedMap, Position, Side, Sink};

// Structural maintenance: rotations and the two rebalancing passes.
impl<K, V, S: Sink> OrderedMap<K, V, S> {
    #[inline]
    pub(crate) fn report(&self, diagnostic: Diagnostic) {
        self.sink.notify(diagnostic.level(), &diagnostic);
    }

    /// Which slot of its parent `id` occupies. `None` (after reporting) when
    /// the parent does not point back at `id`.
    pub(crate) fn position(&self, id: NodeId) -> Option<Position> {
        let Some(parent) = self.arena.parent(Some(id)) else {
            return Some(Position::Root);
        };
        if self.arena.left(Some(parent)) == Some(id) {
            Some(Position::Child(Side::Left))
        } else if self.arena.right(Some(parent)) == Some(id) {
            Some(Position::Child(Side::Right))
        } else {
            self.report(Diagnostic::MalformedChild { node: id });
            None
        }
    }

    /// Points whatever held `position` under `parent` at `new`; the root
    /// slot when `position` is [`Position::Root`].
    pub(crate) fn replace_child(&mut self, parent: Link, position: Position, new: Link) {
        match position {
            Position::Root => self.root = new,
            Position::Child(side) => self.arena.set_child(parent, side, new),
        }
    }

    /// Left rotation at `node`:
    ///
    ///   parent                   parent
    ///     |                         |
    ///    node                     right
    ///   /    \         ->        /     \
    ///  *      right          node       *
    ///        /     \        /    \
    ///   inner       *      *      inner
    ///
    /// `parent` and `inner` may be absent, `right` must not be.
    #[cfg(test)]
    pub(crate) fn rotate_left(&mut self, node: NodeId) -> bool {
        self.rotate(node, Side::Left)
    }

    /// Mirror image of [`Self::rotate_left`]; `node` needs a left child.
    #[cfg(test)]
    pub(crate) fn rotate_right(&mut self, node: NodeId) -> bool {
        self.rotate(node, Side::Right)
    }

    /// Rotates `node` down towards `direction`, lifting its child from the
    /// other side. Reports and leaves the tree untouched when that child is
    /// missing.
    pub(crate) fn rotate(&mut self, node: NodeId, direction: Side) -> bool {
        let lifted_side = direction.opposite();
        let Some(lifted) = self.arena.child(Some(node), lifted_side) else {
            self.report(Diagnostic::RotationPrecondition { direction });
            return false;
        };
        let Some(position) = self.position(node) else {
            return false;
        };
        let parent = self.arena.parent(Some(node));
        let inner = self.arena.child(Some(lifted), direction);

        self.arena.set_child(Some(node), lifted_side, inner);
        self.arena.set_parent(inner, Some(node));
        self.arena.set_child(Some(lifted), direction, Some(node));
        self.arena.set_parent(Some(node), Some(lifted));
        self.arena.set_parent(Some(lifted), parent);
        self.replace_child(parent, position, Some(lifted));
        true
    }

    /// Repairs a red-red violation introduced by linking the red `node`.
    /// The caller forces the root black afterwards.
    pub(crate) fn rebalance_insert(&mut self, mut node: NodeId) {
        loop {
            if self.arena.is_black(Some(node)) {
                return;
            }
            let Some(parent) = self.arena.parent(Some(node)) else {
                return;
            };
            if self.arena.is_black(Some(parent)) {
                return;
            }
            // A red parent without a grandparent is the root; the final
            // root recolor settles it.
            let Some(grandparent) = self.arena.parent(Some(parent)) else {
                return;
            };
            let Some(Position::Child(parent_side)) = self.position(parent) else {
                return;
            };

            let uncle = self.arena.child(Some(grandparent), parent_side.opposite());
            if self.arena.is_red(uncle) {
                /*
                 * Red uncle: push the grandparent's blackness down.
                 *
                 *       G            g
                 *      / \          / \
                 *     p   u  -->   P   U
                 *    /            /
                 *   n            n
                 *
                 * g may now clash with its own parent; go again from there.
                 */
                self.arena.set_color(Some(grandparent), Color::Red);
                self.arena.set_color(Some(parent), Color::Black);
                self.arena.set_color(uncle, Color::Black);
                node = grandparent;
                continue;
            }

            let Some(Position::Child(node_side)) = self.position(node) else {
                return;
            };
            let mut parent = parent;
            if node_side != parent_side {
                /*
                 * Black uncle, node on the inner side: rotate at parent so
                 * node and parent line up.
                 *
                 *      G             G
                 *     / \           / \
                 *    p   U  -->    n   U
                 *     \           /
                 *      n         p
                 */
                self.rotate(parent, parent_side);
                parent = node;
            }
            /*
             * Black uncle, outer side: rotate at grandparent and swap colors.
             *
             *        G           P
             *       / \         / \
             *      p   U  -->  n   g
             *     /                 \
             *    n                   U
             */
            self.rotate(grandparent, parent_side.opposite());
            self.arena.set_color(Some(parent), Color::Black);
            self.arena.set_color(Some(grandparent), Color::Red);
            return;
        }
    }

    /// Restores black-height after a black node left the `position` slot
    /// under `parent`. Removing the root needs nothing.
    pub(crate) fn rebalance_delete(&mut self, mut parent: Link, mut position: Position) {
        loop {
            let Position::Child(side) = position else {
                return;
            };

            // A red replacement absorbs the missing black.
            let replacement = self.arena.child(parent, side);
            if self.arena.is_red(replacement) {
                self.arena.set_color(replacement, Color::Black);
                return;
            }

            // The removed node was black, so its sibling exists.
            let far = side.opposite();
            let mut sibling = self.arena.child(parent, far);
            if self.arena.is_red(sibling) {
                /*
                 * Red sibling: rotate it above parent so the new sibling is
                 * black.
                 *
                 *     P               S
                 *    / \             / \
                 *   N   s    -->    p   Sf
                 *      / \         / \
                 *    Sn   Sf      N   Sn
                 */
                if let Some(p) = parent {
                    self.rotate(p, side);
                }
                self.arena.set_color(parent, Color::Red);
                self.arena.set_color(sibling, Color::Black);
                sibling = self.arena.child(parent, far);
            }

            let near_child = self.arena.child(sibling, side);
            let far_child = self.arena.child(sibling, far);
            if self.arena.is_black(near_child) && self.arena.is_black(far_child) {
                /*
                 * Black sibling with black children: make it red, which
                 * moves the missing black up to parent.
                 *
                 *    (p)           (p)
                 *    / \           / \
                 *   N   S    -->  N   s
                 *      / \           / \
                 *    Sn   Sf       Sn   Sf
                 */
                self.arena.set_color(sibling, Color::Red);
                let Some(p) = parent else {
                    return;
                };
                let Some(up) = self.position(p) else {
                    return;
                };
                position = up;
                parent = self.arena.parent(parent);
                continue;
            }

            if self.arena.is_red(near_child) {
                /*
                 * Near child red, far child black: rotate at sibling so the
                 * red lands on the far side.
                 *
                 *   (p)           (p)
                 *   / \           / \
                 *  N   S    -->  N   sn
                 *     / \             \
                 *   sn   Sf            S
                 *                       \
                 *                        Sf
                 */
                self.arena.set_color(near_child, Color::Black);
                self.arena.set_color(sibling, Color::Red);
                if let Some(s) = sibling {
                    self.rotate(s, far);
                }
                sibling = self.arena.child(parent, far);
            }

            /*
             * Far child red: rotate at parent, sibling takes parent's color,
             * parent and the far child turn black.
             *
             *      (p)             (s)
             *      / \             / \
             *     N   S     -->   P   Sf
             *        / \         / \
             *     (sn)  sf      N  (sn)
             */
            if let Some(p) = parent {
                self.rotate(p, side);
            }
            let parent_color = self.arena.color(parent);
            self.arena.set_color(sibling, parent_color);
            self.arena.set_color(parent, Color::Black);
            let far_child = self.arena.child(sibling, far);
            self.arena.set_color(far_child, Color::Black);
            return;
        }
    }

    /// Unlinks `id` and hands back its key and value. A node with two
    /// children trades payloads with its in-order successor, which is then
    /// unlinked in its place.
    pub(crate) fn detach(&mut self, id: NodeId) -> Option<(K, V)> {
        let target = match (self.arena.left(Some(id)), self.arena.right(Some(id))) {
            (Some(_), Some(right)) => self.arena.first(Some(right))?,
            _ => id,
        };
        let position = self.position(target)?;
        self.arena.swap_payload(id, target);

        let parent = self.arena.parent(Some(target));
        let child = self
            .arena
            .left(Some(target))
            .or(self.arena.right(Some(target)));
        self.replace_child(parent, position, child);
        self.arena.set_parent(child, parent);

        let node = self.arena.release(target)?;
        if node.color == Color::Black {
            self.rebalance_delete(parent, position);
        }
        self.arena.set_color(self.root, Color::Black);
        self.len -= 1;
        Some((node.key, node.value))
    }
}

#[cfg(test)]
mod test {
    use crate::{Color, Diagnostic, Level, OrderedMap, Recorder, Side};
    use pretty_assertions::assert_eq;

    fn recorded(keys: &[u32]) -> OrderedMap<u32, u32, Recorder> {
        let mut map = OrderedMap::with_sink(Recorder::new());
        for &k in keys {
            assert!(map.insert(k, k * 10));
        }
        map
    }

    #[test]
    fn rotate_left_relinks_three_generations() {
        //     2            4
        //    / \          / \
        //   1   4   ->   2   5
        //      / \      / \
        //     3   5    1   3
        let mut map = recorded(&[2, 1, 4, 3, 5]);
        let root = map.root.unwrap();
        assert_eq!(2, map.arena[root].key);

        assert!(map.rotate_left(root));
        let new_root = map.root.unwrap();
        assert_eq!(4, map.arena[new_root].key);
        assert_eq!(None, map.arena.parent(Some(new_root)));
        assert_eq!(Some(root), map.arena.left(Some(new_root)));
        assert_eq!(Some(new_root), map.arena.parent(Some(root)));
        let inner = map.arena.right(Some(root)).unwrap();
        assert_eq!(3, map.arena[inner].key);
        assert_eq!(Some(root), map.arena.parent(Some(inner)));
        assert_eq!(vec![1, 2, 3, 4, 5], map.keys().copied().collect::<Vec<_>>());
        assert!(map.sink().is_empty());
    }

    #[test]
    fn rotate_right_reattaches_to_parent() {
        let mut map = recorded(&[4, 2, 6, 1, 3]);
        let left = map.arena.left(map.root).unwrap();
        assert_eq!(2, map.arena[left].key);

        assert!(map.rotate_right(left));
        let lifted = map.arena.left(map.root).unwrap();
        assert_eq!(1, map.arena[lifted].key);
        assert_eq!(map.root, map.arena.parent(Some(lifted)));
        assert_eq!(Some(left), map.arena.right(Some(lifted)));
        assert_eq!(vec![1, 2, 3, 4, 6], map.keys().copied().collect::<Vec<_>>());
    }

    #[test]
    fn rotation_without_required_child_is_reported_noop() {
        let mut map = recorded(&[2, 1]);
        let root = map.root.unwrap();

        assert!(!map.rotate_left(root));
        assert_eq!(Some(root), map.root);
        assert_eq!(
            vec![(
                Level::Error,
                Diagnostic::RotationPrecondition {
                    direction: Side::Left
                }
            )],
            map.sink().take()
        );

        let leaf = map.arena.left(map.root).unwrap();
        assert!(!map.rotate_right(leaf));
        assert_eq!(
            vec![(
                Level::Error,
                Diagnostic::RotationPrecondition {
                    direction: Side::Right
                }
            )],
            map.sink().take()
        );
        assert_eq!(Ok(()), map.verify());
    }

    #[test]
    fn malformed_child_is_reported() {
        let mut map = recorded(&[2, 1, 3]);
        let root = map.root.unwrap();
        let left = map.arena.left(Some(root)).unwrap();
        // Sever the downward link only.
        map.arena.set_child(Some(root), Side::Left, None);

        assert_eq!(None, map.position(left));
        assert_eq!(
            vec![(Level::Error, Diagnostic::MalformedChild { node: left })],
            map.sink().take()
        );
    }

    #[test]
    fn red_uncle_recolors_and_recurses() {
        let map = recorded(&[2, 1, 3, 4]);
        let root = map.root.unwrap();
        assert_eq!(Color::Black, map.arena.color(map.arena.left(Some(root))));
        assert_eq!(Color::Black, map.arena.color(map.arena.right(Some(root))));
        let four = map.arena.right(map.arena.right(Some(root)));
        assert_eq!(Color::Red, map.arena.color(four));
        assert_eq!(Ok(()), map.verify());
    }

    #[test]
    fn inner_grandchild_takes_double_rotation() {
        let map = recorded(&[3, 1, 2]);
        let root = map.root.unwrap();
        assert_eq!(2, map.arena[root].key);
        assert_eq!(Color::Black, map.arena.color(Some(root)));
        assert_eq!(Color::Red, map.arena.color(map.arena.left(Some(root))));
        assert_eq!(Color::Red, map.arena.color(map.arena.right(Some(root))));

        let mirrored = recorded(&[1, 3, 2]);
        let root = mirrored.root.unwrap();
        assert_eq!(2, mirrored.arena[root].key);
        assert_eq!(Ok(()), mirrored.verify());
    }

    #[test]
    fn delete_with_red_sibling_on_either_side() {
        // Ascending inserts leave a red inner node on the right.
        let mut map = recorded(&[1, 2, 3, 4, 5, 6]);
        assert!(map.delete_entry(&1));
        assert_eq!(Ok(()), map.verify());

        let mut mirrored = recorded(&[6, 5, 4, 3, 2, 1]);
        assert!(mirrored.delete_entry(&6));
        assert_eq!(Ok(()), mirrored.verify());
        assert!(map.sink().is_empty());
        assert!(mirrored.sink().is_empty());
    }

    #[test]
    fn delete_near_and_far_child_cases() {
        for order in [[5, 2, 8, 7], [5, 2, 8, 9], [5, 8, 2, 3], [5, 8, 2, 1]] {
            for victim in order {
                let mut map = recorded(&order);
                assert!(map.delete_entry(&victim));
                assert_eq!(Ok(()), map.verify(), "order {order:?}, victim {victim}");
                assert!(!map.contains_key(&victim));
                assert_eq!(3, map.len());
            }
        }
    }

    #[test]
    fn detach_two_children_swaps_with_successor() {
        let mut map = recorded(&[4, 2, 6, 5, 7]);
        let root = map.root.unwrap();
        assert_eq!(Some((4, 40)), map.detach(root));
        assert_eq!(5, map.arena[map.root.unwrap()].key);
        assert_eq!(vec![2, 5, 6, 7], map.keys().copied().collect::<Vec<_>>());
        assert_eq!(Ok(()), map.verify());
    }
}
