use crate::{Color, Link, NodeId, Side, alloc::Arena};

// Link-level accessors. An absent link reads as a black leaf with no
// relatives and ignores writes.
impl<K, V> Arena<K, V> {
    #[inline(always)]
    pub(crate) fn color(&self, link: Link) -> Color {
        self.get(link).map_or(Color::Black, |n| n.color)
    }

    #[inline(always)]
    pub(crate) fn is_black(&self, link: Link) -> bool {
        self.color(link) == Color::Black
    }

    #[inline(always)]
    pub(crate) fn is_red(&self, link: Link) -> bool {
        self.color(link) == Color::Red
    }

    #[inline(always)]
    pub(crate) fn parent(&self, link: Link) -> Link {
        self.get(link).and_then(|n| n.parent)
    }

    #[inline(always)]
    pub(crate) fn left(&self, link: Link) -> Link {
        self.get(link).and_then(|n| n.left)
    }

    #[inline(always)]
    pub(crate) fn right(&self, link: Link) -> Link {
        self.get(link).and_then(|n| n.right)
    }

    #[inline(always)]
    pub(crate) fn child(&self, link: Link, side: Side) -> Link {
        match side {
            Side::Left => self.left(link),
            Side::Right => self.right(link),
        }
    }

    #[inline(always)]
    pub(crate) fn set_color(&mut self, link: Link, color: Color) {
        if let Some(node) = self.get_mut(link) {
            node.color = color;
        }
    }

    #[inline(always)]
    pub(crate) fn set_parent(&mut self, link: Link, parent: Link) {
        if let Some(node) = self.get_mut(link) {
            node.parent = parent;
        }
    }

    #[inline(always)]
    pub(crate) fn set_child(&mut self, link: Link, side: Side, child: Link) {
        if let Some(node) = self.get_mut(link) {
            match side {
                Side::Left => node.left = child,
                Side::Right => node.right = child,
            }
        }
    }

    /// Leftmost node of the subtree under `link`.
    pub(crate) fn first(&self, link: Link) -> Link {
        let mut current = link?;
        while let Some(left) = self.left(Some(current)) {
            current = left;
        }
        Some(current)
    }

    /// Rightmost node of the subtree under `link`.
    pub(crate) fn last(&self, link: Link) -> Link {
        let mut current = link?;
        while let Some(right) = self.right(Some(current)) {
            current = right;
        }
        Some(current)
    }

    /// In-order successor.
    pub(crate) fn next(&self, id: NodeId) -> Link {
        // With a right-hand child, go down once and then left as far as we
        // can.
        if let Some(right) = self.right(Some(id)) {
            return self.first(Some(right));
        }
        // Otherwise climb while we are a right-hand child; the first parent
        // we reach from its left is the successor.
        let mut node = id;
        loop {
            let parent = self.parent(Some(node))?;
            if self.right(Some(parent)) != Some(node) {
                return Some(parent);
            }
            node = parent;
        }
    }

    /// In-order predecessor.
    pub(crate) fn prev(&self, id: NodeId) -> Link {
        if let Some(left) = self.left(Some(id)) {
            return self.last(Some(left));
        }
        let mut node = id;
        loop {
            let parent = self.parent(Some(node))?;
            if self.left(Some(parent)) != Some(node) {
                return Some(parent);
            }
            node = parent;
        }
    }

    /// Number of nodes on the longest path down from `link`.
    pub(crate) fn height(&self, link: Link) -> usize {
        match self.get(link) {
            Some(node) => 1 + self.height(node.left).max(self.height(node.right)),
            None => 0,
        }
    }
}
