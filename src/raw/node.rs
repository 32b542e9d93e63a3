use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A red-black tree node.
///
/// Child links are the only references that keep a node in the tree. The parent link is
/// a back-reference for climbing during rebalancing and in-order stepping.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) key: T,
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) color: Color,
}

impl<T> Node<T> {
    /// Creates a detached red leaf under `parent`.
    pub(crate) const fn new(key: T, parent: Option<Handle>) -> Self {
        Self {
            key,
            parent,
            left: None,
            right: None,
            color: Color::Red,
        }
    }

    #[inline]
    pub(crate) const fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    /// Returns the child on the given side.
    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_red_leaf() {
        let parent = Handle::from_index(3);
        let node = Node::new(10, Some(parent));
        assert!(node.is_red());
        assert_eq!(node.parent, Some(parent));
        assert_eq!(node.left, None);
        assert_eq!(node.right, None);
    }

    #[test]
    fn children_by_side() {
        let mut node = Node::new('k', None);
        let a = Handle::from_index(1);
        let b = Handle::from_index(2);
        node.set_child(Side::Left, Some(a));
        node.set_child(Side::Right, Some(b));
        assert_eq!(node.child(Side::Left), Some(a));
        assert_eq!(node.child(Side::Right), Some(b));
        assert_eq!(node.child(Side::Left.opposite()), Some(b));

        node.set_child(Side::Right, None);
        assert_eq!(node.right, None);
    }
}
