use core::fmt;
use core::ptr;

use crate::raw::{Handle, RawTree, SlotRef, TreeId};

/// A read-only cursor over the elements of an [`RBTreeSet`] or [`RBTreeMultiset`].
///
/// A cursor points either at an element or at the *end* position, which sits after the
/// last element and, going backwards, before the first. Moving past either end lands on
/// the end position, and moving from the end position wraps around to the other end.
///
/// Cursors borrow their collection, so it cannot be modified while one is alive. To erase
/// the element under a cursor, take its [`Position`] first.
///
/// # Examples
///
/// ```
/// use kuro_tree::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 2, 3]);
/// let mut cursor = set.lower_bound(&2);
/// assert_eq!(cursor.get(), Some(&2));
///
/// cursor.move_next();
/// cursor.move_next();
/// assert!(cursor.is_end());
///
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&1));
/// ```
///
/// [`RBTreeSet`]: crate::RBTreeSet
/// [`RBTreeMultiset`]: crate::RBTreeMultiset
pub struct Cursor<'a, T> {
    tree: &'a RawTree<T>,
    node: Option<Handle>,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) const fn new(tree: &'a RawTree<T>, node: Option<Handle>) -> Self {
        Self {
            tree,
            node,
        }
    }

    /// Returns the element under the cursor, or `None` at the end position.
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.node.map(|h| self.tree.key(h))
    }

    /// Returns `true` if the cursor is at the end position.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Moves to the next element in order. From the last element this reaches the end
    /// position, and from the end position the first element.
    ///
    /// # Complexity
    ///
    /// Amortized O(1), worst case O(log n).
    pub fn move_next(&mut self) {
        self.node = match self.node {
            Some(h) => self.tree.successor(h),
            None => self.tree.first(),
        };
    }

    /// Moves to the previous element in order. From the first element this reaches the end
    /// position, and from the end position the last element.
    ///
    /// # Complexity
    ///
    /// Amortized O(1), worst case O(log n).
    pub fn move_prev(&mut self) {
        self.node = match self.node {
            Some(h) => self.tree.predecessor(h),
            None => self.tree.last(),
        };
    }

    /// Returns the element [`move_next`](Cursor::move_next) would land on.
    #[must_use]
    pub fn peek_next(&self) -> Option<&'a T> {
        let mut next = *self;
        next.move_next();
        next.get()
    }

    /// Returns the element [`move_prev`](Cursor::move_prev) would land on.
    #[must_use]
    pub fn peek_prev(&self) -> Option<&'a T> {
        let mut prev = *self;
        prev.move_prev();
        prev.get()
    }

    /// Returns a detached [`Position`] for the cursor's current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use kuro_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([1, 2, 3]);
    /// let position = set.find(&2).position();
    /// assert_eq!(set.erase(position), Some(2));
    /// assert_eq!(set.erase(position), None);
    /// ```
    #[must_use]
    pub fn position(&self) -> Position {
        self.tree.position(self.node)
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.node == other.node
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// A detached reference to one element of one collection.
///
/// Positions are plain `Copy` values that do not borrow the collection, so they can be
/// held across mutations and passed back to `erase` or `cursor_at`. A position keeps
/// naming its element until that element is erased; inserting or erasing other elements
/// does not disturb it. Positions whose element is gone, positions into a different
/// collection, and the end position are all ignored by `erase`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) tree: TreeId,
    pub(crate) slot: Option<SlotRef>,
}

impl Position {
    /// Returns `true` if this is the end position of its collection.
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.slot.is_none()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::DuplicatePolicy;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Cursor<'static, u8>: Copy, Send, Sync);
    assert_impl_all!(Position: Copy, Send, Sync, core::hash::Hash);

    fn tree_of(keys: &[u8]) -> RawTree<u8> {
        let mut tree = RawTree::new();
        for &key in keys {
            tree.insert(key, DuplicatePolicy::Allow);
        }
        tree
    }

    #[test]
    fn walks_forward_through_the_ghost() {
        let tree = tree_of(&[2, 1, 3]);
        let mut cursor = Cursor::new(&tree, None);
        let mut seen = alloc::vec::Vec::new();
        for _ in 0..8 {
            cursor.move_next();
            seen.push(cursor.get().copied());
        }
        assert_eq!(seen, [Some(1), Some(2), Some(3), None, Some(1), Some(2), Some(3), None]);
    }

    #[test]
    fn walks_backward_through_the_ghost() {
        let tree = tree_of(&[2, 1, 3]);
        let mut cursor = Cursor::new(&tree, tree.first());
        cursor.move_prev();
        assert!(cursor.is_end());
        cursor.move_prev();
        assert_eq!(cursor.get(), Some(&3));
        assert_eq!(cursor.peek_next(), None);
        assert_eq!(cursor.peek_prev(), Some(&2));
    }

    #[test]
    fn empty_tree_stays_at_ghost() {
        let tree = tree_of(&[]);
        let mut cursor = Cursor::new(&tree, None);
        cursor.move_next();
        assert!(cursor.is_end());
        cursor.move_prev();
        assert!(cursor.is_end());
        assert!(cursor.position().is_end());
    }

    #[test]
    fn equality_needs_the_same_tree() {
        let a = tree_of(&[1]);
        let b = tree_of(&[1]);
        assert_eq!(Cursor::new(&a, a.first()), Cursor::new(&a, a.first()));
        assert_ne!(Cursor::new(&a, a.first()), Cursor::new(&a, None));
        assert_ne!(Cursor::new(&a, None), Cursor::new(&b, None));
    }
}
