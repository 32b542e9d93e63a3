use core::fmt;
use core::iter::FusedIterator;

use alloc::vec;

use crate::raw::{Handle, RawTree};

/// An iterator over the elements of an `RBTreeSet` or `RBTreeMultiset`, in order.
///
/// This `struct` is created by the `iter` method of either collection.
///
/// # Examples
///
/// ```
/// use kuro_tree::RBTreeMultiset;
///
/// let set = RBTreeMultiset::from([3, 1, 3]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&3));
/// assert_eq!(iter.next(), None);
/// ```
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    tree: Option<&'a RawTree<T>>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a RawTree<T>) -> Self {
        Self {
            tree: Some(tree),
            front: tree.first(),
            back: tree.last(),
            remaining: tree.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let tree = self.tree?;
        let handle = self.front?;
        self.front = tree.successor(handle);
        self.remaining -= 1;
        Some(tree.key(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let tree = self.tree?;
        let handle = self.back?;
        self.back = tree.predecessor(handle);
        self.remaining -= 1;
        Some(tree.key(handle))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Default for Iter<'_, T> {
    /// Creates an empty `Iter`.
    ///
    /// ```
    /// # use kuro_tree::rbtree_set;
    /// let iter: rbtree_set::Iter<'_, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            tree: None,
            front: None,
            back: None,
            remaining: 0,
        }
    }
}

/// An iterator over a sub-range of elements, in order.
///
/// This `struct` is created by the `range` method of either collection.
///
/// # Examples
///
/// ```
/// use kuro_tree::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 2, 3, 4]);
/// let mut range = set.range(2..=3);
/// assert_eq!(range.next(), Some(&2));
/// assert_eq!(range.next_back(), Some(&3));
/// assert_eq!(range.next(), None);
/// ```
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, T> {
    tree: Option<&'a RawTree<T>>,
    // Both ends are inclusive. Both are `None` once the range is exhausted.
    front: Option<Handle>,
    back: Option<Handle>,
}

impl<'a, T> Range<'a, T> {
    pub(crate) const fn new(tree: &'a RawTree<T>, (front, back): (Option<Handle>, Option<Handle>)) -> Self {
        Self {
            tree: Some(tree),
            front,
            back,
        }
    }

    fn finish(&mut self) {
        self.front = None;
        self.back = None;
    }
}

impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let tree = self.tree?;
        let handle = self.front?;
        if self.front == self.back {
            self.finish();
        } else {
            self.front = tree.successor(handle);
        }
        Some(tree.key(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.front {
            Some(_) => (1, None),
            None => (0, Some(0)),
        }
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Range<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        let tree = self.tree?;
        let handle = self.back?;
        if self.front == self.back {
            self.finish();
        } else {
            self.back = tree.predecessor(handle);
        }
        Some(tree.key(handle))
    }
}

impl<T> FusedIterator for Range<'_, T> {}

impl<T> Clone for Range<'_, T> {
    fn clone(&self) -> Self {
        Range {
            tree: self.tree,
            front: self.front,
            back: self.back,
        }
    }
}

impl<T> Default for Range<'_, T> {
    /// Creates an empty `Range`.
    ///
    /// ```
    /// # use kuro_tree::rbtree_set;
    /// let iter: rbtree_set::Range<'_, u8> = Default::default();
    /// assert_eq!(iter.count(), 0);
    /// ```
    fn default() -> Self {
        Range {
            tree: None,
            front: None,
            back: None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Range<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the elements of a collection, in order.
///
/// This `struct` is created by the `into_iter` method of either collection (provided by
/// the [`IntoIterator`] trait).
///
/// # Examples
///
/// ```
/// use kuro_tree::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 2, 3]);
/// let mut iter = set.into_iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.next(), Some(2));
/// ```
pub struct IntoIter<T> {
    inner: vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(mut tree: RawTree<T>) -> Self {
        Self {
            inner: tree.take_sorted().into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("inner", &self.inner).finish()
    }
}

impl<T> Default for IntoIter<T> {
    /// Creates an empty `IntoIter`.
    ///
    /// ```
    /// # use kuro_tree::rbtree_set;
    /// let iter: rbtree_set::IntoIter<u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            inner: vec::IntoIter::default(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::DuplicatePolicy;
    use alloc::vec::Vec;

    fn tree_of(keys: impl IntoIterator<Item = i32>) -> RawTree<i32> {
        let mut tree = RawTree::new();
        for key in keys {
            tree.insert(key, DuplicatePolicy::Allow);
        }
        tree
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let tree = tree_of([5, 1, 4, 2, 3]);
        let mut iter = Iter::new(&tree);
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn range_single_element_yields_once() {
        let tree = tree_of([1, 2, 3]);
        let mut range = Range::new(&tree, tree.range_ends(&(2..3)));
        assert_eq!(range.next_back(), Some(&2));
        assert_eq!(range.next(), None);
        assert_eq!(range.next_back(), None);
    }

    #[test]
    fn range_over_duplicates() {
        let tree = tree_of([1, 2, 2, 2, 3]);
        let range = Range::new(&tree, tree.range_ends(&(2..=2)));
        assert_eq!(range.rev().collect::<Vec<_>>(), [&2, &2, &2]);
    }

    #[test]
    fn into_iter_is_sorted() {
        let tree = tree_of([3, 1, 2, 1]);
        let items: Vec<i32> = IntoIter::new(tree).collect();
        assert_eq!(items, [1, 1, 2, 3]);
    }
}
