use core::borrow::Borrow;

use crate::facade::tree_facade;
use crate::raw::{DuplicatePolicy, RawTree};

pub use crate::iter::{IntoIter, Iter, Range};

/// An ordered set of unique keys based on a red-black tree.
///
/// Keys are kept in ascending order as determined by [`Ord`]. Inserting a key that is
/// equivalent to one already present leaves the set unchanged and reports the existing
/// element instead.
///
/// Lookups return [`Cursor`]s, which can step to neighbouring elements in either
/// direction. A cursor's [`Position`] outlives the borrow and can be handed back to
/// [`erase`](RBTreeSet::erase); erasing one element never disturbs the positions of
/// the others.
///
/// It is a logic error for a key to be modified in such a way that its ordering relative
/// to any other key, as determined by the [`Ord`] trait, changes while it is in the set.
/// The behavior resulting from such a logic error is not specified, but will be
/// encapsulated to the `RBTreeSet` that observed it and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use kuro_tree::RBTreeSet;
///
/// let mut books = RBTreeSet::new();
///
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// // Inserting a title again is reported, not stored twice.
/// let (_, inserted) = books.insert("The Odyssey");
/// assert!(!inserted);
///
/// if !books.contains("The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.", books.len());
/// }
///
/// books.remove("The Odyssey");
///
/// for book in &books {
///     println!("{book}");
/// }
/// ```
///
/// A `RBTreeSet` with a known list of items can be initialized from an array:
///
/// ```
/// use kuro_tree::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 2, 3]);
/// ```
pub struct RBTreeSet<T> {
    raw: RawTree<T>,
}

tree_facade!(RBTreeSet, DuplicatePolicy::Reject);

impl<T: Ord> RBTreeSet<T> {
    /// If the set contains an element equal to the value, removes it from the set and
    /// drops it. Returns whether such an element was present.
    ///
    /// The value may be any borrowed form of the set's element type, but the ordering on
    /// the borrowed form *must* match the ordering on the element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use kuro_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    ///
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use kuro_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.raw.find(value)?;
        Some(self.raw.remove(node))
    }

    /// Returns the number of elements equal to the value, which is `0` or `1`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        usize::from(self.contains(value))
    }

    /// Moves the elements of `other` that have no equal in `self` into `self`.
    ///
    /// Elements of `other` that collide with an element of `self` stay in `other`, and
    /// positions into `other` for them remain valid. Nothing is cloned. If the ordering
    /// panics partway, every element is still in exactly one of the two sets.
    ///
    /// # Examples
    ///
    /// ```
    /// use kuro_tree::RBTreeSet;
    ///
    /// let mut a = RBTreeSet::from([1, 2, 3]);
    /// let mut b = RBTreeSet::from([3, 4, 5]);
    ///
    /// a.merge(&mut b);
    ///
    /// assert_eq!(a.len(), 5);
    /// assert!(a.iter().eq(&[1, 2, 3, 4, 5]));
    /// assert!(b.iter().eq(&[3]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(m log(n + m)), where m is the size of `other` and n is the size of `self`.
    pub fn merge(&mut self, other: &mut Self) {
        self.raw.merge_unique(&mut other.raw);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use static_assertions::assert_impl_all;

    assert_impl_all!(RBTreeSet<u8>: Send, Sync, Clone, Default);
    assert_impl_all!(Iter<'static, u8>: Send, Sync);
    assert_impl_all!(IntoIter<u8>: Send, Sync);

    #[test]
    fn cursors_from_insert_many_stay_usable() {
        let mut set = RBTreeSet::new();
        let results = set.insert_many([3, 1, 2, 3]);
        let keys: Vec<Option<&i32>> = results.iter().map(|(c, _)| c.get()).collect();
        assert_eq!(keys, [Some(&3), Some(&1), Some(&2), Some(&3)]);
        assert_eq!(results[3].0.peek_prev(), Some(&2));
    }

    #[test]
    fn cursor_at_end_position() {
        let set = RBTreeSet::from([1]);
        let end = set.end().position();
        assert_eq!(set.cursor_at(end), Some(set.end()));

        let other = RBTreeSet::from([1]);
        assert_eq!(other.cursor_at(end), None);
    }
}
