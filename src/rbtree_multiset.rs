use core::borrow::Borrow;
use core::cmp::Ordering;

use crate::facade::tree_facade;
use crate::raw::{DuplicatePolicy, RawTree};

pub use crate::iter::{IntoIter, Iter, Range};

/// An ordered multiset based on a red-black tree.
///
/// Unlike [`RBTreeSet`](crate::RBTreeSet), equivalent keys may be stored any number of
/// times. Equal keys are kept next to each other in the order they were inserted: a new
/// key is placed after every element it compares equal to.
///
/// The same logic-error rules as for `RBTreeSet` apply to keys whose ordering changes
/// while they are stored.
///
/// # Examples
///
/// ```
/// use kuro_tree::RBTreeMultiset;
///
/// let mut rolls = RBTreeMultiset::new();
/// for roll in [4, 2, 6, 2, 4, 4] {
///     rolls.insert(roll);
/// }
///
/// assert_eq!(rolls.len(), 6);
/// assert_eq!(rolls.count(&4), 3);
/// assert_eq!(rolls.count(&5), 0);
///
/// // Removes a single 4.
/// rolls.remove(&4);
/// assert_eq!(rolls.count(&4), 2);
///
/// assert!(rolls.iter().eq(&[2, 2, 4, 4, 6]));
/// ```
pub struct RBTreeMultiset<T> {
    raw: RawTree<T>,
}

tree_facade!(RBTreeMultiset, DuplicatePolicy::Allow);

impl<T: Ord> RBTreeMultiset<T> {
    /// Removes one element equal to the value, the first of its run. Returns whether one
    /// was present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.raw.lower_bound(value) {
            Some(node) if self.raw.key(node).borrow().cmp(value) == Ordering::Equal => {
                drop(self.raw.remove(node));
                true
            }
            _ => false,
        }
    }

    /// Removes every element equal to the value and returns how many there were.
    ///
    /// # Examples
    ///
    /// ```
    /// use kuro_tree::RBTreeMultiset;
    ///
    /// let mut set = RBTreeMultiset::from([1, 2, 2, 2, 3]);
    /// assert_eq!(set.remove_all(&2), 3);
    /// assert_eq!(set.remove_all(&2), 0);
    /// assert!(set.iter().eq(&[1, 3]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(k log n), where k is the number of removed elements.
    pub fn remove_all<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let end = self.raw.upper_bound(value);
        let mut current = self.raw.lower_bound(value);
        let mut removed = 0;
        while let Some(node) = current.filter(|&node| Some(node) != end) {
            current = self.raw.successor(node);
            drop(self.raw.remove(node));
            removed += 1;
        }
        removed
    }

    /// Returns the number of elements equal to the value.
    ///
    /// # Complexity
    ///
    /// O(log n + k), where k is the result.
    #[must_use]
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.distance(self.raw.lower_bound(value), self.raw.upper_bound(value))
    }

    /// Moves every element of `other` into `self`, leaving `other` empty.
    ///
    /// Moved elements are placed after the elements of `self` they compare equal to, and
    /// keep their order from `other`. Nothing is cloned.
    ///
    /// # Examples
    ///
    /// ```
    /// use kuro_tree::RBTreeMultiset;
    ///
    /// let mut a = RBTreeMultiset::from([1, 3]);
    /// let mut b = RBTreeMultiset::from([3, 3, 2]);
    /// a.merge(&mut b);
    /// assert!(a.iter().eq(&[1, 2, 3, 3, 3]));
    /// assert!(b.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(m log(n + m)), where m is the size of `other` and n is the size of `self`.
    pub fn merge(&mut self, other: &mut Self) {
        self.raw.merge_all(&mut other.raw);
    }
}
