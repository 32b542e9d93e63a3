//! The surface shared by [`RBTreeSet`](crate::RBTreeSet) and
//! [`RBTreeMultiset`](crate::RBTreeMultiset).
//!
//! Both collections are a `RawTree` plus a duplicate policy. Everything that does not depend
//! on the policy is generated here, so the two cannot drift apart. Lookups that do
//! (`remove`, `count`, `merge`) live next to each type.

macro_rules! tree_facade {
    ($name:ident, $policy:expr) => {
        impl<T> $name<T> {
            #[doc = concat!("Makes a new, empty `", stringify!($name), "`. Does not allocate.")]
            ///
            /// # Examples
            ///
            /// ```
            #[doc = concat!("use kuro_tree::", stringify!($name), ";")]
            ///
            #[doc = concat!("let set: ", stringify!($name), "<i32> = ", stringify!($name), "::new();")]
            /// assert!(set.is_empty());
            /// ```
            #[must_use]
            pub fn new() -> Self {
                $name {
                    raw: $crate::raw::RawTree::new(),
                }
            }

            /// Creates an empty collection with room for at least `capacity` elements.
            #[must_use]
            pub fn with_capacity(capacity: usize) -> Self {
                $name {
                    raw: $crate::raw::RawTree::with_capacity(capacity),
                }
            }

            /// Returns the number of elements the collection can hold without reallocating.
            #[must_use]
            pub fn capacity(&self) -> usize {
                self.raw.capacity()
            }

            /// Reserves capacity for at least `additional` more elements.
            ///
            /// # Panics
            ///
            /// Panics if the new capacity overflows `usize`.
            pub fn reserve(&mut self, additional: usize) {
                self.raw.reserve(additional);
            }

            /// Tries to reserve capacity for at least `additional` more elements.
            ///
            /// # Errors
            ///
            /// Returns [`Error::CapacityExceeded`](crate::Error::CapacityExceeded) if the
            /// collection could never hold that many elements, or
            /// [`Error::AllocFailed`](crate::Error::AllocFailed) if the allocator refused.
            /// The contents are unchanged either way.
            ///
            /// # Examples
            ///
            /// ```
            #[doc = concat!("use kuro_tree::{Error, ", stringify!($name), "};")]
            ///
            #[doc = concat!("let mut set = ", stringify!($name), "::from([1, 2]);")]
            /// set.try_reserve(8)?;
            /// assert!(set.capacity() >= 10);
            /// assert!(matches!(set.try_reserve(usize::MAX), Err(Error::CapacityExceeded { .. })));
            /// # Ok::<(), Error>(())
            /// ```
            pub fn try_reserve(&mut self, additional: usize) -> $crate::error::Result<()> {
                self.raw.try_reserve(additional)
            }

            /// Returns the largest number of elements any collection of this type can hold.
            #[must_use]
            #[allow(clippy::unused_self)]
            pub const fn max_size(&self) -> usize {
                $crate::raw::RawTree::<T>::max_len()
            }

            /// Returns a cursor at the first element, or the end cursor if the collection
            /// is empty.
            ///
            /// # Complexity
            ///
            /// O(1)
            #[must_use]
            pub fn begin(&self) -> $crate::Cursor<'_, T> {
                $crate::Cursor::new(&self.raw, self.raw.first())
            }

            /// Returns the end cursor, which sits past the last element.
            ///
            /// # Examples
            ///
            /// ```
            #[doc = concat!("use kuro_tree::", stringify!($name), ";")]
            ///
            #[doc = concat!("let set = ", stringify!($name), "::from([1, 2]);")]
            /// let mut cursor = set.end();
            /// assert_eq!(cursor.get(), None);
            /// cursor.move_prev();
            /// assert_eq!(cursor.get(), Some(&2));
            /// ```
            #[must_use]
            pub fn end(&self) -> $crate::Cursor<'_, T> {
                $crate::Cursor::new(&self.raw, None)
            }

            /// Returns a cursor at the element named by `position`.
            ///
            /// The end position of this collection gives the end cursor. Returns `None` if
            /// the element has been erased since the position was taken, or if the position
            /// belongs to another collection.
            ///
            /// # Examples
            ///
            /// ```
            #[doc = concat!("use kuro_tree::", stringify!($name), ";")]
            ///
            #[doc = concat!("let mut set = ", stringify!($name), "::from([1, 2, 3]);")]
            /// let two = set.find(&2).position();
            /// set.insert(4);
            /// set.remove(&1);
            /// assert_eq!(set.cursor_at(two).and_then(|c| c.peek_next()), Some(&3));
            ///
            /// set.erase(two);
            /// assert!(set.cursor_at(two).is_none());
            /// ```
            ///
            /// # Complexity
            ///
            /// O(1)
            #[must_use]
            pub fn cursor_at(&self, position: $crate::Position) -> Option<$crate::Cursor<'_, T>> {
                self.raw.seek(position).map(|node| $crate::Cursor::new(&self.raw, node))
            }

            /// Removes the element named by `position` and returns it.
            ///
            /// Only that one element is removed, even if others compare equal to it.
            /// Erasing through the end position, a position whose element is already gone,
            /// or a position into another collection does nothing and returns `None`.
            /// Positions of all other elements stay valid.
            ///
            /// # Examples
            ///
            /// ```
            #[doc = concat!("use kuro_tree::", stringify!($name), ";")]
            ///
            #[doc = concat!("let mut set = ", stringify!($name), "::from([1, 2, 3]);")]
            /// let one = set.begin().position();
            /// let three = set.find(&3).position();
            ///
            /// assert_eq!(set.erase(one), Some(1));
            /// assert_eq!(set.erase(one), None);
            /// assert_eq!(set.erase(set.end().position()), None);
            /// assert_eq!(set.erase(three), Some(3));
            /// assert_eq!(set.len(), 1);
            /// ```
            ///
            /// # Complexity
            ///
            /// O(log n)
            pub fn erase(&mut self, position: $crate::Position) -> Option<T> {
                self.raw.erase(position)
            }

            /// Removes every element. Every [`Position`](crate::Position) taken earlier
            /// becomes stale.
            ///
            /// # Complexity
            ///
            /// O(n)
            pub fn clear(&mut self) {
                self.raw.clear();
            }

            /// Returns the smallest element, if any. Among equal elements this is the one
            /// inserted first.
            ///
            /// # Examples
            ///
            /// ```
            #[doc = concat!("use kuro_tree::", stringify!($name), ";")]
            ///
            #[doc = concat!("let mut set = ", stringify!($name), "::new();")]
            /// assert_eq!(set.first(), None);
            /// set.insert(2);
            /// set.insert(1);
            /// assert_eq!(set.first(), Some(&1));
            /// ```
            #[must_use]
            pub fn first(&self) -> Option<&T> {
                self.begin().get()
            }

            /// Returns the largest element, if any. Among equal elements this is the one
            /// inserted last.
            #[must_use]
            pub fn last(&self) -> Option<&T> {
                self.raw.last().map(|h| self.raw.key(h))
            }

            /// Removes the first element and returns it, if any.
            ///
            /// # Complexity
            ///
            /// O(log n)
            pub fn pop_first(&mut self) -> Option<T> {
                self.raw.pop_first()
            }

            /// Removes the last element and returns it, if any.
            ///
            /// # Complexity
            ///
            /// O(log n)
            pub fn pop_last(&mut self) -> Option<T> {
                self.raw.pop_last()
            }

            /// Retains only the elements specified by the predicate, visiting them in
            /// ascending order.
            ///
            /// # Examples
            ///
            /// ```
            #[doc = concat!("use kuro_tree::", stringify!($name), ";")]
            ///
            #[doc = concat!("let mut set: ", stringify!($name), "<i32> = (0..8).collect();")]
            /// set.retain(|&k| k % 2 == 0);
            /// assert!(set.into_iter().eq(vec![0, 2, 4, 6]));
            /// ```
            ///
            /// # Complexity
            ///
            /// O(n log n) in the worst case (when many elements are removed).
            pub fn retain<F>(&mut self, f: F)
            where
                F: FnMut(&T) -> bool,
            {
                self.raw.retain(f);
            }

            /// Swaps the contents of `self` and `other`. Positions follow their elements.
            ///
            /// # Examples
            ///
            /// ```
            #[doc = concat!("use kuro_tree::", stringify!($name), ";")]
            ///
            #[doc = concat!("let mut a = ", stringify!($name), "::from([1, 2]);")]
            #[doc = concat!("let mut b = ", stringify!($name), "::from([3]);")]
            /// let three = b.begin().position();
            ///
            /// a.swap(&mut b);
            /// assert_eq!(a.erase(three), Some(3));
            /// assert_eq!(b.len(), 2);
            /// ```
            ///
            /// # Complexity
            ///
            /// O(1)
            pub fn swap(&mut self, other: &mut Self) {
                ::core::mem::swap(self, other);
            }

            /// Gets an iterator over the elements in ascending order, equal elements in
            /// insertion order.
            ///
            /// # Complexity
            ///
            /// O(1) to create the iterator; amortized O(1) per step.
            pub fn iter(&self) -> $crate::iter::Iter<'_, T> {
                $crate::iter::Iter::new(&self.raw)
            }

            #[must_use]
            pub const fn len(&self) -> usize {
                self.raw.len()
            }

            #[must_use]
            pub const fn is_empty(&self) -> bool {
                self.raw.is_empty()
            }
        }

        impl<T: Ord> $name<T> {
            /// Adds a value.
            ///
            /// Returns a cursor at the element and whether `value` was stored. A collection
            /// of unique keys that already holds an equivalent element is left unchanged;
            /// the cursor then points at that element and the flag is `false`. A multiset
            /// always stores the value, after every element equal to it.
            ///
            /// # Panics
            ///
            #[doc = concat!("Panics if the collection already holds [`max_size`](", stringify!($name), "::max_size)")]
            /// elements. See `try_insert` for a fallible version.
            ///
            /// # Complexity
            ///
            /// O(log n)
            pub fn insert(&mut self, value: T) -> ($crate::Cursor<'_, T>, bool) {
                let (node, inserted) = self.raw.insert(value, $policy);
                ($crate::Cursor::new(&self.raw, Some(node)), inserted)
            }

            #[doc = concat!("Fallible version of [`insert`](", stringify!($name), "::insert).")]
            ///
            /// On error the collection is unchanged and `value` is dropped.
            ///
            /// # Errors
            ///
            /// Returns [`Error::CapacityExceeded`](crate::Error::CapacityExceeded) if the
            /// collection is full, or [`Error::AllocFailed`](crate::Error::AllocFailed) if
            /// the allocator refused to grow it.
            ///
            /// # Examples
            ///
            /// ```
            #[doc = concat!("use kuro_tree::", stringify!($name), ";")]
            ///
            #[doc = concat!("let mut set = ", stringify!($name), "::new();")]
            /// let (cursor, inserted) = set.try_insert(7)?;
            /// assert!(inserted);
            /// assert_eq!(cursor.get(), Some(&7));
            /// # Ok::<(), kuro_tree::Error>(())
            /// ```
            pub fn try_insert(&mut self, value: T) -> $crate::error::Result<($crate::Cursor<'_, T>, bool)> {
                let (node, inserted) = self.raw.try_insert(value, $policy)?;
                Ok(($crate::Cursor::new(&self.raw, Some(node)), inserted))
            }

            /// Inserts every value in iteration order, as if by repeated `insert`, and
            /// returns one `(cursor, inserted)` pair per value in input order.
            ///
            /// Earlier values are visible to later ones.
            ///
            /// # Complexity
            ///
            /// O(m log(n + m)), where m is the number of values.
            pub fn insert_many<I>(&mut self, values: I) -> ::alloc::vec::Vec<($crate::Cursor<'_, T>, bool)>
            where
                I: IntoIterator<Item = T>,
            {
                let outcomes: ::alloc::vec::Vec<_> =
                    values.into_iter().map(|value| self.raw.insert(value, $policy)).collect();
                let raw = &self.raw;
                outcomes.into_iter().map(|(node, inserted)| ($crate::Cursor::new(raw, Some(node)), inserted)).collect()
            }

            /// Returns a cursor at an element equal to the value, or the end cursor if
            /// there is none.
            ///
            /// The value may be any borrowed form of the element type, but the ordering on
            /// the borrowed form *must* match the ordering on the element type.
            ///
            /// # Complexity
            ///
            /// O(log n)
            pub fn find<Q>(&self, value: &Q) -> $crate::Cursor<'_, T>
            where
                T: ::core::borrow::Borrow<Q>,
                Q: ?Sized + Ord,
            {
                $crate::Cursor::new(&self.raw, self.raw.find(value))
            }

            /// Returns `true` if an element equal to the value is present.
            ///
            /// # Examples
            ///
            /// ```
            #[doc = concat!("use kuro_tree::", stringify!($name), ";")]
            ///
            #[doc = concat!("let set = ", stringify!($name), "::from([1, 2, 3]);")]
            /// assert!(set.contains(&1));
            /// assert!(!set.contains(&4));
            /// ```
            #[must_use]
            pub fn contains<Q>(&self, value: &Q) -> bool
            where
                T: ::core::borrow::Borrow<Q>,
                Q: ?Sized + Ord,
            {
                self.raw.find(value).is_some()
            }

            /// Returns a reference to an element equal to the value, if any.
            pub fn get<Q>(&self, value: &Q) -> Option<&T>
            where
                T: ::core::borrow::Borrow<Q>,
                Q: ?Sized + Ord,
            {
                self.raw.find(value).map(|h| self.raw.key(h))
            }

            /// Returns a cursor at the first element that is not less than the value, or
            /// the end cursor if every element is less.
            ///
            /// # Examples
            ///
            /// ```
            #[doc = concat!("use kuro_tree::", stringify!($name), ";")]
            ///
            #[doc = concat!("let set = ", stringify!($name), "::from([10, 20, 30]);")]
            /// assert_eq!(set.lower_bound(&20).get(), Some(&20));
            /// assert_eq!(set.lower_bound(&21).get(), Some(&30));
            /// assert!(set.lower_bound(&31).is_end());
            /// ```
            ///
            /// # Complexity
            ///
            /// O(log n)
            pub fn lower_bound<Q>(&self, value: &Q) -> $crate::Cursor<'_, T>
            where
                T: ::core::borrow::Borrow<Q>,
                Q: ?Sized + Ord,
            {
                $crate::Cursor::new(&self.raw, self.raw.lower_bound(value))
            }

            /// Returns a cursor at the first element that is greater than the value, or the
            /// end cursor if there is none.
            ///
            /// # Complexity
            ///
            /// O(log n)
            pub fn upper_bound<Q>(&self, value: &Q) -> $crate::Cursor<'_, T>
            where
                T: ::core::borrow::Borrow<Q>,
                Q: ?Sized + Ord,
            {
                $crate::Cursor::new(&self.raw, self.raw.upper_bound(value))
            }

            /// Returns `(lower_bound(value), upper_bound(value))`, delimiting the run of
            /// elements equal to the value. Both cursors are equal when nothing matches.
            ///
            /// # Complexity
            ///
            /// O(log n)
            pub fn equal_range<Q>(&self, value: &Q) -> ($crate::Cursor<'_, T>, $crate::Cursor<'_, T>)
            where
                T: ::core::borrow::Borrow<Q>,
                Q: ?Sized + Ord,
            {
                (self.lower_bound(value), self.upper_bound(value))
            }

            /// Constructs a double-ended iterator over a sub-range of elements.
            ///
            /// # Panics
            ///
            /// Panics if range `start > end`.
            /// Panics if range `start == end` and both bounds are `Excluded`.
            ///
            /// # Examples
            ///
            /// ```
            /// use core::ops::Bound::Included;
            #[doc = concat!("use kuro_tree::", stringify!($name), ";")]
            ///
            #[doc = concat!("let set = ", stringify!($name), "::from([3, 5, 8]);")]
            /// assert!(set.range((Included(&4), Included(&8))).eq(&[5, 8]));
            /// assert_eq!(Some(&5), set.range(4..).next());
            /// ```
            ///
            /// # Complexity
            ///
            /// O(log n) to create the iterator; amortized O(1) per step.
            pub fn range<K, R>(&self, range: R) -> $crate::iter::Range<'_, T>
            where
                K: ?Sized + Ord,
                T: ::core::borrow::Borrow<K>,
                R: ::core::ops::RangeBounds<K>,
            {
                $crate::iter::Range::new(&self.raw, self.raw.range_ends(&range))
            }
        }

        impl<T: ::core::hash::Hash> ::core::hash::Hash for $name<T> {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                state.write_usize(self.len());
                for elt in self {
                    elt.hash(state);
                }
            }
        }

        impl<T: PartialEq> PartialEq for $name<T> {
            fn eq(&self, other: &$name<T>) -> bool {
                self.len() == other.len() && self.iter().eq(other)
            }
        }

        impl<T: Eq> Eq for $name<T> {}

        impl<T: PartialOrd> PartialOrd for $name<T> {
            fn partial_cmp(&self, other: &$name<T>) -> Option<::core::cmp::Ordering> {
                self.iter().partial_cmp(other.iter())
            }
        }

        impl<T: Ord> Ord for $name<T> {
            fn cmp(&self, other: &$name<T>) -> ::core::cmp::Ordering {
                self.iter().cmp(other.iter())
            }
        }

        impl<T: Clone> Clone for $name<T> {
            /// Deep-copies the collection. Positions into `self` do not name elements of
            /// the copy.
            fn clone(&self) -> Self {
                $name {
                    raw: self.raw.clone(),
                }
            }
        }

        impl<T: ::core::fmt::Debug> ::core::fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_set().entries(self.iter()).finish()
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> $name<T> {
                $name::new()
            }
        }

        impl<T: Ord> FromIterator<T> for $name<T> {
            fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> $name<T> {
                let mut set = $name::new();
                set.extend(iter);
                set
            }
        }

        impl<T: Ord> Extend<T> for $name<T> {
            #[inline]
            fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
                for elem in iter {
                    self.raw.insert(elem, $policy);
                }
            }
        }

        impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for $name<T> {
            fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
                self.extend(iter.into_iter().copied());
            }
        }

        impl<T: Ord, const N: usize> From<[T; N]> for $name<T> {
            fn from(arr: [T; N]) -> Self {
                arr.into_iter().collect()
            }
        }

        impl<T> IntoIterator for $name<T> {
            type Item = T;
            type IntoIter = $crate::iter::IntoIter<T>;

            /// Moves the elements out in ascending order.
            fn into_iter(self) -> $crate::iter::IntoIter<T> {
                $crate::iter::IntoIter::new(self.raw)
            }
        }

        impl<'a, T> IntoIterator for &'a $name<T> {
            type Item = &'a T;
            type IntoIter = $crate::iter::Iter<'a, T>;

            fn into_iter(self) -> $crate::iter::Iter<'a, T> {
                self.iter()
            }
        }
    };
}

pub(crate) use tree_facade;
