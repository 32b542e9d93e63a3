use core::fmt;

use alloc::collections::VecDeque;
use alloc::collections::vec_deque;

/// A first-in, first-out queue.
///
/// Values are pushed at the back and popped from the front.
///
/// # Examples
///
/// ```
/// use kuro_tree::Queue;
///
/// let mut queue = Queue::new();
/// queue.push(1);
/// queue.push(2);
/// queue.push(3);
///
/// assert_eq!(queue.front(), Some(&1));
/// assert_eq!(queue.back(), Some(&3));
/// assert_eq!(queue.pop(), Some(1));
/// assert_eq!(queue.len(), 2);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    /// Creates an empty queue. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Queue {
            items: VecDeque::new(),
        }
    }

    /// Creates an empty queue with room for at least `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Queue {
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a value to the back of the queue.
    ///
    /// # Complexity
    ///
    /// Amortized O(1)
    pub fn push(&mut self, value: T) {
        self.items.push_back(value);
    }

    /// Removes the value at the front of the queue and returns it, or `None` if the queue
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use kuro_tree::Queue;
    ///
    /// let mut queue = Queue::from([1]);
    /// assert_eq!(queue.pop(), Some(1));
    /// assert_eq!(queue.pop(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Returns the value that [`pop`](Queue::pop) would return next.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    /// Returns the most recently pushed value.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.items.front_mut()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.items.back_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Swaps the contents of `self` and `other`.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.items, &mut other.items);
    }

    /// Pushes every value to the back, in iteration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use kuro_tree::Queue;
    ///
    /// let mut queue = Queue::from([4, 5]);
    /// queue.insert_many_back([1, 2, 3]);
    /// assert_eq!(queue.len(), 5);
    /// assert_eq!(queue.front(), Some(&4));
    /// assert_eq!(queue.back(), Some(&3));
    /// ```
    pub fn insert_many_back<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.extend(values);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns a front-to-back iterator.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Queue::new()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Queue {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many_back(iter);
    }
}

impl<T, const N: usize> From<[T; N]> for Queue<T> {
    fn from(arr: [T; N]) -> Self {
        Queue {
            items: VecDeque::from(arr),
        }
    }
}

impl<T> IntoIterator for Queue<T> {
    type Item = T;
    type IntoIter = vec_deque::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
