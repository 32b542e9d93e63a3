use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::ops::{Bound, RangeBounds};
use core::sync::atomic::{self, AtomicUsize};

use alloc::vec::Vec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};
use crate::cursor::Position;
use crate::error::Error;

/// What `insert` does when an equivalent key is already present.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DuplicatePolicy {
    /// Leave the tree alone and report the existing node.
    Reject,
    /// Insert after the existing run of equal keys.
    Allow,
}

/// Process-unique identity of a tree, so positions from one tree are ignored by another.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) struct TreeId(usize);

impl TreeId {
    fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        TreeId(NEXT.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// The red-black tree backing both `RBTreeSet` and `RBTreeMultiset`.
pub(crate) struct RawTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Leftmost node, for O(1) `begin`.
    first: Option<Handle>,
    /// Rightmost node, for O(1) backward iteration from the end.
    last: Option<Handle>,
    id: TreeId,
}

/// Where a key belongs, as found by descending from the root.
enum InsertPoint {
    /// An equivalent key exists and duplicates are rejected.
    Occupied(Handle),
    /// The key goes into the empty `side` slot of `parent` (or becomes the root).
    Vacant {
        parent: Option<Handle>,
        side: Side,
    },
}

impl<T> RawTree<T> {
    /// Creates a new, empty tree.
    pub(crate) fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            first: None,
            last: None,
            id: TreeId::next(),
        }
    }

    /// Creates a new tree with room for `capacity` keys.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            ..Self::new()
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Upper bound on the number of keys, limited by the handle width.
    pub(crate) const fn max_len() -> usize {
        let fraction = usize::MAX / 32;
        if fraction < Handle::MAX { fraction } else { Handle::MAX }
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        if self.len().saturating_add(additional) > Handle::MAX {
            tracing::debug!(len = self.len(), additional, "reserve exceeds handle space");
            return Err(Error::CapacityExceeded {
                max: Handle::MAX,
            });
        }
        self.nodes.try_reserve(additional).map_err(|err| {
            tracing::debug!(len = self.len(), additional, "reserve failed");
            Error::from(err)
        })
    }

    /// Drops every node. Positions taken before the call no longer resolve.
    pub(crate) fn clear(&mut self) {
        tracing::trace!(len = self.len(), "clearing tree");
        self.nodes.clear();
        self.root = None;
        self.first = None;
        self.last = None;
        self.id = TreeId::next();
    }

    pub(crate) const fn first(&self) -> Option<Handle> {
        self.first
    }

    pub(crate) const fn last(&self) -> Option<Handle> {
        self.last
    }

    #[inline]
    pub(crate) fn key(&self, handle: Handle) -> &T {
        &self.nodes.get(handle).key
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|h| self.node(h).is_red())
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).color = color;
    }

    /// Which child slot of `parent` holds `child`.
    fn side_of(&self, child: Handle, parent: Handle) -> Side {
        if self.node(parent).left == Some(child) { Side::Left } else { Side::Right }
    }

    /// Follows `side` links from `handle` to the end of the subtree.
    fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.node(handle).child(side) {
            handle = child;
        }
        handle
    }

    /// In-order neighbour of `handle` on `side` (`Right` is the successor).
    fn neighbor(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.node(handle).child(side) {
            return Some(self.extreme(child, side.opposite()));
        }

        let mut child = handle;
        let mut parent = self.node(handle).parent;
        while let Some(p) = parent {
            if self.node(p).child(side.opposite()) == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.node(p).parent;
        }
        None
    }

    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Right)
    }

    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Left)
    }

    /// Number of successor steps from `from` to `to`. `None` is the end position.
    pub(crate) fn distance(&self, from: Option<Handle>, to: Option<Handle>) -> usize {
        let mut steps = 0;
        let mut current = from;
        while current != to {
            let Some(handle) = current else {
                break;
            };
            current = self.successor(handle);
            steps += 1;
        }
        steps
    }

    /// Returns a detached position for `node` (`None` is the end position).
    pub(crate) fn position(&self, node: Option<Handle>) -> Position {
        Position {
            tree: self.id,
            slot: node.map(|h| self.nodes.slot_ref(h)),
        }
    }

    /// Returns where `position` points in this tree: `Some(None)` for the end position,
    /// `Some(Some(node))` for a present element, and `None` if it is stale or foreign.
    pub(crate) fn seek(&self, position: Position) -> Option<Option<Handle>> {
        if position.tree != self.id {
            return None;
        }
        match position.slot {
            None => Some(None),
            Some(slot) => self.nodes.is_live(slot).then_some(Some(slot.handle)),
        }
    }

    /// Returns the node named by `position` if it belongs to this tree and is still present.
    pub(crate) fn resolve(&self, position: Position) -> Option<Handle> {
        self.seek(position).flatten()
    }

    /// Removes the element named by `position`. End, stale and foreign positions are ignored.
    pub(crate) fn erase(&mut self, position: Position) -> Option<T> {
        let handle = self.resolve(position)?;
        Some(self.remove(handle))
    }

    /// Unlinks `handle`, rebalances, and returns its key. Other handles stay valid.
    pub(crate) fn remove(&mut self, handle: Handle) -> T {
        if self.first == Some(handle) {
            self.first = self.successor(handle);
        }
        if self.last == Some(handle) {
            self.last = self.predecessor(handle);
        }
        self.unlink(handle);
        self.nodes.take(handle).key
    }

    pub(crate) fn pop_first(&mut self) -> Option<T> {
        self.first.map(|h| self.remove(h))
    }

    pub(crate) fn pop_last(&mut self) -> Option<T> {
        self.last.map(|h| self.remove(h))
    }

    /// Keeps only the keys for which `keep` returns `true`, visiting them in order.
    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0usize;
        let mut current = self.first;
        while let Some(handle) = current {
            current = self.successor(handle);
            if !keep(self.key(handle)) {
                drop(self.remove(handle));
                removed += 1;
            }
        }
        tracing::trace!(removed, remaining = self.len(), "retain finished");
    }

    /// Moves every key out in ascending order, leaving the tree empty.
    pub(crate) fn take_sorted(&mut self) -> Vec<T> {
        let mut order = Vec::with_capacity(self.len());
        let mut current = self.first;
        while let Some(handle) = current {
            order.push(handle);
            current = self.successor(handle);
        }

        // Links are not maintained while draining; the tree is reset right after.
        let keys = order.into_iter().map(|h| self.nodes.take(h).key).collect();
        self.clear();
        keys
    }

    /// Replaces `old` with `new` in the child slot of `parent` (or at the root).
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let side = self.side_of(old, p);
                self.node_mut(p).set_child(side, new);
            }
        }
    }

    /// Puts the subtree `new` where `old` hangs. `old` keeps its own links.
    fn transplant(&mut self, old: Handle, new: Option<Handle>) {
        let parent = self.node(old).parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.node_mut(new).parent = parent;
        }
    }

    /// Rotates `pivot` down towards `side`; its child on the other side takes its place.
    fn rotate(&mut self, pivot: Handle, side: Side) {
        let opposite = side.opposite();
        let riser = self.node(pivot).child(opposite).expect("`RawTree::rotate()` - pivot has no child to rotate up!");

        let inner = self.node(riser).child(side);
        self.node_mut(pivot).set_child(opposite, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(pivot);
        }

        self.transplant(pivot, Some(riser));
        self.node_mut(riser).set_child(side, Some(pivot));
        self.node_mut(pivot).parent = Some(riser);
    }

    /// Links the freshly allocated `handle` into the tree and restores balance.
    fn link(&mut self, handle: Handle, parent: Option<Handle>, side: Side) {
        match parent {
            None => {
                self.root = Some(handle);
                self.first = Some(handle);
                self.last = Some(handle);
            }
            Some(p) => {
                self.node_mut(p).set_child(side, Some(handle));
                match side {
                    Side::Left if self.first == Some(p) => self.first = Some(handle),
                    Side::Right if self.last == Some(p) => self.last = Some(handle),
                    _ => {}
                }
            }
        }
        self.insert_fixup(handle);
    }

    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(mut parent) = self.node(node).parent {
            if !self.node(parent).is_red() {
                break;
            }
            // The root is black, so a red parent always has a parent.
            let grandparent =
                self.node(parent).parent.expect("`RawTree::insert_fixup()` - red node without a parent!");
            let side = self.side_of(parent, grandparent);

            let uncle = self.node(grandparent).child(side.opposite());
            if let Some(uncle) = uncle.filter(|&u| self.node(u).is_red()) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.side_of(node, parent) != side {
                self.rotate(parent, side);
                node = parent;
                parent = self.node(node).parent.expect("`RawTree::insert_fixup()` - rotation lost the parent!");
            }
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Detaches `node` from the structure. A node with two children is replaced by its
    /// successor node, so no key changes slots.
    fn unlink(&mut self, node: Handle) {
        let Node {
            left,
            right,
            parent,
            color,
            ..
        } = *self.node(node);
        let mut removed_color = color;

        let (child, child_parent) = match (left, right) {
            (None, _) => {
                self.transplant(node, right);
                (right, parent)
            }
            (Some(_), None) => {
                self.transplant(node, left);
                (left, parent)
            }
            (Some(left), Some(right)) => {
                let successor = self.extreme(right, Side::Left);
                removed_color = self.node(successor).color;
                let child = self.node(successor).right;

                let child_parent = if successor == right {
                    Some(successor)
                } else {
                    let successor_parent = self.node(successor).parent;
                    self.transplant(successor, child);
                    self.node_mut(successor).right = Some(right);
                    self.node_mut(right).parent = Some(successor);
                    successor_parent
                };

                self.transplant(node, Some(successor));
                self.node_mut(successor).left = Some(left);
                self.node_mut(left).parent = Some(successor);
                self.set_color(successor, color);
                (child, child_parent)
            }
        };

        if removed_color == Color::Black {
            self.erase_fixup(child, child_parent);
        }
    }

    /// Restores the black height after a black node left the path through `node`.
    fn erase_fixup(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        while node != self.root && !self.is_red(node) {
            let Some(p) = parent else {
                break;
            };
            // `node` may be empty, but then its sibling is not: the removed black node
            // gave the sibling's subtree a black height of at least one.
            let side = if self.node(p).left == node { Side::Left } else { Side::Right };
            let opposite = side.opposite();

            let mut sibling = self.sibling(p, opposite);
            if self.node(sibling).is_red() {
                self.set_color(sibling, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                sibling = self.sibling(p, opposite);
            }

            let near = self.node(sibling).child(side);
            let far = self.node(sibling).child(opposite);
            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Color::Red);
                node = Some(p);
                parent = self.node(p).parent;
                continue;
            }

            if !self.is_red(far) {
                if let Some(near) = near {
                    self.set_color(near, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, opposite);
                sibling = self.sibling(p, opposite);
            }

            let parent_color = self.node(p).color;
            self.set_color(sibling, parent_color);
            self.set_color(p, Color::Black);
            if let Some(far) = self.node(sibling).child(opposite) {
                self.set_color(far, Color::Black);
            }
            self.rotate(p, side);
            node = self.root;
            parent = None;
        }

        if let Some(node) = node {
            self.set_color(node, Color::Black);
        }
    }

    fn sibling(&self, parent: Handle, side: Side) -> Handle {
        self.node(parent).child(side).expect("`RawTree::erase_fixup()` - doubly black node without a sibling!")
    }
}

impl<T: Ord> RawTree<T> {
    fn locate(&self, key: &T, policy: DuplicatePolicy) -> InsertPoint {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.node(handle);
            side = match key.cmp(&node.key) {
                Less => Side::Left,
                Greater => Side::Right,
                Equal => match policy {
                    DuplicatePolicy::Reject => return InsertPoint::Occupied(handle),
                    DuplicatePolicy::Allow => Side::Right,
                },
            };
            parent = Some(handle);
            current = node.child(side);
        }

        InsertPoint::Vacant {
            parent,
            side,
        }
    }

    /// Inserts `key` according to `policy`.
    ///
    /// Returns the handle of the new node and `true`, or the handle of the equivalent
    /// node already present and `false`.
    pub(crate) fn insert(&mut self, key: T, policy: DuplicatePolicy) -> (Handle, bool) {
        match self.locate(&key, policy) {
            InsertPoint::Occupied(handle) => (handle, false),
            InsertPoint::Vacant {
                parent,
                side,
            } => {
                let handle = self.nodes.alloc(Node::new(key, parent));
                self.link(handle, parent, side);
                (handle, true)
            }
        }
    }

    /// Like [`RawTree::insert`], but returns an error instead of panicking when no node can
    /// be allocated. The tree is unchanged on error.
    pub(crate) fn try_insert(&mut self, key: T, policy: DuplicatePolicy) -> Result<(Handle, bool), Error> {
        match self.locate(&key, policy) {
            InsertPoint::Occupied(handle) => Ok((handle, false)),
            InsertPoint::Vacant {
                parent,
                side,
            } => match self.nodes.try_alloc(Node::new(key, parent)) {
                Ok(handle) => {
                    self.link(handle, parent, side);
                    Ok((handle, true))
                }
                Err(err) => {
                    tracing::debug!(len = self.len(), %err, "insert failed");
                    Err(err)
                }
            },
        }
    }

    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            current = match key.cmp(node.key.borrow()) {
                Less => node.left,
                Greater => node.right,
                Equal => return Some(handle),
            };
        }
        None
    }

    /// First node whose key is not less than `key`.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.bound_by(|node_key| node_key.borrow().cmp(key) != Less)
    }

    /// First node whose key is greater than `key`.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.bound_by(|node_key| node_key.borrow().cmp(key) == Greater)
    }

    /// First node satisfying `past`, which must be monotone over the in-order sequence.
    fn bound_by<F>(&self, past: F) -> Option<Handle>
    where
        F: Fn(&T) -> bool,
    {
        let mut bound = None;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            if past(&node.key) {
                bound = Some(handle);
                current = node.left;
            } else {
                current = node.right;
            }
        }
        bound
    }

    /// First and last node inside `range`, or `(None, None)` when the range is empty.
    ///
    /// # Panics
    ///
    /// Panics if the start of the range is after its end, or if both are equal and excluded.
    pub(crate) fn range_ends<Q, R>(&self, range: &R) -> (Option<Handle>, Option<Handle>)
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
        R: RangeBounds<Q>,
    {
        match (range.start_bound(), range.end_bound()) {
            (Bound::Excluded(start), Bound::Excluded(end)) if start.cmp(end) == Equal => {
                panic!("`RawTree::range_ends()` - range start and end are equal and excluded!")
            }
            (Bound::Included(start) | Bound::Excluded(start), Bound::Included(end) | Bound::Excluded(end))
                if start.cmp(end) == Greater =>
            {
                panic!("`RawTree::range_ends()` - range start is greater than range end!")
            }
            _ => {}
        }

        let front = match range.start_bound() {
            Bound::Included(start) => self.lower_bound(start),
            Bound::Excluded(start) => self.upper_bound(start),
            Bound::Unbounded => self.first,
        };
        let past_back = match range.end_bound() {
            Bound::Included(end) => Some(self.upper_bound(end)),
            Bound::Excluded(end) => Some(self.lower_bound(end)),
            Bound::Unbounded => None,
        };
        let back = match past_back {
            Some(Some(handle)) => self.predecessor(handle),
            Some(None) | None => self.last,
        };

        match (front, back) {
            (Some(f), Some(b)) if self.key(f) <= self.key(b) => (Some(f), Some(b)),
            _ => (None, None),
        }
    }

    /// Moves each key of `other` with no equivalent in `self` into `self`. Keys that collide
    /// stay in `other`, and handles to them remain valid.
    pub(crate) fn merge_unique(&mut self, other: &mut Self) {
        let transferred = self.merge_with(other, DuplicatePolicy::Reject);
        tracing::trace!(transferred, retained = other.len(), len = self.len(), "merged unique keys");
    }

    /// Moves every key of `other` into `self`, leaving `other` empty. Moved keys follow
    /// any equal keys already in `self`, and keep their relative order.
    pub(crate) fn merge_all(&mut self, other: &mut Self) {
        let transferred = self.merge_with(other, DuplicatePolicy::Allow);
        tracing::trace!(transferred, len = self.len(), "merged all keys");
    }

    /// Moves the keys of `other` that `policy` admits into `self`, one node at a time and in
    /// ascending order. Returns how many were moved.
    ///
    /// A key's place in `self` is found before it leaves `other`, and nothing after that
    /// compares keys, so a panicking `Ord` leaves every key in exactly one of the two trees.
    fn merge_with(&mut self, other: &mut Self, policy: DuplicatePolicy) -> usize {
        let mut transferred = 0;
        let mut current = other.first;
        while let Some(handle) = current {
            current = other.successor(handle);
            let InsertPoint::Vacant {
                parent,
                side,
            } = self.locate(other.key(handle), policy)
            else {
                continue;
            };

            self.nodes.reserve_slot();
            let key = other.remove(handle);
            let node = self.nodes.alloc(Node::new(key, parent));
            self.link(node, parent, side);
            transferred += 1;
        }
        transferred
    }
}

impl<T: Clone> Clone for RawTree<T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            first: self.first,
            last: self.last,
            id: TreeId::next(),
        }
    }
}
