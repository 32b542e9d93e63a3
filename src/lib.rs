//! Red-black tree collections with stable cursors, for Rust.
//!
//! This crate provides an ordered set ([`RBTreeSet`]) and an ordered multiset
//! ([`RBTreeMultiset`]) on top of one red-black tree engine, and a small FIFO [`Queue`].
//!
//! Besides the usual `BTreeSet`-style API, both trees expose:
//!
//! - [`Cursor`]s from lookups (`find`, `lower_bound`, `upper_bound`, `equal_range`) that
//!   step in either direction and wrap through an end position.
//! - [`Position`]s, detached copies of a cursor that survive mutation and can be passed
//!   back to `erase`. Erasing one element never disturbs the positions of the others,
//!   and a stale or foreign position is simply ignored.
//! - Bulk insertion reporting a cursor per value, and merging that moves elements
//!   between trees without cloning them.
//!
//! # Example
//!
//! ```
//! use kuro_tree::{RBTreeMultiset, RBTreeSet};
//!
//! let mut set = RBTreeSet::from([1, 2, 3]);
//! let flags: Vec<bool> = set.insert_many([3, 4]).into_iter().map(|(_, inserted)| inserted).collect();
//! assert_eq!(flags, [false, true]);
//!
//! // Positions outlive the borrow and stay valid across unrelated erasures.
//! let three = set.find(&3).position();
//! set.remove(&2);
//! assert_eq!(set.cursor_at(three).and_then(|c| c.peek_prev()), Some(&1));
//! assert_eq!(set.erase(three), Some(3));
//!
//! let mut bag = RBTreeMultiset::from([2, 1, 2]);
//! assert_eq!(bag.count(&2), 2);
//! bag.merge(&mut RBTreeMultiset::from([2]));
//! assert_eq!(bag.count(&2), 3);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`. The `std` feature implements
//!   `std::error::Error` for [`Error`] and lets `tracing` use the standard library.
//! - **No unsafe code** - Nodes live in an index-based arena.
//! - **Logging** - Bulk operations emit `tracing` events at `trace` level, failed fallible
//!   operations at `debug` level.
//!
//! # Implementation
//!
//! Nodes are stored in a slot arena and linked by 32-bit handles, including a parent link
//! used for in-order stepping and rebalancing. Deleting a node with two children relinks
//! its successor node into its place instead of moving keys, which is what keeps
//! positions stable. Each slot carries a stamp that changes when it is freed, so a
//! position to an erased element is recognized even after the slot is reused.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod cursor;
mod error;
mod facade;
mod iter;
mod raw;

pub mod queue;
pub mod rbtree_multiset;
pub mod rbtree_set;

pub use cursor::{Cursor, Position};
pub use error::{Error, Result};
pub use queue::Queue;
pub use rbtree_multiset::RBTreeMultiset;
pub use rbtree_set::RBTreeSet;
