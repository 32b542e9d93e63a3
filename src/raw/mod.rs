mod arena;
mod handle;
mod node;
mod raw_tree;

pub(crate) use handle::{Handle, SlotRef};
pub(crate) use raw_tree::{DuplicatePolicy, RawTree, TreeId};
