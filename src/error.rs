use alloc::collections::TryReserveError;

/// Errors returned by the fallible operations of this crate ([`try_insert`], [`try_reserve`]).
///
/// Ordinary outcomes such as inserting a key that is already present, or looking up a
/// missing key, are never errors. Only resource exhaustion is reported here. When an error
/// is returned the collection is left exactly as it was before the call.
///
/// [`try_insert`]: crate::RBTreeSet::try_insert
/// [`try_reserve`]: crate::RBTreeSet::try_reserve
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Every node handle is in use; the collection cannot hold another element.
    #[error("collection is at maximum capacity ({max} elements)")]
    CapacityExceeded {
        /// The maximum number of elements.
        max: usize,
    },
    /// The allocator could not provide memory for another node.
    #[error("memory allocation failed: {0}")]
    AllocFailed(TryReserveError),
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Self {
        Error::AllocFailed(err)
    }
}

/// A `Result` alias with [`Error`] as the default error type.
pub type Result<T, E = Error> = core::result::Result<T, E>;
