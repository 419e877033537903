//! Errors reported by the fallible reservation API.

use std::collections::TryReserveError;

/// Error returned by [`ChunkedDeque::try_reserve`](crate::ChunkedDeque::try_reserve).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReserveError {
    /// Doubling the chunk index would overflow `usize`.
    #[error("the requested capacity exceeds the addressable number of chunk slots")]
    CapacityOverflow,

    /// The allocator could not provide the grown chunk index.
    #[error("failed to allocate the chunk index: {0}")]
    AllocFailed(#[from] TryReserveError),
}
