//! Error types for tandemsort.

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors surfaced by a sort call.
///
/// Range and length problems are detected before any element moves. A
/// comparator that is not a strict weak ordering is only ever detected inside
/// the merge engine; when it is, the columns are left holding a valid
/// permutation of the input, but not necessarily a sorted one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    /// The requested range does not satisfy `lo <= hi <= keys.len()`.
    #[error("invalid sort range {lo}..{hi} for key column of length {len}")]
    InvalidRange { lo: usize, hi: usize, len: usize },

    /// A satellite column's length differs from the key column's.
    #[error("satellite column length {found} does not match key column length {expected}")]
    SatelliteLength { expected: usize, found: usize },

    /// The comparator contradicted itself mid-merge.
    #[error("comparison method violates its general contract")]
    ComparatorContract,

    /// Merge scratch storage could not be allocated.
    #[error("failed to allocate merge scratch storage")]
    Allocation(#[from] TryReserveError),
}
