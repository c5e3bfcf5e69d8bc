//! Error taxonomy for `lcpsort`.
//!
//! Only caller-recoverable conditions are surfaced through [`LcpSortError`]. Corrupted
//! internal state (a loser-tree tournament, bucket permutation, or splitter-tree index
//! gone wrong) is a library defect, not something a caller can act on, and is reported
//! via `debug_assert!`/`panic!` instead (see the crate root docs).

use thiserror::Error;

/// Errors surfaced by the public sorting entry points.
#[derive(Debug, Error)]
pub enum LcpSortError {
    /// An argument (K, `treebits`, output buffer length, ...) was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Scratch storage (runs, bucket cache, splitter tree, job queue) could not be
    /// allocated for the requested input size.
    #[error("allocation failure: {0}")]
    AllocationFailure(String),
}

pub(crate) type Result<T> = std::result::Result<T, LcpSortError>;
