//! Crate-level error types.
//!
//! Only batch construction and batch drawing can fail recoverably;
//! allocator invariant violations (double free, corrupted bookkeeping)
//! abort instead, since continuing past them would corrupt shared GPU
//! state silently.

use std::fmt;

use crate::signature::Signature;

/// Errors produced by the chunkpool crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError {
    /// A batch was captured over chunks of differing signatures; they
    /// live in different backing stores and cannot share a draw.
    SignatureMismatch {
        /// Signature of the first non-empty chunk in the batch.
        expected: Signature,
        /// The conflicting signature encountered after it.
        found: Signature,
    },
    /// A batch was captured over chunks that share a signature but not a
    /// backing store (they came from different registries); their ranges
    /// index different buffers and cannot share a draw.
    StoreMismatch,
    /// A batch's backing store grew or was destroyed after capture; its
    /// recorded ranges can no longer be trusted.
    StaleBatch,
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignatureMismatch { expected, found } => write!(
                f,
                "batch mixes signatures: expected {}, found {}",
                expected.label(),
                found.label()
            ),
            Self::StoreMismatch => write!(
                f,
                "batch mixes backing stores: chunks share a signature but \
                 come from different registries"
            ),
            Self::StaleBatch => {
                write!(f, "batch is stale: backing store grew or was destroyed")
            }
        }
    }
}

impl std::error::Error for ChunkError {}
