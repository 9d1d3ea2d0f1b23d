use thiserror::Error;

/// Alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors from streaming Merkle tree operations.
///
/// Proof verification never produces an error: malformed or forged input
/// is reported as `false` by [`verify_proof`](crate::verify_proof).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The proof target was changed after leaves had been appended.
    #[error("cannot set the proof index after {leaf_count} leaves were appended")]
    AlreadyStarted {
        /// Number of leaves appended when the call was rejected.
        leaf_count: u64,
    },
    /// The stream ended before the requested leaf was reached.
    #[error("index {index} was not reached while creating proof ({leaf_count} leaves read)")]
    IndexNotReached {
        /// Requested leaf index.
        index: u64,
        /// Number of leaves actually read.
        leaf_count: u64,
    },
    /// A cached subtree height too large to index raw leaves with `u64`.
    #[error("cached node height {0} is out of range")]
    InvalidHeight(u32),
    /// Stream ingestion was asked to read zero-sized segments.
    #[error("segment size must be greater than zero")]
    InvalidSegmentSize,
    /// Malformed encoded data (proof bytes, length-prefixed frames).
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// An error from the underlying reader or writer.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
