//! Streaming Merkle tree: roots and single-leaf inclusion proofs over a
//! stream of segments in O(log n) memory.
//!
//! Leaves are folded into a stack of complete subtree roots as they arrive,
//! exactly like incrementing a binary counter, so no tree is ever stored.
//! The audit path of one designated leaf is recorded on the fly.
//!
//! # Core types
//!
//! - [`StreamMerkleTree`]: incremental tree (append, root, proof).
//! - [`CachedStreamMerkleTree`]: two-level tree over pre-computed subtree
//!   roots, for inputs too large to hash in one pass.
//! - [`Proof`]: portable proof with a fixed-layout byte encoding.
//! - [`verify_proof`]: stateless verification.
//!
//! # Hashing
//!
//! The hash function is injected through [`SegmentHasher`]. [`Blake3Hasher`]
//! (feature `blake3`, default) and [`Sha256Hasher`] (feature `sha2`) are
//! provided.

#![warn(missing_docs)]

mod cached_tree;
mod error;
/// Digest forest backing incremental construction.
pub mod forest;
/// Digest capability and domain-separated digest helpers.
pub mod hasher;
/// Index arithmetic shared by proof recording and verification.
pub mod helper;
mod proof;
mod stream;
#[cfg(all(test, feature = "blake3"))]
mod tests;
mod tree;
mod verify;

pub use cached_tree::{CachedStreamMerkleTree, MAX_CACHED_NODE_HEIGHT};
pub use error::{Error, Result};
#[cfg(feature = "blake3")]
pub use hasher::Blake3Hasher;
pub use hasher::SegmentHasher;
#[cfg(feature = "sha2")]
pub use hasher::Sha256Hasher;
pub use hasher::{leaf_sum, node_sum};
pub use proof::{MAX_OBJECT_SIZE, MAX_SLICE_SIZE, Proof, read_prefixed, write_prefixed};
pub use stream::{build_reader_proof, reader_root};
pub use tree::StreamMerkleTree;
pub use verify::verify_proof;
