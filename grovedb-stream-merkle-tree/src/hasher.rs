//! Injected digest capability and the domain-separated digest helpers.
//!
//! Hash domain separation:
//! - Leaf digests: `H(0x00 || data)`
//! - Node digests: `H(0x01 || left || right)`
//!
//! The 0x00/0x01 tags keep a crafted segment from colliding with an
//! internal node, so a leaf can never be passed off as a subtree.

/// Domain tag prepended to leaf inputs: `H(LEAF_TAG || data)`.
pub const LEAF_TAG: u8 = 0x00;
/// Domain tag prepended to internal merge inputs: `H(INTERNAL_TAG || left ||
/// right)`.
pub const INTERNAL_TAG: u8 = 0x01;

/// A resettable hash function with a fixed output length.
///
/// Trees own one instance and reuse it for every digest; read-only
/// operations such as [`root`](crate::StreamMerkleTree::root) work on a
/// clone, which is why the capability must be `Clone`.
pub trait SegmentHasher: Clone {
    /// Discard any buffered input.
    fn reset(&mut self);

    /// Feed `bytes` into the running digest.
    fn update(&mut self, bytes: &[u8]);

    /// Produce the digest of everything written since the last reset and
    /// leave the hasher reset.
    fn finalize(&mut self) -> Vec<u8>;
}

/// Blake3 with 32-byte output.
#[cfg(feature = "blake3")]
#[derive(Clone, Debug, Default)]
pub struct Blake3Hasher {
    inner: blake3::Hasher,
}

#[cfg(feature = "blake3")]
impl Blake3Hasher {
    /// Create a fresh hasher.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "blake3")]
impl SegmentHasher for Blake3Hasher {
    fn reset(&mut self) {
        self.inner.reset();
    }

    fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    fn finalize(&mut self) -> Vec<u8> {
        let out = self.inner.finalize().as_bytes().to_vec();
        self.inner.reset();
        out
    }
}

/// SHA-256 with 32-byte output.
#[cfg(feature = "sha2")]
#[derive(Clone, Debug, Default)]
pub struct Sha256Hasher {
    inner: sha2::Sha256,
}

#[cfg(feature = "sha2")]
impl Sha256Hasher {
    /// Create a fresh hasher.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "sha2")]
impl SegmentHasher for Sha256Hasher {
    fn reset(&mut self) {
        sha2::Digest::reset(&mut self.inner);
    }

    fn update(&mut self, bytes: &[u8]) {
        sha2::Digest::update(&mut self.inner, bytes);
    }

    fn finalize(&mut self) -> Vec<u8> {
        sha2::Digest::finalize_reset(&mut self.inner).to_vec()
    }
}

/// Digest of the concatenation of `parts`.
pub fn sum<H: SegmentHasher>(hasher: &mut H, parts: &[&[u8]]) -> Vec<u8> {
    hasher.reset();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()
}

/// Leaf digest: `H(0x00 || data)`.
pub fn leaf_sum<H: SegmentHasher>(hasher: &mut H, data: &[u8]) -> Vec<u8> {
    sum(hasher, &[&[LEAF_TAG], data])
}

/// Node digest: `H(0x01 || left || right)`.
pub fn node_sum<H: SegmentHasher>(hasher: &mut H, left: &[u8], right: &[u8]) -> Vec<u8> {
    sum(hasher, &[&[INTERNAL_TAG], left, right])
}
