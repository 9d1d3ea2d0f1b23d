//! Single-leaf inclusion proof and its byte encoding.
//!
//! Wire layout (bincode, little-endian, fixed-width integers):
//! `root_len(8) + root + path_len(8) + [elem_len(8) + elem]* +
//! target_index(8) + leaf_count(8)`.
//!
//! Framed proofs written by [`Proof::write_to`] carry an extra 8-byte
//! little-endian length header so they can be read back from a stream.

use std::io::{Read, Write};

use bincode::{Decode, Encode};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{Error, Result, hasher::SegmentHasher, verify::verify_proof};

/// Upper bound on the encoded size of one object.
pub const MAX_OBJECT_SIZE: usize = 12_000_000;

/// Upper bound on any single variable-size field of a decoded proof.
pub const MAX_SLICE_SIZE: usize = 5_000_000;

/// Self-contained proof that one leaf belongs to a tree with a given root.
///
/// `path[0]` is the leaf's raw segment; the remaining elements are sibling
/// digests ordered from the leaf up. An empty path means no proof is
/// available (nothing appended, or the target leaf was never reached).
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Proof {
    root: Vec<u8>,
    path: Vec<Vec<u8>>,
    target_index: u64,
    leaf_count: u64,
}

impl Proof {
    /// Create a proof from its parts.
    pub fn new(root: Vec<u8>, path: Vec<Vec<u8>>, target_index: u64, leaf_count: u64) -> Self {
        Self {
            root,
            path,
            target_index,
            leaf_count,
        }
    }

    /// Root the path recomputes to; empty for a tree without leaves.
    pub fn root(&self) -> &[u8] {
        &self.root
    }

    /// Raw leaf followed by the sibling digests.
    pub fn path(&self) -> &[Vec<u8>] {
        &self.path
    }

    /// Index of the proved leaf.
    pub fn target_index(&self) -> u64 {
        self.target_index
    }

    /// Number of leaves in the tree the proof was taken from.
    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    /// The proved leaf's raw segment, if a proof is available.
    pub fn leaf(&self) -> Option<&[u8]> {
        self.path.first().map(Vec::as_slice)
    }

    /// Returns `true` if the path is non-empty.
    pub fn is_available(&self) -> bool {
        !self.path.is_empty()
    }

    /// Consume the proof and return `(root, path, target_index,
    /// leaf_count)`.
    pub fn into_parts(self) -> (Vec<u8>, Vec<Vec<u8>>, u64, u64) {
        (self.root, self.path, self.target_index, self.leaf_count)
    }

    /// Check the proof against its own root.
    pub fn verify<H: SegmentHasher>(&self, hasher: &mut H) -> bool {
        verify_proof(
            hasher,
            &self.root,
            &self.path,
            self.target_index,
            self.leaf_count,
        )
    }

    /// Check the proof and that it proves exactly `data`.
    pub fn verify_leaf<H: SegmentHasher>(&self, hasher: &mut H, data: &[u8]) -> bool {
        self.leaf() == Some(data) && self.verify(hasher)
    }

    /// Check the proof against an externally trusted root.
    pub fn verify_against<H: SegmentHasher>(&self, hasher: &mut H, expected_root: &[u8]) -> bool {
        self.root == expected_root && self.verify(hasher)
    }

    /// Serialize this proof to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_little_endian()
            .with_fixed_int_encoding();
        bincode::encode_to_vec(self, config)
            .map_err(|e| Error::InvalidData(format!("failed to encode Proof: {}", e)))
    }

    /// Deserialize a proof from bytes.
    ///
    /// The bincode size limit is capped at [`MAX_OBJECT_SIZE`] so crafted
    /// length headers cannot cause huge allocations, and no single field may
    /// exceed [`MAX_SLICE_SIZE`].
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_little_endian()
            .with_fixed_int_encoding()
            .with_limit::<MAX_OBJECT_SIZE>();
        let (proof, read): (Proof, usize) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| Error::InvalidData(format!("failed to decode Proof: {}", e)))?;
        if read != bytes.len() {
            return Err(Error::InvalidData(format!(
                "Proof has {} trailing bytes",
                bytes.len() - read
            )));
        }
        if proof.root.len() > MAX_SLICE_SIZE
            || proof.path.iter().any(|elem| elem.len() > MAX_SLICE_SIZE)
        {
            return Err(Error::InvalidData(format!(
                "Proof field exceeds {} bytes",
                MAX_SLICE_SIZE
            )));
        }
        Ok(proof)
    }

    /// Write this proof as one length-prefixed frame.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_prefixed(writer, &self.encode_to_vec()?)
    }

    /// Read one length-prefixed proof frame.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let bytes = read_prefixed(reader, MAX_OBJECT_SIZE as u64)?;
        Self::decode_from_slice(&bytes)
    }
}

/// Write `data` preceded by its length as an 8-byte little-endian integer.
pub fn write_prefixed<W: Write>(writer: &mut W, data: &[u8]) -> Result<()> {
    writer.write_u64::<LittleEndian>(data.len() as u64)?;
    writer.write_all(data)?;
    Ok(())
}

/// Read a frame written by [`write_prefixed`], refusing lengths above
/// `max_len` before allocating.
pub fn read_prefixed<R: Read>(reader: &mut R, max_len: u64) -> Result<Vec<u8>> {
    let len = reader.read_u64::<LittleEndian>()?;
    if len > max_len {
        return Err(Error::InvalidData(format!(
            "length {} exceeds maxLen of {}",
            len, max_len
        )));
    }
    let len = usize::try_from(len)
        .map_err(|_| Error::InvalidData(format!("length {} does not fit in memory", len)))?;
    let mut data = vec![0u8; len];
    reader.read_exact(&mut data)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use assert_matches::assert_matches;

    use super::*;

    fn sample_proof() -> Proof {
        Proof::new(
            vec![0xAB; 32],
            vec![b"leaf".to_vec(), vec![1; 32], vec![2; 32]],
            5,
            11,
        )
    }

    #[test]
    fn test_proof_encode_decode() {
        let proof = sample_proof();
        let bytes = proof.encode_to_vec().expect("encode proof");
        let decoded = Proof::decode_from_slice(&bytes).expect("decode proof");
        assert_eq!(decoded, proof);
        assert_eq!(decoded.leaf(), Some(&b"leaf"[..]));
    }

    #[test]
    fn test_fixed_layout() {
        let proof = Proof::new(vec![9; 2], vec![vec![7]], 3, 4);
        let bytes = proof.encode_to_vec().expect("encode proof");
        let mut expected = Vec::new();
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(&[9, 9]);
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.push(7);
        expected.extend_from_slice(&3u64.to_le_bytes());
        expected.extend_from_slice(&4u64.to_le_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_decode_rejects_truncated_and_trailing() {
        let bytes = sample_proof().encode_to_vec().expect("encode proof");
        assert_matches!(
            Proof::decode_from_slice(&bytes[..bytes.len() - 1]),
            Err(Error::InvalidData(_))
        );
        let mut padded = bytes.clone();
        padded.push(0);
        assert_matches!(Proof::decode_from_slice(&padded), Err(Error::InvalidData(_)));
    }

    #[test]
    fn test_decode_rejects_huge_length_header() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(u64::MAX / 2).to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]);
        assert_matches!(Proof::decode_from_slice(&bytes), Err(Error::InvalidData(_)));
    }

    #[test]
    fn test_decode_rejects_oversized_field() {
        let proof = Proof::new(vec![1; 32], vec![vec![0; MAX_SLICE_SIZE + 1]], 0, 1);
        let bytes = proof.encode_to_vec().expect("encode proof");
        assert_matches!(Proof::decode_from_slice(&bytes), Err(Error::InvalidData(_)));
    }

    #[test]
    fn test_framed_roundtrip() {
        let proof = sample_proof();
        let mut buffer = Vec::new();
        proof.write_to(&mut buffer).expect("write proof");
        proof.write_to(&mut buffer).expect("write second proof");

        let mut cursor = Cursor::new(buffer);
        assert_eq!(Proof::read_from(&mut cursor).expect("first"), proof);
        assert_eq!(Proof::read_from(&mut cursor).expect("second"), proof);
        assert_matches!(Proof::read_from(&mut cursor), Err(Error::Io(_)));
    }

    #[test]
    fn test_read_prefixed_enforces_max_len() {
        let mut buffer = Vec::new();
        write_prefixed(&mut buffer, &[0u8; 10]).expect("write");
        assert_matches!(
            read_prefixed(&mut Cursor::new(&buffer), 9),
            Err(Error::InvalidData(_))
        );
        assert_eq!(
            read_prefixed(&mut Cursor::new(&buffer), 10).expect("read"),
            vec![0u8; 10]
        );
    }

    #[test]
    fn test_read_prefixed_short_payload() {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&8u64.to_le_bytes());
        buffer.extend_from_slice(&[1, 2, 3]);
        assert_matches!(
            read_prefixed(&mut Cursor::new(&buffer), 100),
            Err(Error::Io(_))
        );
    }
}
