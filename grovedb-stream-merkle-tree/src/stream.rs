//! Feeding a byte stream into a tree in fixed-size segments.

use std::io::{ErrorKind, Read};

use tracing::debug;

use crate::{Error, Proof, Result, StreamMerkleTree, hasher::SegmentHasher};

/// Fill `buf` from `reader`, stopping early only at end of stream.
///
/// Returns the number of bytes read.
fn read_segment<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(filled)
}

impl<H: SegmentHasher> StreamMerkleTree<H> {
    /// Append `reader` in segments of `segment_size` bytes until it is
    /// exhausted and return the number of segments appended.
    ///
    /// A short final segment is appended as is.
    pub fn read_all<R: Read>(&mut self, mut reader: R, segment_size: usize) -> Result<u64> {
        if segment_size == 0 {
            return Err(Error::InvalidSegmentSize);
        }
        let mut segment = vec![0u8; segment_size];
        let mut appended = 0;
        loop {
            let n = read_segment(&mut reader, &mut segment)?;
            if n == 0 {
                break;
            }
            self.append(&segment[..n]);
            appended += 1;
            if n < segment_size {
                break;
            }
        }
        debug!(
            appended,
            segment_size,
            leaf_count = self.leaf_count(),
            "finished reading stream"
        );
        Ok(appended)
    }
}

/// Merkle root of `reader` split into `segment_size`-byte leaves, or `None`
/// for an empty stream.
pub fn reader_root<H: SegmentHasher, R: Read>(
    reader: R,
    hasher: H,
    segment_size: usize,
) -> Result<Option<Vec<u8>>> {
    let mut tree = StreamMerkleTree::new(hasher);
    tree.read_all(reader, segment_size)?;
    Ok(tree.root())
}

/// Proof that segment `index` of `reader` belongs to the stream's root.
///
/// Fails with [`Error::IndexNotReached`] if the stream has at most `index`
/// segments.
pub fn build_reader_proof<H: SegmentHasher, R: Read>(
    reader: R,
    hasher: H,
    segment_size: usize,
    index: u64,
) -> Result<Proof> {
    let mut tree = StreamMerkleTree::new(hasher);
    tree.set_index(index)?;
    tree.read_all(reader, segment_size)?;
    let proof = tree.proof();
    if !proof.is_available() {
        return Err(Error::IndexNotReached {
            index,
            leaf_count: proof.leaf_count(),
        });
    }
    Ok(proof)
}
