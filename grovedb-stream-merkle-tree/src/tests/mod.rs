
use std::{cell::Cell, rc::Rc};

use crate::{Blake3Hasher, SegmentHasher, StreamMerkleTree};

/// Segment payload for leaf `i` (for test convenience).
pub(super) fn segment(i: u64) -> Vec<u8> {
    format!("segment_{}", i).into_bytes()
}

/// Build a tree over `count` segments proving leaf `index`.
pub(super) fn build_tree(count: u64, index: u64) -> StreamMerkleTree<Blake3Hasher> {
    let mut tree = StreamMerkleTree::new(Blake3Hasher::new());
    tree.set_index(index).expect("set index before append");
    for i in 0..count {
        tree.append(&segment(i));
    }
    tree
}

/// Blake3 hasher that counts finalized digests across all of its clones.
#[derive(Clone, Default)]
pub(super) struct CountingHasher {
    inner: Blake3Hasher,
    calls: Rc<Cell<u32>>,
}

impl CountingHasher {
    pub(super) fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl SegmentHasher for CountingHasher {
    fn reset(&mut self) {
        self.inner.reset();
    }

    fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    fn finalize(&mut self) -> Vec<u8> {
        self.calls.set(self.calls.get() + 1);
        self.inner.finalize()
    }
}
