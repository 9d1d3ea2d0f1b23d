//! Two-level tree over pre-computed subtree roots.
//!
//! Very large inputs are split into cached subtrees of `2^h` raw leaves
//! each. Every cached subtree root is computed on its own (for instance with
//! a [`StreamMerkleTree`] over just that slice of the stream) and appended
//! here as one leaf. The proof for a raw leaf is the path inside its cached
//! subtree followed by the path of the cached node in this tree.

use tracing::debug;

use crate::{Error, Proof, Result, StreamMerkleTree, hasher::SegmentHasher};

/// Exclusive upper bound on the height of a cached subtree.
pub const MAX_CACHED_NODE_HEIGHT: u32 = 63;

/// Top-level tree whose leaves are roots of equally sized cached subtrees.
#[derive(Clone, Debug)]
pub struct CachedStreamMerkleTree<H> {
    tree: StreamMerkleTree<H>,
    cached_node_height: u32,
    true_target_index: u64,
}

impl<H: SegmentHasher> CachedStreamMerkleTree<H> {
    /// Create an empty tree whose cached nodes each cover
    /// `2^cached_node_height` raw leaves.
    ///
    /// The height must be below [`MAX_CACHED_NODE_HEIGHT`].
    pub fn new(hasher: H, cached_node_height: u32) -> Result<Self> {
        if cached_node_height >= MAX_CACHED_NODE_HEIGHT {
            return Err(Error::InvalidHeight(cached_node_height));
        }
        Ok(CachedStreamMerkleTree {
            tree: StreamMerkleTree::new_cached(hasher),
            cached_node_height,
            true_target_index: 0,
        })
    }

    /// Height of every cached subtree.
    pub fn cached_node_height(&self) -> u32 {
        self.cached_node_height
    }

    /// Number of cached subtree roots appended.
    pub fn cached_node_count(&self) -> u64 {
        self.tree.leaf_count()
    }

    /// Number of raw leaves covered by the appended cached subtrees.
    ///
    /// Saturates at `u64::MAX`.
    pub fn leaf_count(&self) -> u64 {
        let count = self.tree.leaf_count();
        if count.leading_zeros() < self.cached_node_height {
            u64::MAX
        } else {
            count << self.cached_node_height
        }
    }

    /// Raw leaf whose proof is being collected.
    pub fn target_index(&self) -> u64 {
        self.true_target_index
    }

    /// Cached node that contains the target raw leaf.
    pub fn cached_target_index(&self) -> u64 {
        self.tree.target_index()
    }

    /// Choose the raw leaf to prove.
    ///
    /// Fails with [`Error::AlreadyStarted`] once a cached root was appended.
    pub fn set_index(&mut self, index: u64) -> Result<()> {
        self.tree.set_index(index >> self.cached_node_height)?;
        self.true_target_index = index;
        Ok(())
    }

    /// Append the root of the next cached subtree and return its cached
    /// node index.
    pub fn append(&mut self, cached_root: &[u8]) -> u64 {
        self.tree.append(cached_root)
    }

    /// Current Merkle root over all raw leaves, or `None` if empty.
    pub fn root(&self) -> Option<Vec<u8>> {
        self.tree.root()
    }

    /// Inclusion proof for the target raw leaf.
    ///
    /// `cached_path` is the complete proof path of the target inside its
    /// cached subtree: the raw leaf followed by `cached_node_height` sibling
    /// digests. It replaces the first element of this tree's own path, which
    /// is merely the cached subtree root.
    pub fn proof(&self, cached_path: Vec<Vec<u8>>) -> Proof {
        let leaf_count = self.leaf_count();
        let (root, tail, _, _) = self.tree.proof().into_parts();
        if tail.is_empty() {
            return Proof::new(root, Vec::new(), self.true_target_index, leaf_count);
        }
        debug!(
            cached_len = cached_path.len(),
            tail_len = tail.len() - 1,
            "assembling cached proof"
        );
        let mut path = cached_path;
        path.extend(tail.into_iter().skip(1));
        Proof::new(root, path, self.true_target_index, leaf_count)
    }

    /// Build one cached subtree from its `2^cached_node_height` raw leaves.
    ///
    /// Returns `(cached_root, cached_path)` where the path proves the raw
    /// leaf at the target's offset inside a subtree; only the path of the
    /// subtree that actually contains the target is meant for
    /// [`CachedStreamMerkleTree::proof`].
    pub fn build_subtree<'a, I>(&self, leaves: I) -> Result<(Vec<u8>, Vec<Vec<u8>>)>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let offset_mask = (1u64 << self.cached_node_height) - 1;
        let mut subtree = StreamMerkleTree::new(self.tree.hasher().clone());
        subtree.set_index(self.true_target_index & offset_mask)?;
        for leaf in leaves {
            subtree.append(leaf);
        }
        let expected = 1u64 << self.cached_node_height;
        if subtree.leaf_count() != expected {
            return Err(Error::InvalidData(format!(
                "cached subtree has {} leaves, expected {}",
                subtree.leaf_count(),
                expected
            )));
        }
        let (root, path, _, _) = subtree.proof().into_parts();
        Ok((root, path))
    }
}
