//! Incremental Merkle tree over a stream of segments.

use tracing::{debug, trace};

use crate::{
    Error, Proof, Result,
    forest::Forest,
    hasher::{SegmentHasher, leaf_sum, node_sum},
    helper::{subtree_start, target_in_left_half},
};

/// A Merkle tree that is built one leaf at a time and only keeps the roots
/// of its complete subtrees.
///
/// One leaf, the proof target, can be designated before the first append;
/// its audit path is collected while data arrives so that [`proof`] never
/// needs the leaves again.
///
/// [`proof`]: StreamMerkleTree::proof
#[derive(Clone, Debug)]
pub struct StreamMerkleTree<H> {
    hasher: H,
    forest: Forest,
    leaf_count: u64,
    target_index: u64,
    proof_set: Vec<Vec<u8>>,
    cached: bool,
}

impl<H: SegmentHasher + Default> Default for StreamMerkleTree<H> {
    fn default() -> Self {
        Self::new(H::default())
    }
}

impl<H: SegmentHasher> StreamMerkleTree<H> {
    /// Create an empty tree whose leaves are raw segments.
    pub fn new(hasher: H) -> Self {
        Self::with_mode(hasher, false)
    }

    /// Create an empty tree whose appended values are already leaf digests
    /// (roots of cached subtrees).
    pub(crate) fn new_cached(hasher: H) -> Self {
        Self::with_mode(hasher, true)
    }

    fn with_mode(hasher: H, cached: bool) -> Self {
        StreamMerkleTree {
            hasher,
            forest: Forest::new(),
            leaf_count: 0,
            target_index: 0,
            proof_set: Vec::new(),
            cached,
        }
    }

    /// Number of leaves appended so far.
    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    /// Returns `true` if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    /// Leaf whose audit path is being collected.
    pub fn target_index(&self) -> u64 {
        self.target_index
    }

    /// The injected hash capability.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Pending subtree roots.
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Choose the leaf to prove.
    ///
    /// Must be called before the first append; afterwards the audit path of
    /// the previous target is already partially built and
    /// [`Error::AlreadyStarted`] is returned without touching the tree.
    pub fn set_index(&mut self, index: u64) -> Result<()> {
        if !self.forest.is_empty() {
            debug!(
                index,
                leaf_count = self.leaf_count,
                "rejected proof index change after append"
            );
            return Err(Error::AlreadyStarted {
                leaf_count: self.leaf_count,
            });
        }
        self.target_index = index;
        Ok(())
    }

    /// Append a segment and return its leaf index.
    ///
    /// In a cached tree `data` is used verbatim as the leaf digest.
    pub fn append(&mut self, data: &[u8]) -> u64 {
        let index = self.leaf_count;
        if index == self.target_index {
            self.proof_set.push(data.to_vec());
        }

        let leaf = if self.cached {
            data.to_vec()
        } else {
            leaf_sum(&mut self.hasher, data)
        };
        self.forest.push_leaf(leaf);

        while let Some((older, newer)) = self.forest.pending_merge() {
            let height = older.height;
            if self.proof_set.len() == height as usize + 1 {
                let start = subtree_start(index, height + 1);
                let sibling = if target_in_left_half(self.target_index, start, height) {
                    newer
                } else {
                    older
                };
                trace!(height, "recorded proof sibling");
                self.proof_set.push(sibling.digest.clone());
            }
            self.forest.merge_top(&mut self.hasher);
        }

        self.leaf_count += 1;
        index
    }

    /// Current Merkle root, or `None` if nothing has been appended.
    pub fn root(&self) -> Option<Vec<u8>> {
        let mut hasher = self.hasher.clone();
        self.forest.fold(&mut hasher)
    }

    /// Inclusion proof for the target leaf against the current root.
    ///
    /// The path is empty when nothing was appended or when the target leaf
    /// has not arrived yet; this is a normal outcome, not an error.
    pub fn proof(&self) -> Proof {
        let root = self.root().unwrap_or_default();
        if self.proof_set.is_empty() {
            return Proof::new(root, Vec::new(), self.target_index, self.leaf_count);
        }

        let mut hasher = self.hasher.clone();
        let mut path = self.proof_set.clone();
        let frontier = path.len() - 1;

        let mut entries = self.forest.entries().iter().rev().peekable();
        let mut younger: Option<Vec<u8>> = None;
        while let Some(entry) = entries.next_if(|e| (e.height as usize) < frontier) {
            younger = Some(match younger {
                None => entry.digest.clone(),
                Some(acc) => node_sum(&mut hasher, &entry.digest, &acc),
            });
        }
        path.extend(younger);

        // the subtree holding the target is what the path so far proves
        let target_subtree = entries.next();
        debug_assert!(target_subtree.is_some_and(|e| e.height as usize == frontier));

        path.extend(entries.map(|e| e.digest.clone()));
        Proof::new(root, path, self.target_index, self.leaf_count)
    }
}
