//! Stack of not-yet-merged subtree summaries.
//!
//! Pushing a leaf behaves like incrementing a binary counter: every pair of
//! equal-height entries on top of the stack is a carry and merges into one
//! entry a level higher. The stack therefore holds one entry per set bit of
//! the leaf count, with heights strictly decreasing from bottom to top.

use crate::hasher::{SegmentHasher, node_sum};

/// Root summary of one complete subtree spanning `2^height` leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForestEntry {
    /// Height of the subtree; leaves have height 0.
    pub height: u32,
    /// Digest of the subtree root.
    pub digest: Vec<u8>,
}

/// Ordered pending subtree roots, oldest first.
#[derive(Clone, Debug, Default)]
pub struct Forest {
    entries: Vec<ForestEntry>,
}

impl Forest {
    /// Create an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries from oldest (tallest) to newest (shortest).
    pub fn entries(&self) -> &[ForestEntry] {
        &self.entries
    }

    /// Returns `true` if nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Push a height-0 entry on top of the stack.
    pub fn push_leaf(&mut self, digest: Vec<u8>) {
        self.entries.push(ForestEntry { height: 0, digest });
    }

    /// The two newest entries as `(older, newer)` when they share a height
    /// and must be merged.
    pub fn pending_merge(&self) -> Option<(&ForestEntry, &ForestEntry)> {
        match self.entries.as_slice() {
            [.., older, newer] if older.height == newer.height => Some((older, newer)),
            _ => None,
        }
    }

    /// Replace the two newest entries by their parent.
    ///
    /// Does nothing unless [`Forest::pending_merge`] reports a pair.
    pub fn merge_top<H: SegmentHasher>(&mut self, hasher: &mut H) {
        let Some((older, newer)) = self.pending_merge() else {
            return;
        };
        let height = older.height + 1;
        let digest = node_sum(hasher, &older.digest, &newer.digest);
        self.entries.truncate(self.entries.len() - 2);
        self.entries.push(ForestEntry { height, digest });
    }

    /// Fold every entry into a single root, newest to oldest, so that older
    /// subtrees always sit on the left.
    ///
    /// Returns `None` for an empty forest. Does not modify the stack.
    pub fn fold<H: SegmentHasher>(&self, hasher: &mut H) -> Option<Vec<u8>> {
        let mut iter = self.entries.iter().rev();
        let mut acc = iter.next()?.digest.clone();
        for entry in iter {
            acc = node_sum(hasher, &entry.digest, &acc);
        }
        Some(acc)
    }
}
