//! Proof verification.
//!
//! Pure function, no tree required. Recomputes the root from the target
//! leaf and its audit path and compares it to the expected root.

use tracing::trace;

use crate::{
    hasher::{SegmentHasher, leaf_sum, node_sum},
    helper::{subtree_start, target_in_left_half},
};

/// Check that `path` proves leaf `target_index` of a `leaf_count`-leaf tree
/// with root `root`.
///
/// `path[0]` is the raw leaf segment; every further element is the sibling
/// digest one level up. Above the largest complete subtree containing the
/// target, the tree is unbalanced: the first remaining element (if the
/// target is not in the rightmost part) is the folded root of everything to
/// its right, and every element after that is an older subtree on the left.
///
/// Returns `false` for any malformed input instead of failing.
pub fn verify_proof<H: SegmentHasher, P: AsRef<[u8]>>(
    hasher: &mut H,
    root: &[u8],
    path: &[P],
    target_index: u64,
    leaf_count: u64,
) -> bool {
    if root.is_empty() {
        trace!("rejecting proof: empty root");
        return false;
    }
    if target_index >= leaf_count {
        trace!(target_index, leaf_count, "rejecting proof: index out of range");
        return false;
    }
    let Some(leaf) = path.first() else {
        trace!("rejecting proof: empty path");
        return false;
    };

    let mut running = leaf_sum(hasher, leaf.as_ref());
    let mut height: u32 = 1;
    let mut stable_end = target_index;

    // balanced part: every aligned subtree around the target that is full
    loop {
        let start = subtree_start(target_index, height);
        let end = start as u128 + (1u128 << height) - 1;
        if end >= leaf_count as u128 {
            break;
        }
        stable_end = end as u64;

        let Some(sibling) = path.get(height as usize) else {
            trace!(height, "rejecting proof: path too short");
            return false;
        };
        running = if target_in_left_half(target_index, start, height - 1) {
            node_sum(hasher, &running, sibling.as_ref())
        } else {
            node_sum(hasher, sibling.as_ref(), &running)
        };
        height += 1;
    }

    if stable_end != leaf_count - 1 {
        let Some(right) = path.get(height as usize) else {
            trace!(height, "rejecting proof: missing right-hand fold");
            return false;
        };
        running = node_sum(hasher, &running, right.as_ref());
        height += 1;
    }

    for left in path.iter().skip(height as usize) {
        running = node_sum(hasher, left.as_ref(), &running);
    }

    running == root
}

#[cfg(all(test, feature = "blake3"))]
mod tests {
    use super::*;
    use crate::Blake3Hasher;

    fn four_leaf_fixture(hasher: &mut Blake3Hasher) -> (Vec<u8>, Vec<Vec<u8>>) {
        let a = leaf_sum(hasher, &[0x41]);
        let b = leaf_sum(hasher, &[0x42]);
        let c = leaf_sum(hasher, &[0x43]);
        let d = leaf_sum(hasher, &[0x44]);
        let ab = node_sum(hasher, &a, &b);
        let cd = node_sum(hasher, &c, &d);
        let root = node_sum(hasher, &ab, &cd);
        (root, vec![vec![0x42], a, cd])
    }

    #[test]
    fn test_hand_built_four_leaf_proof() {
        let mut hasher = Blake3Hasher::new();
        let (root, path) = four_leaf_fixture(&mut hasher);
        assert!(verify_proof(&mut hasher, &root, &path, 1, 4));
        assert!(!verify_proof(&mut hasher, &root, &path, 0, 4));
        assert!(!verify_proof(&mut hasher, &root, &path, 2, 4));
        assert!(!verify_proof(&mut hasher, &root, &path, 1, 5));
    }

    #[test]
    fn test_rejects_preconditions() {
        let mut hasher = Blake3Hasher::new();
        let (root, path) = four_leaf_fixture(&mut hasher);
        let empty: Vec<Vec<u8>> = Vec::new();
        assert!(!verify_proof(&mut hasher, &[], &path, 1, 4));
        assert!(!verify_proof(&mut hasher, &root, &empty, 1, 4));
        assert!(!verify_proof(&mut hasher, &root, &path, 4, 4));
        assert!(!verify_proof(&mut hasher, &root, &path, 9, 4));
        assert!(!verify_proof(&mut hasher, &root, &path, 0, 0));
    }

    #[test]
    fn test_rejects_truncated_and_extended_paths() {
        let mut hasher = Blake3Hasher::new();
        let (root, path) = four_leaf_fixture(&mut hasher);
        assert!(!verify_proof(&mut hasher, &root, &path[..2], 1, 4));
        let mut extended = path.clone();
        extended.push(vec![0u8; 32]);
        assert!(!verify_proof(&mut hasher, &root, &extended, 1, 4));
    }

    #[test]
    fn test_three_leaf_unbalanced() {
        let mut hasher = Blake3Hasher::new();
        let a = leaf_sum(&mut hasher, b"a");
        let b = leaf_sum(&mut hasher, b"b");
        let c = leaf_sum(&mut hasher, b"c");
        let ab = node_sum(&mut hasher, &a, &b);
        let root = node_sum(&mut hasher, &ab, &c);

        // the lone right leaf climbs with the left subtree as its sibling
        assert!(verify_proof(&mut hasher, &root, &[b"c".to_vec(), ab.clone()], 2, 3));
        // a left leaf folds the right-hand remainder in as a right operand
        assert!(verify_proof(
            &mut hasher,
            &root,
            &[b"a".to_vec(), b.clone(), c.clone()],
            0,
            3
        ));
        assert!(!verify_proof(&mut hasher, &root, &[b"a".to_vec(), b], 0, 3));
    }

    #[test]
    fn test_huge_leaf_count_does_not_overflow() {
        let mut hasher = Blake3Hasher::new();
        let path = vec![vec![1u8]];
        assert!(!verify_proof(&mut hasher, &[1u8; 32], &path, u64::MAX - 1, u64::MAX));
        assert!(!verify_proof(&mut hasher, &[1u8; 32], &path, 0, u64::MAX));
    }
}
