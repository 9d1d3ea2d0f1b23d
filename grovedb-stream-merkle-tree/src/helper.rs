/// Whether `target_index` lies in the left half of the aligned subtree that
/// starts at `subtree_start` and whose two children have height
/// `child_height`.
///
/// This decides sidedness both while a proof is recorded during append and
/// while it is replayed during verification, so both sides agree on which
/// sibling belongs in the path and in which operand order it is combined.
///
/// Callers guarantee `subtree_start <= target_index`.
pub fn target_in_left_half(target_index: u64, subtree_start: u64, child_height: u32) -> bool {
    let half = 1u128 << child_height;
    ((target_index - subtree_start) as u128) < half
}

/// Start index of the aligned subtree of height `height` containing
/// `index`.
pub fn subtree_start(index: u64, height: u32) -> u64 {
    if height >= u64::BITS {
        0
    } else {
        (index >> height) << height
    }
}

/// Returns the exact number of hash calls made by one append to a tree that
/// already holds `leaf_count` leaves.
///
/// This is: 1 (leaf digest) + trailing_ones(leaf_count) (merge digests).
/// Raw-leaf (cached) trees skip the leaf digest.
pub fn hash_count_for_append(leaf_count: u64, cached: bool) -> u32 {
    let leaf = if cached { 0 } else { 1 };
    leaf + leaf_count.trailing_ones()
}
