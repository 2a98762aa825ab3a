//! Merkle commitment over an ordered batch of transaction hashes.
//!
//! Pairs are combined by hashing the concatenation of their hex forms,
//! and odd layers duplicate their last hash. The resulting tree is
//! left-duplicated and non-balanced for non-power-of-two batches, so it
//! offers no protection against duplicate-leaf constructions beyond what
//! SHA3-256 itself provides.

use crate::crypto::hash::Hash256;

/// Folds a sequence of hashes into a single root.
///
/// An empty batch commits to the hash of the empty byte string; a single
/// hash is its own root.
pub fn compute_root(leaves: &[Hash256]) -> Hash256 {
    if leaves.is_empty() {
        return Hash256::hash(b"");
    }

    let mut level: Vec<Hash256> = leaves.to_vec();

    while level.len() > 1 {
        if level.len() % 2 != 0 {
            let last = level[level.len() - 1];
            level.push(last);
        }

        let mut next_level = Vec::with_capacity(level.len() / 2);
        for pair in level.chunks(2) {
            let combined = format!("{}{}", pair[0].to_hex(), pair[1].to_hex());
            next_level.push(Hash256::hash(combined.as_bytes()));
        }

        level = next_level;
    }

    level[0]
}
