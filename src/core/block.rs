use crate::core::merkle;
use crate::core::transaction::Transaction;
use crate::crypto::hash::{Hash256, Hashable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// An ordered batch of transactions plus linkage and proof-of-work fields.
///
/// The transaction set and Merkle root are fixed at construction; only the
/// nonce changes while mining, and the stored hash is set once the
/// proof-of-work condition is met.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub previous_hash: Hash256,
    pub merkle_root: Hash256,
    pub nonce: u64,
    pub hash: Option<Hash256>,
}

/// Per-block view for front ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSummary {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub transaction_count: usize,
    pub hash: Option<Hash256>,
    pub previous_hash: Hash256,
    pub nonce: u64,
}

impl Block {
    pub fn new(index: u64, transactions: Vec<Transaction>, previous_hash: Hash256) -> Self {
        Self::with_timestamp(index, transactions, previous_hash, Utc::now())
    }

    pub fn with_timestamp(
        index: u64,
        transactions: Vec<Transaction>,
        previous_hash: Hash256,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let tx_hashes: Vec<Hash256> = transactions.iter().map(|tx| tx.hash()).collect();
        let merkle_root = merkle::compute_root(&tx_hashes);

        Self {
            index,
            timestamp,
            transactions,
            previous_hash,
            merkle_root,
            nonce: 0,
            hash: None,
        }
    }

    fn canonical_value(&self) -> Value {
        json!({
            "index": self.index,
            "timestamp": self.timestamp,
            "transactions": self
                .transactions
                .iter()
                .map(Transaction::canonical_value)
                .collect::<Vec<_>>(),
            "previous_hash": self.previous_hash,
            "merkle_root": self.merkle_root,
            "nonce": self.nonce,
        })
    }

    /// Hash over the current field values. Pure; called repeatedly by
    /// `mine` as the nonce advances.
    pub fn compute_hash(&self) -> Hash256 {
        Hash256::hash(self.canonical_value().to_string().as_bytes())
    }

    /// Proof-of-work search: increments the nonce until the block hash
    /// starts with `difficulty` zero hex characters. Blocks the caller
    /// with no attempt bound; difficulty 0 succeeds on the first attempt.
    pub fn mine(&mut self, difficulty: usize) {
        log::info!("Mining block {} at difficulty {}", self.index, difficulty);

        loop {
            let hash = self.compute_hash();
            if hash.meets_difficulty(difficulty) {
                self.hash = Some(hash);
                log::info!("Block {} mined: nonce {}, hash {}", self.index, self.nonce, hash);
                return;
            }

            self.nonce += 1;
            if self.nonce % 10_000 == 0 {
                log::trace!("Block {}: {} attempts", self.index, self.nonce);
            }
        }
    }

    pub fn is_mined(&self) -> bool {
        self.hash.is_some()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn summary(&self) -> BlockSummary {
        BlockSummary {
            index: self.index,
            timestamp: self.timestamp,
            transaction_count: self.transactions.len(),
            hash: self.hash,
            previous_hash: self.previous_hash,
            nonce: self.nonce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample_transactions(count: usize) -> Vec<Transaction> {
        (0..count)
            .map(|i| {
                Transaction::new(
                    &format!("sender-{}", i),
                    &format!("recipient-{}", i),
                    Decimal::from(10 + i as i64),
                    None,
                    None,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_new_block_is_unmined() {
        let block = Block::new(1, sample_transactions(2), Hash256::zero());

        assert_eq!(block.nonce, 0);
        assert!(!block.is_mined());
        assert_eq!(block.transaction_count(), 2);
    }

    #[test]
    fn test_merkle_root_matches_transaction_hashes() {
        let transactions = sample_transactions(3);
        let tx_hashes: Vec<Hash256> = transactions.iter().map(|tx| tx.hash()).collect();
        let block = Block::new(1, transactions, Hash256::zero());

        assert_eq!(block.merkle_root, merkle::compute_root(&tx_hashes));
    }

    #[test]
    fn test_compute_hash_is_stable() {
        let block = Block::new(1, sample_transactions(2), Hash256::zero());
        assert_eq!(block.compute_hash(), block.compute_hash());
    }

    #[test]
    fn test_compute_hash_depends_on_nonce() {
        let mut block = Block::new(1, sample_transactions(1), Hash256::zero());
        let before = block.compute_hash();
        block.nonce += 1;

        assert_ne!(before, block.compute_hash());
    }

    #[test]
    fn test_mine_meets_difficulty() {
        let mut block = Block::new(1, sample_transactions(2), Hash256::zero());
        block.mine(1);

        let hash = block.hash.unwrap();
        assert!(hash.meets_difficulty(1));
        assert!(hash.to_hex().starts_with('0'));
        assert_eq!(hash, block.compute_hash());
    }

    #[test]
    fn test_mine_difficulty_zero_is_immediate() {
        let mut block = Block::new(1, sample_transactions(1), Hash256::zero());
        block.mine(0);

        assert_eq!(block.nonce, 0);
        assert!(block.is_mined());
    }

    #[test]
    fn test_summary_reflects_block() {
        let mut block = Block::new(3, sample_transactions(2), Hash256::zero());
        block.mine(0);

        let summary = block.summary();
        assert_eq!(summary.index, 3);
        assert_eq!(summary.transaction_count, 2);
        assert_eq!(summary.hash, block.hash);
        assert_eq!(summary.previous_hash, Hash256::zero());
    }
}
