//! Hash-linked blocks of ledger entries.

use crate::codec::{canonicalize, digest, BlockFields};
use crate::hash::Hash;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed genesis timestamp, so the genesis hash is the same on every run.
pub const GENESIS_TIMESTAMP: f64 = 1632535482.903651;

/// An indexed, timestamped container of ledger entries.
///
/// `hash` is derived from the other fields. It is computed once at
/// construction and refreshed only by [`Block::reseal`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain (0 for genesis).
    pub index: u64,
    /// Hash of the preceding block.
    pub previous_hash: Hash,
    /// Unix timestamp in seconds.
    #[serde(with = "crate::codec::float")]
    pub timestamp: f64,
    /// Entries carried by this block, in order.
    pub transactions: Vec<Transaction>,
    /// Always zero; there is no proof of work.
    pub nonce: u64,
    /// Digest of the fields above.
    pub hash: Hash,
}

impl Block {
    /// Create a sealed block stamped with the current time.
    pub fn new(index: u64, previous_hash: Hash, transactions: Vec<Transaction>) -> Self {
        Self::with_timestamp(index, previous_hash, transactions, Self::current_timestamp())
    }

    /// Create a sealed block with an explicit timestamp.
    pub fn with_timestamp(
        index: u64,
        previous_hash: Hash,
        transactions: Vec<Transaction>,
        timestamp: f64,
    ) -> Self {
        let mut block = Self {
            index,
            previous_hash,
            timestamp,
            transactions,
            nonce: 0,
            hash: Hash::default(),
        };
        block.hash = block.recompute_hash();
        block
    }

    /// Create the genesis block.
    pub fn genesis() -> Self {
        Self::with_timestamp(0, Hash::genesis_parent(), Vec::new(), GENESIS_TIMESTAMP)
    }

    /// Compute the hash of the current fields without storing it.
    pub fn recompute_hash(&self) -> Hash {
        let fields = BlockFields {
            index: self.index,
            nonce: self.nonce,
            previous_hash: &self.previous_hash,
            timestamp: self.timestamp,
            transactions: &self.transactions,
        };
        digest(&canonicalize(&fields))
    }

    /// Relink to a new predecessor and refresh the stored hash.
    pub fn reseal(&mut self, previous_hash: Hash) {
        self.previous_hash = previous_hash;
        self.hash = self.recompute_hash();
    }

    /// Check that the stored hash matches the current fields.
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.recompute_hash()
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash == Hash::genesis_parent()
    }

    /// Get the number of entries in this block.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }

    /// Get the current Unix timestamp in fractional seconds.
    pub fn current_timestamp() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer() -> Transaction {
        Transaction::new("alice", "bob", 10.0)
    }

    #[test]
    fn test_genesis_block() {
        let genesis = Block::genesis();

        assert!(genesis.is_genesis());
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash.as_str(), "0");
        assert_eq!(genesis.timestamp, GENESIS_TIMESTAMP);
        assert_eq!(genesis.nonce, 0);
        assert!(genesis.transactions.is_empty());
    }

    #[test]
    fn test_genesis_hash_reproducible() {
        assert_eq!(Block::genesis().hash, Block::genesis().hash);
        assert!(Block::genesis().hash.is_digest());
    }

    #[test]
    fn test_block_hash_deterministic() {
        let block = Block::with_timestamp(1, Hash::genesis_parent(), vec![transfer()], 5.0);

        let h1 = block.recompute_hash();
        let h2 = block.recompute_hash();
        assert_eq!(h1, h2);
        assert_eq!(block.hash, h1);
    }

    #[test]
    fn test_identical_fields_identical_hash() {
        let a = Block::with_timestamp(1, Block::genesis().hash, vec![transfer()], 5.0);
        let b = Block::with_timestamp(1, Block::genesis().hash, vec![transfer()], 5.0);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn test_every_field_affects_hash() {
        let base = Block::with_timestamp(1, Hash::genesis_parent(), vec![transfer()], 5.0);

        let mut changed = base.clone();
        changed.index = 2;
        assert_ne!(changed.recompute_hash(), base.hash);

        let mut changed = base.clone();
        changed.timestamp = 6.0;
        assert_ne!(changed.recompute_hash(), base.hash);

        let mut changed = base.clone();
        changed.nonce = 1;
        assert_ne!(changed.recompute_hash(), base.hash);

        let mut changed = base.clone();
        changed.transactions[0].amount = 11.0;
        assert_ne!(changed.recompute_hash(), base.hash);

        let mut changed = base.clone();
        changed.previous_hash = Block::genesis().hash;
        assert_ne!(changed.recompute_hash(), base.hash);
    }

    #[test]
    fn test_tampering_detected() {
        let mut block = Block::with_timestamp(1, Hash::genesis_parent(), vec![transfer()], 5.0);
        assert!(block.has_valid_hash());

        block.transactions[0].recipient = "mallory".into();
        assert!(!block.has_valid_hash());
    }

    #[test]
    fn test_non_finite_amount_swap_detected() {
        let tx = Transaction::new("alice", "bob", f64::INFINITY);
        let block = Block::with_timestamp(1, Hash::genesis_parent(), vec![tx], 5.0);

        let mut tampered = block.clone();
        tampered.transactions[0].amount = f64::NAN;
        assert!(!tampered.has_valid_hash());

        tampered.transactions[0].amount = f64::NEG_INFINITY;
        assert!(!tampered.has_valid_hash());
    }

    #[test]
    fn test_reseal() {
        let mut block = Block::with_timestamp(1, Hash::genesis_parent(), vec![transfer()], 5.0);
        let before = block.hash.clone();
        let parent = Block::genesis().hash;

        block.reseal(parent.clone());

        assert_eq!(block.previous_hash, parent);
        assert_ne!(block.hash, before);
        assert!(block.has_valid_hash());
    }

    #[test]
    fn test_new_block_is_stamped_after_genesis() {
        let block = Block::new(1, Block::genesis().hash, vec![]);
        assert!(block.timestamp > GENESIS_TIMESTAMP);
        assert_eq!(block.tx_count(), 0);
    }
}
