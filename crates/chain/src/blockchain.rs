//! Main ledger orchestration.
//!
//! A [`Blockchain`] owns the ordered blocks, admits transactions against the
//! participants already on record, and seals each admitted entry into its own
//! block linked to the current tip.

use crate::validation::{
    check_link, check_timestamp, check_transaction, BlockRejection, TransactionRejection,
};
use ledgerchain_core::{Address, Block, Hash, MerkleError, MerkleTree, Transaction};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("transaction rejected: {0}")]
    RejectedTransaction(#[from] TransactionRejection),

    #[error("invalid block: {0}")]
    InvalidBlock(#[from] BlockRejection),

    #[error("chain has no blocks")]
    EmptyChain,

    #[error("merkle error: {0}")]
    Merkle(#[from] MerkleError),
}

pub type Result<T> = std::result::Result<T, BlockchainError>;

/// The append-only sequence of blocks rooted at genesis.
#[derive(Debug, Clone, PartialEq)]
pub struct Blockchain {
    /// Never empty; `blocks[0]` is genesis.
    blocks: Vec<Block>,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    /// Create a chain holding only the genesis block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    /// The last block.
    pub fn tip(&self) -> Result<&Block> {
        self.blocks.last().ok_or(BlockchainError::EmptyChain)
    }

    /// All blocks in order, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Iterate over the blocks in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false for a chain built with [`Blockchain::new`].
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the tip block.
    pub fn height(&self) -> u64 {
        self.blocks.len().saturating_sub(1) as u64
    }

    /// Link `block` onto the tip and push it.
    ///
    /// The block's `previous_hash` is overwritten and its hash recomputed, so
    /// any hash read before this call is stale. No admission checks run here.
    pub fn append(&mut self, mut block: Block) -> Result<&Block> {
        let parent = self.tip()?.hash.clone();
        block.reseal(parent);

        debug!(index = block.index, hash = %block.hash, "appending block");
        self.blocks.push(block);
        self.tip()
    }

    /// Check whether `block` may extend the chain, reporting the first failure.
    ///
    /// Checks run in order: linkage to the tip, hash integrity, every entry,
    /// then timestamp ordering.
    pub fn validate_block(&self, block: &Block) -> Result<()> {
        let tip = self.tip()?;

        if block.previous_hash != tip.hash {
            return Err(BlockRejection::PreviousHashMismatch.into());
        }

        if !block.has_valid_hash() {
            return Err(BlockRejection::HashMismatch.into());
        }

        let known = self.known_addresses();
        for tx in &block.transactions {
            check_transaction(tx, &known).map_err(BlockRejection::InvalidTransaction)?;
        }

        check_timestamp(tip, block)?;
        Ok(())
    }

    /// Check whether `block` may extend the chain.
    pub fn validate(&self, block: &Block) -> bool {
        match self.validate_block(block) {
            Ok(()) => true,
            Err(err) => {
                warn!(index = block.index, %err, "block failed validation");
                false
            }
        }
    }

    /// Every sender and recipient appearing in any block.
    pub fn known_addresses(&self) -> HashSet<Address> {
        self.blocks
            .iter()
            .flat_map(|block| &block.transactions)
            .flat_map(|tx| tx.participants())
            .cloned()
            .collect()
    }

    /// Check an entry against the participants on record.
    pub fn check_transaction(
        &self,
        tx: &Transaction,
    ) -> std::result::Result<(), TransactionRejection> {
        check_transaction(tx, &self.known_addresses())
    }

    /// Whether an entry would be admitted.
    pub fn validate_transaction(&self, tx: &Transaction) -> bool {
        self.check_transaction(tx).is_ok()
    }

    /// Admit `tx` as a new single-entry block.
    ///
    /// On rejection the chain is left unchanged.
    pub fn submit_transaction(&mut self, tx: Transaction) -> Result<&Block> {
        if let Err(rejection) = self.check_transaction(&tx) {
            warn!(sender = %tx.sender, recipient = %tx.recipient, %rejection, "transaction rejected");
            return Err(rejection.into());
        }

        let tip = self.tip()?;
        // Never stamp earlier than the tip, even if the clock went backwards.
        let timestamp = Block::current_timestamp().max(tip.timestamp);
        let block = Block::with_timestamp(
            self.blocks.len() as u64,
            tip.hash.clone(),
            vec![tx],
            timestamp,
        );
        let block = self.append(block)?;
        info!(index = block.index, hash = %block.hash, "transaction admitted");
        Ok(block)
    }

    /// Admit a transfer between two participants.
    pub fn transfer(
        &mut self,
        sender: impl Into<Address>,
        recipient: impl Into<Address>,
        amount: f64,
    ) -> Result<&Block> {
        self.submit_transaction(Transaction::new(sender, recipient, amount))
    }

    /// Verify every stored block: genesis is intact and each block is sealed
    /// and linked to its predecessor in timestamp order.
    pub fn verify_integrity(&self) -> Result<()> {
        let genesis = self.blocks.first().ok_or(BlockchainError::EmptyChain)?;
        if !genesis.is_genesis() || !genesis.has_valid_hash() {
            return Err(BlockRejection::BrokenLink {
                index: 0,
                reason: Box::new(BlockRejection::HashMismatch),
            }
            .into());
        }

        for (offset, pair) in self.blocks.windows(2).enumerate() {
            check_link(&pair[0], &pair[1]).map_err(|reason| BlockRejection::BrokenLink {
                index: offset + 1,
                reason: Box::new(reason),
            })?;
        }

        Ok(())
    }

    /// Build a fresh merkle summary over the current blocks.
    pub fn merkle_tree(&self) -> Result<MerkleTree> {
        Ok(MerkleTree::build(&self.blocks)?)
    }

    /// Get blockchain statistics.
    pub fn stats(&self) -> Result<BlockchainStats> {
        let tip = self.tip()?;

        Ok(BlockchainStats {
            height: self.height(),
            latest_block_hash: tip.hash.clone(),
            latest_timestamp: tip.timestamp,
            transaction_count: self.blocks.iter().map(Block::tx_count).sum(),
            address_count: self.known_addresses().len(),
        })
    }
}

impl<'a> IntoIterator for &'a Blockchain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Blockchain statistics.
#[derive(Debug, Clone)]
pub struct BlockchainStats {
    /// Index of the tip block.
    pub height: u64,
    /// Hash of the tip block.
    pub latest_block_hash: Hash,
    /// Timestamp of the tip block.
    pub latest_timestamp: f64,
    /// Entries across all blocks.
    pub transaction_count: usize,
    /// Distinct participants on record.
    pub address_count: usize,
}
