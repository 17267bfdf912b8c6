//! Transaction admission and block linkage rules.

use crate::blockchain::{Blockchain, Result};
use ledgerchain_core::{Address, Block, Transaction};
use std::collections::HashSet;
use thiserror::Error;

/// Why a transaction was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransactionRejection {
    #[error("unknown sender {0}")]
    UnknownSender(Address),

    #[error("unknown recipient {0}")]
    UnknownRecipient(Address),

    #[error("negative amount {0}")]
    NegativeAmount(f64),
}

/// Why a block does not extend the chain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlockRejection {
    #[error("previous hash does not match the chain tip")]
    PreviousHashMismatch,

    #[error("stored hash does not match block contents")]
    HashMismatch,

    #[error("block carries a rejected transaction: {0}")]
    InvalidTransaction(TransactionRejection),

    #[error("block timestamp {block} precedes parent timestamp {parent}")]
    TimestampRegression { block: f64, parent: f64 },

    #[error("chain broken at block {index}: {reason}")]
    BrokenLink {
        index: usize,
        reason: Box<BlockRejection>,
    },
}

/// Check an entry against the set of known participants.
pub fn check_transaction(
    tx: &Transaction,
    known: &HashSet<Address>,
) -> std::result::Result<(), TransactionRejection> {
    if !known.contains(&tx.sender) {
        return Err(TransactionRejection::UnknownSender(tx.sender.clone()));
    }

    if !known.contains(&tx.recipient) {
        return Err(TransactionRejection::UnknownRecipient(tx.recipient.clone()));
    }

    if !tx.has_valid_amount() {
        return Err(TransactionRejection::NegativeAmount(tx.amount));
    }

    Ok(())
}

/// Check that `block` is sealed and correctly linked onto `parent`.
///
/// Entries are not checked here; see [`Blockchain::validate_block`].
pub fn check_link(parent: &Block, block: &Block) -> std::result::Result<(), BlockRejection> {
    if block.previous_hash != parent.hash {
        return Err(BlockRejection::PreviousHashMismatch);
    }

    if !block.has_valid_hash() {
        return Err(BlockRejection::HashMismatch);
    }

    check_timestamp(parent, block)
}

pub(crate) fn check_timestamp(
    parent: &Block,
    block: &Block,
) -> std::result::Result<(), BlockRejection> {
    if block.timestamp < parent.timestamp {
        return Err(BlockRejection::TimestampRegression {
            block: block.timestamp,
            parent: parent.timestamp,
        });
    }
    Ok(())
}

/// Check whether `block` may extend `chain`.
pub fn validate_new_block(chain: &Blockchain, block: &Block) -> bool {
    chain.validate(block)
}

/// Admit a transaction into `chain` as a new single-entry block.
pub fn handle_new_transaction(chain: &mut Blockchain, tx: Transaction) -> Result<()> {
    chain.submit_transaction(tx).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerchain_core::Hash;

    fn known(names: &[&str]) -> HashSet<Address> {
        names.iter().map(|n| Address::from(*n)).collect()
    }

    #[test]
    fn test_known_participants_accepted() {
        let tx = Transaction::new("alice", "bob", 5.0);
        assert_eq!(check_transaction(&tx, &known(&["alice", "bob"])), Ok(()));
    }

    #[test]
    fn test_unknown_sender_checked_first() {
        let tx = Transaction::new("carol", "dave", 5.0);
        assert_eq!(
            check_transaction(&tx, &known(&["alice"])),
            Err(TransactionRejection::UnknownSender(Address::from("carol")))
        );
    }

    #[test]
    fn test_unknown_recipient() {
        let tx = Transaction::new("alice", "dave", 5.0);
        assert_eq!(
            check_transaction(&tx, &known(&["alice"])),
            Err(TransactionRejection::UnknownRecipient(Address::from("dave")))
        );
    }

    #[test]
    fn test_negative_amount() {
        let set = known(&["alice", "bob"]);
        assert_eq!(
            check_transaction(&Transaction::new("alice", "bob", -1.0), &set),
            Err(TransactionRejection::NegativeAmount(-1.0))
        );
        assert!(check_transaction(&Transaction::new("alice", "bob", 0.0), &set).is_ok());
    }

    #[test]
    fn test_empty_address_set_rejects_everything() {
        let tx = Transaction::new("alice", "alice", 0.0);
        assert!(check_transaction(&tx, &HashSet::new()).is_err());
    }

    #[test]
    fn test_check_link() {
        let parent = Block::genesis();
        let child = Block::with_timestamp(1, parent.hash.clone(), vec![], parent.timestamp + 1.0);
        assert_eq!(check_link(&parent, &child), Ok(()));

        let orphan = Block::with_timestamp(1, Hash::genesis_parent(), vec![], parent.timestamp + 1.0);
        assert_eq!(
            check_link(&parent, &orphan),
            Err(BlockRejection::PreviousHashMismatch)
        );

        let mut tampered = child.clone();
        tampered.index = 7;
        assert_eq!(check_link(&parent, &tampered), Err(BlockRejection::HashMismatch));

        let early = Block::with_timestamp(1, parent.hash.clone(), vec![], parent.timestamp - 1.0);
        assert!(matches!(
            check_link(&parent, &early),
            Err(BlockRejection::TimestampRegression { .. })
        ));
    }

    #[test]
    fn test_equal_timestamp_allowed() {
        let parent = Block::genesis();
        let child = Block::with_timestamp(1, parent.hash.clone(), vec![], parent.timestamp);
        assert!(check_link(&parent, &child).is_ok());
    }
}
