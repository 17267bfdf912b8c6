//! Ledger orchestration for ledgerchain.
//!
//! This crate ties the core primitives into a working ledger:
//! - **Blockchain**: the genesis-rooted block sequence, append and validation
//! - **Validation**: transaction admission and block linkage rules
//!
//! # Example
//!
//! ```rust
//! use ledgerchain_chain::{Blockchain, BlockchainError};
//!
//! let mut chain = Blockchain::new();
//!
//! // Nobody is on record yet, so the first transfer is refused.
//! let err = chain.transfer("alice", "bob", 10.0).unwrap_err();
//! assert!(matches!(err, BlockchainError::RejectedTransaction(_)));
//!
//! let tree = chain.merkle_tree().unwrap();
//! println!("root: {}", tree.root_hash());
//! ```

pub mod blockchain;
pub mod validation;

// Re-export commonly used types
pub use blockchain::{Blockchain, BlockchainError, BlockchainStats, Result};
pub use validation::{
    check_link, check_transaction, handle_new_transaction, validate_new_block, BlockRejection,
    TransactionRejection,
};
