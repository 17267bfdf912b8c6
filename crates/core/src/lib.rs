//! Core ledger primitives for ledgerchain.
//!
//! This crate provides the fundamental types used throughout the ledger:
//! - Hashing and the canonical block encoding
//! - Addresses and ledger entries
//! - Hash-linked blocks
//! - Merkle summaries over block sequences

pub mod address;
pub mod block;
pub mod codec;
pub mod hash;
pub mod merkle;
pub mod transaction;

// Re-export commonly used types at the crate root
pub use address::Address;
pub use block::{Block, GENESIS_TIMESTAMP};
pub use codec::{canonicalize, digest, digest_pair, digest_string, BlockFields};
pub use hash::{hash, hash_concat, hash_str, Hash};
pub use merkle::{MerkleBlock, MerkleError, MerkleNode, MerkleTree};
pub use transaction::Transaction;
