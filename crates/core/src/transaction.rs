//! Ledger entries.

use crate::address::Address;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A value transfer between two participants.
///
/// Entries are plain data. The amount may be negative here; admission rules
/// reject negative amounts when the entry is offered to a chain.
///
/// Fields are declared in sorted key order so the canonical encoding does not
/// depend on declaration changes elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Value moved from sender to recipient.
    #[serde(with = "crate::codec::float")]
    pub amount: f64,
    /// Receiving participant.
    pub recipient: Address,
    /// Sending participant.
    pub sender: Address,
}

impl Transaction {
    /// Create a new transfer.
    pub fn new(sender: impl Into<Address>, recipient: impl Into<Address>, amount: f64) -> Self {
        Self {
            amount,
            recipient: recipient.into(),
            sender: sender.into(),
        }
    }

    /// Both participants touched by this entry.
    pub fn participants(&self) -> [&Address; 2] {
        [&self.sender, &self.recipient]
    }

    /// Check whether the amount is admissible: anything not below zero.
    ///
    /// `NaN` compares as unordered and is therefore not rejected.
    pub fn has_valid_amount(&self) -> bool {
        self.amount.partial_cmp(&0.0) != Some(Ordering::Less)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_fields() {
        let tx = Transaction::new("alice", "bob", 10.0);

        assert_eq!(tx.sender, Address::from("alice"));
        assert_eq!(tx.recipient, Address::from("bob"));
        assert_eq!(tx.amount, 10.0);
    }

    #[test]
    fn test_participants_order() {
        let tx = Transaction::new("alice", "bob", 1.0);
        let [sender, recipient] = tx.participants();
        assert_eq!(sender.as_str(), "alice");
        assert_eq!(recipient.as_str(), "bob");
    }

    #[test]
    fn test_amount_boundary() {
        assert!(Transaction::new("a", "b", 0.0).has_valid_amount());
        assert!(!Transaction::new("a", "b", -1.0).has_valid_amount());
    }

    #[test]
    fn test_non_finite_amounts() {
        assert!(Transaction::new("a", "b", f64::NAN).has_valid_amount());
        assert!(Transaction::new("a", "b", f64::INFINITY).has_valid_amount());
        assert!(!Transaction::new("a", "b", f64::NEG_INFINITY).has_valid_amount());
    }

    #[test]
    fn test_json_keys_sorted() {
        let json = serde_json::to_string(&Transaction::new("alice", "bob", 2.5)).unwrap();
        assert_eq!(json, r#"{"amount":2.5,"recipient":"bob","sender":"alice"}"#);
    }
}
