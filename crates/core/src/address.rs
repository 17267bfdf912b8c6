//! Participant addresses.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// An opaque participant identifier.
///
/// Addresses carry no structure or checksum; two addresses are the same
/// participant exactly when their strings are equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for Address {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_address_equality() {
        assert_eq!(Address::from("alice"), Address::new("alice".to_string()));
        assert_ne!(Address::from("alice"), Address::from("Alice"));
    }

    #[test]
    fn test_set_lookup_by_str() {
        let mut set = HashSet::new();
        set.insert(Address::from("bob"));
        assert!(set.contains("bob"));
        assert!(!set.contains("carol"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&Address::from("alice")).unwrap();
        assert_eq!(json, "\"alice\"");
    }
}
