//! Blake3 hashing utilities for the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a rendered digest in hex characters.
pub const HASH_HEX_LEN: usize = 64;

/// A hash rendered as a lowercase hex string.
///
/// Digests are always 64 hex chars, but the type also has to carry the
/// literal genesis parent `"0"`, so it wraps a string rather than raw bytes.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hash(String);

impl Hash {
    /// The predecessor hash stored in the genesis block.
    pub fn genesis_parent() -> Self {
        Self("0".to_string())
    }

    /// Wrap an already-rendered hash string.
    pub fn from_hex(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Borrow the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this is a full-length digest (as opposed to the genesis parent).
    pub fn is_digest(&self) -> bool {
        self.0.len() == HASH_HEX_LEN && self.0.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// First `n` characters, for compact display.
    pub fn short(&self, n: usize) -> &str {
        match self.0.char_indices().nth(n) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.short(8))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Hash arbitrary data using Blake3.
pub fn hash(data: &[u8]) -> Hash {
    Hash(hex::encode(blake3::hash(data).as_bytes()))
}

/// Hash the UTF-8 bytes of a string.
pub fn hash_str(s: &str) -> Hash {
    hash(s.as_bytes())
}

/// Hash multiple pieces of data by concatenating them.
pub fn hash_concat(parts: &[&[u8]]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    Hash(hex::encode(hasher.finalize().as_bytes()))
}
