//! Canonical encoding of block contents for hashing.
//!
//! The encoding is compact JSON with keys in sorted order. Floating point
//! fields are written with `serde_json`'s shortest round-trip formatting, so
//! the bytes never depend on locale or platform. Non-finite values, which
//! JSON numbers cannot carry, are written as the strings `"NaN"`,
//! `"Infinity"` and `"-Infinity"` (see [`float`]).

use crate::hash::{hash, hash_concat, hash_str, Hash};
use crate::transaction::Transaction;
use serde::Serialize;

/// Borrowed view over the hashed fields of a block.
///
/// Field order here is the key order of the encoding.
#[derive(Debug, Serialize)]
pub struct BlockFields<'a> {
    pub index: u64,
    pub nonce: u64,
    pub previous_hash: &'a Hash,
    #[serde(serialize_with = "float::serialize")]
    pub timestamp: f64,
    pub transactions: &'a [Transaction],
}

/// Encode block fields into their canonical byte form.
pub fn canonicalize(fields: &BlockFields<'_>) -> Vec<u8> {
    serde_json::to_vec(fields).expect("serialization should not fail")
}

/// Digest a byte string.
pub fn digest(bytes: &[u8]) -> Hash {
    hash(bytes)
}

/// Digest the UTF-8 bytes of a string.
pub fn digest_string(s: &str) -> Hash {
    hash_str(s)
}

/// Digest the concatenation of two hash strings.
///
/// Equivalent to `digest_string(&format!("{left}{right}"))`.
pub fn digest_pair(left: &Hash, right: &Hash) -> Hash {
    hash_concat(&[left.as_ref(), right.as_ref()])
}

/// Serde adapter for `f64` fields that keeps non-finite values distinct.
///
/// Use with `#[serde(with = "crate::codec::float")]`.
pub mod float {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value == f64::INFINITY {
            serializer.serialize_str("Infinity")
        } else if *value == f64::NEG_INFINITY {
            serializer.serialize_str("-Infinity")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Token(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Token(token) => match token.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(serde::de::Error::custom(format!(
                    "invalid float token {other:?}"
                ))),
            },
        }
    }
}
