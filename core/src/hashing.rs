//! Hashing utilities for the transaction core
//!
//! Provides SHA3-256 hashing for transaction digests and address derivation.
//! All hashing functions are deterministic; every node must reproduce them
//! bit for bit.

use crate::types::Hash;
use alloy_primitives::B256;
use sha3::{Digest, Sha3_256};

/// Compute SHA3-256 hash of arbitrary data
///
/// # Arguments
/// * `data` - Byte slice to hash
///
/// # Returns
/// 32-byte SHA3-256 digest
pub fn sha3_256(data: &[u8]) -> Hash {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    B256::from_slice(&hasher.finalize())
}

/// Hash multiple byte slices together
///
/// Feeds every slice into a single SHA3-256 state, in order. This is the
/// primitive behind the canonical transaction hash; the slice order is
/// part of the protocol.
pub fn hash_concat(values: &[&[u8]]) -> Hash {
    let mut hasher = Sha3_256::new();
    for value in values {
        hasher.update(value);
    }
    B256::from_slice(&hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha3_256_empty() {
        let hash = sha3_256(&[]);
        // Known empty SHA3-256 digest
        assert_eq!(
            hex::encode(hash),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_sha3_256_hello() {
        let hash = sha3_256(b"hello");
        assert_eq!(
            hex::encode(hash),
            "3338be694f50c5f338814986cdf0686453a888b84f424d792af4b9202398f392"
        );
    }

    #[test]
    fn test_hash_deterministic() {
        let h1 = sha3_256(b"emberchain");
        let h2 = sha3_256(b"emberchain");
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_hash_concat() {
        let a = b"hello";
        let b = b"world";

        let h1 = hash_concat(&[a, b]);
        let h2 = sha3_256(b"helloworld");

        assert_eq!(h1, h2);
    }

    #[test]
    fn test_hash_concat_order_sensitive() {
        let h1 = hash_concat(&[b"ab", b"cd"]);
        let h2 = hash_concat(&[b"cd", b"ab"]);
        assert_ne!(h1, h2);
    }
}
