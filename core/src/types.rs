//! Core type definitions for the transaction core
//!
//! Uses alloy-primitives for the canonical account and digest types.
//!
//! An [`Address`] is an opaque 20-byte account identifier. User-account
//! addresses are the right-most 20 bytes of the SHA3-256 digest of the
//! encoded public key; contract addresses come from `sha3(from ‖ nonce_be)`.
//! Equality is byte equality.

pub use alloy_primitives::{Address, B256};

use crate::hashing::sha3_256;

/// 32-byte digest (SHA3-256 output)
pub type Hash = B256;

/// Account nonce type
pub type Nonce = u64;

/// Timestamp (seconds since epoch)
pub type Timestamp = i64;

/// Chain identifier
pub type ChainId = u32;

/// Derive an address from a 32-byte digest
///
/// Takes the trailing 20 bytes. Both user and contract addresses are
/// produced through this truncation, from different preimages.
pub fn address_from_hash(digest: Hash) -> Address {
    Address::from_slice(&digest[12..])
}

/// Derive a user-account address from an encoded public key
pub fn address_from_public_key(encoded: &[u8]) -> Address {
    address_from_hash(sha3_256(encoded))
}
