//! Recoverable signature schemes
//!
//! The on-chain record carries no public key, only `(alg, sign)`. The
//! scheme must therefore be recoverable: given the signed hash and the
//! signature, the verifier recomputes the public key and derives the
//! sender address from it.
//!
//! Wire format for secp256k1 signatures: `r (32) ‖ s (32) ‖ v (1)` where
//! `v` is the recovery id.

use crate::errors::{ChainError, Result};
use crate::types::{address_from_public_key, Address, Hash};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};

/// Length of an encoded recoverable secp256k1 signature
pub const SECP256K1_SIGNATURE_SIZE: usize = 65;

/// Signature scheme identifiers
///
/// The discriminants are wire-visible; reassigning them is a hard fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Algorithm {
    /// secp256k1 ECDSA with an appended recovery id
    Secp256k1 = 1,
}

impl Algorithm {
    /// Stable wire id of this scheme
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Decode a wire id
    pub fn from_id(id: u32) -> Result<Self> {
        match id {
            1 => Ok(Algorithm::Secp256k1),
            other => Err(ChainError::UnknownAlgorithm(other)),
        }
    }
}

/// A scheme-specific signing handle
///
/// `sign` operates on a prehashed message (the canonical transaction hash).
pub trait Signer {
    /// The scheme this signer produces signatures under
    fn algorithm(&self) -> Algorithm;

    /// Sign a 32-byte digest, returning the wire-encoded signature
    fn sign(&self, hash: &Hash) -> Result<Vec<u8>>;
}

/// A public key recovered from a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Canonical byte encoding (uncompressed SEC1, 65 bytes)
    ///
    /// Address derivation hashes exactly these bytes; switching to the
    /// compressed encoding would change every address on the network.
    pub fn encoded(&self) -> Vec<u8> {
        self.0.to_encoded_point(false).as_bytes().to_vec()
    }

    /// The user-account address bound to this key
    pub fn address(&self) -> Address {
        address_from_public_key(&self.encoded())
    }
}

/// secp256k1 keypair
pub struct Secp256k1Keypair {
    signing_key: SigningKey,
}

impl Secp256k1Keypair {
    /// Construct from raw 32-byte secret scalar
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(bytes)?;
        Ok(Self { signing_key })
    }

    /// The public half of this keypair
    pub fn public_key(&self) -> PublicKey {
        PublicKey(*self.signing_key.verifying_key())
    }

    /// The address this keypair signs for
    pub fn address(&self) -> Address {
        self.public_key().address()
    }
}

impl Signer for Secp256k1Keypair {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Secp256k1
    }

    fn sign(&self, hash: &Hash) -> Result<Vec<u8>> {
        let (signature, recovery_id) = self.signing_key.sign_prehash_recoverable(hash.as_slice())?;
        let mut out = Vec::with_capacity(SECP256K1_SIGNATURE_SIZE);
        out.extend_from_slice(signature.to_bytes().as_slice());
        out.push(recovery_id.to_byte());
        Ok(out)
    }
}

/// Recover the public key that signed `hash` under the given scheme
pub fn recover_public(algorithm: Algorithm, hash: &Hash, sign: &[u8]) -> Result<PublicKey> {
    match algorithm {
        Algorithm::Secp256k1 => {
            if sign.len() != SECP256K1_SIGNATURE_SIZE {
                return Err(ChainError::Signature(format!(
                    "secp256k1 signature needs {SECP256K1_SIGNATURE_SIZE} bytes, got {}",
                    sign.len()
                )));
            }
            let recovery_id = RecoveryId::from_byte(sign[64])
                .ok_or_else(|| ChainError::Signature("invalid recovery id".into()))?;
            let signature = EcdsaSignature::from_slice(&sign[..64])?;
            let key = VerifyingKey::recover_from_prehash(hash.as_slice(), &signature, recovery_id)?;
            Ok(PublicKey(key))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::sha3_256;

    fn test_keypair() -> Secp256k1Keypair {
        // Fixed secret so addresses are reproducible across runs
        Secp256k1Keypair::from_secret_bytes(&[0x17; 32]).unwrap()
    }

    #[test]
    fn test_sign_recover_round_trip() {
        let keypair = test_keypair();
        let hash = sha3_256(b"message");

        let sign = keypair.sign(&hash).unwrap();
        assert_eq!(sign.len(), SECP256K1_SIGNATURE_SIZE);

        let recovered = recover_public(Algorithm::Secp256k1, &hash, &sign).unwrap();
        assert_eq!(recovered.address(), keypair.address());
        assert_eq!(recovered.encoded(), keypair.public_key().encoded());
    }

    #[test]
    fn test_recovery_binds_to_hash() {
        let keypair = test_keypair();
        let sign = keypair.sign(&sha3_256(b"message")).unwrap();

        // Same signature against a different hash recovers a different key,
        // if it recovers at all
        let other = sha3_256(b"another message");
        match recover_public(Algorithm::Secp256k1, &other, &sign) {
            Ok(key) => assert_ne!(key.address(), keypair.address()),
            Err(_) => {}
        }
    }

    #[test]
    fn test_recover_rejects_truncated_signature() {
        let keypair = test_keypair();
        let hash = sha3_256(b"message");
        let sign = keypair.sign(&hash).unwrap();

        let err = recover_public(Algorithm::Secp256k1, &hash, &sign[..64]);
        assert!(err.is_err());
    }

    #[test]
    fn test_algorithm_wire_ids() {
        assert_eq!(Algorithm::Secp256k1.id(), 1);
        assert_eq!(Algorithm::from_id(1).unwrap(), Algorithm::Secp256k1);
        assert!(matches!(
            Algorithm::from_id(9),
            Err(ChainError::UnknownAlgorithm(9))
        ));
    }

    #[test]
    fn test_encoded_key_is_uncompressed_sec1() {
        let encoded = test_keypair().public_key().encoded();
        assert_eq!(encoded.len(), 65);
        assert_eq!(encoded[0], 0x04);
    }
}
