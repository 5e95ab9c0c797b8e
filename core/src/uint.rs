//! Network-stable 128-bit unsigned integer
//!
//! Balances, transferred values and gas quantities are 128-bit unsigned
//! integers with a fixed 16-byte big-endian wire encoding. The encoding is
//! network-visible: it feeds the canonical transaction hash, so it must be
//! bit-identical on every node.
//!
//! Arithmetic is overflow-checked; silent wrapping would fork the chain.

use crate::errors::{ChainError, Result};
use alloy_primitives::U128;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the fixed-size encoding in bytes
pub const UINT128_SIZE: usize = 16;

/// Unsigned 128-bit integer with a fixed-size big-endian codec
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Uint128(U128);

impl Uint128 {
    /// The zero value
    pub const ZERO: Self = Self(U128::ZERO);

    /// Create from a native unsigned integer
    pub fn new(value: u128) -> Self {
        Self(U128::from(value))
    }

    /// Decode from the fixed 16-byte big-endian encoding
    ///
    /// Rejects any slice that is not exactly 16 bytes; variable-width
    /// encodings would be ambiguous under concatenation.
    pub fn from_fixed_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; UINT128_SIZE] = bytes
            .try_into()
            .map_err(|_| ChainError::WireDecode(format!("uint128 needs {UINT128_SIZE} bytes")))?;
        Ok(Self(U128::from_be_bytes(bytes)))
    }

    /// Encode to the fixed 16-byte big-endian encoding
    pub fn to_fixed_bytes(&self) -> [u8; UINT128_SIZE] {
        self.0.to_be_bytes()
    }

    /// Checked addition
    pub fn checked_add(&self, rhs: Uint128) -> Result<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(ChainError::ArithmeticOverflow)
    }

    /// Checked subtraction
    pub fn checked_sub(&self, rhs: Uint128) -> Result<Self> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(ChainError::ArithmeticUnderflow)
    }

    /// Checked multiplication
    pub fn checked_mul(&self, rhs: Uint128) -> Result<Self> {
        self.0
            .checked_mul(rhs.0)
            .map(Self)
            .ok_or(ChainError::ArithmeticOverflow)
    }

    /// Whether this is the zero value
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Convert to a native unsigned integer
    pub fn to_u128(&self) -> u128 {
        self.0.to::<u128>()
    }
}

impl From<u64> for Uint128 {
    fn from(value: u64) -> Self {
        Self(U128::from(value))
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_bytes_round_trip() {
        let value = Uint128::new(0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10);
        let bytes = value.to_fixed_bytes();
        assert_eq!(bytes.len(), UINT128_SIZE);
        assert_eq!(Uint128::from_fixed_bytes(&bytes).unwrap(), value);
    }

    #[test]
    fn test_fixed_bytes_big_endian() {
        let bytes = Uint128::new(1).to_fixed_bytes();
        let mut expected = [0u8; UINT128_SIZE];
        expected[15] = 1;
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_from_fixed_bytes_rejects_wrong_length() {
        assert!(Uint128::from_fixed_bytes(&[0u8; 8]).is_err());
        assert!(Uint128::from_fixed_bytes(&[0u8; 17]).is_err());
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Uint128::new(u128::MAX);
        assert!(max.checked_add(Uint128::new(1)).is_err());
        assert_eq!(
            Uint128::new(2).checked_add(Uint128::new(3)).unwrap(),
            Uint128::new(5)
        );
    }

    #[test]
    fn test_checked_sub_underflow() {
        assert!(matches!(
            Uint128::ZERO.checked_sub(Uint128::new(1)),
            Err(ChainError::ArithmeticUnderflow)
        ));
        assert_eq!(
            Uint128::new(5).checked_sub(Uint128::new(3)).unwrap(),
            Uint128::new(2)
        );
    }

    #[test]
    fn test_checked_mul() {
        // gas_price * gas_limit at protocol maxima stays in range
        let max_price = Uint128::new(50_000_000_000);
        let max_gas = Uint128::new(50_000_000_000);
        let product = max_price.checked_mul(max_gas).unwrap();
        assert_eq!(product, Uint128::new(2_500_000_000_000_000_000_000));

        let max = Uint128::new(u128::MAX);
        assert!(max.checked_mul(Uint128::new(2)).is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(Uint128::new(1) < Uint128::new(2));
        assert_eq!(Uint128::default(), Uint128::ZERO);
    }
}
