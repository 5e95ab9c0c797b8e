/*
Error types for the emberchain transaction core
Covers integrity verification, payload decoding and state execution.
*/

use thiserror::Error;

/// Errors raised by the transaction core
#[derive(Debug, Error)]
pub enum ChainError {
    /// Transaction chain id does not match the node's chain id
    #[error("invalid chain id")]
    InvalidChainId,

    /// Recomputed canonical hash differs from the recorded hash
    #[error("invalid transaction hash")]
    InvalidTransactionHash,

    /// Recovered signer address does not match the declared sender
    #[error("invalid transaction signer")]
    InvalidTransactionSigner,

    /// Unknown payload type tag
    #[error("invalid transaction payload type: {0}")]
    InvalidTxPayloadType(String),

    /// Payload bytes failed to decode for a known type tag
    #[error("invalid transaction payload: {0}")]
    InvalidPayload(String),

    /// Sender balance cannot cover the required amount
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Gas limit is below the gas already required
    #[error("out of gas limit")]
    OutOfGasLimit,

    /// Gas price above the protocol maximum
    #[error("invalid gas price")]
    InvalidGasPrice,

    /// Gas limit above the protocol maximum
    #[error("invalid gas limit")]
    InvalidGasLimit,

    /// Unknown signature algorithm id on the wire
    #[error("unknown signature algorithm: {0}")]
    UnknownAlgorithm(u32),

    /// Signing or public-key recovery failed
    #[error("signature error: {0}")]
    Signature(String),

    /// 128-bit arithmetic overflowed
    #[error("uint128 overflow")]
    ArithmeticOverflow,

    /// 128-bit arithmetic underflowed
    #[error("uint128 underflow")]
    ArithmeticUnderflow,

    /// Balance debit without a sufficient-balance precheck
    #[error("balance underflow")]
    BalanceUnderflow,

    /// Account-state store failure; aborts block processing
    #[error("state error: {0}")]
    State(String),

    /// Wire record failed to decode
    #[error("wire decode error: {0}")]
    WireDecode(String),

    /// Payload execution failed; batch is rolled back
    #[error("payload execution failed: {0}")]
    PayloadExecution(String),
}

/// Result type for transaction-core operations
pub type Result<T> = core::result::Result<T, ChainError>;

impl From<prost::DecodeError> for ChainError {
    fn from(err: prost::DecodeError) -> Self {
        ChainError::WireDecode(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::InvalidPayload(err.to_string())
    }
}

impl From<k256::ecdsa::Error> for ChainError {
    fn from(err: k256::ecdsa::Error) -> Self {
        ChainError::Signature(err.to_string())
    }
}
