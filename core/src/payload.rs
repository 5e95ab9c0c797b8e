//! Transaction payload dispatch
//!
//! A transaction carries a `(type_tag, payload_bytes)` pair; the tag picks
//! the decoder and the decoded payload drives its own state changes during
//! execution. Payload kinds are a closed set, so dispatch is a tagged
//! variant rather than trait objects.
//!
//! The payload bodies here are the protocol's governance and contract
//! records; contract execution itself (the VM) lives outside this crate,
//! and the deploy/call variants meter their input bytes in its place.

use crate::errors::{ChainError, Result};
use crate::hashing::{hash_concat, sha3_256};
use crate::state::WorldState;
use crate::transaction::{Transaction, CANDIDATE_BASE_GAS, DELEGATE_BASE_GAS};
use crate::types::{address_from_hash, Address};
use crate::uint::Uint128;
use serde::{Deserialize, Serialize};

/// Type tag of plain value-transfer payloads
pub const TX_PAYLOAD_BINARY_TYPE: &str = "binary";
/// Type tag of contract deployment payloads
pub const TX_PAYLOAD_DEPLOY_TYPE: &str = "deploy";
/// Type tag of contract call payloads
pub const TX_PAYLOAD_CALL_TYPE: &str = "call";
/// Type tag of candidate registration payloads
pub const TX_PAYLOAD_CANDIDATE_TYPE: &str = "candidate";
/// Type tag of vote delegation payloads
pub const TX_PAYLOAD_DELEGATE_TYPE: &str = "delegate";

/// Candidate action: enter the candidate set
pub const CANDIDATE_ACTION_LOGIN: &str = "login";
/// Candidate action: leave the candidate set
pub const CANDIDATE_ACTION_LOGOUT: &str = "logout";

/// Delegate action: delegate to the named delegatee
pub const DELEGATE_ACTION_DO: &str = "do";
/// Delegate action: withdraw an existing delegation
pub const DELEGATE_ACTION_UN: &str = "un";

/// Execution context handed to a payload
///
/// Borrows the block's account state for the duration of steps 5-7 of the
/// execution state machine; the batch primitives scope the payload's own
/// mutations so they can be undone atomically.
pub struct PayloadContext<'a> {
    /// Account state the payload mutates
    pub state: &'a mut WorldState,
    /// Sender address
    pub from: Address,
    /// Recipient address
    pub to: Address,
    /// Sender's transaction ordinal
    pub nonce: u64,
}

impl<'a> PayloadContext<'a> {
    /// Create a context for one transaction over the block's state
    pub fn new(state: &'a mut WorldState, tx: &Transaction) -> Self {
        Self {
            state,
            from: tx.from(),
            to: tx.to(),
            nonce: tx.nonce(),
        }
    }

    /// Open the payload mutation batch
    pub fn begin_batch(&mut self) -> Result<()> {
        self.state.begin_batch()
    }

    /// Keep the payload's mutations
    pub fn commit(&mut self) -> Result<()> {
        self.state.commit()
    }

    /// Undo the payload's mutations
    pub fn rollback(&mut self) -> Result<()> {
        self.state.rollback()
    }
}

/// Opaque rider on a plain value transfer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryPayload {
    pub data: Vec<u8>,
}

impl BinaryPayload {
    /// Decode from raw payload bytes; never fails
    pub fn load(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
        }
    }

    /// Payload bytes as carried on the wire
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }
}

/// Contract deployment record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployPayload {
    /// Source language tag, e.g. "js" or "ts"
    pub source_type: String,
    /// Contract source
    pub source: String,
    /// Constructor arguments, JSON-encoded
    pub args: String,
}

impl DeployPayload {
    /// Decode and validate from JSON payload bytes
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let payload: Self = serde_json::from_slice(bytes)?;
        if payload.source.is_empty() {
            return Err(ChainError::InvalidPayload("empty deploy source".into()));
        }
        Ok(payload)
    }

    /// Encode to JSON payload bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Contract invocation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPayload {
    /// Function to invoke on the callee contract
    pub function: String,
    /// Call arguments, JSON-encoded
    pub args: String,
}

impl CallPayload {
    /// Decode and validate from JSON payload bytes
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let payload: Self = serde_json::from_slice(bytes)?;
        if payload.function.is_empty() {
            return Err(ChainError::InvalidPayload("empty call function".into()));
        }
        Ok(payload)
    }

    /// Encode to JSON payload bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Candidate registration record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePayload {
    /// "login" or "logout"
    pub action: String,
}

impl CandidatePayload {
    /// Decode and validate from JSON payload bytes
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let payload: Self = serde_json::from_slice(bytes)?;
        match payload.action.as_str() {
            CANDIDATE_ACTION_LOGIN | CANDIDATE_ACTION_LOGOUT => Ok(payload),
            other => Err(ChainError::InvalidPayload(format!(
                "unknown candidate action: {other}"
            ))),
        }
    }

    /// Encode to JSON payload bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Vote delegation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatePayload {
    /// "do" or "un"
    pub action: String,
    /// Hex-encoded delegatee address
    pub delegatee: String,
}

impl DelegatePayload {
    /// Decode and validate from JSON payload bytes
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let payload: Self = serde_json::from_slice(bytes)?;
        if !matches!(
            payload.action.as_str(),
            DELEGATE_ACTION_DO | DELEGATE_ACTION_UN
        ) {
            return Err(ChainError::InvalidPayload(format!(
                "unknown delegate action: {}",
                payload.action
            )));
        }
        if payload.delegatee.is_empty() {
            return Err(ChainError::InvalidPayload("empty delegatee".into()));
        }
        Ok(payload)
    }

    /// Encode to JSON payload bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Decoded transaction payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxPayload {
    Binary(BinaryPayload),
    Deploy(DeployPayload),
    Call(CallPayload),
    Candidate(CandidatePayload),
    Delegate(DelegatePayload),
}

impl TxPayload {
    /// Decode `(type_tag, payload_bytes)` into a payload
    ///
    /// Unknown tags are [`ChainError::InvalidTxPayloadType`]; known tags
    /// with malformed bytes are [`ChainError::InvalidPayload`].
    pub fn load(type_tag: &str, payload: &[u8]) -> Result<Self> {
        match type_tag {
            TX_PAYLOAD_BINARY_TYPE => Ok(Self::Binary(BinaryPayload::load(payload))),
            TX_PAYLOAD_DEPLOY_TYPE => Ok(Self::Deploy(DeployPayload::load(payload)?)),
            TX_PAYLOAD_CALL_TYPE => Ok(Self::Call(CallPayload::load(payload)?)),
            TX_PAYLOAD_CANDIDATE_TYPE => Ok(Self::Candidate(CandidatePayload::load(payload)?)),
            TX_PAYLOAD_DELEGATE_TYPE => Ok(Self::Delegate(DelegatePayload::load(payload)?)),
            other => Err(ChainError::InvalidTxPayloadType(other.to_string())),
        }
    }

    /// Fixed gas charged for carrying this payload kind
    pub fn base_gas_count(&self) -> Uint128 {
        match self {
            Self::Binary(_) | Self::Deploy(_) | Self::Call(_) => Uint128::ZERO,
            Self::Candidate(_) => Uint128::from(CANDIDATE_BASE_GAS),
            Self::Delegate(_) => Uint128::from(DELEGATE_BASE_GAS),
        }
    }

    /// Perform the payload's own state changes
    ///
    /// Returns the execution gas alongside the outcome; gas is owed even
    /// when execution fails, so it rides outside the `Result`.
    pub fn execute(&self, ctx: &mut PayloadContext<'_>) -> (Uint128, Result<()>) {
        match self {
            Self::Binary(_) => (Uint128::ZERO, Ok(())),
            Self::Deploy(payload) => payload_execute_deploy(payload, ctx),
            Self::Call(payload) => payload_execute_call(payload, ctx),
            // Candidate/delegate bookkeeping lives in the consensus layer;
            // only their base gas is charged here
            Self::Candidate(_) | Self::Delegate(_) => (Uint128::ZERO, Ok(())),
        }
    }
}

fn payload_execute_deploy(
    payload: &DeployPayload,
    ctx: &mut PayloadContext<'_>,
) -> (Uint128, Result<()>) {
    let gas = Uint128::from(payload.source.len() as u64);
    let contract_addr =
        address_from_hash(hash_concat(&[ctx.from.as_slice(), &ctx.nonce.to_be_bytes()]));
    let account = ctx.state.get_or_create(contract_addr);
    if account.is_contract() {
        return (
            gas,
            Err(ChainError::PayloadExecution(format!(
                "contract already deployed at {contract_addr}"
            ))),
        );
    }
    account.code_hash = sha3_256(payload.source.as_bytes());
    (gas, Ok(()))
}

fn payload_execute_call(
    payload: &CallPayload,
    ctx: &mut PayloadContext<'_>,
) -> (Uint128, Result<()>) {
    let gas = Uint128::from((payload.function.len() + payload.args.len()) as u64);
    match ctx.state.get_account(&ctx.to) {
        Some(account) if account.is_contract() => (gas, Ok(())),
        _ => (
            gas,
            Err(ChainError::PayloadExecution(format!(
                "no contract at {}",
                ctx.to
            ))),
        ),
    }
}
