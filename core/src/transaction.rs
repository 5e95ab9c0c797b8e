//! Transaction type and deterministic execution
//!
//! The transaction is the unit of state change: it transfers value, deploys
//! or invokes contracts, and registers governance actions. Everything here
//! must be reproduced bit for bit on every node; the canonical hash, the
//! gas arithmetic and the order of balance mutations are all protocol.
//!
//! Lifecycle: construct with [`Transaction::new`], [`Transaction::sign`]
//! once, then the transaction is immutable. [`verify_integrity`] is the
//! mempool-facing check; [`verify_execution`] runs the transaction against
//! a block's account state during block execution.
//!
//! [`verify_integrity`]: Transaction::verify_integrity
//! [`verify_execution`]: Transaction::verify_execution

use crate::block::{Block, Event, TOPIC_EXECUTE_TX_FAILED, TOPIC_EXECUTE_TX_SUCCESS};
use crate::errors::{ChainError, Result};
use crate::hashing::hash_concat;
use crate::keystore::{self, Algorithm, Signer};
use crate::payload::{PayloadContext, TxPayload};
use crate::proto;
use crate::telemetry;
use crate::types::{address_from_hash, Address, ChainId, Hash, Nonce, Timestamp};
use crate::uint::Uint128;
use prost::Message;
use serde_json::json;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};

/// Minimum gas charged for any transaction
pub const MIN_GAS_PER_TX: u64 = 20_000;

/// Gas charged per byte of payload data
pub const GAS_PER_BYTE: u64 = 1;

/// Base gas of a delegate transaction
pub const DELEGATE_BASE_GAS: u64 = 20_000;

/// Base gas of a candidate transaction
pub const CANDIDATE_BASE_GAS: u64 = 20_000;

/// Gas price used when the client supplies none: 10^6
pub const DEFAULT_GAS_PRICE: u64 = 1_000_000;

/// Upper bound on gas price: 50 * 10^9
pub const MAX_GAS_PRICE: u64 = 50_000_000_000;

/// Upper bound on gas limit: 50 * 10^9
pub const MAX_GAS: u64 = 50_000_000_000;

/// A signed, immutable state-change request
///
/// Field order in the canonical hash and wire record is fixed; see
/// [`Transaction::canonical_hash`] and [`proto::Transaction`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    hash: Hash,
    from: Address,
    to: Address,
    value: Uint128,
    nonce: Nonce,
    timestamp: Timestamp,
    data: proto::Data,
    chain_id: ChainId,
    gas_price: Uint128,
    gas_limit: Uint128,

    // Signature
    alg: u8,
    sign: Vec<u8>,
}

/// Outcome of the batched payload phase (steps 5-7)
enum PayloadOutcome {
    /// `tx_base_gas + payload_base_gas` exceeded the limit
    BaseGasExceeded,
    /// The payload ran; its mutations are committed or rolled back
    Executed {
        gas_execution: Uint128,
        result: Result<()>,
    },
}

impl Transaction {
    /// Create an unsigned transaction
    ///
    /// A zero `gas_price` defaults to [`DEFAULT_GAS_PRICE`], a zero
    /// `gas_limit` to [`MIN_GAS_PER_TX`]. Values above the protocol
    /// maxima are rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: ChainId,
        from: Address,
        to: Address,
        value: Uint128,
        nonce: Nonce,
        payload_type: &str,
        payload: Vec<u8>,
        gas_price: Uint128,
        gas_limit: Uint128,
    ) -> Result<Self> {
        let gas_price = if gas_price.is_zero() {
            Uint128::from(DEFAULT_GAS_PRICE)
        } else {
            gas_price
        };
        let gas_limit = if gas_limit.is_zero() {
            Uint128::from(MIN_GAS_PER_TX)
        } else {
            gas_limit
        };
        if gas_price > Uint128::from(MAX_GAS_PRICE) {
            return Err(ChainError::InvalidGasPrice);
        }
        if gas_limit > Uint128::from(MAX_GAS) {
            return Err(ChainError::InvalidGasLimit);
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or(0);

        Ok(Self {
            hash: Hash::ZERO,
            from,
            to,
            value,
            nonce,
            timestamp,
            data: proto::Data {
                type_tag: payload_type.to_string(),
                payload,
            },
            chain_id,
            gas_price,
            gas_limit,
            alg: 0,
            sign: Vec::new(),
        })
    }

    /// Canonical hash of the transaction (set by [`Transaction::sign`])
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Sender address
    pub fn from(&self) -> Address {
        self.from
    }

    /// Recipient address
    pub fn to(&self) -> Address {
        self.to
    }

    /// Transferred value
    pub fn value(&self) -> Uint128 {
        self.value
    }

    /// Replay-protection ordinal
    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    /// Construction time, seconds since epoch
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Chain this transaction is bound to
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Payload type tag
    pub fn payload_type(&self) -> &str {
        &self.data.type_tag
    }

    /// Raw payload bytes
    pub fn payload_bytes(&self) -> &[u8] {
        &self.data.payload
    }

    /// Length of the payload bytes
    pub fn data_len(&self) -> usize {
        self.data.payload.len()
    }

    /// Gas price in native token units per gas unit
    pub fn gas_price(&self) -> Uint128 {
        self.gas_price
    }

    /// Gas limit for the whole transaction
    pub fn gas_limit(&self) -> Uint128 {
        self.gas_limit
    }

    /// Balance the sender must hold before execution: `gas_price * gas_limit`
    pub fn min_balance_required(&self) -> Result<Uint128> {
        self.gas_price.checked_mul(self.gas_limit)
    }

    /// Gas charged for carrying the transaction itself
    ///
    /// `MinGasPerTx` plus one `GasPerByte` per payload byte.
    pub fn gas_count_of_tx_base(&self) -> Result<Uint128> {
        let mut gas = Uint128::from(MIN_GAS_PER_TX);
        let data_len = self.data_len();
        if data_len > 0 {
            let data_gas =
                Uint128::from(data_len as u64).checked_mul(Uint128::from(GAS_PER_BYTE))?;
            gas = gas.checked_add(data_gas)?;
        }
        Ok(gas)
    }

    /// Gas budget left for the payload's own execution
    pub fn payload_gas_limit(&self, payload: &TxPayload) -> Result<Uint128> {
        self.gas_limit
            .checked_sub(self.gas_count_of_tx_base()?)?
            .checked_sub(payload.base_gas_count())
    }

    /// Decode this transaction's payload
    pub fn load_payload(&self) -> Result<TxPayload> {
        TxPayload::load(&self.data.type_tag, &self.data.payload)
    }

    /// Deterministic address for the contract this transaction deploys
    pub fn generate_contract_address(&self) -> Address {
        address_from_hash(hash_concat(&[
            self.from.as_slice(),
            &self.nonce.to_be_bytes(),
        ]))
    }

    /// Canonical hash over all fields except `alg` and `sign`
    ///
    /// The concatenation order is protocol; reordering is a hard fork.
    pub fn canonical_hash(&self) -> Hash {
        hash_concat(&[
            self.from.as_slice(),
            self.to.as_slice(),
            &self.value.to_fixed_bytes(),
            &self.nonce.to_be_bytes(),
            &self.timestamp.to_be_bytes(),
            &self.data.encode_to_vec(),
            &self.chain_id.to_be_bytes(),
            &self.gas_price.to_fixed_bytes(),
            &self.gas_limit.to_fixed_bytes(),
        ])
    }

    /// Compute the canonical hash and sign it
    ///
    /// Fills `hash`, `alg` and `sign`; the transaction must not be
    /// modified afterwards.
    pub fn sign(&mut self, signer: &dyn Signer) -> Result<()> {
        let hash = self.canonical_hash();
        let sign = signer.sign(&hash)?;
        self.hash = hash;
        self.alg = signer.algorithm().id();
        self.sign = sign;
        Ok(())
    }

    /// Verify hash and signature against the node's chain id
    ///
    /// Pure function of the transaction; returns the first failure among
    /// chain-id mismatch, hash mismatch and signer mismatch.
    pub fn verify_integrity(&self, chain_id: ChainId) -> Result<()> {
        if self.chain_id != chain_id {
            return Err(ChainError::InvalidChainId);
        }

        if self.canonical_hash() != self.hash {
            return Err(ChainError::InvalidTransactionHash);
        }

        self.verify_sign()
    }

    fn verify_sign(&self) -> Result<()> {
        let algorithm = Algorithm::from_id(u32::from(self.alg))?;
        let public = keystore::recover_public(algorithm, &self.hash, &self.sign)?;
        let recovered = public.address();
        if recovered != self.from {
            error!(recovered = %recovered, tx = %self, "Failed to verify transaction signer");
            return Err(ChainError::InvalidTransactionSigner);
        }
        Ok(())
    }

    /// Execute the transaction against a block's account state
    ///
    /// Returns the gas charged. Pre-flight rejections (insolvent sender,
    /// limit below base gas) return `Err` with no state change and no
    /// event; failures from the payload-decode step onward charge gas,
    /// emit a failure event and return `Ok` so block processing continues.
    /// `Err` from the store aborts the block.
    pub fn verify_execution(&self, block: &mut Block) -> Result<Uint128> {
        let coinbase = block.coinbase_hash();

        // Solvency precheck: balance < gas_price * gas_limit rejects the
        // transaction outright. Reads only; the store must stay untouched
        // on every pre-flight path.
        if block.state.balance(&self.from) < self.min_balance_required()? {
            return Err(ChainError::InsufficientBalance);
        }

        let mut gas_used = self.gas_count_of_tx_base()?;
        if self.gas_limit < gas_used {
            return Err(ChainError::OutOfGasLimit);
        }

        // Pre-flight passed; materialize the touched accounts
        block.state.get_or_create(self.from);
        block.state.get_or_create(self.to);
        block.state.get_or_create(coinbase);

        let payload = match self.load_payload() {
            Ok(payload) => payload,
            Err(err) => {
                error!(%err, tx = %self, "Failed to load payload");
                telemetry::TX_EXECUTE_ERR.inc();

                self.consume_gas(block, gas_used)?;
                self.trigger_event(block, TOPIC_EXECUTE_TX_FAILED, Some(&err));
                return Ok(gas_used);
            }
        };

        // Steps 5-7 run under the batch so the payload's own mutations
        // commit or roll back atomically. The context borrow ends before
        // gas is charged and events are recorded.
        let outcome = {
            let mut ctx = PayloadContext::new(&mut block.state, self);
            ctx.begin_batch()?;

            gas_used = gas_used.checked_add(payload.base_gas_count())?;
            if self.gas_limit < gas_used {
                ctx.rollback()?;
                PayloadOutcome::BaseGasExceeded
            } else {
                let (gas_execution, result) = payload.execute(&mut ctx);
                if result.is_err() {
                    ctx.rollback()?;
                } else {
                    ctx.commit()?;
                }
                PayloadOutcome::Executed {
                    gas_execution,
                    result,
                }
            }
        };

        match outcome {
            PayloadOutcome::BaseGasExceeded => {
                error!(err = %ChainError::OutOfGasLimit, tx = %self, "Failed to check base gas used");
                telemetry::TX_EXECUTE_ERR.inc();

                self.consume_gas(block, self.gas_limit)?;
                self.trigger_event(block, TOPIC_EXECUTE_TX_FAILED, Some(&ChainError::OutOfGasLimit));
                Ok(self.gas_limit)
            }
            PayloadOutcome::Executed {
                gas_execution,
                result,
            } => {
                // Payloads may not overspend: total gas is clamped to the limit
                let mut gas = gas_used.checked_add(gas_execution)?;
                if gas > self.gas_limit {
                    gas = self.gas_limit;
                }

                info!(
                    tx = %self,
                    gas_used = %gas_used,
                    gas_execution = %gas_execution,
                    gas = %gas,
                    gas_price = %self.gas_price,
                    gas_limit = %self.gas_limit,
                    "Transaction execution statistics",
                );

                self.consume_gas(block, gas)?;

                match result {
                    Err(err) => {
                        error!(
                            %err,
                            tx = %self,
                            gas_used = %gas_used,
                            gas_execution = %gas_execution,
                            "Failed to execute payload",
                        );
                        telemetry::TX_EXECUTE_ERR.inc();
                        self.trigger_event(block, TOPIC_EXECUTE_TX_FAILED, Some(&err));
                    }
                    Ok(()) => {
                        if block.state.balance(&self.from) < self.value {
                            error!(
                                err = %ChainError::InsufficientBalance,
                                tx = %self,
                                "Failed to check balance sufficient",
                            );
                            telemetry::TX_EXECUTE_ERR.inc();
                            self.trigger_event(
                                block,
                                TOPIC_EXECUTE_TX_FAILED,
                                Some(&ChainError::InsufficientBalance),
                            );
                        } else {
                            block.state.sub_balance(&self.from, self.value)?;
                            block.state.add_balance(&self.to, self.value)?;

                            telemetry::TX_EXECUTE.inc();
                            self.trigger_event(block, TOPIC_EXECUTE_TX_SUCCESS, None);
                        }
                    }
                }

                Ok(gas)
            }
        }
    }

    /// Move `gas_price * gas` from the sender to the coinbase
    fn consume_gas(&self, block: &mut Block, gas: Uint128) -> Result<()> {
        let coinbase = block.coinbase_hash();
        let cost = self.gas_price.checked_mul(gas)?;
        block.state.sub_balance(&self.from, cost)?;
        block.state.add_balance(&coinbase, cost)?;
        Ok(())
    }

    /// Record a success or failure event keyed by this transaction's hash
    fn trigger_event(&self, block: &mut Block, topic: &str, err: Option<&ChainError>) {
        let tx_json = self.to_event_json();
        let data = match err {
            Some(err) => json!({ "transaction": tx_json, "error": err.to_string() }),
            None => tx_json,
        };
        block.record_event(
            self.hash,
            Event {
                topic: topic.to_string(),
                data: data.to_string(),
            },
        );
    }

    fn to_event_json(&self) -> serde_json::Value {
        json!({
            "hash": hex::encode(self.hash),
            "from": hex::encode(self.from),
            "to": hex::encode(self.to),
            "value": self.value.to_string(),
            "nonce": self.nonce,
            "timestamp": self.timestamp,
            "data": {
                "type": self.data.type_tag,
                "payload": hex::encode(&self.data.payload),
            },
            "chain_id": self.chain_id,
            "gas_price": self.gas_price.to_string(),
            "gas_limit": self.gas_limit.to_string(),
            "alg": self.alg,
            "sign": hex::encode(&self.sign),
        })
    }

    /// Convert to the wire record
    pub fn to_proto(&self) -> proto::Transaction {
        proto::Transaction {
            hash: self.hash.to_vec(),
            from: self.from.to_vec(),
            to: self.to.to_vec(),
            value: self.value.to_fixed_bytes().to_vec(),
            nonce: self.nonce,
            timestamp: self.timestamp,
            data: Some(self.data.clone()),
            chain_id: self.chain_id,
            gas_price: self.gas_price.to_fixed_bytes().to_vec(),
            gas_limit: self.gas_limit.to_fixed_bytes().to_vec(),
            alg: u32::from(self.alg),
            sign: self.sign.clone(),
        }
    }

    /// Rebuild from the wire record, validating field widths
    pub fn from_proto(msg: &proto::Transaction) -> Result<Self> {
        let hash = Hash::try_from(msg.hash.as_slice())
            .map_err(|_| ChainError::WireDecode("hash needs 32 bytes".into()))?;
        let from = Address::try_from(msg.from.as_slice())
            .map_err(|_| ChainError::WireDecode("from needs 20 bytes".into()))?;
        let to = Address::try_from(msg.to.as_slice())
            .map_err(|_| ChainError::WireDecode("to needs 20 bytes".into()))?;
        let data = msg
            .data
            .clone()
            .ok_or_else(|| ChainError::WireDecode("missing data record".into()))?;
        let alg = u8::try_from(msg.alg)
            .map_err(|_| ChainError::WireDecode("alg does not fit u8".into()))?;

        Ok(Self {
            hash,
            from,
            to,
            value: Uint128::from_fixed_bytes(&msg.value)?,
            nonce: msg.nonce,
            timestamp: msg.timestamp,
            data,
            chain_id: msg.chain_id,
            gas_price: Uint128::from_fixed_bytes(&msg.gas_price)?,
            gas_limit: Uint128::from_fixed_bytes(&msg.gas_limit)?,
            alg,
            sign: msg.sign.clone(),
        })
    }

    /// Encode to wire bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    /// Decode from wire bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let msg = proto::Transaction::decode(bytes)?;
        Self::from_proto(&msg)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"{{"chainID":{}, "hash":"{}", "from":"{}", "to":"{}", "nonce":{}, "value":"{}", "timestamp":{}, "type":"{}"}}"#,
            self.chain_id,
            hex::encode(self.hash),
            hex::encode(self.from),
            hex::encode(self.to),
            self.nonce,
            self.value,
            self.timestamp,
            self.data.type_tag,
        )
    }
}
