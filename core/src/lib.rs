//! # Emberchain Core
//!
//! Transaction core of the emberchain node: the transaction data
//! structure, canonical SHA3-256 hashing, signature binding via public-key
//! recovery, gas accounting, and deterministic execution against a
//! block-scoped account state.
//!
//! Every node must reproduce byte-identical hashes, identical
//! post-execution state and identical events for the same input;
//! divergence forks the chain.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   Transaction   │ ── canonical hash, sign, verify_integrity
//! └────────┬────────┘
//!          │ verify_execution(block)
//!          ▼
//! ┌─────────────────┐
//! │      Block      │ ── coinbase, account state, event sink
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    TxPayload    │ ── binary / deploy / call / candidate / delegate
//! └────────┬────────┘
//!          │ begin_batch .. commit | rollback
//!          ▼
//! ┌─────────────────┐
//! │   WorldState    │ ── balances, batched mutation
//! └─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use emberchain_core::prelude::*;
//!
//! let keypair = Secp256k1Keypair::from_secret_bytes(&secret)?;
//! let mut tx = Transaction::new(
//!     chain_id, keypair.address(), recipient, value, nonce,
//!     TX_PAYLOAD_BINARY_TYPE, vec![], gas_price, gas_limit,
//! )?;
//! tx.sign(&keypair)?;
//! tx.verify_integrity(chain_id)?;
//!
//! let mut block = Block::new(chain_id, coinbase, state);
//! let gas = tx.verify_execution(&mut block)?;
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Address and digest types, address derivation
//! - [`uint`] - Fixed-width 128-bit integer codec
//! - [`errors`] - Error types and Result alias
//! - [`hashing`] - SHA3-256 digests
//! - [`keystore`] - Recoverable signature schemes
//! - [`state`] - Account state with batched mutation
//! - [`block`] - Execution container and event sink
//! - [`proto`] - Wire records
//! - [`payload`] - Payload dispatch
//! - [`transaction`] - The transaction and its execution state machine
//! - [`telemetry`] - Process-wide execution counters

pub mod block;
pub mod errors;
pub mod hashing;
pub mod keystore;
pub mod payload;
pub mod proto;
pub mod state;
pub mod telemetry;
pub mod transaction;
pub mod types;
pub mod uint;

// Re-exports for convenience
pub use block::{Block, Event, TOPIC_EXECUTE_TX_FAILED, TOPIC_EXECUTE_TX_SUCCESS};
pub use errors::{ChainError, Result};
pub use hashing::{hash_concat, sha3_256};
pub use keystore::{recover_public, Algorithm, PublicKey, Secp256k1Keypair, Signer};
pub use payload::{PayloadContext, TxPayload, TX_PAYLOAD_BINARY_TYPE};
pub use state::{Account, WorldState};
pub use transaction::Transaction;
pub use types::{address_from_hash, address_from_public_key, Address, ChainId, Hash};
pub use uint::Uint128;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        address_from_hash, address_from_public_key, Account, Address, Algorithm, Block, ChainError,
        ChainId, Event, Hash, PublicKey, Result, Secp256k1Keypair, Signer, Transaction, TxPayload,
        Uint128, WorldState, TOPIC_EXECUTE_TX_FAILED, TOPIC_EXECUTE_TX_SUCCESS,
        TX_PAYLOAD_BINARY_TYPE,
    };
}
