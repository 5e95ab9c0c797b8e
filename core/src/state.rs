//! In-memory account state for block execution
//!
//! Uses a BTreeMap-based model for deterministic iteration order (not a
//! Merkle trie; the trie lives outside this crate). The store exposes the
//! batch contract required by payload execution: every mutation between
//! `begin_batch` and `rollback` is undone atomically.

use crate::errors::{ChainError, Result};
use crate::types::{Address, Hash};
use crate::uint::Uint128;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single account record
///
/// Sender nonces are tracked by the mempool layer, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Spendable balance in native token units
    pub balance: Uint128,
    /// Digest of deployed contract source (zero for user accounts)
    pub code_hash: Hash,
}

impl Account {
    /// Create an account holding a balance
    pub fn new_with_balance(balance: Uint128) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// Check if this is a contract account
    pub fn is_contract(&self) -> bool {
        self.code_hash != Hash::ZERO
    }
}

/// Block-scoped account state store
///
/// The caller guarantees no concurrent mutation during a transaction's
/// execution window. Batches do not nest: one snapshot at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldState {
    /// Account records indexed by address
    pub accounts: BTreeMap<Address, Account>,
    #[serde(skip)]
    snapshot: Option<BTreeMap<Address, Account>>,
}

impl WorldState {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account, replacing any existing record
    pub fn insert_account(&mut self, address: Address, account: Account) {
        self.accounts.insert(address, account);
    }

    /// Fetch an account, creating an empty record if absent
    ///
    /// Idempotent within a batch; an account created before `begin_batch`
    /// survives a rollback.
    pub fn get_or_create(&mut self, address: Address) -> &mut Account {
        self.accounts.entry(address).or_default()
    }

    /// Get an account reference
    pub fn get_account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Check if an account exists
    pub fn account_exists(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    /// Balance of an account, zero if absent
    pub fn balance(&self, address: &Address) -> Uint128 {
        self.accounts
            .get(address)
            .map(|account| account.balance)
            .unwrap_or(Uint128::ZERO)
    }

    /// Credit an account
    pub fn add_balance(&mut self, address: &Address, amount: Uint128) -> Result<()> {
        let account = self.get_or_create(*address);
        account.balance = account.balance.checked_add(amount)?;
        Ok(())
    }

    /// Debit an account
    ///
    /// Callers must precheck solvency; an insufficient balance here is a
    /// programming error surfaced as [`ChainError::BalanceUnderflow`].
    pub fn sub_balance(&mut self, address: &Address, amount: Uint128) -> Result<()> {
        let account = self.get_or_create(*address);
        if account.balance < amount {
            return Err(ChainError::BalanceUnderflow);
        }
        account.balance = account.balance.checked_sub(amount)?;
        Ok(())
    }

    /// Open a mutation batch
    pub fn begin_batch(&mut self) -> Result<()> {
        if self.snapshot.is_some() {
            return Err(ChainError::State("batch already open".into()));
        }
        self.snapshot = Some(self.accounts.clone());
        Ok(())
    }

    /// Keep all mutations made since `begin_batch`
    pub fn commit(&mut self) -> Result<()> {
        self.snapshot
            .take()
            .ok_or_else(|| ChainError::State("commit without open batch".into()))?;
        Ok(())
    }

    /// Discard all mutations made since `begin_batch`
    pub fn rollback(&mut self) -> Result<()> {
        let snapshot = self
            .snapshot
            .take()
            .ok_or_else(|| ChainError::State("rollback without open batch".into()))?;
        self.accounts = snapshot;
        Ok(())
    }

    /// Whether a batch is currently open
    pub fn in_batch(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Number of accounts in the store
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}
