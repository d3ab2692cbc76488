//! Ledger State Tables
//!
//! The mutable side of the state machine:
//! - commitment status table (`Unknown -> Unspent -> [Locked] -> Spent`)
//! - nullifier-spent set (grows only)
//! - commitment tree + bounded window of recognized roots
//!
//! Mutators are individually guarded; the ledger stages every check
//! before touching any of them, so a failed operation never leaves a
//! partial transition behind.

use std::collections::{HashMap, HashSet};

use log::debug;

use zeto_privacy::{Commitment, Nullifier, RootWindow, SparseMerkleTree};

use crate::error::LedgerError;
use crate::ledger::AccountId;

/// Spend status of a known commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtxoStatus {
    Unspent,
    /// Only the delegate may spend it
    Locked(AccountId),
    /// Terminal
    Spent,
}

/// In-memory UTXO state. Durability belongs to the host ledger.
pub struct UtxoStore {
    statuses: HashMap<Commitment, UtxoStatus>,
    nullifiers: HashSet<Nullifier>,
    tree: SparseMerkleTree,
    positions: HashMap<[u8; 32], u64>,
    roots: RootWindow,
}

impl UtxoStore {
    pub fn new(root_window: usize) -> Self {
        let tree = SparseMerkleTree::new();
        let mut roots = RootWindow::new(root_window);
        roots.push(tree.root());
        Self {
            statuses: HashMap::new(),
            nullifiers: HashSet::new(),
            tree,
            positions: HashMap::new(),
            roots,
        }
    }

    pub fn status(&self, commitment: &Commitment) -> Option<UtxoStatus> {
        self.statuses.get(commitment).copied()
    }

    /// Read-only check that `commitment` can be spent by `caller`.
    pub fn ensure_spendable(
        &self,
        commitment: &Commitment,
        caller: &AccountId,
    ) -> Result<(), LedgerError> {
        match self.status(commitment) {
            None => Err(LedgerError::UnknownUtxo(commitment.0)),
            Some(UtxoStatus::Spent) => Err(LedgerError::AlreadySpent(commitment.0)),
            Some(UtxoStatus::Locked(delegate)) if delegate != *caller => {
                Err(LedgerError::NotLockDelegate)
            }
            Some(_) => Ok(()),
        }
    }

    /// Mark a new commitment unspent; re-minting is rejected.
    pub fn insert_unspent(&mut self, commitment: Commitment) -> Result<(), LedgerError> {
        if self.statuses.contains_key(&commitment) {
            return Err(LedgerError::AlreadyKnown(commitment.0));
        }
        self.statuses.insert(commitment, UtxoStatus::Unspent);
        Ok(())
    }

    /// Transition `Unspent`/`Locked` -> `Spent`.
    pub fn mark_spent(
        &mut self,
        commitment: &Commitment,
        caller: &AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_spendable(commitment, caller)?;
        self.statuses.insert(*commitment, UtxoStatus::Spent);
        Ok(())
    }

    /// Lock an unspent commitment to a delegate.
    pub fn lock(
        &mut self,
        commitment: &Commitment,
        delegate: AccountId,
    ) -> Result<(), LedgerError> {
        match self.status(commitment) {
            None => Err(LedgerError::UnknownUtxo(commitment.0)),
            Some(UtxoStatus::Spent) => Err(LedgerError::AlreadySpent(commitment.0)),
            Some(UtxoStatus::Locked(_)) => Err(LedgerError::Locked(commitment.0)),
            Some(UtxoStatus::Unspent) => {
                self.statuses.insert(*commitment, UtxoStatus::Locked(delegate));
                Ok(())
            }
        }
    }

    pub fn nullifier_spent(&self, nullifier: &Nullifier) -> bool {
        self.nullifiers.contains(nullifier)
    }

    /// Add a nullifier to the spent set; the set only grows.
    pub fn spend_nullifier(&mut self, nullifier: Nullifier) -> Result<(), LedgerError> {
        if self.nullifiers.contains(&nullifier) {
            return Err(LedgerError::AlreadySpent(nullifier.0));
        }
        self.nullifiers.insert(nullifier);
        Ok(())
    }

    /// Append a minted commitment to the tree and recognize the new root.
    pub fn append_to_tree(&mut self, commitment: &Commitment) -> u64 {
        let position = self.tree.insert(commitment.0);
        self.positions.insert(commitment.0, position);
        self.roots.push(self.tree.root());
        debug!(
            "appended commitment at position {position}, root {}",
            hex::encode(self.tree.root())
        );
        position
    }

    pub fn recognizes_root(&self, root: &[u8; 32]) -> bool {
        self.roots.recognizes(root)
    }

    pub fn current_root(&self) -> [u8; 32] {
        self.tree.root()
    }

    /// Tree position of a minted commitment, for membership paths.
    pub fn position(&self, commitment: &Commitment) -> Option<u64> {
        self.positions.get(&commitment.0).copied()
    }

    /// Read access for clients building membership paths.
    pub fn tree(&self) -> &SparseMerkleTree {
        &self.tree
    }

    pub fn nullifier_count(&self) -> usize {
        self.nullifiers.len()
    }

    pub fn known_count(&self) -> usize {
        self.statuses.len()
    }
}
