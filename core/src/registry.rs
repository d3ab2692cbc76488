//! Identity Registry
//!
//! The KYC policy gate: an owner-gated allow-list of approved public
//! keys, kept as a sparse Merkle tree of `Poseidon(x, y)` leaves. The
//! transfer path reads `identities_root()` into its public-input
//! vector; clients fetch membership paths for their proofs. Which keys
//! matched is never revealed on-chain.

use std::collections::HashMap;

use log::info;

use zeto_privacy::{InclusionPath, PublicKey, SparseMerkleTree};
use zeto_prover::identity_leaf;

use crate::error::LedgerError;
use crate::ledger::AccountId;

/// Read-only view the transfer path consumes.
pub trait IdentityGate {
    fn identities_root(&self) -> [u8; 32];
}

/// Registry backed by its own sparse Merkle tree.
pub struct SmtIdentityRegistry {
    authority: AccountId,
    tree: SparseMerkleTree,
    positions: HashMap<[u8; 32], u64>,
}

impl SmtIdentityRegistry {
    pub fn new(authority: AccountId) -> Self {
        Self {
            authority,
            tree: SparseMerkleTree::new(),
            positions: HashMap::new(),
        }
    }

    /// Approve a key. Owner-gated; re-registration is rejected.
    pub fn register(
        &mut self,
        caller: &AccountId,
        key: &PublicKey,
    ) -> Result<u64, LedgerError> {
        if *caller != self.authority {
            return Err(LedgerError::NotAuthorized);
        }
        let leaf = identity_leaf(key);
        if self.positions.contains_key(&leaf) {
            return Err(LedgerError::AlreadyKnown(leaf));
        }
        let position = self.tree.insert(leaf);
        self.positions.insert(leaf, position);
        info!("registered identity at position {position}");
        Ok(position)
    }

    pub fn is_registered(&self, key: &PublicKey) -> bool {
        self.positions.contains_key(&identity_leaf(key))
    }

    /// Membership path for a registered key.
    pub fn membership_path(&self, key: &PublicKey) -> Option<InclusionPath> {
        let position = *self.positions.get(&identity_leaf(key))?;
        self.tree.path(position)
    }
}

impl IdentityGate for SmtIdentityRegistry {
    fn identities_root(&self) -> [u8; 32] {
        self.tree.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::rngs::OsRng;
    use zeto_privacy::OwnerKeypair;

    const AUTHORITY: AccountId = [7u8; 32];

    #[test]
    fn test_register_is_owner_gated() {
        let mut registry = SmtIdentityRegistry::new(AUTHORITY);
        let key = OwnerKeypair::random(&mut OsRng).public_key;

        assert!(matches!(
            registry.register(&[8u8; 32], &key),
            Err(LedgerError::NotAuthorized)
        ));
        registry.register(&AUTHORITY, &key).unwrap();
        assert!(registry.is_registered(&key));
    }

    #[test]
    fn test_membership_path_verifies() {
        let mut rng = OsRng;
        let mut registry = SmtIdentityRegistry::new(AUTHORITY);
        let a = OwnerKeypair::random(&mut rng).public_key;
        let b = OwnerKeypair::random(&mut rng).public_key;

        registry.register(&AUTHORITY, &a).unwrap();
        registry.register(&AUTHORITY, &b).unwrap();

        let path = registry.membership_path(&a).unwrap();
        assert!(path.verify(&identity_leaf(&a), &registry.identities_root()));
        assert!(!path.verify(&identity_leaf(&b), &registry.identities_root()));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = SmtIdentityRegistry::new(AUTHORITY);
        let key = OwnerKeypair::random(&mut OsRng).public_key;

        registry.register(&AUTHORITY, &key).unwrap();
        assert!(matches!(
            registry.register(&AUTHORITY, &key),
            Err(LedgerError::AlreadyKnown(_))
        ));
    }
}
