//! Nullifiers
//!
//! ```text
//! N = Poseidon(DOMAIN, C, sk)
//! ```
//!
//! Publishing `N` spends the commitment `C` without revealing which
//! commitment was spent; deriving it requires the owner's private key.
//! The ledger accepts each nullifier at most once.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use crate::commitment::Commitment;
use crate::keys::PrivateKey;
use crate::poseidon::{self, bytes_to_field, field_to_bytes};

/// Domain separator ("NULL" in hex).
const DOMAIN_NULLIFIER: u64 = 0x4e55_4c4c;

/// A nullifier (32 bytes) - the one-way spend tag of a commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nullifier(pub [u8; 32]);

impl Nullifier {
    /// Zero sentinel used to pad fixed-width proposal arrays.
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn from_field(f: Fr) -> Self {
        Self(field_to_bytes(f))
    }

    pub fn to_field(&self) -> Fr {
        bytes_to_field(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl AsRef<[u8]> for Nullifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Derive the nullifier of a commitment under the owner's key.
pub fn nullify(commitment: &Commitment, key: &PrivateKey) -> Nullifier {
    let digest = poseidon::hash(&[
        Fr::from(DOMAIN_NULLIFIER),
        commitment.to_field(),
        key.as_field(),
    ]);
    Nullifier::from_field(digest)
}
