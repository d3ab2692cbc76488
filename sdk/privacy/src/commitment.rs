//! UTXO Commitments
//!
//! ```text
//! C = Poseidon(value, salt, owner.x, owner.y)
//! ```
//!
//! Hiding (the salt blinds the value) and binding (Poseidon collision
//! resistance). The ledger only ever sees `C`; spending requires the
//! pre-image, held off-chain by the owner.

use ark_bn254::Fr;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::keys::PublicKey;
use crate::poseidon::{self, bytes_to_field, field_to_bytes};

/// A UTXO commitment (32 bytes, a BN254 field element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub [u8; 32]);

impl Commitment {
    /// Zero sentinel used to pad fixed-width proposal arrays.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create a commitment from a field element.
    pub fn from_field(f: Fr) -> Self {
        Self(field_to_bytes(f))
    }

    /// Convert to a field element.
    pub fn to_field(&self) -> Fr {
        bytes_to_field(&self.0)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl AsRef<[u8]> for Commitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Random blinding factor for a commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Salt(pub [u8; 32]);

impl Salt {
    pub const ZERO: Self = Self([0u8; 32]);

    /// Sample a fresh salt, stored in canonical field form.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(field_to_bytes(bytes_to_field(&bytes)))
    }

    pub fn from_field(f: Fr) -> Self {
        Self(field_to_bytes(f))
    }

    pub fn to_field(&self) -> Fr {
        bytes_to_field(&self.0)
    }
}

/// Commit to a UTXO: `C = Poseidon(value, salt, owner.x, owner.y)`.
pub fn commit(value: u64, salt: &Salt, owner: &PublicKey) -> Commitment {
    let digest = poseidon::hash(&[
        Fr::from(value),
        salt.to_field(),
        owner.x_field(),
        owner.y_field(),
    ]);
    Commitment::from_field(digest)
}
