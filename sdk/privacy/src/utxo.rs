//! UTXOs
//!
//! A `Utxo` is the off-chain pre-image of a commitment:
//!
//! ```text
//! Utxo = {
//!     value: u64,     // amount, bounded below 2^40
//!     salt:  [u8; 32] // blinding factor
//!     owner: (x, y)   // Baby Jubjub public key
//! }
//! ```
//!
//! The ledger never sees these fields, only `commitment()`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::commitment::{Commitment, Salt, commit};
use crate::keys::{PrivateKey, PublicKey};
use crate::nullifier::{Nullifier, nullify};

/// Bit-width bound on UTXO values. Sums of even a full batch of maximal
/// values stay far below the field modulus, so conservation arithmetic
/// cannot wrap.
pub const VALUE_BITS: u32 = 40;

/// A UTXO amount with range and overflow protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtxoValue(pub u64);

impl UtxoValue {
    pub const ZERO: Self = Self(0);
    /// Largest representable amount: `2^40 - 1`.
    pub const MAX: Self = Self((1u64 << VALUE_BITS) - 1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether the amount lies in `[0, 2^40 - 1]`.
    pub fn in_range(&self) -> bool {
        self.0 <= Self::MAX.0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

/// A unit of hidden value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utxo {
    /// The amount held in this UTXO
    pub value: UtxoValue,
    /// Random blinding factor
    pub salt: Salt,
    /// Owner's public key (who can spend it)
    pub owner: PublicKey,
}

impl Utxo {
    /// Create a new UTXO with a fresh random salt.
    pub fn new<R: Rng>(value: u64, owner: PublicKey, rng: &mut R) -> Self {
        Self {
            value: UtxoValue(value),
            salt: Salt::random(rng),
            owner,
        }
    }

    /// Create a UTXO with an explicit salt (recovery, tests).
    pub fn with_salt(value: u64, owner: PublicKey, salt: Salt) -> Self {
        Self {
            value: UtxoValue(value),
            salt,
            owner,
        }
    }

    /// The on-chain commitment for this UTXO.
    pub fn commitment(&self) -> Commitment {
        commit(self.value.0, &self.salt, &self.owner)
    }

    /// The spend tag for this UTXO under the owner's private key.
    pub fn nullifier(&self, key: &PrivateKey) -> Nullifier {
        nullify(&self.commitment(), key)
    }
}
