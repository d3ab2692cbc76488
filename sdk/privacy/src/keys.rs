//! Owner keys on Baby Jubjub.
//!
//! Public keys live on the twisted Edwards curve embedded in the BN254
//! scalar field, so both coordinates are field elements the proof
//! statement can hash directly. Key derivation is fixed-base scalar
//! multiplication; the confidentiality encoder uses plain ECDH on the
//! same curve.

use ark_bn254::Fr;
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ed_on_bn254::{EdwardsAffine, EdwardsProjective, Fr as ScalarField};
use ark_ff::{BigInteger, PrimeField};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::poseidon::{bytes_to_field, field_to_bytes};

/// A spending private key: a Baby Jubjub scalar, stored canonically.
///
/// Loss = loss of funds. Compromise = theft of funds.
#[derive(Clone)]
pub struct PrivateKey {
    scalar: [u8; 32],
}

impl PrivateKey {
    /// Generate a random private key.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Build a key from raw bytes, reducing into the scalar field so the
    /// stored form is canonical.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        let scalar = ScalarField::from_le_bytes_mod_order(&bytes);
        Self {
            scalar: scalar_to_bytes(scalar),
        }
    }

    /// Canonical scalar bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.scalar
    }

    /// View of the key as a BN254 field element, for use inside hash
    /// statements (nullifier PRF).
    pub fn as_field(&self) -> Fr {
        bytes_to_field(&self.scalar)
    }

    fn scalar(&self) -> ScalarField {
        ScalarField::from_le_bytes_mod_order(&self.scalar)
    }

    /// Derive the public key: `pk = sk * G`.
    pub fn public_key(&self) -> PublicKey {
        let point = (EdwardsProjective::generator() * self.scalar()).into_affine();
        PublicKey::from_point(point)
    }

    /// ECDH: `secret = sk * their_pk`.
    ///
    /// Returns `None` if `other` does not decode to a valid curve point.
    pub fn shared_secret(&self, other: &PublicKey) -> Option<SharedSecret> {
        let point = other.to_point()?;
        let shared = (EdwardsProjective::from(point) * self.scalar()).into_affine();
        Some(SharedSecret {
            x: shared.x,
            y: shared.y,
        })
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print key material
        f.write_str("PrivateKey(..)")
    }
}

/// An owner public key: affine Baby Jubjub coordinates, each a BN254
/// field element serialized as 32 little-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    pub x: [u8; 32],
    pub y: [u8; 32],
}

impl PublicKey {
    /// Zero sentinel used for padding slots; not a valid curve point.
    pub const ZERO: Self = Self {
        x: [0u8; 32],
        y: [0u8; 32],
    };

    pub fn from_point(p: EdwardsAffine) -> Self {
        Self {
            x: field_to_bytes(p.x),
            y: field_to_bytes(p.y),
        }
    }

    /// Rebuild the curve point. `None` if the coordinates are not on the
    /// curve or outside the prime-order subgroup.
    pub fn to_point(&self) -> Option<EdwardsAffine> {
        let p = EdwardsAffine::new_unchecked(bytes_to_field(&self.x), bytes_to_field(&self.y));
        if p.is_on_curve() && p.is_in_correct_subgroup_assuming_on_curve() {
            Some(p)
        } else {
            None
        }
    }

    pub fn x_field(&self) -> Fr {
        bytes_to_field(&self.x)
    }

    pub fn y_field(&self) -> Fr {
        bytes_to_field(&self.y)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// An ECDH shared secret: the coordinates of the shared curve point.
///
/// Short-lived; feeds the encryption keystream and is never persisted.
#[derive(Clone)]
pub struct SharedSecret {
    x: Fr,
    y: Fr,
}

impl SharedSecret {
    pub fn coords(&self) -> (Fr, Fr) {
        (self.x, self.y)
    }
}

/// A full owner keypair.
#[derive(Debug, Clone)]
pub struct OwnerKeypair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl OwnerKeypair {
    /// Generate a fresh keypair.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::from_private_key(PrivateKey::random(rng))
    }

    /// Restore a keypair from its private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }
}

fn scalar_to_bytes(s: ScalarField) -> [u8; 32] {
    let bytes = s.into_bigint().to_bytes_le();
    let mut arr = [0u8; 32];
    arr[..bytes.len()].copy_from_slice(&bytes);
    arr
}
