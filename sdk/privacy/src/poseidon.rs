//! Poseidon hash over the BN254 scalar field.
//!
//! One shared configuration for every hashing site in the protocol:
//! commitments, nullifiers, Merkle nodes, identity leaves and the
//! encryption keystream all use the same sponge parameters, so values
//! computed off-chain match what the proof statement recomputes.
//!
//! Parameters: rate 2, capacity 1, 8 full rounds, 56 partial rounds,
//! alpha 5 (128-bit security on BN254).

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::{
    CryptographicSponge,
    poseidon::{PoseidonConfig, PoseidonSponge, find_poseidon_ark_and_mds},
};
use ark_ff::{BigInteger, PrimeField};
use std::sync::OnceLock;

static CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();

/// Shared Poseidon configuration (round constants computed once).
pub fn poseidon_config() -> &'static PoseidonConfig<Fr> {
    CONFIG.get_or_init(|| {
        let full_rounds = 8;
        let partial_rounds = 56;
        let alpha = 5u64;
        let rate = 2;
        let capacity = 1;

        let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
            Fr::MODULUS_BIT_SIZE as u64,
            rate,
            full_rounds as u64,
            partial_rounds as u64,
            0,
        );
        PoseidonConfig::new(full_rounds, partial_rounds, alpha, mds, ark, rate, capacity)
    })
}

/// Hash a sequence of field elements into a single element.
pub fn hash(inputs: &[Fr]) -> Fr {
    let mut sponge = PoseidonSponge::new(poseidon_config());
    for input in inputs {
        sponge.absorb(input);
    }
    let result: Fr = sponge.squeeze_field_elements(1)[0];
    result
}

/// Squeeze `len` field elements from a sponge seeded with `inputs`.
///
/// Used as the keystream generator for confidential value transport.
pub fn keystream(inputs: &[Fr], len: usize) -> Vec<Fr> {
    let mut sponge = PoseidonSponge::new(poseidon_config());
    for input in inputs {
        sponge.absorb(input);
    }
    sponge.squeeze_field_elements(len)
}

/// Serialize a field element as 32 little-endian bytes.
pub fn field_to_bytes(f: Fr) -> [u8; 32] {
    let bytes = f.into_bigint().to_bytes_le();
    let mut arr = [0u8; 32];
    arr[..bytes.len()].copy_from_slice(&bytes);
    arr
}

/// Reduce 32 bytes into a field element.
pub fn bytes_to_field(bytes: &[u8; 32]) -> Fr {
    Fr::from_le_bytes_mod_order(bytes)
}

/// Recover a `u64` from a field element, if it fits.
pub fn field_to_u64(f: Fr) -> Option<u64> {
    let limbs = f.into_bigint().0;
    if limbs[1..].iter().all(|l| *l == 0) {
        Some(limbs[0])
    } else {
        None
    }
}
