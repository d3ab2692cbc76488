//! Confidential Value Transport
//!
//! Encrypts transfer outputs for the receiver using ECDH on Baby Jubjub
//! and a Poseidon keystream, so the ciphertext is a sequence of field
//! elements that slots directly into the proof's public-input vector.
//!
//! ```text
//! Flow (one ephemeral keypair, one nonce per transaction):
//! 1. secret    = ECDH(ephemeral_sk, receiver_pk)
//! 2. keystream = Poseidon(DOMAIN, secret.x, secret.y, nonce)
//! 3. c[i]      = m[i] + keystream[i]                (field addition)
//! 4. c[last]   = Poseidon(secret.x, secret.y, nonce, m...)   (auth tag)
//! ```
//!
//! The message is the padded sequence of output `(value, salt)` pairs,
//! so a ciphertext covers `3 * ceil(2n/3) + 1` elements. The nonce must
//! be unique per transaction; reusing one under the same secret leaks
//! the difference of the plaintexts.

use ark_bn254::Fr;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::commitment::{Commitment, Salt, commit};
use crate::keys::{PrivateKey, PublicKey, SharedSecret};
use crate::poseidon::{self, bytes_to_field, field_to_bytes, field_to_u64};
use crate::utxo::{Utxo, UtxoValue};

/// Domain separator for the keystream ("ZENC" in hex).
const DOMAIN_KEYSTREAM: u64 = 0x5a45_4e43;

/// The encrypted payload published alongside a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedTransfer {
    /// Ephemeral public key for ECDH (shared by every output)
    pub ephemeral_pk: PublicKey,
    /// Transaction-unique nonce, canonical field bytes
    pub nonce: [u8; 32],
    /// Ciphertext elements, auth element last
    pub ciphertext: Vec<[u8; 32]>,
}

impl EncryptedTransfer {
    pub fn nonce_field(&self) -> Fr {
        bytes_to_field(&self.nonce)
    }

    /// Ciphertext as field elements, in public-input order.
    pub fn ciphertext_fields(&self) -> Vec<Fr> {
        self.ciphertext.iter().map(bytes_to_field).collect()
    }
}

/// Ciphertext length for `n` (value, salt) pairs: `3 * ceil(2n/3) + 1`.
pub fn ciphertext_len(pairs: usize) -> usize {
    (2 * pairs).div_ceil(3) * 3 + 1
}

/// Encrypt `(value, salt)` pairs under a shared secret.
///
/// Deterministic in (secret, nonce, pairs); the proof statement recomputes
/// this exact function to bind the published ciphertext.
pub fn seal(secret: &SharedSecret, nonce: &[u8; 32], pairs: &[(UtxoValue, Salt)]) -> Vec<[u8; 32]> {
    let message = pad_message(pairs);
    let (sx, sy) = secret.coords();
    let nonce_f = bytes_to_field(nonce);

    let ks = poseidon::keystream(
        &[Fr::from(DOMAIN_KEYSTREAM), sx, sy, nonce_f],
        message.len(),
    );

    let mut out: Vec<[u8; 32]> = message
        .iter()
        .zip(ks.iter())
        .map(|(m, k)| field_to_bytes(*m + *k))
        .collect();
    out.push(field_to_bytes(auth_tag(sx, sy, nonce_f, &message)));
    out
}

/// Decrypt a ciphertext produced by [`seal`], recovering `pairs` entries.
///
/// Returns `None` if the ciphertext shape is wrong for `pairs` or the
/// authentication element does not match.
pub fn open(
    secret: &SharedSecret,
    nonce: &[u8; 32],
    ciphertext: &[[u8; 32]],
    pairs: usize,
) -> Option<Vec<(UtxoValue, Salt)>> {
    if pairs == 0 || ciphertext.len() != ciphertext_len(pairs) {
        return None;
    }
    let body = &ciphertext[..ciphertext.len() - 1];
    let (sx, sy) = secret.coords();
    let nonce_f = bytes_to_field(nonce);

    let ks = poseidon::keystream(&[Fr::from(DOMAIN_KEYSTREAM), sx, sy, nonce_f], body.len());
    let message: Vec<Fr> = body
        .iter()
        .zip(ks.iter())
        .map(|(c, k)| bytes_to_field(c) - *k)
        .collect();

    let expected_tag = field_to_bytes(auth_tag(sx, sy, nonce_f, &message));
    if ciphertext[ciphertext.len() - 1] != expected_tag {
        return None;
    }

    let mut out = Vec::with_capacity(pairs);
    for i in 0..pairs {
        let value = field_to_u64(message[2 * i])?;
        out.push((UtxoValue::new(value), Salt::from_field(message[2 * i + 1])));
    }
    Some(out)
}

/// Encrypt transfer outputs for a receiver with a fresh ephemeral key
/// and nonce.
///
/// Returns `None` if `receiver` is not a valid curve point.
pub fn encrypt_pairs<R: Rng>(
    pairs: &[(UtxoValue, Salt)],
    receiver: &PublicKey,
    rng: &mut R,
) -> Option<EncryptedTransfer> {
    let ephemeral = PrivateKey::random(rng);
    let nonce = Salt::random(rng).0;
    encrypt_pairs_with(&ephemeral, nonce, pairs, receiver)
}

/// Encrypt with a caller-supplied ephemeral key and nonce.
///
/// Used by the transfer builder, which must hand the same ephemeral key
/// to the proof witness.
pub fn encrypt_pairs_with(
    ephemeral: &PrivateKey,
    nonce: [u8; 32],
    pairs: &[(UtxoValue, Salt)],
    receiver: &PublicKey,
) -> Option<EncryptedTransfer> {
    let secret = ephemeral.shared_secret(receiver)?;
    Some(EncryptedTransfer {
        ephemeral_pk: ephemeral.public_key(),
        nonce,
        ciphertext: seal(&secret, &nonce, pairs),
    })
}

/// Decrypt a published transfer payload with the receiver's key.
pub fn decrypt_pairs(
    encrypted: &EncryptedTransfer,
    receiver_key: &PrivateKey,
    pairs: usize,
) -> Option<Vec<(UtxoValue, Salt)>> {
    let secret = receiver_key.shared_secret(&encrypted.ephemeral_pk)?;
    open(&secret, &encrypted.nonce, &encrypted.ciphertext, pairs)
}

/// Decrypt and reconstruct the receiver's UTXOs, keeping only entries
/// whose recomputed commitment appears in `expected` (scan mode).
pub fn try_decrypt_utxos(
    encrypted: &EncryptedTransfer,
    receiver_key: &PrivateKey,
    expected: &[Commitment],
) -> Option<Vec<Utxo>> {
    let owner = receiver_key.public_key();
    let pairs = decrypt_pairs(encrypted, receiver_key, expected.len())?;

    let utxos: Vec<Utxo> = pairs
        .into_iter()
        .zip(expected.iter())
        .filter(|((value, salt), expected)| commit(value.0, salt, &owner) == **expected)
        .map(|((value, salt), _)| Utxo {
            value,
            salt,
            owner,
        })
        .collect();
    if utxos.is_empty() { None } else { Some(utxos) }
}

fn pad_message(pairs: &[(UtxoValue, Salt)]) -> Vec<Fr> {
    let mut message: Vec<Fr> = Vec::with_capacity((2 * pairs.len()).div_ceil(3) * 3);
    for (value, salt) in pairs {
        message.push(Fr::from(value.0));
        message.push(salt.to_field());
    }
    while message.len() % 3 != 0 {
        message.push(Fr::from(0u64));
    }
    message
}

fn auth_tag(sx: Fr, sy: Fr, nonce: Fr, message: &[Fr]) -> Fr {
    let mut inputs = vec![sx, sy, nonce];
    inputs.extend_from_slice(message);
    poseidon::hash(&inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::OwnerKeypair;
    use ark_std::rand::rngs::OsRng;

    fn sample_pairs(rng: &mut OsRng) -> Vec<(UtxoValue, Salt)> {
        vec![
            (UtxoValue::new(1000), Salt::random(rng)),
            (UtxoValue::new(250), Salt::random(rng)),
        ]
    }

    #[test]
    fn test_ciphertext_len() {
        assert_eq!(ciphertext_len(1), 4);
        assert_eq!(ciphertext_len(2), 7);
        assert_eq!(ciphertext_len(10), 22);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let mut rng = OsRng;
        let receiver = OwnerKeypair::random(&mut rng);
        let pairs = sample_pairs(&mut rng);

        let encrypted = encrypt_pairs(&pairs, &receiver.public_key, &mut rng).unwrap();
        assert_eq!(encrypted.ciphertext.len(), ciphertext_len(2));

        let decrypted = decrypt_pairs(&encrypted, &receiver.private_key, 2)
            .expect("decryption should succeed");
        assert_eq!(decrypted, pairs);
    }

    #[test]
    fn test_wrong_key_fails() {
        let mut rng = OsRng;
        let receiver = OwnerKeypair::random(&mut rng);
        let eavesdropper = OwnerKeypair::random(&mut rng);
        let pairs = sample_pairs(&mut rng);

        let encrypted = encrypt_pairs(&pairs, &receiver.public_key, &mut rng).unwrap();
        assert!(
            decrypt_pairs(&encrypted, &eavesdropper.private_key, 2).is_none(),
            "wrong key should fail decryption"
        );
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut rng = OsRng;
        let receiver = OwnerKeypair::random(&mut rng);
        let pairs = sample_pairs(&mut rng);

        let mut encrypted = encrypt_pairs(&pairs, &receiver.public_key, &mut rng).unwrap();
        encrypted.ciphertext[0][0] ^= 1;
        assert!(decrypt_pairs(&encrypted, &receiver.private_key, 2).is_none());
    }

    #[test]
    fn test_nonce_separates_keystreams() {
        let mut rng = OsRng;
        let receiver = OwnerKeypair::random(&mut rng);
        let ephemeral = PrivateKey::random(&mut rng);
        let pairs = sample_pairs(&mut rng);

        let e1 = encrypt_pairs_with(&ephemeral, [1u8; 32], &pairs, &receiver.public_key).unwrap();
        let e2 = encrypt_pairs_with(&ephemeral, [2u8; 32], &pairs, &receiver.public_key).unwrap();
        assert_ne!(e1.ciphertext, e2.ciphertext);
    }

    #[test]
    fn test_scan_mode_commitment_check() {
        let mut rng = OsRng;
        let receiver = OwnerKeypair::random(&mut rng);

        let utxo = Utxo::new(1000, receiver.public_key, &mut rng);
        let pairs = vec![(utxo.value, utxo.salt)];
        let encrypted = encrypt_pairs(&pairs, &receiver.public_key, &mut rng).unwrap();

        // Matching commitment recovers the UTXO
        let found =
            try_decrypt_utxos(&encrypted, &receiver.private_key, &[utxo.commitment()]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, utxo.value);

        // A foreign commitment is filtered out
        assert!(
            try_decrypt_utxos(&encrypted, &receiver.private_key, &[Commitment([9u8; 32])])
                .is_none()
        );
    }
}
