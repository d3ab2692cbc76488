//! Zeto Privacy SDK
//!
//! Commitment-nullifier UTXO primitives for confidential token
//! transfers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Confidential Transfer                          │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────────┐ │
//! │  │  Nullifiers  │  │ Commitments  │  │   Encrypted Values    │ │
//! │  │  (spent)     │  │ (new UTXOs)  │  │   (for receiver)      │ │
//! │  └──────────────┘  └──────────────┘  └───────────────────────┘ │
//! │         │                 │                     │               │
//! │         ▼                 ▼                     ▼               │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              ZK Proof (Groth16)                          │   │
//! │  │  • Valid nullifier derivation                            │   │
//! │  │  • Valid commitment structure + Merkle membership        │   │
//! │  │  • Conservation: Σ inputs = Σ outputs                    │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;
pub mod encryption;
pub mod keys;
pub mod nullifier;
pub mod poseidon;
pub mod smt;
pub mod utxo;

pub use commitment::{Commitment, Salt, commit};
pub use encryption::{
    EncryptedTransfer, ciphertext_len, decrypt_pairs, encrypt_pairs, encrypt_pairs_with,
    try_decrypt_utxos,
};
pub use keys::{OwnerKeypair, PrivateKey, PublicKey, SharedSecret};
pub use nullifier::{Nullifier, nullify};
pub use smt::{InclusionPath, RootWindow, SparseMerkleTree, TREE_DEPTH};
pub use utxo::{Utxo, UtxoValue, VALUE_BITS};
