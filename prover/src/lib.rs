//! Zeto Prover
//!
//! The provable side of the confidential UTXO protocol: the transfer
//! statement expressed as explicit predicates, deterministic
//! public-input assembly, and the proof-oracle boundary (Groth16 in
//! production, a statement-checking mock in tests and demos).
//!
//! Proof *generation* over a constraint system lives outside this
//! workspace; everything here is the contract both sides of that
//! boundary must agree on.

pub mod builder;
pub mod constants;
pub mod mock;
pub mod public_inputs;
pub mod statement;
pub mod verifier;

pub use builder::{BuildError, TransferBuilder};
pub use constants::{BATCH_SIZE, ProtocolVariant, SINGLE_SIZE};
pub use mock::{MockProofSystem, MockProverError};
pub use public_inputs::{
    Circuit, assemble_deposit, assemble_transfer, assemble_withdraw, padded_size,
};
pub use statement::{
    DepositStatement, DepositWitness, InputWitness, OutputWitness, TransferPublic,
    TransferStatement, TransferWitness, WithdrawPublic, WithdrawStatement, WithdrawWitness,
    identity_leaf,
};
pub use verifier::{Groth16Verifier, Proof, ProofVerifier, VerifierError};
