//! Ledger error taxonomy.
//!
//! Every rejection is explicit and leaves state untouched. Structural
//! errors fire before any cryptographic work; `ProofInvalid` is the
//! catch-all for a violated statement, since the proof system does not
//! say which predicate failed.

use thiserror::Error;

use zeto_prover::VerifierError;

#[derive(Debug, Error)]
pub enum LedgerError {
    // --- structural rejections ---
    #[error("empty proposal")]
    EmptyProposal,

    #[error("batch size exceeded: {got} > {max}")]
    BatchSizeExceeded { got: usize, max: usize },

    #[error("duplicate entry in proposal: {}", hex::encode(.0))]
    DuplicateEntry([u8; 32]),

    #[error("zero entry in a real slot")]
    ZeroEntry,

    #[error("missing Merkle root for a nullifier transfer")]
    MissingRoot,

    #[error("missing encrypted payload for this variant")]
    MissingEncryption,

    #[error("ciphertext length mismatch: expected {expected}, got {got}")]
    CiphertextLength { expected: usize, got: usize },

    #[error("field not used by this variant: {0}")]
    UnexpectedField(&'static str),

    #[error("operation not supported by this variant: {0}")]
    Unsupported(&'static str),

    #[error("identity registry not configured")]
    RegistryMissing,

    // --- state rejections ---
    #[error("unrecognized Merkle root: {}", hex::encode(.0))]
    UnrecognizedRoot([u8; 32]),

    #[error("already spent: {}", hex::encode(.0))]
    AlreadySpent([u8; 32]),

    #[error("commitment already known: {}", hex::encode(.0))]
    AlreadyKnown([u8; 32]),

    #[error("unknown UTXO: {}", hex::encode(.0))]
    UnknownUtxo([u8; 32]),

    #[error("UTXO locked to a delegate: {}", hex::encode(.0))]
    Locked([u8; 32]),

    #[error("caller is not the lock delegate")]
    NotLockDelegate,

    #[error("caller not authorized")]
    NotAuthorized,

    // --- oracle rejections ---
    #[error("proof rejected by verifier")]
    ProofInvalid,

    #[error(transparent)]
    Verifier(#[from] VerifierError),
}
