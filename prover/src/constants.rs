//! Circuit shape constants.

/// Smallest supported circuit size: inputs/outputs per transfer.
/// Proposals with at most this many real entries use the single-path
/// verifier.
pub const SINGLE_SIZE: usize = 2;

/// Maximum batch size. Proposals with more real entries than
/// `SINGLE_SIZE` pad up to this bound; anything above it is rejected
/// before padding.
pub const BATCH_SIZE: usize = 10;

/// Public-input width of the single-path transfer for the
/// nullifier + KYC + encryption variant:
/// ciphertext(7) + nullifiers(2) + root + enabled(2) + identitiesRoot
/// + outputs(2) + nonce.
pub const TRANSFER_SINGLE_WIDTH: usize = 16;

/// Batch-path transfer width for the same variant:
/// ciphertext(22) + nullifiers(10) + root + enabled(10)
/// + identitiesRoot + outputs(10) + nonce.
pub const TRANSFER_BATCH_WIDTH: usize = 55;

/// Withdraw widths (nullifier variant):
/// amount + nullifiers(n) + root + enabled(n) + output.
pub const WITHDRAW_SINGLE_WIDTH: usize = 7;
pub const WITHDRAW_BATCH_WIDTH: usize = 23;

/// Deposit width: amount + output commitment.
pub const DEPOSIT_WIDTH: usize = 2;

/// Variant switches for the transfer family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVariant {
    /// Spends reference nullifiers + a Merkle root instead of the
    /// commitments themselves
    pub nullifiers: bool,
    /// Spender and receiver keys are bound to the identity registry root
    pub kyc: bool,
    /// Output values travel encrypted to the receiver
    pub encryption: bool,
}

impl ProtocolVariant {
    /// Plain variant: spent-flag table, no registry, no ciphertext.
    pub const ANON: Self = Self {
        nullifiers: false,
        kyc: false,
        encryption: false,
    };

    /// Nullifier-based double-spend protection.
    pub const ANON_NULLIFIER: Self = Self {
        nullifiers: true,
        kyc: false,
        encryption: false,
    };

    /// The full variant: nullifiers, KYC gate and encrypted values.
    pub const ANON_ENC_NULLIFIER_KYC: Self = Self {
        nullifiers: true,
        kyc: true,
        encryption: true,
    };
}
