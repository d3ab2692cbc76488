//! Public-Input Assembly
//!
//! Rebuilds the exact ordered vector a proof attests to. Ordering is
//! part of the wire contract between ledger and verifier:
//!
//! ```text
//! transfer: [ciphertext..., inputs..., root?, enabled...,
//!            identitiesRoot?, outputs..., nonce?]
//! withdraw: [amount, inputs..., root?, enabled..., output]
//! deposit:  [amount, output]
//! ```
//!
//! Any reordering or omission makes a legitimate proof fail. The
//! `enabled` flags (present in nullifier variants) carry 1 for real
//! slots and 0 for padding, so the statement can skip ownership and
//! membership checks on unused slots.

use ark_bn254::Fr;

use zeto_privacy::poseidon::bytes_to_field;

use crate::constants::{BATCH_SIZE, ProtocolVariant, SINGLE_SIZE};
use crate::statement::{TransferPublic, WithdrawPublic};

/// Which verifying key a proposal dispatches to. Single vs batch is a
/// pure function of the padded slot count; the two circuits encode
/// different vector widths and are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Circuit {
    Deposit,
    Transfer,
    TransferBatch,
    Withdraw,
    WithdrawBatch,
}

impl Circuit {
    /// Transfer circuit for a padded proposal size.
    pub fn transfer_for(size: usize) -> Self {
        if size > SINGLE_SIZE {
            Circuit::TransferBatch
        } else {
            Circuit::Transfer
        }
    }

    /// Withdraw circuit for a padded proposal size.
    pub fn withdraw_for(size: usize) -> Self {
        if size > SINGLE_SIZE {
            Circuit::WithdrawBatch
        } else {
            Circuit::Withdraw
        }
    }

    /// Expected public-input width under `variant`.
    pub fn width(&self, variant: &ProtocolVariant) -> usize {
        match self {
            Circuit::Deposit => 2,
            Circuit::Transfer => transfer_width(variant, SINGLE_SIZE),
            Circuit::TransferBatch => transfer_width(variant, BATCH_SIZE),
            Circuit::Withdraw => withdraw_width(variant, SINGLE_SIZE),
            Circuit::WithdrawBatch => withdraw_width(variant, BATCH_SIZE),
        }
    }
}

/// Transfer vector width for a circuit size under `variant`.
pub fn transfer_width(variant: &ProtocolVariant, size: usize) -> usize {
    let mut width = 2 * size; // inputs + outputs
    if variant.nullifiers {
        width += 1 + size; // root + enabled flags
    }
    if variant.kyc {
        width += 1; // identities root
    }
    if variant.encryption {
        width += zeto_privacy::ciphertext_len(size) + 1; // ciphertext + nonce
    }
    width
}

/// Withdraw vector width for a circuit size under `variant`.
pub fn withdraw_width(variant: &ProtocolVariant, size: usize) -> usize {
    let mut width = 2 + size; // amount + inputs + output
    if variant.nullifiers {
        width += 1 + size; // root + enabled flags
    }
    width
}

/// Pad a real slot count up to a supported circuit size.
///
/// `None` for an empty proposal or one past the batch bound; callers
/// reject those before any padding or cryptographic work.
pub fn padded_size(real: usize) -> Option<usize> {
    match real {
        0 => None,
        n if n <= SINGLE_SIZE => Some(SINGLE_SIZE),
        n if n <= BATCH_SIZE => Some(BATCH_SIZE),
        _ => None,
    }
}

fn enabled_flag(slot: &[u8; 32]) -> Fr {
    if *slot == [0u8; 32] {
        Fr::from(0u64)
    } else {
        Fr::from(1u64)
    }
}

/// Assemble the transfer vector. Field presence on `public` drives the
/// layout, so the vector always matches the variant that built it.
pub fn assemble_transfer(public: &TransferPublic) -> Vec<Fr> {
    let mut vector = Vec::new();
    if let Some(encrypted) = &public.encrypted {
        vector.extend(encrypted.ciphertext_fields());
    }
    vector.extend(public.inputs.iter().map(bytes_to_field));
    if let Some(root) = &public.root {
        vector.push(bytes_to_field(root));
        vector.extend(public.inputs.iter().map(enabled_flag));
    }
    if let Some(identities_root) = &public.identities_root {
        vector.push(bytes_to_field(identities_root));
    }
    vector.extend(public.outputs.iter().map(bytes_to_field));
    if let Some(encrypted) = &public.encrypted {
        vector.push(encrypted.nonce_field());
    }
    vector
}

/// Assemble the withdraw vector.
pub fn assemble_withdraw(public: &WithdrawPublic) -> Vec<Fr> {
    let mut vector = vec![Fr::from(public.amount)];
    vector.extend(public.inputs.iter().map(bytes_to_field));
    if let Some(root) = &public.root {
        vector.push(bytes_to_field(root));
        vector.extend(public.inputs.iter().map(enabled_flag));
    }
    vector.push(public.output.to_field());
    vector
}

/// Assemble the deposit vector.
pub fn assemble_deposit(amount: u64, output: &zeto_privacy::Commitment) -> Vec<Fr> {
    vec![Fr::from(amount), output.to_field()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        TRANSFER_BATCH_WIDTH, TRANSFER_SINGLE_WIDTH, WITHDRAW_BATCH_WIDTH, WITHDRAW_SINGLE_WIDTH,
    };
    use zeto_privacy::{Commitment, EncryptedTransfer, PublicKey, ciphertext_len};

    fn full_variant_public(size: usize) -> TransferPublic {
        let ciphertext = vec![[1u8; 32]; ciphertext_len(size)];
        TransferPublic {
            inputs: vec![[2u8; 32]; size],
            outputs: vec![[3u8; 32]; size],
            root: Some([4u8; 32]),
            identities_root: Some([5u8; 32]),
            encrypted: Some(EncryptedTransfer {
                ephemeral_pk: PublicKey::ZERO,
                nonce: [6u8; 32],
                ciphertext,
            }),
        }
    }

    #[test]
    fn test_padded_size_dispatch() {
        assert_eq!(padded_size(0), None);
        assert_eq!(padded_size(1), Some(2));
        assert_eq!(padded_size(2), Some(2));
        assert_eq!(padded_size(3), Some(10));
        assert_eq!(padded_size(10), Some(10));
        assert_eq!(padded_size(11), None, "rejected before padding");
    }

    #[test]
    fn test_circuit_dispatch_on_padded_size() {
        assert_eq!(Circuit::transfer_for(2), Circuit::Transfer);
        assert_eq!(Circuit::transfer_for(10), Circuit::TransferBatch);
        assert_eq!(Circuit::withdraw_for(2), Circuit::Withdraw);
        assert_eq!(Circuit::withdraw_for(10), Circuit::WithdrawBatch);
    }

    #[test]
    fn test_full_variant_single_width_is_16() {
        let variant = ProtocolVariant::ANON_ENC_NULLIFIER_KYC;
        assert_eq!(transfer_width(&variant, 2), TRANSFER_SINGLE_WIDTH);

        let vector = assemble_transfer(&full_variant_public(2));
        assert_eq!(vector.len(), TRANSFER_SINGLE_WIDTH);
        assert_eq!(vector.len(), Circuit::Transfer.width(&variant));
    }

    #[test]
    fn test_full_variant_batch_width_is_55() {
        let variant = ProtocolVariant::ANON_ENC_NULLIFIER_KYC;
        assert_eq!(transfer_width(&variant, 10), TRANSFER_BATCH_WIDTH);

        let vector = assemble_transfer(&full_variant_public(10));
        assert_eq!(vector.len(), TRANSFER_BATCH_WIDTH);
        assert_eq!(vector.len(), Circuit::TransferBatch.width(&variant));
    }

    #[test]
    fn test_plain_variant_width() {
        let variant = ProtocolVariant::ANON;
        assert_eq!(transfer_width(&variant, 2), 4);

        let public = TransferPublic {
            inputs: vec![[2u8; 32]; 2],
            outputs: vec![[3u8; 32]; 2],
            root: None,
            identities_root: None,
            encrypted: None,
        };
        assert_eq!(assemble_transfer(&public).len(), 4);
    }

    #[test]
    fn test_withdraw_widths() {
        let variant = ProtocolVariant::ANON_NULLIFIER;
        assert_eq!(withdraw_width(&variant, 2), WITHDRAW_SINGLE_WIDTH);
        assert_eq!(withdraw_width(&variant, 10), WITHDRAW_BATCH_WIDTH);

        let public = WithdrawPublic {
            amount: 50,
            inputs: vec![[2u8; 32], [0u8; 32]],
            root: Some([4u8; 32]),
            output: Commitment::ZERO,
        };
        assert_eq!(assemble_withdraw(&public).len(), WITHDRAW_SINGLE_WIDTH);
    }

    #[test]
    fn test_enabled_flags_track_padding() {
        let public = WithdrawPublic {
            amount: 50,
            inputs: vec![[2u8; 32], [0u8; 32]],
            root: Some([4u8; 32]),
            output: Commitment::ZERO,
        };
        let vector = assemble_withdraw(&public);
        // [amount, in0, in1, root, enabled0, enabled1, output]
        assert_eq!(vector[4], Fr::from(1u64));
        assert_eq!(vector[5], Fr::from(0u64));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let public = full_variant_public(2);
        assert_eq!(assemble_transfer(&public), assemble_transfer(&public));
    }
}
