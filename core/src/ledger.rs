//! Ledger State Machine
//!
//! The on-chain authority for the confidential UTXO protocol. Every
//! operation runs the same shape:
//!
//! ```text
//! validate structure -> check roots/spent state -> assemble the exact
//! public-input vector -> dispatch single/batch -> ask the proof oracle
//! -> commit the whole transition or none of it
//! ```
//!
//! The host serializes calls, so a transition sees no concurrent
//! mutation; every check runs before the first write, which is what
//! makes the commit step all-or-nothing.

use log::info;
use serde::{Deserialize, Serialize};

use zeto_privacy::{Commitment, EncryptedTransfer, Nullifier, PublicKey, ciphertext_len};
use zeto_prover::{
    BATCH_SIZE, Circuit, Proof, ProofVerifier, ProtocolVariant, TransferPublic, WithdrawPublic,
    assemble_deposit, assemble_transfer, assemble_withdraw, padded_size,
};

use crate::capabilities::{LockCapable, Mintable, Registrable, WithdrawCapable};
use crate::error::LedgerError;
use crate::registry::{IdentityGate, SmtIdentityRegistry};
use crate::state::UtxoStore;

/// Host-level account identity (transaction sender).
pub type AccountId = [u8; 32];

/// A proposed confidential transfer, as submitted by a client.
///
/// `inputs` carries real (unpadded) entries: commitments in spent-flag
/// variants, nullifiers in nullifier variants. The ledger pads both
/// sides to the circuit size itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub inputs: Vec<[u8; 32]>,
    pub outputs: Vec<[u8; 32]>,
    /// Referenced tree root (nullifier variants)
    pub root: Option<[u8; 32]>,
    /// Encrypted output values (encryption variants)
    pub encrypted: Option<EncryptedTransfer>,
    pub proof: Proof,
}

/// Mint one hidden UTXO whose value is public.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    pub amount: u64,
    pub output: Commitment,
    pub proof: Proof,
}

/// Spend hidden UTXOs into a public amount plus optional change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub amount: u64,
    pub inputs: Vec<[u8; 32]>,
    /// Change commitment; [`Commitment::ZERO`] when withdrawn exactly
    pub output: Commitment,
    pub root: Option<[u8; 32]>,
    pub proof: Proof,
}

/// What a committed transfer changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub spent: Vec<[u8; 32]>,
    pub created: Vec<Commitment>,
    pub new_root: Option<[u8; 32]>,
    /// Passed through for the receiver to pick up
    pub encrypted: Option<EncryptedTransfer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintReceipt {
    pub created: Vec<Commitment>,
    /// Tree positions (nullifier variants)
    pub positions: Option<Vec<u64>>,
    pub new_root: Option<[u8; 32]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub amount: u64,
    pub created: Commitment,
    pub position: Option<u64>,
    pub new_root: Option<[u8; 32]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    pub amount: u64,
    pub spent: Vec<[u8; 32]>,
    pub change: Option<Commitment>,
    pub new_root: Option<[u8; 32]>,
}

/// The confidential UTXO ledger.
///
/// The proof oracle and the identity registry are injected
/// collaborators; tests substitute fakes through the same seams.
pub struct Ledger<V: ProofVerifier> {
    variant: ProtocolVariant,
    authority: AccountId,
    verifier: V,
    registry: Option<SmtIdentityRegistry>,
    store: UtxoStore,
}

impl<V: ProofVerifier> Ledger<V> {
    pub fn new(
        variant: ProtocolVariant,
        authority: AccountId,
        verifier: V,
        root_window: usize,
    ) -> Self {
        Self {
            variant,
            authority,
            verifier,
            registry: None,
            store: UtxoStore::new(root_window),
        }
    }

    /// Attach the identity registry (required by KYC variants).
    pub fn with_registry(mut self, registry: SmtIdentityRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn variant(&self) -> ProtocolVariant {
        self.variant
    }

    pub fn store(&self) -> &UtxoStore {
        &self.store
    }

    pub fn registry(&self) -> Option<&SmtIdentityRegistry> {
        self.registry.as_ref()
    }

    pub fn current_root(&self) -> [u8; 32] {
        self.store.current_root()
    }

    /// Execute a confidential transfer.
    pub fn transfer(
        &mut self,
        caller: AccountId,
        request: &TransferRequest,
    ) -> Result<TransferReceipt, LedgerError> {
        // structural validation, before any cryptographic work
        if request.inputs.is_empty() || request.outputs.is_empty() {
            return Err(LedgerError::EmptyProposal);
        }
        check_entries(&request.inputs)?;
        check_entries(&request.outputs)?;

        let real = request.inputs.len().max(request.outputs.len());
        let size = padded_size(real).ok_or(LedgerError::BatchSizeExceeded {
            got: real,
            max: BATCH_SIZE,
        })?;

        let root = self.expected_root(request.root)?;
        let encrypted = self.expected_encryption(request.encrypted.as_ref(), size)?;
        let identities_root = self.expected_identities_root()?;

        // defensive spent-state checks; a valid proof against consistent
        // state cannot trip these, but they must hold before commit
        if self.variant.nullifiers {
            for input in &request.inputs {
                if self.store.nullifier_spent(&Nullifier(*input)) {
                    return Err(LedgerError::AlreadySpent(*input));
                }
            }
        } else {
            for input in &request.inputs {
                self.store.ensure_spendable(&Commitment(*input), &caller)?;
            }
        }
        for output in &request.outputs {
            if self.store.status(&Commitment(*output)).is_some() {
                return Err(LedgerError::AlreadyKnown(*output));
            }
        }

        // the exact vector the proof must attest to
        let public = TransferPublic {
            inputs: pad(&request.inputs, size),
            outputs: pad(&request.outputs, size),
            root,
            identities_root,
            encrypted: encrypted.cloned(),
        };
        let vector = assemble_transfer(&public);
        let circuit = Circuit::transfer_for(size);

        if !self.verifier.verify(circuit, &request.proof, &vector)? {
            return Err(LedgerError::ProofInvalid);
        }

        // commit
        if self.variant.nullifiers {
            for input in &request.inputs {
                self.store.spend_nullifier(Nullifier(*input))?;
            }
        } else {
            for input in &request.inputs {
                self.store.mark_spent(&Commitment(*input), &caller)?;
            }
        }
        let created: Vec<Commitment> = request.outputs.iter().map(|o| Commitment(*o)).collect();
        for output in &created {
            self.store.insert_unspent(*output)?;
            if self.variant.nullifiers {
                self.store.append_to_tree(output);
            }
        }

        info!(
            "transfer committed: {} spent, {} created",
            request.inputs.len(),
            created.len()
        );
        Ok(TransferReceipt {
            spent: request.inputs.clone(),
            created,
            new_root: self.variant.nullifiers.then(|| self.store.current_root()),
            encrypted: request.encrypted.clone(),
        })
    }

    fn expected_root(&self, root: Option<[u8; 32]>) -> Result<Option<[u8; 32]>, LedgerError> {
        match (self.variant.nullifiers, root) {
            (true, None) => Err(LedgerError::MissingRoot),
            (true, Some(root)) => {
                if !self.store.recognizes_root(&root) {
                    return Err(LedgerError::UnrecognizedRoot(root));
                }
                Ok(Some(root))
            }
            (false, Some(_)) => Err(LedgerError::UnexpectedField("root")),
            (false, None) => Ok(None),
        }
    }

    fn expected_encryption<'a>(
        &self,
        encrypted: Option<&'a EncryptedTransfer>,
        size: usize,
    ) -> Result<Option<&'a EncryptedTransfer>, LedgerError> {
        match (self.variant.encryption, encrypted) {
            (true, None) => Err(LedgerError::MissingEncryption),
            (true, Some(encrypted)) => {
                let expected = ciphertext_len(size);
                if encrypted.ciphertext.len() != expected {
                    return Err(LedgerError::CiphertextLength {
                        expected,
                        got: encrypted.ciphertext.len(),
                    });
                }
                Ok(Some(encrypted))
            }
            (false, Some(_)) => Err(LedgerError::UnexpectedField("encrypted")),
            (false, None) => Ok(None),
        }
    }

    fn expected_identities_root(&self) -> Result<Option<[u8; 32]>, LedgerError> {
        if !self.variant.kyc {
            return Ok(None);
        }
        let registry = self.registry.as_ref().ok_or(LedgerError::RegistryMissing)?;
        Ok(Some(registry.identities_root()))
    }
}

impl<V: ProofVerifier> Mintable for Ledger<V> {
    /// Mint pre-formed commitments. Authority-gated; the commitments
    /// hide value and owner, so minting attests issuance, not amounts.
    fn mint(
        &mut self,
        caller: AccountId,
        commitments: &[Commitment],
    ) -> Result<MintReceipt, LedgerError> {
        if caller != self.authority {
            return Err(LedgerError::NotAuthorized);
        }
        if commitments.is_empty() {
            return Err(LedgerError::EmptyProposal);
        }
        let raw: Vec<[u8; 32]> = commitments.iter().map(|c| c.0).collect();
        check_entries(&raw)?;
        for commitment in commitments {
            if self.store.status(commitment).is_some() {
                return Err(LedgerError::AlreadyKnown(commitment.0));
            }
        }

        let mut positions = Vec::with_capacity(commitments.len());
        for commitment in commitments {
            self.store.insert_unspent(*commitment)?;
            if self.variant.nullifiers {
                positions.push(self.store.append_to_tree(commitment));
            }
        }

        info!("minted {} commitments", commitments.len());
        Ok(MintReceipt {
            created: commitments.to_vec(),
            positions: self.variant.nullifiers.then_some(positions),
            new_root: self.variant.nullifiers.then(|| self.store.current_root()),
        })
    }
}

impl<V: ProofVerifier> WithdrawCapable for Ledger<V> {
    /// Deposit: mint one hidden UTXO whose value is attested in the
    /// clear. Deliberately not KYC-gated: a deposit is a single-party
    /// boundary operation against the reserve, and every multi-party
    /// movement afterwards is a transfer, which carries the gate.
    fn deposit(
        &mut self,
        _caller: AccountId,
        request: &DepositRequest,
    ) -> Result<DepositReceipt, LedgerError> {
        if request.output.is_zero() {
            return Err(LedgerError::ZeroEntry);
        }
        if self.store.status(&request.output).is_some() {
            return Err(LedgerError::AlreadyKnown(request.output.0));
        }

        let vector = assemble_deposit(request.amount, &request.output);
        if !self
            .verifier
            .verify(Circuit::Deposit, &request.proof, &vector)?
        {
            return Err(LedgerError::ProofInvalid);
        }

        self.store.insert_unspent(request.output)?;
        let position = self
            .variant
            .nullifiers
            .then(|| self.store.append_to_tree(&request.output));

        info!("deposit committed: amount {}", request.amount);
        Ok(DepositReceipt {
            amount: request.amount,
            created: request.output,
            position,
            new_root: self.variant.nullifiers.then(|| self.store.current_root()),
        })
    }

    /// Withdraw: spend hidden UTXOs into a public amount, minting the
    /// change commitment if there is one. Not KYC-gated for the same
    /// reason as deposit.
    fn withdraw(
        &mut self,
        caller: AccountId,
        request: &WithdrawRequest,
    ) -> Result<WithdrawReceipt, LedgerError> {
        if request.inputs.is_empty() {
            return Err(LedgerError::EmptyProposal);
        }
        check_entries(&request.inputs)?;

        let size = padded_size(request.inputs.len()).ok_or(LedgerError::BatchSizeExceeded {
            got: request.inputs.len(),
            max: BATCH_SIZE,
        })?;
        let root = self.expected_root(request.root)?;

        if self.variant.nullifiers {
            for input in &request.inputs {
                if self.store.nullifier_spent(&Nullifier(*input)) {
                    return Err(LedgerError::AlreadySpent(*input));
                }
            }
        } else {
            for input in &request.inputs {
                self.store.ensure_spendable(&Commitment(*input), &caller)?;
            }
        }
        let change = (!request.output.is_zero()).then_some(request.output);
        if let Some(change) = &change {
            if self.store.status(change).is_some() {
                return Err(LedgerError::AlreadyKnown(change.0));
            }
        }

        let public = WithdrawPublic {
            amount: request.amount,
            inputs: pad(&request.inputs, size),
            root,
            output: request.output,
        };
        let vector = assemble_withdraw(&public);
        let circuit = Circuit::withdraw_for(size);

        if !self.verifier.verify(circuit, &request.proof, &vector)? {
            return Err(LedgerError::ProofInvalid);
        }

        if self.variant.nullifiers {
            for input in &request.inputs {
                self.store.spend_nullifier(Nullifier(*input))?;
            }
        } else {
            for input in &request.inputs {
                self.store.mark_spent(&Commitment(*input), &caller)?;
            }
        }
        if let Some(change) = &change {
            self.store.insert_unspent(*change)?;
            if self.variant.nullifiers {
                self.store.append_to_tree(change);
            }
        }

        info!("withdraw committed: amount {}", request.amount);
        Ok(WithdrawReceipt {
            amount: request.amount,
            spent: request.inputs.clone(),
            change,
            new_root: self.variant.nullifiers.then(|| self.store.current_root()),
        })
    }
}

impl<V: ProofVerifier> Registrable for Ledger<V> {
    fn register(&mut self, caller: AccountId, key: &PublicKey) -> Result<(), LedgerError> {
        let registry = self.registry.as_mut().ok_or(LedgerError::RegistryMissing)?;
        registry.register(&caller, key)?;
        Ok(())
    }
}

impl<V: ProofVerifier> LockCapable for Ledger<V> {
    /// Lock unspent commitments to a spending delegate (escrow-style).
    /// Authority-gated; only meaningful where spends reference
    /// commitments directly.
    fn lock(
        &mut self,
        caller: AccountId,
        commitments: &[Commitment],
        delegate: AccountId,
    ) -> Result<(), LedgerError> {
        if self.variant.nullifiers {
            return Err(LedgerError::Unsupported(
                "lock requires direct commitment spends",
            ));
        }
        if caller != self.authority {
            return Err(LedgerError::NotAuthorized);
        }
        if commitments.is_empty() {
            return Err(LedgerError::EmptyProposal);
        }
        // check everything, then lock, so a bad entry locks nothing
        for commitment in commitments {
            match self.store.status(commitment) {
                None => return Err(LedgerError::UnknownUtxo(commitment.0)),
                Some(crate::state::UtxoStatus::Spent) => {
                    return Err(LedgerError::AlreadySpent(commitment.0));
                }
                Some(crate::state::UtxoStatus::Locked(_)) => {
                    return Err(LedgerError::Locked(commitment.0));
                }
                Some(crate::state::UtxoStatus::Unspent) => {}
            }
        }
        for commitment in commitments {
            self.store.lock(commitment, delegate)?;
        }
        info!("locked {} commitments to delegate", commitments.len());
        Ok(())
    }
}

fn check_entries(entries: &[[u8; 32]]) -> Result<(), LedgerError> {
    if entries.len() > BATCH_SIZE {
        return Err(LedgerError::BatchSizeExceeded {
            got: entries.len(),
            max: BATCH_SIZE,
        });
    }
    for (i, entry) in entries.iter().enumerate() {
        if *entry == [0u8; 32] {
            return Err(LedgerError::ZeroEntry);
        }
        if entries[..i].contains(entry) {
            return Err(LedgerError::DuplicateEntry(*entry));
        }
    }
    Ok(())
}

fn pad(slots: &[[u8; 32]], size: usize) -> Vec<[u8; 32]> {
    let mut padded = slots.to_vec();
    padded.resize(size, [0u8; 32]);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const AUTHORITY: AccountId = [1u8; 32];
    const ALICE: AccountId = [2u8; 32];
    const BOB: AccountId = [3u8; 32];

    /// Oracle fake that accepts everything.
    struct AcceptAll;
    impl ProofVerifier for AcceptAll {
        fn verify(
            &self,
            _circuit: Circuit,
            _proof: &Proof,
            _public_inputs: &[ark_bn254::Fr],
        ) -> Result<bool, zeto_prover::VerifierError> {
            Ok(true)
        }
    }

    /// Oracle fake that rejects everything.
    struct RejectAll;
    impl ProofVerifier for RejectAll {
        fn verify(
            &self,
            _circuit: Circuit,
            _proof: &Proof,
            _public_inputs: &[ark_bn254::Fr],
        ) -> Result<bool, zeto_prover::VerifierError> {
            Ok(false)
        }
    }

    /// Oracle fake recording what it was asked to verify.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(Circuit, usize)>>,
    }
    impl ProofVerifier for Recorder {
        fn verify(
            &self,
            circuit: Circuit,
            _proof: &Proof,
            public_inputs: &[ark_bn254::Fr],
        ) -> Result<bool, zeto_prover::VerifierError> {
            self.calls.borrow_mut().push((circuit, public_inputs.len()));
            Ok(true)
        }
    }

    fn dummy_proof() -> Proof {
        Proof {
            a: vec![0u8; 32],
            b: Vec::new(),
            c: Vec::new(),
        }
    }

    fn entry(byte: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[0] = byte;
        bytes
    }

    fn anon_ledger<V: ProofVerifier>(verifier: V) -> Ledger<V> {
        Ledger::new(ProtocolVariant::ANON, AUTHORITY, verifier, 16)
    }

    #[test]
    fn test_mint_is_authority_gated() {
        let mut ledger = anon_ledger(AcceptAll);
        let err = ledger.mint(ALICE, &[Commitment(entry(1))]).unwrap_err();
        assert!(matches!(err, LedgerError::NotAuthorized));
    }

    #[test]
    fn test_mint_twice_rejected() {
        let mut ledger = anon_ledger(AcceptAll);
        ledger.mint(AUTHORITY, &[Commitment(entry(1))]).unwrap();
        assert!(matches!(
            ledger.mint(AUTHORITY, &[Commitment(entry(1))]),
            Err(LedgerError::AlreadyKnown(_))
        ));
    }

    #[test]
    fn test_transfer_spends_and_creates() {
        let mut ledger = anon_ledger(AcceptAll);
        ledger
            .mint(AUTHORITY, &[Commitment(entry(1)), Commitment(entry(2))])
            .unwrap();

        let request = TransferRequest {
            inputs: vec![entry(1), entry(2)],
            outputs: vec![entry(3)],
            root: None,
            encrypted: None,
            proof: dummy_proof(),
        };
        let receipt = ledger.transfer(ALICE, &request).unwrap();
        assert_eq!(receipt.spent.len(), 2);
        assert_eq!(receipt.created.len(), 1);

        // replaying the identical transfer hits the spent flags
        assert!(matches!(
            ledger.transfer(ALICE, &request),
            Err(LedgerError::AlreadySpent(_))
        ));
    }

    #[test]
    fn test_duplicate_entry_rejected_before_verification() {
        let mut ledger = anon_ledger(RejectAll);
        let request = TransferRequest {
            inputs: vec![entry(1), entry(1)],
            outputs: vec![entry(3)],
            root: None,
            encrypted: None,
            proof: dummy_proof(),
        };
        // RejectAll would fail later; the duplicate fails first
        assert!(matches!(
            ledger.transfer(ALICE, &request),
            Err(LedgerError::DuplicateEntry(_))
        ));
    }

    #[test]
    fn test_zero_entry_rejected() {
        let mut ledger = anon_ledger(AcceptAll);
        let request = TransferRequest {
            inputs: vec![[0u8; 32]],
            outputs: vec![entry(3)],
            root: None,
            encrypted: None,
            proof: dummy_proof(),
        };
        assert!(matches!(
            ledger.transfer(ALICE, &request),
            Err(LedgerError::ZeroEntry)
        ));
    }

    #[test]
    fn test_batch_bound_rejected_before_padding() {
        let mut ledger = anon_ledger(AcceptAll);
        let inputs: Vec<[u8; 32]> = (1..=11).map(entry).collect();
        let request = TransferRequest {
            inputs,
            outputs: vec![entry(50)],
            root: None,
            encrypted: None,
            proof: dummy_proof(),
        };
        assert!(matches!(
            ledger.transfer(ALICE, &request),
            Err(LedgerError::BatchSizeExceeded { got: 11, max: 10 })
        ));
    }

    #[test]
    fn test_rejected_proof_leaves_state_untouched() {
        let mut ledger = anon_ledger(RejectAll);
        ledger.mint(AUTHORITY, &[Commitment(entry(1))]).unwrap();

        let request = TransferRequest {
            inputs: vec![entry(1)],
            outputs: vec![entry(3)],
            root: None,
            encrypted: None,
            proof: dummy_proof(),
        };
        assert!(matches!(
            ledger.transfer(ALICE, &request),
            Err(LedgerError::ProofInvalid)
        ));
        assert_eq!(
            ledger.store().status(&Commitment(entry(1))),
            Some(crate::state::UtxoStatus::Unspent),
            "input must remain unspent"
        );
        assert!(ledger.store().status(&Commitment(entry(3))).is_none());
    }

    #[test]
    fn test_nullifier_variant_requires_recognized_root() {
        let mut ledger = Ledger::new(ProtocolVariant::ANON_NULLIFIER, AUTHORITY, AcceptAll, 16);

        let missing = TransferRequest {
            inputs: vec![entry(1)],
            outputs: vec![entry(3)],
            root: None,
            encrypted: None,
            proof: dummy_proof(),
        };
        assert!(matches!(
            ledger.transfer(ALICE, &missing),
            Err(LedgerError::MissingRoot)
        ));

        let stale = TransferRequest {
            root: Some([9u8; 32]),
            ..missing
        };
        assert!(matches!(
            ledger.transfer(ALICE, &stale),
            Err(LedgerError::UnrecognizedRoot(_))
        ));
    }

    #[test]
    fn test_nullifier_replay_rejected() {
        let mut ledger = Ledger::new(ProtocolVariant::ANON_NULLIFIER, AUTHORITY, AcceptAll, 16);
        let request = TransferRequest {
            inputs: vec![entry(1)],
            outputs: vec![entry(3)],
            root: Some(ledger.current_root()),
            encrypted: None,
            proof: dummy_proof(),
        };
        ledger.transfer(ALICE, &request).unwrap();

        // same nullifier, fresh output and root
        let replay = TransferRequest {
            outputs: vec![entry(4)],
            root: Some(ledger.current_root()),
            ..request
        };
        assert!(matches!(
            ledger.transfer(ALICE, &replay),
            Err(LedgerError::AlreadySpent(_))
        ));
    }

    #[test]
    fn test_dispatch_single_vs_batch() {
        let mut ledger = anon_ledger(Recorder::default());
        let mints: Vec<Commitment> = (1..=5).map(|b| Commitment(entry(b))).collect();
        ledger.mint(AUTHORITY, &mints).unwrap();

        let single = TransferRequest {
            inputs: vec![entry(1), entry(2)],
            outputs: vec![entry(50)],
            root: None,
            encrypted: None,
            proof: dummy_proof(),
        };
        ledger.transfer(ALICE, &single).unwrap();

        let batch = TransferRequest {
            inputs: vec![entry(3), entry(4), entry(5)],
            outputs: vec![entry(51)],
            root: None,
            encrypted: None,
            proof: dummy_proof(),
        };
        ledger.transfer(ALICE, &batch).unwrap();

        let calls = ledger.verifier.calls.borrow();
        // ANON widths: 2 * size
        assert_eq!(calls[0], (Circuit::Transfer, 4));
        assert_eq!(calls[1], (Circuit::TransferBatch, 20));
    }

    #[test]
    fn test_encryption_payload_shape_enforced() {
        let variant = ProtocolVariant {
            nullifiers: false,
            kyc: false,
            encryption: true,
        };
        let mut ledger = Ledger::new(variant, AUTHORITY, AcceptAll, 16);
        ledger.mint(AUTHORITY, &[Commitment(entry(1))]).unwrap();

        let missing = TransferRequest {
            inputs: vec![entry(1)],
            outputs: vec![entry(3)],
            root: None,
            encrypted: None,
            proof: dummy_proof(),
        };
        assert!(matches!(
            ledger.transfer(ALICE, &missing),
            Err(LedgerError::MissingEncryption)
        ));

        let short = TransferRequest {
            encrypted: Some(EncryptedTransfer {
                ephemeral_pk: PublicKey::ZERO,
                nonce: [1u8; 32],
                ciphertext: vec![[1u8; 32]; 3],
            }),
            ..missing
        };
        assert!(matches!(
            ledger.transfer(ALICE, &short),
            Err(LedgerError::CiphertextLength {
                expected: 7,
                got: 3
            })
        ));
    }

    #[test]
    fn test_lock_restricts_spender_to_delegate() {
        let mut ledger = anon_ledger(AcceptAll);
        ledger.mint(AUTHORITY, &[Commitment(entry(1))]).unwrap();
        ledger
            .lock(AUTHORITY, &[Commitment(entry(1))], BOB)
            .unwrap();

        let request = TransferRequest {
            inputs: vec![entry(1)],
            outputs: vec![entry(3)],
            root: None,
            encrypted: None,
            proof: dummy_proof(),
        };
        assert!(matches!(
            ledger.transfer(ALICE, &request),
            Err(LedgerError::NotLockDelegate)
        ));
        ledger.transfer(BOB, &request).unwrap();
    }

    #[test]
    fn test_deposit_and_withdraw_lifecycle() {
        let mut ledger = anon_ledger(AcceptAll);

        let deposit = DepositRequest {
            amount: 100,
            output: Commitment(entry(1)),
            proof: dummy_proof(),
        };
        let receipt = ledger.deposit(ALICE, &deposit).unwrap();
        assert_eq!(receipt.amount, 100);

        let withdraw = WithdrawRequest {
            amount: 70,
            inputs: vec![entry(1)],
            output: Commitment(entry(2)), // change
            root: None,
            proof: dummy_proof(),
        };
        let receipt = ledger.withdraw(ALICE, &withdraw).unwrap();
        assert_eq!(receipt.change, Some(Commitment(entry(2))));

        // the change is spendable, the withdrawn input is not
        assert!(matches!(
            ledger.withdraw(ALICE, &withdraw),
            Err(LedgerError::AlreadySpent(_))
        ));
    }
}
