//! Transfer Statement
//!
//! The logical statement a proof must attest, re-expressed as explicit
//! predicates over (public values, private witness):
//!
//! 1. Every spent commitment opens to a known (value, salt, owner)
//! 2. One signer owns every input: `owner == derive(spending_key)`
//! 3. Nullifiers derive from the spent commitments (nullifier variants)
//! 4. Spent commitments are members of the referenced tree root
//! 5. Conservation: Σ input values == Σ output values
//! 6. Every value lies in `[0, 2^40 - 1]`
//! 7. Spender and receivers appear under the identities root (KYC)
//! 8. The published ciphertext encrypts the output (value, salt) pairs
//!    under the published ephemeral key and nonce
//!
//! The composition answers satisfied/unsatisfied as a whole; a verifier
//! rejecting a proof does not say which predicate failed.
//!
//! Witness slots are carried real (unpadded). Zero-padding to the fixed
//! circuit width happens only at the oracle boundary, so a genuine
//! zero-value output is never confused with padding.

use zeto_privacy::{
    Commitment, EncryptedTransfer, InclusionPath, PrivateKey, PublicKey, Salt, Utxo, UtxoValue,
    encryption, nullify, poseidon,
};

use crate::constants::ProtocolVariant;

/// Registry leaf for an approved owner key: `Poseidon(x, y)`.
pub fn identity_leaf(key: &PublicKey) -> [u8; 32] {
    poseidon::field_to_bytes(poseidon::hash(&[key.x_field(), key.y_field()]))
}

/// A spent input as the prover sees it: the UTXO pre-image plus its
/// tree membership path when nullifiers are in play.
#[derive(Clone)]
pub struct InputWitness {
    pub utxo: Utxo,
    /// Membership path of the commitment (nullifier variants only)
    pub path: Option<InclusionPath>,
}

/// A created output plus the registry membership path of its owner.
#[derive(Clone)]
pub struct OutputWitness {
    pub utxo: Utxo,
    /// Registry membership path of the owner key (KYC variants only)
    pub identity_path: Option<InclusionPath>,
}

/// Private witness of a transfer.
pub struct TransferWitness {
    /// Single signer: this one key spends every input
    pub spending_key: PrivateKey,
    pub inputs: Vec<InputWitness>,
    pub outputs: Vec<OutputWitness>,
    /// Registry membership path of the spender's key (KYC variants)
    pub spender_identity_path: Option<InclusionPath>,
    /// Ephemeral key behind the published ciphertext
    pub ephemeral_key: Option<PrivateKey>,
    /// The encryption receiver
    pub receiver: Option<PublicKey>,
}

/// Public values of a transfer, already padded to the circuit size.
#[derive(Debug, Clone)]
pub struct TransferPublic {
    /// Spent entries: commitments, or nullifiers in nullifier variants.
    /// Zero-padded to the circuit size.
    pub inputs: Vec<[u8; 32]>,
    /// New commitments, zero-padded to the circuit size
    pub outputs: Vec<[u8; 32]>,
    /// Referenced commitment-tree root (nullifier variants)
    pub root: Option<[u8; 32]>,
    /// Identity registry root (KYC variants)
    pub identities_root: Option<[u8; 32]>,
    /// Encrypted output values (encryption variants)
    pub encrypted: Option<EncryptedTransfer>,
}

/// The full transfer statement.
pub struct TransferStatement {
    pub variant: ProtocolVariant,
    pub public: TransferPublic,
    pub witness: TransferWitness,
}

impl TransferStatement {
    /// Evaluate every predicate. True iff a proof of this transfer could
    /// exist.
    pub fn is_satisfied(&self) -> bool {
        let v = self.variant;
        let p = &self.public;
        let w = &self.witness;

        let size = p.inputs.len();
        if p.outputs.len() != size {
            return false;
        }
        if w.inputs.is_empty() || w.inputs.len() > size || w.outputs.len() > size {
            return false;
        }
        if v.nullifiers != p.root.is_some()
            || v.kyc != p.identities_root.is_some()
            || v.encryption != p.encrypted.is_some()
        {
            return false;
        }

        let spender = w.spending_key.public_key();

        // enabled input slots
        for (i, input) in w.inputs.iter().enumerate() {
            let utxo = &input.utxo;
            if !utxo.value.in_range() {
                return false;
            }
            if utxo.owner != spender {
                return false;
            }
            let commitment = utxo.commitment();
            if v.nullifiers {
                let Some(root) = p.root else { return false };
                if p.inputs[i] != nullify(&commitment, &w.spending_key).0 {
                    return false;
                }
                let Some(path) = &input.path else {
                    return false;
                };
                if !path.verify(commitment.as_bytes(), &root) {
                    return false;
                }
            } else if p.inputs[i] != commitment.0 {
                return false;
            }
        }
        // padding slots carry the zero sentinel, nothing else
        if p.inputs[w.inputs.len()..].iter().any(|s| *s != [0u8; 32]) {
            return false;
        }

        // enabled output slots
        for (j, output) in w.outputs.iter().enumerate() {
            let utxo = &output.utxo;
            if !utxo.value.in_range() {
                return false;
            }
            if p.outputs[j] != utxo.commitment().0 {
                return false;
            }
        }
        if p.outputs[w.outputs.len()..].iter().any(|s| *s != [0u8; 32]) {
            return false;
        }

        // conservation; range-bounded values cannot wrap a u128 sum
        let inflow: u128 = w.inputs.iter().map(|i| i.utxo.value.0 as u128).sum();
        let outflow: u128 = w.outputs.iter().map(|o| o.utxo.value.0 as u128).sum();
        if inflow != outflow {
            return false;
        }

        if v.kyc && !self.kyc_satisfied(&spender) {
            return false;
        }
        if v.encryption && !self.encryption_satisfied(size) {
            return false;
        }
        true
    }

    fn kyc_satisfied(&self, spender: &PublicKey) -> bool {
        let Some(identities_root) = self.public.identities_root else {
            return false;
        };
        let Some(spender_path) = &self.witness.spender_identity_path else {
            return false;
        };
        if !spender_path.verify(&identity_leaf(spender), &identities_root) {
            return false;
        }
        self.witness.outputs.iter().all(|output| {
            output
                .identity_path
                .as_ref()
                .is_some_and(|path| path.verify(&identity_leaf(&output.utxo.owner), &identities_root))
        })
    }

    fn encryption_satisfied(&self, size: usize) -> bool {
        let Some(encrypted) = &self.public.encrypted else {
            return false;
        };
        let Some(ephemeral) = &self.witness.ephemeral_key else {
            return false;
        };
        let Some(receiver) = &self.witness.receiver else {
            return false;
        };
        if ephemeral.public_key() != encrypted.ephemeral_pk {
            return false;
        }
        let Some(secret) = ephemeral.shared_secret(receiver) else {
            return false;
        };
        let pairs = padded_pairs(&self.witness.outputs, size);
        encryption::seal(&secret, &encrypted.nonce, &pairs) == encrypted.ciphertext
    }
}

/// Output (value, salt) pairs zero-padded to the circuit size, in the
/// order the ciphertext covers them.
pub fn padded_pairs(outputs: &[OutputWitness], size: usize) -> Vec<(UtxoValue, Salt)> {
    let mut pairs: Vec<(UtxoValue, Salt)> = outputs
        .iter()
        .map(|o| (o.utxo.value, o.utxo.salt))
        .collect();
    pairs.resize(size, (UtxoValue::ZERO, Salt::ZERO));
    pairs
}

/// Statement behind a deposit: the commitment hides the salt and owner
/// of a UTXO whose value is attested in the clear. No ownership or
/// encryption predicates; the depositor is the implicit owner.
pub struct DepositStatement {
    pub amount: u64,
    pub output: Commitment,
    pub witness: DepositWitness,
}

pub struct DepositWitness {
    pub salt: Salt,
    pub owner: PublicKey,
}

impl DepositStatement {
    pub fn is_satisfied(&self) -> bool {
        UtxoValue::new(self.amount).in_range()
            && zeto_privacy::commit(self.amount, &self.witness.salt, &self.witness.owner)
                == self.output
    }
}

/// Statement behind a withdraw: the nullified inputs sum to the public
/// amount plus the hidden change value.
pub struct WithdrawStatement {
    pub variant: ProtocolVariant,
    pub public: WithdrawPublic,
    pub witness: WithdrawWitness,
}

#[derive(Debug, Clone)]
pub struct WithdrawPublic {
    pub amount: u64,
    /// Spent entries, zero-padded to the circuit size
    pub inputs: Vec<[u8; 32]>,
    /// Referenced commitment-tree root (nullifier variants)
    pub root: Option<[u8; 32]>,
    /// Change commitment; zero when the inputs are withdrawn exactly
    pub output: Commitment,
}

pub struct WithdrawWitness {
    pub spending_key: PrivateKey,
    pub inputs: Vec<InputWitness>,
    /// Change UTXO, present iff `output` is non-zero
    pub change: Option<Utxo>,
}

impl WithdrawStatement {
    pub fn is_satisfied(&self) -> bool {
        let v = self.variant;
        let p = &self.public;
        let w = &self.witness;

        let size = p.inputs.len();
        if w.inputs.is_empty() || w.inputs.len() > size {
            return false;
        }
        if v.nullifiers != p.root.is_some() {
            return false;
        }
        if !UtxoValue::new(p.amount).in_range() {
            return false;
        }

        let spender = w.spending_key.public_key();
        for (i, input) in w.inputs.iter().enumerate() {
            let utxo = &input.utxo;
            if !utxo.value.in_range() || utxo.owner != spender {
                return false;
            }
            let commitment = utxo.commitment();
            if v.nullifiers {
                let Some(root) = p.root else { return false };
                if p.inputs[i] != nullify(&commitment, &w.spending_key).0 {
                    return false;
                }
                let Some(path) = &input.path else {
                    return false;
                };
                if !path.verify(commitment.as_bytes(), &root) {
                    return false;
                }
            } else if p.inputs[i] != commitment.0 {
                return false;
            }
        }
        if p.inputs[w.inputs.len()..].iter().any(|s| *s != [0u8; 32]) {
            return false;
        }

        let change_value = match &w.change {
            Some(change) => {
                if !change.value.in_range() || change.commitment() != p.output {
                    return false;
                }
                change.value.0
            }
            None => {
                if !p.output.is_zero() {
                    return false;
                }
                0
            }
        };

        let inflow: u128 = w.inputs.iter().map(|i| i.utxo.value.0 as u128).sum();
        inflow == p.amount as u128 + change_value as u128
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ProtocolVariant, SINGLE_SIZE};
    use ark_std::rand::rngs::OsRng;
    use zeto_privacy::{OwnerKeypair, SparseMerkleTree};

    fn pad(mut slots: Vec<[u8; 32]>, size: usize) -> Vec<[u8; 32]> {
        slots.resize(size, [0u8; 32]);
        slots
    }

    /// Two inputs (60 + 40) owned by one key, one real output of 100 to
    /// a receiver, one padding slot. The canonical happy path.
    fn anon_statement(output_value: u64) -> TransferStatement {
        let mut rng = OsRng;
        let sender = OwnerKeypair::random(&mut rng);
        let receiver = OwnerKeypair::random(&mut rng);

        let in1 = Utxo::new(60, sender.public_key, &mut rng);
        let in2 = Utxo::new(40, sender.public_key, &mut rng);
        let out = Utxo::new(output_value, receiver.public_key, &mut rng);

        TransferStatement {
            variant: ProtocolVariant::ANON,
            public: TransferPublic {
                inputs: vec![in1.commitment().0, in2.commitment().0],
                outputs: pad(vec![out.commitment().0], SINGLE_SIZE),
                root: None,
                identities_root: None,
                encrypted: None,
            },
            witness: TransferWitness {
                spending_key: sender.private_key,
                inputs: vec![
                    InputWitness {
                        utxo: in1,
                        path: None,
                    },
                    InputWitness {
                        utxo: in2,
                        path: None,
                    },
                ],
                outputs: vec![OutputWitness {
                    utxo: out,
                    identity_path: None,
                }],
                spender_identity_path: None,
                ephemeral_key: None,
                receiver: None,
            },
        }
    }

    #[test]
    fn test_conservation_with_padding_holds() {
        assert!(anon_statement(100).is_satisfied());
    }

    #[test]
    fn test_conservation_violation_fails() {
        assert!(!anon_statement(99).is_satisfied());
    }

    #[test]
    fn test_foreign_input_fails_ownership() {
        let mut rng = OsRng;
        let mut statement = anon_statement(100);
        // swap in an input owned by someone else, keeping sums equal
        let thief_target = OwnerKeypair::random(&mut rng);
        let foreign = Utxo::new(60, thief_target.public_key, &mut rng);
        statement.public.inputs[0] = foreign.commitment().0;
        statement.witness.inputs[0] = InputWitness {
            utxo: foreign,
            path: None,
        };
        assert!(!statement.is_satisfied());
    }

    #[test]
    fn test_out_of_range_output_fails() {
        let mut rng = OsRng;
        let sender = OwnerKeypair::random(&mut rng);
        let receiver = OwnerKeypair::random(&mut rng);
        let over = UtxoValue::MAX.0 + 1;

        let input = Utxo::new(over, sender.public_key, &mut rng);
        let output = Utxo::new(over, receiver.public_key, &mut rng);
        let statement = TransferStatement {
            variant: ProtocolVariant::ANON,
            public: TransferPublic {
                inputs: pad(vec![input.commitment().0], SINGLE_SIZE),
                outputs: pad(vec![output.commitment().0], SINGLE_SIZE),
                root: None,
                identities_root: None,
                encrypted: None,
            },
            witness: TransferWitness {
                spending_key: sender.private_key,
                inputs: vec![InputWitness {
                    utxo: input,
                    path: None,
                }],
                outputs: vec![OutputWitness {
                    utxo: output,
                    identity_path: None,
                }],
                spender_identity_path: None,
                ephemeral_key: None,
                receiver: None,
            },
        };
        assert!(!statement.is_satisfied());
    }

    #[test]
    fn test_nonzero_padding_slot_fails() {
        let mut statement = anon_statement(100);
        statement.public.outputs[1] = [7u8; 32];
        assert!(!statement.is_satisfied());
    }

    #[test]
    fn test_nullifier_variant_membership() {
        let mut rng = OsRng;
        let sender = OwnerKeypair::random(&mut rng);
        let receiver = OwnerKeypair::random(&mut rng);

        let input = Utxo::new(100, sender.public_key, &mut rng);
        let output = Utxo::new(100, receiver.public_key, &mut rng);

        let mut tree = SparseMerkleTree::new();
        let position = tree.insert(input.commitment().0);
        let path = tree.path(position).unwrap();
        let root = tree.root();

        let nf = input.nullifier(&sender.private_key);
        let statement = TransferStatement {
            variant: ProtocolVariant::ANON_NULLIFIER,
            public: TransferPublic {
                inputs: pad(vec![nf.0], SINGLE_SIZE),
                outputs: pad(vec![output.commitment().0], SINGLE_SIZE),
                root: Some(root),
                identities_root: None,
                encrypted: None,
            },
            witness: TransferWitness {
                spending_key: sender.private_key,
                inputs: vec![InputWitness {
                    utxo: input,
                    path: Some(path),
                }],
                outputs: vec![OutputWitness {
                    utxo: output,
                    identity_path: None,
                }],
                spender_identity_path: None,
                ephemeral_key: None,
                receiver: None,
            },
        };
        assert!(statement.is_satisfied());

        // same statement against a root the path does not lead to
        let mut stale = statement;
        stale.public.root = Some([9u8; 32]);
        assert!(!stale.is_satisfied());
    }

    #[test]
    fn test_deposit_statement() {
        let mut rng = OsRng;
        let owner = OwnerKeypair::random(&mut rng);
        let salt = Salt::random(&mut rng);
        let output = zeto_privacy::commit(500, &salt, &owner.public_key);

        let good = DepositStatement {
            amount: 500,
            output,
            witness: DepositWitness {
                salt,
                owner: owner.public_key,
            },
        };
        assert!(good.is_satisfied());

        let bad_amount = DepositStatement {
            amount: 501,
            output,
            witness: DepositWitness {
                salt,
                owner: owner.public_key,
            },
        };
        assert!(!bad_amount.is_satisfied());
    }

    #[test]
    fn test_withdraw_statement_with_change() {
        let mut rng = OsRng;
        let owner = OwnerKeypair::random(&mut rng);
        let input = Utxo::new(100, owner.public_key, &mut rng);
        let change = Utxo::new(30, owner.public_key, &mut rng);

        let statement = WithdrawStatement {
            variant: ProtocolVariant::ANON,
            public: WithdrawPublic {
                amount: 70,
                inputs: pad(vec![input.commitment().0], SINGLE_SIZE),
                root: None,
                output: change.commitment(),
            },
            witness: WithdrawWitness {
                spending_key: owner.private_key,
                inputs: vec![InputWitness {
                    utxo: input,
                    path: None,
                }],
                change: Some(change),
            },
        };
        assert!(statement.is_satisfied());

        let mut short = statement;
        short.public.amount = 71;
        assert!(!short.is_satisfied());
    }
}
