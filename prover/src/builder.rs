//! Transfer Builder
//!
//! Client-side assembly: turns UTXOs + keys into the padded public
//! values and the private witness a prover consumes. Handles slot
//! padding, nullifier derivation, and the encryption envelope (one
//! ephemeral keypair and one fresh nonce per transfer).

use rand::Rng;
use thiserror::Error;

use zeto_privacy::{
    InclusionPath, PrivateKey, PublicKey, Salt, Utxo, encryption, nullify,
};

use crate::constants::{BATCH_SIZE, ProtocolVariant};
use crate::public_inputs::padded_size;
use crate::statement::{
    InputWitness, OutputWitness, TransferPublic, TransferStatement, TransferWitness, padded_pairs,
};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("a transfer needs at least one input and one output")]
    EmptyProposal,

    #[error("too many entries: {got} > {max}")]
    TooManyEntries { got: usize, max: usize },

    #[error("nullifier transfers need the referenced tree root")]
    MissingRoot,

    #[error("membership path missing for input {0}")]
    MissingPath(usize),

    #[error("KYC transfers need the identities root and membership paths")]
    MissingIdentity,

    #[error("encrypting transfers need a receiver key")]
    MissingReceiver,

    #[error("receiver key is not a valid curve point")]
    InvalidReceiver,
}

/// Assembles a [`TransferStatement`] ready for proving.
pub struct TransferBuilder {
    variant: ProtocolVariant,
    inputs: Vec<InputWitness>,
    outputs: Vec<OutputWitness>,
    root: Option<[u8; 32]>,
    identities_root: Option<[u8; 32]>,
    spender_identity_path: Option<InclusionPath>,
    receiver: Option<PublicKey>,
}

impl TransferBuilder {
    pub fn new(variant: ProtocolVariant) -> Self {
        Self {
            variant,
            inputs: Vec::new(),
            outputs: Vec::new(),
            root: None,
            identities_root: None,
            spender_identity_path: None,
            receiver: None,
        }
    }

    /// Spend `utxo`; `path` is its tree membership path in nullifier
    /// variants.
    pub fn spend(mut self, utxo: Utxo, path: Option<InclusionPath>) -> Self {
        self.inputs.push(InputWitness { utxo, path });
        self
    }

    /// Create `utxo`; `identity_path` is its owner's registry path in
    /// KYC variants.
    pub fn create(mut self, utxo: Utxo, identity_path: Option<InclusionPath>) -> Self {
        self.outputs.push(OutputWitness {
            utxo,
            identity_path,
        });
        self
    }

    /// Reference a recognized commitment-tree root.
    pub fn against_root(mut self, root: [u8; 32]) -> Self {
        self.root = Some(root);
        self
    }

    /// Bind spender and receivers to the identity registry.
    pub fn with_kyc(mut self, identities_root: [u8; 32], spender_path: InclusionPath) -> Self {
        self.identities_root = Some(identities_root);
        self.spender_identity_path = Some(spender_path);
        self
    }

    /// Encrypt the output values for `receiver`.
    pub fn encrypt_for(mut self, receiver: PublicKey) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// Pad, derive nullifiers, seal the ciphertext, and produce the
    /// statement. The caller keeps the statement private; only its
    /// `public` half ever leaves the client.
    pub fn build<R: Rng>(
        self,
        spending_key: PrivateKey,
        rng: &mut R,
    ) -> Result<TransferStatement, BuildError> {
        if self.inputs.is_empty() || self.outputs.is_empty() {
            return Err(BuildError::EmptyProposal);
        }
        let real = self.inputs.len().max(self.outputs.len());
        let size = padded_size(real).ok_or(BuildError::TooManyEntries {
            got: real,
            max: BATCH_SIZE,
        })?;

        let mut public_inputs: Vec<[u8; 32]> = Vec::with_capacity(size);
        for (i, input) in self.inputs.iter().enumerate() {
            let commitment = input.utxo.commitment();
            if self.variant.nullifiers {
                if input.path.is_none() {
                    return Err(BuildError::MissingPath(i));
                }
                public_inputs.push(nullify(&commitment, &spending_key).0);
            } else {
                public_inputs.push(commitment.0);
            }
        }
        public_inputs.resize(size, [0u8; 32]);

        let mut public_outputs: Vec<[u8; 32]> =
            self.outputs.iter().map(|o| o.utxo.commitment().0).collect();
        public_outputs.resize(size, [0u8; 32]);

        let root = match (self.variant.nullifiers, self.root) {
            (true, None) => return Err(BuildError::MissingRoot),
            (true, root) => root,
            (false, _) => None,
        };

        let identities_root = if self.variant.kyc {
            if self.identities_root.is_none()
                || self.spender_identity_path.is_none()
                || self.outputs.iter().any(|o| o.identity_path.is_none())
            {
                return Err(BuildError::MissingIdentity);
            }
            self.identities_root
        } else {
            None
        };

        let (encrypted, ephemeral_key, receiver) = if self.variant.encryption {
            let receiver = self.receiver.ok_or(BuildError::MissingReceiver)?;
            let ephemeral = PrivateKey::random(rng);
            let nonce = Salt::random(rng).0;
            let pairs = padded_pairs(&self.outputs, size);
            let encrypted = encryption::encrypt_pairs_with(&ephemeral, nonce, &pairs, &receiver)
                .ok_or(BuildError::InvalidReceiver)?;
            (Some(encrypted), Some(ephemeral), Some(receiver))
        } else {
            (None, None, None)
        };

        Ok(TransferStatement {
            variant: self.variant,
            public: TransferPublic {
                inputs: public_inputs,
                outputs: public_outputs,
                root,
                identities_root,
                encrypted,
            },
            witness: TransferWitness {
                spending_key,
                inputs: self.inputs,
                outputs: self.outputs,
                spender_identity_path: self.spender_identity_path,
                ephemeral_key,
                receiver,
            },
        })
    }
}
