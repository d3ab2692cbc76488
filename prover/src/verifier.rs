//! Proof Oracle
//!
//! The verification boundary: the ledger hands `(circuit, proof,
//! public_inputs)` to a [`ProofVerifier`] and gets back a yes/no.
//! Cryptographic validity is entirely the oracle's concern; the ledger
//! only guarantees it assembled the vector deterministically.
//!
//! [`Groth16Verifier`] is the production oracle, holding one prepared
//! verifying key per circuit. Tests substitute fakes through the trait.

use std::collections::HashMap;

use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_groth16::{
    Groth16, PreparedVerifyingKey, Proof as Groth16Proof, VerifyingKey, prepare_verifying_key,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::public_inputs::Circuit;

/// A proof bundle `(pA, pB, pC)`, curve points in compressed encoding.
///
/// Constructed off-chain, consumed exactly once, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub a: Vec<u8>,
    pub b: Vec<u8>,
    pub c: Vec<u8>,
}

impl Proof {
    pub fn from_groth16(proof: &Groth16Proof<Bn254>) -> Result<Self, VerifierError> {
        let mut a = Vec::new();
        let mut b = Vec::new();
        let mut c = Vec::new();
        proof
            .a
            .serialize_compressed(&mut a)
            .and_then(|_| proof.b.serialize_compressed(&mut b))
            .and_then(|_| proof.c.serialize_compressed(&mut c))
            .map_err(|_| VerifierError::MalformedProof)?;
        Ok(Self { a, b, c })
    }

    pub fn to_groth16(&self) -> Result<Groth16Proof<Bn254>, VerifierError> {
        let a = G1Affine::deserialize_compressed(&self.a[..])
            .map_err(|_| VerifierError::MalformedProof)?;
        let b = G2Affine::deserialize_compressed(&self.b[..])
            .map_err(|_| VerifierError::MalformedProof)?;
        let c = G1Affine::deserialize_compressed(&self.c[..])
            .map_err(|_| VerifierError::MalformedProof)?;
        Ok(Groth16Proof { a, b, c })
    }
}

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("no verifying key registered for {0:?}")]
    MissingKey(Circuit),

    #[error("public input width mismatch: expected {expected}, got {got}")]
    WidthMismatch { expected: usize, got: usize },

    #[error("malformed proof encoding")]
    MalformedProof,

    #[error("malformed verifying key encoding")]
    MalformedKey,

    #[error("verifier backend failure: {0}")]
    Backend(String),
}

/// External proof verification oracle.
pub trait ProofVerifier {
    fn verify(
        &self,
        circuit: Circuit,
        proof: &Proof,
        public_inputs: &[Fr],
    ) -> Result<bool, VerifierError>;
}

/// Groth16 verifier over BN254 with one prepared key per circuit.
///
/// The single and batch keys encode different public-input widths; a
/// vector of the wrong length is a hard error, not a failed proof.
#[derive(Default)]
pub struct Groth16Verifier {
    keys: HashMap<Circuit, PreparedVerifyingKey<Bn254>>,
}

impl Groth16Verifier {
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    pub fn with_key(mut self, circuit: Circuit, vk: VerifyingKey<Bn254>) -> Self {
        self.keys.insert(circuit, prepare_verifying_key(&vk));
        self
    }

    pub fn with_key_bytes(self, circuit: Circuit, bytes: &[u8]) -> Result<Self, VerifierError> {
        let vk = VerifyingKey::<Bn254>::deserialize_compressed(bytes)
            .map_err(|_| VerifierError::MalformedKey)?;
        Ok(self.with_key(circuit, vk))
    }
}

impl ProofVerifier for Groth16Verifier {
    fn verify(
        &self,
        circuit: Circuit,
        proof: &Proof,
        public_inputs: &[Fr],
    ) -> Result<bool, VerifierError> {
        let pvk = self
            .keys
            .get(&circuit)
            .ok_or(VerifierError::MissingKey(circuit))?;

        let expected = pvk.vk.gamma_abc_g1.len() - 1;
        if public_inputs.len() != expected {
            return Err(VerifierError::WidthMismatch {
                expected,
                got: public_inputs.len(),
            });
        }

        let proof = proof.to_groth16()?;
        Groth16::<Bn254>::verify_proof(pvk, &proof, public_inputs)
            .map_err(|e| VerifierError::Backend(e.to_string()))
    }
}
