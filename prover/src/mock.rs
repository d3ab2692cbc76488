//! Mock Proof System
//!
//! Development/test stand-in for the SNARK backend, the same role the
//! sequencer's mock prover plays behind its feature switch. `prove_*`
//! evaluates the statement predicates and, only when they hold, issues
//! a proof whose bytes are a keyed BLAKE3 tag over the circuit id and
//! the exact public-input vector. Verification recomputes the tag, so
//! any reordering, omission, or single/batch layout mix-up fails just
//! as it would against a real verifying key.
//!
//! Zero knowledge is NOT provided: whoever holds the statement holds
//! the witness. Never deploy outside tests and local demos.

use ark_bn254::Fr;
use thiserror::Error;

use zeto_privacy::poseidon::field_to_bytes;

use crate::public_inputs::{
    Circuit, assemble_deposit, assemble_transfer, assemble_withdraw,
};
use crate::statement::{DepositStatement, TransferStatement, WithdrawStatement};
use crate::verifier::{Proof, ProofVerifier, VerifierError};

const BINDING_CONTEXT: &str = "zeto-mock-proof-v1";

#[derive(Debug, Error)]
pub enum MockProverError {
    #[error("statement predicates are not satisfied")]
    StatementUnsatisfied,
}

/// Statement-checking prover + input-binding verifier.
#[derive(Debug, Default, Clone)]
pub struct MockProofSystem;

impl MockProofSystem {
    pub fn new() -> Self {
        Self
    }

    /// Prove a transfer: check the statement, then bind the vector.
    pub fn prove_transfer(&self, statement: &TransferStatement) -> Result<Proof, MockProverError> {
        if !statement.is_satisfied() {
            return Err(MockProverError::StatementUnsatisfied);
        }
        let inputs = assemble_transfer(&statement.public);
        let circuit = Circuit::transfer_for(statement.public.inputs.len());
        Ok(tagged_proof(circuit, &inputs))
    }

    /// Prove a deposit.
    pub fn prove_deposit(&self, statement: &DepositStatement) -> Result<Proof, MockProverError> {
        if !statement.is_satisfied() {
            return Err(MockProverError::StatementUnsatisfied);
        }
        let inputs = assemble_deposit(statement.amount, &statement.output);
        Ok(tagged_proof(Circuit::Deposit, &inputs))
    }

    /// Prove a withdraw.
    pub fn prove_withdraw(&self, statement: &WithdrawStatement) -> Result<Proof, MockProverError> {
        if !statement.is_satisfied() {
            return Err(MockProverError::StatementUnsatisfied);
        }
        let inputs = assemble_withdraw(&statement.public);
        let circuit = Circuit::withdraw_for(statement.public.inputs.len());
        Ok(tagged_proof(circuit, &inputs))
    }
}

impl ProofVerifier for MockProofSystem {
    fn verify(
        &self,
        circuit: Circuit,
        proof: &Proof,
        public_inputs: &[Fr],
    ) -> Result<bool, VerifierError> {
        let tag = binding_tag(circuit, public_inputs);
        Ok(proof.a == tag && proof.b.is_empty() && proof.c.is_empty())
    }
}

fn circuit_id(circuit: Circuit) -> u8 {
    match circuit {
        Circuit::Deposit => 0,
        Circuit::Transfer => 1,
        Circuit::TransferBatch => 2,
        Circuit::Withdraw => 3,
        Circuit::WithdrawBatch => 4,
    }
}

fn binding_tag(circuit: Circuit, public_inputs: &[Fr]) -> Vec<u8> {
    let mut hasher = blake3::Hasher::new_derive_key(BINDING_CONTEXT);
    hasher.update(&[circuit_id(circuit)]);
    for input in public_inputs {
        hasher.update(&field_to_bytes(*input));
    }
    hasher.finalize().as_bytes().to_vec()
}

fn tagged_proof(circuit: Circuit, public_inputs: &[Fr]) -> Proof {
    Proof {
        a: binding_tag(circuit, public_inputs),
        b: Vec::new(),
        c: Vec::new(),
    }
}
