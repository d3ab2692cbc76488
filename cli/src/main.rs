//! Zeto CLI
//!
//! Demo driver: walks the full confidential lifecycle against an
//! in-process ledger with the mock proof system - register identities,
//! deposit, transfer with encrypted values, decrypt on the receiving
//! side, replay rejection, withdraw.
//!
//! Run with `RUST_LOG=info cargo run --bin zeto`.

use anyhow::{Context, Result, bail};
use log::info;
use rand::rngs::OsRng;

use zeto_config::ZetoConfig;
use zeto_core::{
    AccountId, DepositRequest, IdentityGate, Ledger, LedgerError, Registrable, SmtIdentityRegistry,
    TransferRequest, WithdrawCapable, WithdrawRequest,
};
use zeto_privacy::{Commitment, InclusionPath, OwnerKeypair, Utxo, try_decrypt_utxos};
use zeto_prover::{
    DepositStatement, DepositWitness, InputWitness, MockProofSystem, ProtocolVariant,
    TransferBuilder, TransferStatement, WithdrawPublic, WithdrawStatement, WithdrawWitness,
    padded_size,
};

const SENDER: AccountId = [2u8; 32];

fn main() -> Result<()> {
    env_logger::init();

    let config = ZetoConfig::init_global()?;
    if !config.features.mock_prover {
        bail!("this demo drives the mock proof system; set ZT_MOCK_PROVER=true");
    }
    let variant = ProtocolVariant {
        nullifiers: config.features.nullifiers,
        kyc: config.features.kyc,
        encryption: config.features.encryption,
    };
    let authority = config.authority_bytes()?;

    run_demo(variant, authority, config.ledger.root_window)
}

fn run_demo(variant: ProtocolVariant, authority: AccountId, root_window: usize) -> Result<()> {
    let mut rng = OsRng;
    let mut ledger = Ledger::new(variant, authority, MockProofSystem::new(), root_window);
    if variant.kyc {
        ledger = ledger.with_registry(SmtIdentityRegistry::new(authority));
    }

    let alice = OwnerKeypair::random(&mut rng);
    let bob = OwnerKeypair::random(&mut rng);

    if variant.kyc {
        ledger.register(authority, &alice.public_key)?;
        ledger.register(authority, &bob.public_key)?;
        info!("registered alice and bob in the identity registry");
    }

    // Alice funds the pool with two hidden deposits
    let (utxo1, pos1) = deposit(&mut ledger, &alice, 60, &mut rng)?;
    let (utxo2, pos2) = deposit(&mut ledger, &alice, 40, &mut rng)?;
    info!("deposited 60 + 40 hidden units for alice");

    // Alice pays Bob 100, confidentially
    let payment = Utxo::new(100, bob.public_key, &mut rng);
    let payment_commitment = payment.commitment();

    let receiver_path = if variant.kyc {
        Some(membership_path(&ledger, &bob)?)
    } else {
        None
    };
    let mut builder = TransferBuilder::new(variant)
        .spend(utxo1, tree_path(&ledger, pos1))
        .spend(utxo2, tree_path(&ledger, pos2))
        .create(payment.clone(), receiver_path);
    if variant.nullifiers {
        builder = builder.against_root(ledger.current_root());
    }
    if variant.kyc {
        let registry = ledger.registry().context("registry configured above")?;
        let identities_root = registry.identities_root();
        builder = builder.with_kyc(identities_root, membership_path(&ledger, &alice)?);
    }
    if variant.encryption {
        builder = builder.encrypt_for(bob.public_key);
    }
    let statement = builder.build(alice.private_key.clone(), &mut rng)?;
    let proof = MockProofSystem::new().prove_transfer(&statement)?;
    let request = request_from(&statement, proof);

    let receipt = ledger.transfer(SENDER, &request)?;
    info!("transfer committed");
    println!("{}", serde_json::to_string_pretty(&receipt)?);

    // Bob scans the payload and recovers his UTXO
    if let Some(encrypted) = &receipt.encrypted {
        let recovered = try_decrypt_utxos(
            encrypted,
            &bob.private_key,
            &[payment_commitment, Commitment::ZERO],
        )
        .context("bob failed to decrypt his output")?;
        info!(
            "bob decrypted his output: {} hidden unit(s)",
            recovered[0].value.as_u64()
        );
    }

    // A replay of the same transfer must be rejected
    match ledger.transfer(SENDER, &request) {
        Err(LedgerError::AlreadySpent(_)) => info!("replay correctly rejected: already spent"),
        Err(other) => bail!("replay rejected for the wrong reason: {other}"),
        Ok(_) => bail!("replay was accepted"),
    }

    // Bob converts the whole payment back to a transparent amount
    let withdraw_receipt = withdraw_all(&mut ledger, &bob, &payment)?;
    info!("withdraw committed");
    println!("{}", serde_json::to_string_pretty(&withdraw_receipt)?);

    Ok(())
}

fn deposit(
    ledger: &mut Ledger<MockProofSystem>,
    owner: &OwnerKeypair,
    amount: u64,
    rng: &mut OsRng,
) -> Result<(Utxo, Option<u64>)> {
    let utxo = Utxo::new(amount, owner.public_key, rng);
    let statement = DepositStatement {
        amount,
        output: utxo.commitment(),
        witness: DepositWitness {
            salt: utxo.salt,
            owner: owner.public_key,
        },
    };
    let proof = MockProofSystem::new().prove_deposit(&statement)?;
    let receipt = ledger.deposit(
        SENDER,
        &DepositRequest {
            amount,
            output: utxo.commitment(),
            proof,
        },
    )?;
    Ok((utxo, receipt.position))
}

fn withdraw_all(
    ledger: &mut Ledger<MockProofSystem>,
    owner: &OwnerKeypair,
    utxo: &Utxo,
) -> Result<zeto_core::WithdrawReceipt> {
    let variant = ledger.variant();
    let commitment = utxo.commitment();

    let (entry, path, root) = if variant.nullifiers {
        let position = ledger
            .store()
            .position(&commitment)
            .context("commitment not in the tree")?;
        let path = ledger
            .store()
            .tree()
            .path(position)
            .context("no path for position")?;
        (
            utxo.nullifier(&owner.private_key).0,
            Some(path),
            Some(ledger.current_root()),
        )
    } else {
        (commitment.0, None, None)
    };

    let size = padded_size(1).context("single entry always pads")?;
    let mut inputs = vec![entry];
    inputs.resize(size, [0u8; 32]);

    let statement = WithdrawStatement {
        variant,
        public: WithdrawPublic {
            amount: utxo.value.as_u64(),
            inputs,
            root,
            output: Commitment::ZERO,
        },
        witness: WithdrawWitness {
            spending_key: owner.private_key.clone(),
            inputs: vec![InputWitness {
                utxo: utxo.clone(),
                path,
            }],
            change: None,
        },
    };
    let proof = MockProofSystem::new().prove_withdraw(&statement)?;

    let receipt = ledger.withdraw(
        SENDER,
        &WithdrawRequest {
            amount: utxo.value.as_u64(),
            inputs: vec![entry],
            output: Commitment::ZERO,
            root,
            proof,
        },
    )?;
    Ok(receipt)
}

fn tree_path(ledger: &Ledger<MockProofSystem>, position: Option<u64>) -> Option<InclusionPath> {
    let position = position?;
    ledger.store().tree().path(position)
}

fn membership_path(
    ledger: &Ledger<MockProofSystem>,
    owner: &OwnerKeypair,
) -> Result<InclusionPath> {
    ledger
        .registry()
        .context("identity registry not configured")?
        .membership_path(&owner.public_key)
        .context("key not registered")
}

fn request_from(statement: &TransferStatement, proof: zeto_prover::Proof) -> TransferRequest {
    TransferRequest {
        inputs: statement.public.inputs[..statement.witness.inputs.len()].to_vec(),
        outputs: statement.public.outputs[..statement.witness.outputs.len()].to_vec(),
        root: statement.public.root,
        encrypted: statement.public.encrypted.clone(),
        proof,
    }
}
