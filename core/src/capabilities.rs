//! Ledger capability seams.
//!
//! The contract surface is split into small capability traits, all
//! implemented by the one concrete [`crate::Ledger`] type. Hosts can
//! expose a subset (a mint-only issuer, a withdraw-only bridge) without
//! inheriting the rest of the surface.

use zeto_privacy::{Commitment, PublicKey};

use crate::error::LedgerError;
use crate::ledger::{
    AccountId, DepositReceipt, DepositRequest, MintReceipt, WithdrawReceipt, WithdrawRequest,
};

/// Issue new UTXOs.
pub trait Mintable {
    fn mint(
        &mut self,
        caller: AccountId,
        commitments: &[Commitment],
    ) -> Result<MintReceipt, LedgerError>;
}

/// Maintain the identity allow-list.
pub trait Registrable {
    fn register(&mut self, caller: AccountId, key: &PublicKey) -> Result<(), LedgerError>;
}

/// Lock UTXOs to a spending delegate.
pub trait LockCapable {
    fn lock(
        &mut self,
        caller: AccountId,
        commitments: &[Commitment],
        delegate: AccountId,
    ) -> Result<(), LedgerError>;
}

/// Cross the confidential/transparent boundary.
pub trait WithdrawCapable {
    fn deposit(
        &mut self,
        caller: AccountId,
        request: &DepositRequest,
    ) -> Result<DepositReceipt, LedgerError>;

    fn withdraw(
        &mut self,
        caller: AccountId,
        request: &WithdrawRequest,
    ) -> Result<WithdrawReceipt, LedgerError>;
}
