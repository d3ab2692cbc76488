//! Zeto Core
//!
//! The ledger state machine of the confidential UTXO protocol: UTXO
//! status tracking, nullifier-spent sets, the recognized-root window,
//! the identity registry gate, and the mint / transfer / deposit /
//! withdraw / lock operations. Cryptographic validity is delegated to
//! an injected proof oracle; state transitions are atomic per call.

pub mod capabilities;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod state;

pub use capabilities::{LockCapable, Mintable, Registrable, WithdrawCapable};
pub use error::LedgerError;
pub use ledger::{
    AccountId, DepositReceipt, DepositRequest, Ledger, MintReceipt, TransferReceipt,
    TransferRequest, WithdrawReceipt, WithdrawRequest,
};
pub use registry::{IdentityGate, SmtIdentityRegistry};
pub use state::{UtxoStatus, UtxoStore};
