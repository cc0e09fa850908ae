//! Error types for ledger operations
//!
//! Every failure is a deterministic function of the current ledger state and
//! is handed back to the caller as-is. Nothing in this crate retries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The address-derivation collaborator failed while creating an address
    /// or while deriving a server public key.
    #[error("Derivation error: {0}")]
    Derivation(String),

    /// Ingestion or lookup targeted an address this wallet does not own
    #[error("Unknown address: {0}")]
    UnknownAddress(String),

    /// Requested spend exceeds the confirmed plus unconfirmed balance
    #[error("Insufficient funds: requested {requested} sats, available {available} sats")]
    InsufficientFunds { requested: u64, available: u64 },

    /// Computed fee would consume the whole balance
    #[error("Balance {balance} sats is not larger than fees {fees} sats")]
    FeesExceedBalance { fees: u64, balance: u64 },

    /// An unspent snapshot from the chain feed carries an impossible amount
    #[error("Invalid unspent: {0}")]
    InvalidUnspent(String),

    /// A wallet record breaks the ledger invariants and cannot be restored
    #[error("Invalid wallet record: {0}")]
    InvalidRecord(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    pub fn derivation(msg: impl Into<String>) -> Self {
        Self::Derivation(msg.into())
    }

    pub fn invalid_unspent(msg: impl Into<String>) -> Self {
        Self::InvalidUnspent(msg.into())
    }

    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Whether the caller asked for more than the wallet can pay for, either
    /// in outputs or in fees.
    pub fn is_insufficient(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds { .. } | Self::FeesExceedBalance { .. }
        )
    }
}
