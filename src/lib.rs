//! thresh-ledger: Wallet Ledger and Coin Selection for Two-Party Wallets
//!
//! Server-side bookkeeping for a 2-of-2 threshold Bitcoin wallet. The server
//! holds one key share, the client the other, and every address is derived
//! from both. This crate keeps the in-memory view of a wallet's addresses,
//! their unspent outputs and history, and answers spend questions from it:
//! which outputs to spend, what the fee is, what the balance is.
//!
//! # Architecture
//!
//! - **Address Ledger**: per-address view, swapped atomically on ingestion
//! - **Wallet Ledger**: address map and derivation counter behind a wallet lock
//! - **Coin Selector**: largest-first greedy selection
//! - **Fee Estimator**: fee quote with the spend-all clamp
//! - **Query Layer**: aggregated balance and paginated history
//! - **Wallet Registry**: process-wide wallet ownership
//!
//! Address derivation and size estimation are collaborators behind the
//! [`KeyDeriver`] and [`SizeEstimator`] traits; [`MultisigDeriver`] and
//! [`LinearSizeEstimator`] are the defaults.
//!
//! # Example
//!
//! ```ignore
//! use thresh_ledger::{Collaborators, LedgerConfig, Wallet, WalletIdentity, WalletKeys};
//!
//! let wallet = Wallet::new(
//!     WalletIdentity::new("user-1", "device-1"),
//!     WalletKeys::new(server_xprv, client_xpub),
//!     LedgerConfig::from_env(),
//!     Collaborators::default(),
//! );
//!
//! let address = wallet.create_default_address()?;
//! wallet.ingest_unspents(&address.address, unspents_from_feed)?;
//!
//! let quote = wallet.estimate_send_fees(50_000, 1_000)?;
//! let inputs = wallet.select_unspents(quote.sendable_value + quote.fees)?;
//! ```

// Public modules
pub mod bitcoin;
pub mod config;
pub mod error;
pub mod registry;
pub mod wallet;

// Re-exports for convenience
pub use crate::bitcoin::{
    AddressKind, KeyDeriver, LinearSizeEstimator, MultisigDeriver, SizeEstimator,
};
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use registry::WalletRegistry;
pub use wallet::{
    AddressSnapshot, Balance, Collaborators, SendFees, Tx, Unspent, Utxo, Wallet, WalletIdentity,
    WalletKeys, WalletRecord,
};

// Re-export the network type every configuration carries
pub use ::bitcoin::Network;

// Common result type
pub type Result<T> = std::result::Result<T, LedgerError>;
