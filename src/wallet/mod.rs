/// Wallet Core Module
///
/// - `types.rs` - Ledger entities and wire records
/// - `address.rs` - Per-address ledger (atomic snapshot swap)
/// - `ledger.rs` - Wallet ledger: address creation and ingestion
/// - `selection.rs` - Coin selection
/// - `fees.rs` - Fee quotes and the spend-all clamp
/// - `query.rs` - Balance and transaction history
/// - `record.rs` - Snapshot/restore records

mod address;
pub mod fees;
mod ledger;
pub mod query;
mod record;
pub mod selection;
pub mod types;

pub use address::AddressSnapshot;
pub use ledger::{Collaborators, Wallet};
pub use record::WalletRecord;
pub use types::{Balance, SendFees, Tx, Unspent, Utxo, WalletIdentity, WalletKeys};
