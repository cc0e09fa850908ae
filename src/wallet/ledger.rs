/// Wallet Ledger
///
/// Lock tiers: `Wallet::state` guards the address map and `last_pos`; each
/// `AddressLedger` guards its own view. Ingestion looks an address up under
/// the wallet lock and releases it before touching the address. Aggregate
/// reads hold the wallet lock and take each address's read lock briefly, so
/// the order is always wallet then address.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::address::{AddressLedger, AddressSnapshot};
use super::types::{Balance, Tx, Unspent, WalletIdentity, WalletKeys};
use crate::bitcoin::{AddressKind, KeyDeriver, LinearSizeEstimator, MultisigDeriver, SizeEstimator};
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::Result;

/// External collaborators a wallet calls into
#[derive(Clone)]
pub struct Collaborators {
    pub deriver: Arc<dyn KeyDeriver>,
    pub estimator: Arc<dyn SizeEstimator>,
}

impl Collaborators {
    pub fn new(deriver: Arc<dyn KeyDeriver>, estimator: Arc<dyn SizeEstimator>) -> Self {
        Self { deriver, estimator }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            deriver: Arc::new(MultisigDeriver::new()),
            estimator: Arc::new(LinearSizeEstimator::default()),
        }
    }
}

pub(crate) struct LedgerState {
    pub last_pos: u32,
    pub addresses: HashMap<String, Arc<AddressLedger>>,
}

impl LedgerState {
    /// Addresses in derivation order
    pub fn by_pos(&self) -> Vec<&Arc<AddressLedger>> {
        let mut ledgers: Vec<_> = self.addresses.values().collect();
        ledgers.sort_by_key(|ledger| ledger.pos());
        ledgers
    }
}

pub struct Wallet {
    pub(super) identity: WalletIdentity,
    pub(super) keys: WalletKeys,
    pub(super) config: LedgerConfig,
    pub(super) collaborators: Collaborators,
    pub(super) state: Mutex<LedgerState>,
}

impl Wallet {
    // ============================================================================
    // Constructors
    // ============================================================================

    /// Create an empty wallet with `last_pos = 0`
    pub fn new(
        identity: WalletIdentity,
        keys: WalletKeys,
        config: LedgerConfig,
        collaborators: Collaborators,
    ) -> Self {
        Self::with_state(
            identity,
            keys,
            config,
            collaborators,
            LedgerState {
                last_pos: 0,
                addresses: HashMap::new(),
            },
        )
    }

    pub(super) fn with_state(
        identity: WalletIdentity,
        keys: WalletKeys,
        config: LedgerConfig,
        collaborators: Collaborators,
        state: LedgerState,
    ) -> Self {
        Self {
            identity,
            keys,
            config,
            collaborators,
            state: Mutex::new(state),
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn identity(&self) -> &WalletIdentity {
        &self.identity
    }

    pub fn uid(&self) -> &str {
        &self.identity.uid
    }

    pub fn keys(&self) -> &WalletKeys {
        &self.keys
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Next derivation index to be handed out
    pub fn last_pos(&self) -> u32 {
        self.state.lock().last_pos
    }

    // ============================================================================
    // Addresses
    // ============================================================================

    /// All address strings currently known, in no particular order
    pub fn list_addresses(&self) -> Vec<String> {
        self.state.lock().addresses.keys().cloned().collect()
    }

    /// Create an address of the configured default kind
    pub fn create_default_address(&self) -> Result<AddressSnapshot> {
        self.create_address(self.config.address_kind)
    }

    /// Derive and register the address at the next derivation index.
    ///
    /// The wallet lock is not held while the derivation collaborator runs.
    /// The new address only commits if no other caller claimed the same
    /// index in the meantime; otherwise the index is re-read and derived
    /// again. A failed derivation commits nothing and leaves `last_pos`
    /// untouched.
    pub fn create_address(&self, kind: AddressKind) -> Result<AddressSnapshot> {
        loop {
            let pos = self.state.lock().last_pos;

            let address = self.collaborators.deriver.derive_shared_address(
                pos,
                &self.keys.svr_master_prv_key,
                &self.keys.cli_master_pub_key,
                self.config.network,
                kind,
            )
            .map_err(|e| match e {
                LedgerError::Derivation(_) => e,
                other => LedgerError::derivation(other.to_string()),
            })?;

            let mut state = self.state.lock();
            if state.last_pos != pos {
                log::debug!(
                    "Derivation index {} claimed concurrently for wallet {}, retrying at {}",
                    pos,
                    self.identity.uid,
                    state.last_pos
                );
                continue;
            }

            if state.addresses.contains_key(&address) {
                return Err(LedgerError::derivation(format!(
                    "derived address {} at index {} is already registered",
                    address, pos
                )));
            }

            let next_pos = pos.checked_add(1).ok_or_else(|| {
                LedgerError::derivation("derivation index space exhausted")
            })?;

            let ledger = Arc::new(AddressLedger::new(pos, address.clone()));
            state.addresses.insert(address.clone(), ledger.clone());
            state.last_pos = next_pos;
            drop(state);

            log::info!(
                "Created {} address {} at index {} for wallet {}",
                kind,
                address,
                pos,
                self.identity.uid
            );
            return Ok(ledger.snapshot());
        }
    }

    // ============================================================================
    // Ingestion
    // ============================================================================

    /// Replace an address's unspent set with a fresh snapshot from the chain
    /// feed. Returns the recomputed balance of that address.
    ///
    /// A snapshot with a value or total above `Amount::MAX_MONEY` is rejected
    /// and the address keeps its previous view.
    pub fn ingest_unspents(&self, address: &str, unspents: Vec<Unspent>) -> Result<Balance> {
        let ledger = self.lookup(address)?;
        if let Err(e) = Balance::checked_from_unspents(&unspents) {
            log::warn!("Rejected unspents for {}: {}", address, e);
            return Err(e);
        }
        let count = unspents.len();
        let balance = ledger.replace_unspents(unspents);

        log::debug!(
            "Ingested {} unspents for {} (total {} sats, unconfirmed {} sats)",
            count,
            address,
            balance.total,
            balance.unconfirmed
        );
        Ok(balance)
    }

    /// Replace an address's transaction history with a fresh snapshot
    pub fn ingest_txs(&self, address: &str, txs: Vec<Tx>) -> Result<()> {
        let ledger = self.lookup(address)?;
        let count = txs.len();
        ledger.replace_txs(txs);

        log::debug!("Ingested {} txs for {}", count, address);
        Ok(())
    }

    /// Find an address under the wallet lock. The lock is released on return.
    pub(super) fn lookup(&self, address: &str) -> Result<Arc<AddressLedger>> {
        let found = self.state.lock().addresses.get(address).cloned();
        found.ok_or_else(|| {
            log::warn!(
                "Rejected operation on unknown address {} for wallet {}",
                address,
                self.identity.uid
            );
            LedgerError::UnknownAddress(address.to_string())
        })
    }
}
