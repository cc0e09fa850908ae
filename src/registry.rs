/// Wallet Registry - per-process wallet ownership
///
/// Holds every live wallet keyed by user id. The embedding service creates
/// one registry at startup with its configuration and collaborators; wallets
/// live until removed or until the registry is dropped.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::LedgerConfig;
use crate::wallet::{Collaborators, Wallet, WalletIdentity, WalletKeys, WalletRecord};
use crate::Result;

pub struct WalletRegistry {
    /// Live wallets per user id
    wallets: RwLock<HashMap<String, Arc<Wallet>>>,
    config: LedgerConfig,
    collaborators: Collaborators,
}

impl WalletRegistry {
    pub fn new(config: LedgerConfig, collaborators: Collaborators) -> Self {
        log::info!("Initializing wallet registry ({} network)", config.network);
        Self {
            wallets: RwLock::new(HashMap::new()),
            config,
            collaborators,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get the wallet for `identity.uid`, creating an empty one if none exists.
    ///
    /// An existing wallet is returned as-is; `keys` only apply to a wallet
    /// created by this call.
    pub fn register(&self, identity: WalletIdentity, keys: WalletKeys) -> Arc<Wallet> {
        // Fast path: wallet exists (read lock)
        if let Some(wallet) = self.wallets.read().get(&identity.uid) {
            log::debug!("Wallet {} already registered", identity.uid);
            return wallet.clone();
        }

        let mut wallets = self.wallets.write();

        // Another thread might have registered it between the two locks
        if let Some(wallet) = wallets.get(&identity.uid) {
            log::debug!("Wallet {} registered concurrently", identity.uid);
            return wallet.clone();
        }

        let uid = identity.uid.clone();
        let wallet = Arc::new(Wallet::new(
            identity,
            keys,
            self.config.clone(),
            self.collaborators.clone(),
        ));
        wallets.insert(uid.clone(), wallet.clone());
        log::info!("Registered wallet {}", uid);

        wallet
    }

    /// Restore a wallet from a record, replacing any live wallet with the same uid
    pub fn restore(&self, record: WalletRecord) -> Result<Arc<Wallet>> {
        let wallet = Arc::new(Wallet::from_record(
            record,
            self.config.clone(),
            self.collaborators.clone(),
        )?);

        let uid = wallet.uid().to_string();
        if self
            .wallets
            .write()
            .insert(uid.clone(), wallet.clone())
            .is_some()
        {
            log::warn!("Restored wallet {} replaced a live instance", uid);
        } else {
            log::info!("Restored wallet {}", uid);
        }

        Ok(wallet)
    }

    pub fn get(&self, uid: &str) -> Option<Arc<Wallet>> {
        self.wallets.read().get(uid).cloned()
    }

    /// Drop a wallet from the registry. Callers still holding it keep a
    /// working instance.
    pub fn remove(&self, uid: &str) -> Option<Arc<Wallet>> {
        let removed = self.wallets.write().remove(uid);
        if removed.is_some() {
            log::info!("Removed wallet {}", uid);
        }
        removed
    }

    pub fn uids(&self) -> Vec<String> {
        self.wallets.read().keys().cloned().collect()
    }

    /// Records of every live wallet, for persistence by the embedding service
    pub fn records(&self) -> Vec<WalletRecord> {
        let wallets: Vec<Arc<Wallet>> = self.wallets.read().values().cloned().collect();
        wallets.iter().map(|wallet| wallet.to_record()).collect()
    }

    pub fn len(&self) -> usize {
        self.wallets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.read().is_empty()
    }
}
