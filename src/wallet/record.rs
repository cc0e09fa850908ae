//! Wallet records: the flat key-value form a storage layer persists

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::address::{AddressLedger, AddressSnapshot};
use super::ledger::{Collaborators, LedgerState, Wallet};
use super::types::{Balance, WalletIdentity, WalletKeys};
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    #[serde(flatten)]
    pub identity: WalletIdentity,
    #[serde(rename = "lastpos")]
    pub last_pos: u32,
    #[serde(rename = "address")]
    pub addresses: HashMap<String, AddressSnapshot>,
    #[serde(flatten)]
    pub keys: WalletKeys,
}

impl WalletRecord {
    /// Check the ledger invariants: every key names its own address, every
    /// `pos` is below `last_pos`, and no two addresses share a `pos`.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (key, snapshot) in &self.addresses {
            if key != &snapshot.address {
                return Err(LedgerError::invalid_record(format!(
                    "entry {} holds address {}",
                    key, snapshot.address
                )));
            }
            if snapshot.pos >= self.last_pos {
                return Err(LedgerError::invalid_record(format!(
                    "address {} has pos {} but lastpos is {}",
                    key, snapshot.pos, self.last_pos
                )));
            }
            Balance::checked_from_unspents(&snapshot.unspents)
                .map_err(|e| LedgerError::invalid_record(format!("address {}: {}", key, e)))?;
            if !seen.insert(snapshot.pos) {
                return Err(LedgerError::invalid_record(format!(
                    "pos {} is used by more than one address",
                    snapshot.pos
                )));
            }
        }
        Ok(())
    }
}

impl Wallet {
    /// Capture the wallet as a record. Per-address views are read one at a
    /// time under the wallet lock.
    pub fn to_record(&self) -> WalletRecord {
        let state = self.state.lock();
        let addresses = state
            .addresses
            .iter()
            .map(|(address, ledger)| (address.clone(), ledger.snapshot()))
            .collect();

        WalletRecord {
            identity: self.identity.clone(),
            last_pos: state.last_pos,
            addresses,
            keys: self.keys.clone(),
        }
    }

    /// Rebuild a wallet from a record. Balances are recomputed from the
    /// recorded unspents.
    pub fn from_record(
        record: WalletRecord,
        config: LedgerConfig,
        collaborators: Collaborators,
    ) -> Result<Self> {
        record.validate()?;

        let addresses = record
            .addresses
            .into_iter()
            .map(|(address, snapshot)| (address, Arc::new(AddressLedger::from_snapshot(snapshot))))
            .collect();

        log::debug!(
            "Restored wallet {} at lastpos {}",
            record.identity.uid,
            record.last_pos
        );

        Ok(Self::with_state(
            record.identity,
            record.keys,
            config,
            collaborators,
            LedgerState {
                last_pos: record.last_pos,
                addresses,
            },
        ))
    }
}
