/// Address Ledger
///
/// Per-address state is an immutable `AddressState` behind an `Arc`. Ingestion
/// builds the next state under the write lock and swaps it in one step, so a
/// reader holding any state sees a balance computed from exactly the unspents
/// next to it.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::types::{Balance, Tx, Unspent};

/// Current view of one address. Replaced wholesale on every ingestion.
#[derive(Debug)]
pub(crate) struct AddressState {
    pub balance: Balance,
    pub unspents: Arc<[Unspent]>,
    pub txs: Arc<[Tx]>,
}

/// Owned copy of an address and its current view, in wire form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSnapshot {
    pub pos: u32,
    pub address: String,
    pub balance: Balance,
    pub txs: Vec<Tx>,
    pub unspents: Vec<Unspent>,
}

pub(crate) struct AddressLedger {
    pos: u32,
    address: String,
    current: RwLock<Arc<AddressState>>,
}

impl AddressLedger {
    pub fn new(pos: u32, address: String) -> Self {
        Self {
            pos,
            address,
            current: RwLock::new(Arc::new(AddressState {
                balance: Balance::default(),
                unspents: Arc::from(Vec::<Unspent>::new()),
                txs: Arc::from(Vec::<Tx>::new()),
            })),
        }
    }

    /// Rebuild a ledger from a stored snapshot. The stored balance is ignored
    /// and recomputed from the unspents.
    pub fn from_snapshot(snapshot: AddressSnapshot) -> Self {
        let state = AddressState {
            balance: Balance::from_unspents(&snapshot.unspents),
            unspents: snapshot.unspents.into(),
            txs: snapshot.txs.into(),
        };
        Self {
            pos: snapshot.pos,
            address: snapshot.address,
            current: RwLock::new(Arc::new(state)),
        }
    }

    pub fn pos(&self) -> u32 {
        self.pos
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn current(&self) -> Arc<AddressState> {
        self.current.read().clone()
    }

    pub fn snapshot(&self) -> AddressSnapshot {
        let current = self.current();
        AddressSnapshot {
            pos: self.pos,
            address: self.address.clone(),
            balance: current.balance,
            txs: current.txs.to_vec(),
            unspents: current.unspents.to_vec(),
        }
    }

    /// Replace the unspent set and recompute the balance in the same swap
    pub fn replace_unspents(&self, unspents: Vec<Unspent>) -> Balance {
        let mut current = self.current.write();
        let balance = Balance::from_unspents(&unspents);
        let next = AddressState {
            balance,
            unspents: unspents.into(),
            txs: current.txs.clone(),
        };
        *current = Arc::new(next);
        balance
    }

    pub fn replace_txs(&self, txs: Vec<Tx>) {
        let mut current = self.current.write();
        let next = AddressState {
            balance: current.balance,
            unspents: current.unspents.clone(),
            txs: txs.into(),
        };
        *current = Arc::new(next);
    }
}
