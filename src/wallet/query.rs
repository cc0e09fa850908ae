//! Query Layer: balances and transaction history

use std::cmp::Ordering;

use super::address::AddressSnapshot;
use super::ledger::Wallet;
use super::types::{Balance, Tx};
use crate::Result;

/// History order: unconfirmed transactions first, then confirmed ones by
/// block time descending, ties broken by block height descending.
///
/// Used with a stable sort, so anything this leaves equal keeps its
/// scan order.
pub fn history_order(a: &Tx, b: &Tx) -> Ordering {
    match (a.confirmed, b.confirmed) {
        (false, false) => Ordering::Equal,
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => b
            .block_time
            .cmp(&a.block_time)
            .then_with(|| b.block_height.cmp(&a.block_height)),
    }
}

impl Wallet {
    /// Sum of every address's balance
    pub fn balance(&self) -> Balance {
        let state = self.state.lock();
        state
            .addresses
            .values()
            .fold(Balance::default(), |mut balance, ledger| {
                balance += ledger.current().balance;
                balance
            })
    }

    pub fn address_balance(&self, address: &str) -> Result<Balance> {
        Ok(self.lookup(address)?.current().balance)
    }

    /// One address with its current unspents and history
    pub fn address(&self, address: &str) -> Result<AddressSnapshot> {
        Ok(self.lookup(address)?.snapshot())
    }

    /// Every address, in derivation order
    pub fn addresses(&self) -> Vec<AddressSnapshot> {
        let state = self.state.lock();
        state.by_pos().into_iter().map(|ledger| ledger.snapshot()).collect()
    }

    /// A page of the wallet's history across all addresses.
    ///
    /// Empty when `offset` is past the end, otherwise up to `limit` entries
    /// starting at `offset`.
    pub fn transactions(&self, offset: usize, limit: usize) -> Vec<Tx> {
        let mut txs = Vec::new();
        {
            let state = self.state.lock();
            for ledger in state.by_pos() {
                txs.extend(ledger.current().txs.iter().cloned());
            }
        }

        if offset >= txs.len() {
            return Vec::new();
        }

        txs.sort_by(history_order);
        txs.into_iter().skip(offset).take(limit).collect()
    }

    /// Number of transactions across all addresses
    pub fn transaction_count(&self) -> usize {
        let state = self.state.lock();
        state
            .addresses
            .values()
            .map(|ledger| ledger.current().txs.len())
            .sum()
    }
}
