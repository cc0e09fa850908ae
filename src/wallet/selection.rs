//! Coin Selector
//!
//! Largest-first greedy selection over every unspent in the wallet.

use super::ledger::Wallet;
use super::types::Utxo;
use crate::error::LedgerError;
use crate::Result;

/// Pick the largest candidates until they cover `requested`.
///
/// Candidates are sorted by value descending with a stable sort, so equal
/// values keep their scan order. Selection stops at the first element that
/// brings the running sum to `requested` or above. Fails without a partial
/// result when `available` is below `requested`.
pub fn select_largest_first(
    mut candidates: Vec<Utxo>,
    requested: u64,
    available: u64,
) -> Result<Vec<Utxo>> {
    if available < requested {
        return Err(LedgerError::InsufficientFunds {
            requested,
            available,
        });
    }

    candidates.sort_by(|a, b| b.value.cmp(&a.value));

    let mut selected = Vec::new();
    let mut total = 0u64;
    for utxo in candidates {
        total = total.saturating_add(utxo.value);
        selected.push(utxo);
        if total >= requested {
            break;
        }
    }

    Ok(selected)
}

impl Wallet {
    /// Select the unspents to spend for `requested` sats
    pub fn select_unspents(&self, requested: u64) -> Result<Vec<Utxo>> {
        let (candidates, available) = self.spend_candidates()?;
        let selected = select_largest_first(candidates, requested, available)?;

        log::debug!(
            "Selected {} unspents ({} sats) for {} sats requested from wallet {}",
            selected.len(),
            selected.iter().map(|u| u.value).sum::<u64>(),
            requested,
            self.identity.uid
        );
        Ok(selected)
    }

    /// Flatten every address's unspents into spend candidates, in derivation
    /// order then arrival order, together with the wallet's total balance.
    ///
    /// Runs under the wallet lock. The server public key is derived once per
    /// address that has something to spend.
    pub(super) fn spend_candidates(&self) -> Result<(Vec<Utxo>, u64)> {
        let state = self.state.lock();

        let mut candidates = Vec::new();
        let mut available = 0u64;
        for ledger in state.by_pos() {
            let current = ledger.current();
            available = available.saturating_add(current.balance.total);
            if current.unspents.is_empty() {
                continue;
            }

            let svr_pub_key = self.collaborators.deriver.derive_server_pubkey(
                ledger.pos(),
                &self.keys.svr_master_prv_key,
                self.config.network,
            )?;

            candidates.extend(current.unspents.iter().map(|unspent| Utxo {
                pos: ledger.pos(),
                txid: unspent.txid.clone(),
                vout: unspent.vout,
                value: unspent.value,
                address: ledger.address().to_string(),
                confirmed: unspent.confirmed,
                svr_pub_key: svr_pub_key.clone(),
                script_pubkey: unspent.script_pubkey.clone(),
            }));
        }

        Ok((candidates, available))
    }
}
