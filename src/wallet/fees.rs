//! Fee Estimator

use super::ledger::Wallet;
use super::selection::select_largest_first;
use super::types::SendFees;
use crate::error::LedgerError;
use crate::Result;

/// `floor(size * fee_per_kb / 1000)`, saturating at `u64::MAX`
pub fn fee_for_size(size_bytes: u64, fee_per_kb: u64) -> u64 {
    let fee = u128::from(size_bytes) * u128::from(fee_per_kb) / 1000;
    u64::try_from(fee).unwrap_or(u64::MAX)
}

/// Reconcile a requested amount with the fee and the wallet balance.
///
/// When `requested + fees` exceeds the balance the sendable amount is
/// clamped to `total_value - fees` (spend all). A fee that would eat the
/// whole balance is an error.
pub fn quote_send(requested: u64, fees: u64, total_value: u64) -> Result<SendFees> {
    if fees >= total_value {
        return Err(LedgerError::FeesExceedBalance {
            fees,
            balance: total_value,
        });
    }

    let sendable_value = if requested.saturating_add(fees) > total_value {
        total_value - fees
    } else {
        requested
    };

    Ok(SendFees {
        fees,
        total_value,
        sendable_value,
    })
}

impl Wallet {
    /// Quote the fee and sendable amount for a spend of `requested` sats at
    /// `fee_per_kb` sats per 1000 bytes.
    ///
    /// Selection and balance come from the same scan of the ledger.
    pub fn estimate_send_fees(&self, requested: u64, fee_per_kb: u64) -> Result<SendFees> {
        let (candidates, total_value) = self.spend_candidates()?;
        let selected = select_largest_first(candidates, requested, total_value)?;

        let size = self
            .collaborators
            .estimator
            .estimate_size(selected.len(), self.config.fee_outputs);
        let fees = fee_for_size(size, fee_per_kb);

        let quote = quote_send(requested, fees, total_value)?;
        log::debug!(
            "Fee quote for wallet {}: {} inputs, {} bytes, {} sats fee, {} of {} sats sendable",
            self.identity.uid,
            selected.len(),
            size,
            quote.fees,
            quote.sendable_value,
            quote.total_value
        );
        Ok(quote)
    }
}
