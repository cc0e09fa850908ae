//! Ledger entities and their wire records

use bitcoin::{Amount, ScriptBuf};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

use crate::error::LedgerError;
use crate::Result;

/// An unspent output reported by the chain feed for one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unspent {
    pub txid: String,
    pub vout: u32,
    pub value: u64,
    pub confirmed: bool,
    pub block_time: u32,
    pub block_height: u32,
    #[serde(rename = "Scriptpubkey")]
    pub script_pubkey: ScriptBuf,
}

/// A transaction touching one address, as reported by the chain feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub txid: String,
    pub fee: i64,
    /// Net value to the wallet, negative for outgoing transactions
    pub value: i64,
    pub confirmed: bool,
    pub block_time: i64,
    pub block_height: i64,
}

/// Total and unconfirmed-only value of a set of unspents.
///
/// Always derived from the unspents it describes, never adjusted in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(rename = "total_balance")]
    pub total: u64,
    #[serde(rename = "unconfirmed_balance")]
    pub unconfirmed: u64,
}

impl Balance {
    /// Balance of a snapshot already accepted by [`Balance::checked_from_unspents`].
    /// Saturates rather than wrapping.
    pub fn from_unspents(unspents: &[Unspent]) -> Self {
        unspents.iter().fold(Self::default(), |mut balance, unspent| {
            if !unspent.confirmed {
                balance.unconfirmed = balance.unconfirmed.saturating_add(unspent.value);
            }
            balance.total = balance.total.saturating_add(unspent.value);
            balance
        })
    }

    /// Balance of a snapshot from the chain feed. Every value and the total
    /// must stay within `Amount::MAX_MONEY`.
    pub fn checked_from_unspents(unspents: &[Unspent]) -> Result<Self> {
        let max = Amount::MAX_MONEY.to_sat();
        let mut balance = Self::default();
        for unspent in unspents {
            if unspent.value > max {
                return Err(LedgerError::invalid_unspent(format!(
                    "{}:{} carries {} sats, above the {} sats money supply",
                    unspent.txid, unspent.vout, unspent.value, max
                )));
            }
            balance.total = balance
                .total
                .checked_add(unspent.value)
                .filter(|total| *total <= max)
                .ok_or_else(|| {
                    LedgerError::invalid_unspent(format!(
                        "snapshot total exceeds the {} sats money supply",
                        max
                    ))
                })?;
            if !unspent.confirmed {
                balance.unconfirmed += unspent.value;
            }
        }
        Ok(balance)
    }

    pub fn confirmed(&self) -> u64 {
        self.total.saturating_sub(self.unconfirmed)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, other: Self) {
        self.total = self.total.saturating_add(other.total);
        self.unconfirmed = self.unconfirmed.saturating_add(other.unconfirmed);
    }
}

/// A spend candidate handed to the co-signing stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub pos: u32,
    pub txid: String,
    pub vout: u32,
    pub value: u64,
    pub address: String,
    pub confirmed: bool,
    #[serde(rename = "svrpubkey")]
    pub svr_pub_key: String,
    #[serde(rename = "Scriptpubkey")]
    pub script_pubkey: ScriptBuf,
}

/// Fee quote for a spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendFees {
    pub fees: u64,
    pub total_value: u64,
    pub sendable_value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletIdentity {
    pub uid: String,
    pub did: String,
}

impl WalletIdentity {
    pub fn new(uid: impl Into<String>, did: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            did: did.into(),
        }
    }
}

/// Key material of the two shares: the server's master private key and the
/// client's master public key, both BIP32 extended key strings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletKeys {
    #[serde(rename = "svrmasterprvkey")]
    pub svr_master_prv_key: String,
    #[serde(rename = "climasterpubkey")]
    pub cli_master_pub_key: String,
}

impl WalletKeys {
    pub fn new(svr_master_prv_key: impl Into<String>, cli_master_pub_key: impl Into<String>) -> Self {
        Self {
            svr_master_prv_key: svr_master_prv_key.into(),
            cli_master_pub_key: cli_master_pub_key.into(),
        }
    }
}

// Keeps the server private key out of logs and panic messages.
impl fmt::Debug for WalletKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletKeys")
            .field("svr_master_prv_key", &"<redacted>")
            .field("cli_master_pub_key", &self.cli_master_pub_key)
            .finish()
    }
}
