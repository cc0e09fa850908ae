/// Ledger configuration from environment variables
///
/// Controls the Bitcoin network handed to the derivation collaborator, the
/// default address kind and the output count used for fee quotes.
/// Defaults to Testnet.

use bitcoin::Network;
use std::env;

use crate::bitcoin::{parse_network, AddressKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Bitcoin network type (for address encoding)
    pub network: Network,
    /// Address kind used when the caller does not name one
    pub address_kind: AddressKind,
    /// Outputs assumed per spend when quoting fees (destination + change)
    pub fee_outputs: usize,
}

impl LedgerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `BITCOIN_NETWORK`: "testnet" (default), "bitcoin"/"mainnet", "signet" or "regtest"
    /// - `ADDRESS_KIND`: "p2wsh" (default), "p2sh" or "p2sh-p2wsh"
    /// - `TX_OUTPUT_COUNT`: outputs per spend for fee quotes (default 2)
    ///
    /// Unparseable values are logged and replaced by their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let network = match lookup("BITCOIN_NETWORK") {
            Some(name) => match parse_network(&name) {
                Some(network) => {
                    log::info!("Using {} network", network);
                    network
                }
                None => {
                    log::warn!(
                        "Unknown network '{}', defaulting to {}",
                        name,
                        defaults.network
                    );
                    defaults.network
                }
            },
            None => defaults.network,
        };

        let address_kind = match lookup("ADDRESS_KIND") {
            Some(kind) => kind.parse().unwrap_or_else(|e| {
                log::warn!("{}, defaulting to {}", e, defaults.address_kind);
                defaults.address_kind
            }),
            None => defaults.address_kind,
        };

        let fee_outputs = match lookup("TX_OUTPUT_COUNT") {
            Some(count) => match count.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    log::warn!(
                        "Invalid TX_OUTPUT_COUNT '{}', defaulting to {}",
                        count,
                        defaults.fee_outputs
                    );
                    defaults.fee_outputs
                }
            },
            None => defaults.fee_outputs,
        };

        Self {
            network,
            address_kind,
            fee_outputs,
        }
    }

    /// Configuration for the given network with every other setting at its default
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            ..Default::default()
        }
    }
}

impl Default for LedgerConfig {
    /// Default configuration (Testnet, P2WSH, two outputs)
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            address_kind: AddressKind::P2wsh,
            fee_outputs: 2,
        }
    }
}
