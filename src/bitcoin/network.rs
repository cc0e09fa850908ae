//! Bitcoin network utility

use bitcoin::Network;

/// Parse a network name as accepted in configuration.
///
/// Accepts the rust-bitcoin names plus the Core-style aliases `main`/`mainnet`
/// and `test`.
pub fn parse_network(name: &str) -> Option<Network> {
    match name.trim().to_lowercase().as_str() {
        "bitcoin" | "main" | "mainnet" => Some(Network::Bitcoin),
        "testnet" | "test" => Some(Network::Testnet),
        "signet" => Some(Network::Signet),
        "regtest" => Some(Network::Regtest),
        _ => None,
    }
}
