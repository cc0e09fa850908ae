//! Common test utilities for ledger integration tests
//!
//! This module provides shared test infrastructure including:
//! - A scripted derivation collaborator that can be told to fail
//! - A fixed-size estimator that records its arguments
//! - Builders for unspents, transactions and wallets

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bitcoin::{Network, ScriptBuf};
use parking_lot::Mutex;
use thresh_ledger::{
    AddressKind, Collaborators, KeyDeriver, LedgerConfig, LedgerError, SizeEstimator, Tx, Unspent,
    Wallet, WalletIdentity, WalletKeys,
};

pub fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// Derives `addr-<kind>-<pos>` and `svrpub-<pos>`. Positions listed in
/// `failing` fail until cleared.
#[derive(Default)]
pub struct ScriptedDeriver {
    pub address_calls: AtomicUsize,
    pub pubkey_calls: AtomicUsize,
    failing: Mutex<HashSet<u32>>,
}

impl ScriptedDeriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_at(&self, pos: u32) {
        self.failing.lock().insert(pos);
    }

    pub fn clear_failures(&self) {
        self.failing.lock().clear();
    }

    pub fn pubkey_calls(&self) -> usize {
        self.pubkey_calls.load(Ordering::SeqCst)
    }

    pub fn address_calls(&self) -> usize {
        self.address_calls.load(Ordering::SeqCst)
    }
}

impl KeyDeriver for ScriptedDeriver {
    fn derive_shared_address(
        &self,
        pos: u32,
        _svr_master_prv_key: &str,
        _cli_master_pub_key: &str,
        _network: Network,
        kind: AddressKind,
    ) -> thresh_ledger::Result<String> {
        self.address_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().contains(&pos) {
            return Err(LedgerError::Derivation(format!("scripted failure at {}", pos)));
        }
        Ok(format!("addr-{}-{}", kind, pos))
    }

    fn derive_server_pubkey(
        &self,
        pos: u32,
        _svr_master_prv_key: &str,
        _network: Network,
    ) -> thresh_ledger::Result<String> {
        self.pubkey_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("svrpub-{}", pos))
    }
}

/// Returns a fixed size and remembers every `(inputs, outputs)` it was asked for
pub struct FixedSize {
    pub size: u64,
    pub calls: Mutex<Vec<(usize, usize)>>,
}

impl FixedSize {
    pub fn new(size: u64) -> Arc<Self> {
        Arc::new(Self {
            size,
            calls: Mutex::new(Vec::new()),
        })
    }
}

impl SizeEstimator for FixedSize {
    fn estimate_size(&self, inputs: usize, outputs: usize) -> u64 {
        self.calls.lock().push((inputs, outputs));
        self.size
    }
}

/// Wallet wired to the given collaborators on regtest
pub struct TestWallet {
    pub wallet: Arc<Wallet>,
    pub deriver: Arc<ScriptedDeriver>,
    pub estimator: Arc<FixedSize>,
}

impl TestWallet {
    pub fn new(size: u64) -> Self {
        init_logging();
        let deriver = ScriptedDeriver::new();
        let estimator = FixedSize::new(size);
        let wallet = Arc::new(Wallet::new(
            WalletIdentity::new("user-1", "device-1"),
            test_keys(),
            LedgerConfig::for_network(Network::Regtest),
            Collaborators::new(deriver.clone(), estimator.clone()),
        ));
        Self {
            wallet,
            deriver,
            estimator,
        }
    }

    /// Create `n` addresses and return their strings in creation order
    pub fn with_addresses(&self, n: usize) -> Vec<String> {
        (0..n)
            .map(|_| {
                self.wallet
                    .create_address(AddressKind::P2wsh)
                    .expect("create address")
                    .address
            })
            .collect()
    }
}

pub fn test_keys() -> WalletKeys {
    WalletKeys::new("tprv-server-master", "tpub-client-master")
}

pub fn unspent(txid: &str, value: u64, confirmed: bool) -> Unspent {
    Unspent {
        txid: txid.to_string(),
        vout: 0,
        value,
        confirmed,
        block_time: if confirmed { 1_600_000_000 } else { 0 },
        block_height: if confirmed { 100 } else { 0 },
        script_pubkey: ScriptBuf::from_bytes(vec![0x00, 0x20, value as u8]),
    }
}

pub fn tx(txid: &str, confirmed: bool, block_time: i64) -> Tx {
    Tx {
        txid: txid.to_string(),
        fee: 250,
        value: 10_000,
        confirmed,
        block_time,
        block_height: if confirmed { block_time / 600 } else { 0 },
    }
}
