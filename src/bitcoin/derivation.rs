use bitcoin::bip32::{ChildNumber, Xpriv, Xpub};
use bitcoin::opcodes::all::{OP_CHECKMULTISIG, OP_PUSHNUM_2};
use bitcoin::script::{Builder, ScriptBuf};
use bitcoin::secp256k1::{All, Secp256k1};
use bitcoin::{Address, Network, PublicKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;
use crate::Result;

/// Script type a shared address is encoded as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressKind {
    P2sh,
    #[default]
    P2wsh,
    P2shP2wsh,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::P2sh => "p2sh",
            Self::P2wsh => "p2wsh",
            Self::P2shP2wsh => "p2sh-p2wsh",
        };
        f.write_str(name)
    }
}

impl FromStr for AddressKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "p2sh" => Ok(Self::P2sh),
            "p2wsh" => Ok(Self::P2wsh),
            "p2sh-p2wsh" | "p2sh_p2wsh" | "p2shwsh" => Ok(Self::P2shP2wsh),
            other => Err(LedgerError::Config(format!(
                "unknown address kind '{}'",
                other
            ))),
        }
    }
}

/// Derivation collaborator: combines the server and client key shares into
/// addresses and derives the server's co-signing key per index.
///
/// Implementations must be deterministic: the same inputs always yield the
/// same output.
pub trait KeyDeriver: Send + Sync {
    fn derive_shared_address(
        &self,
        pos: u32,
        svr_master_prv_key: &str,
        cli_master_pub_key: &str,
        network: Network,
        kind: AddressKind,
    ) -> Result<String>;

    fn derive_server_pubkey(
        &self,
        pos: u32,
        svr_master_prv_key: &str,
        network: Network,
    ) -> Result<String>;
}

/// BIP32 2-of-2 multisig derivation.
///
/// Both shares derive the non-hardened child `pos` directly below their
/// master key. The two child keys are sorted (BIP67) into a
/// `2 <k1> <k2> 2 CHECKMULTISIG` script.
pub struct MultisigDeriver {
    secp: Secp256k1<All>,
}

impl MultisigDeriver {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }

    fn child_number(pos: u32) -> Result<ChildNumber> {
        ChildNumber::from_normal_idx(pos).map_err(|e| LedgerError::derivation(e.to_string()))
    }

    fn server_child(&self, pos: u32, svr_master_prv_key: &str) -> Result<PublicKey> {
        let master = Xpriv::from_str(svr_master_prv_key).map_err(|e| {
            LedgerError::derivation(format!("invalid server master key: {}", e))
        })?;

        let derived = master
            .derive_priv(&self.secp, &[Self::child_number(pos)?])
            .map_err(|e| LedgerError::derivation(e.to_string()))?;

        Ok(PublicKey::new(Xpub::from_priv(&self.secp, &derived).public_key))
    }

    fn client_child(&self, pos: u32, cli_master_pub_key: &str) -> Result<PublicKey> {
        let master = Xpub::from_str(cli_master_pub_key).map_err(|e| {
            LedgerError::derivation(format!("invalid client master key: {}", e))
        })?;

        let derived = master
            .derive_pub(&self.secp, &[Self::child_number(pos)?])
            .map_err(|e| LedgerError::derivation(e.to_string()))?;

        Ok(PublicKey::new(derived.public_key))
    }

    /// The 2-of-2 script both shares must sign for at index `pos`
    pub fn shared_script(
        &self,
        pos: u32,
        svr_master_prv_key: &str,
        cli_master_pub_key: &str,
    ) -> Result<ScriptBuf> {
        let mut keys = [
            self.server_child(pos, svr_master_prv_key)?,
            self.client_child(pos, cli_master_pub_key)?,
        ];
        keys.sort_by_key(|k| k.to_bytes());

        Ok(Builder::new()
            .push_opcode(OP_PUSHNUM_2)
            .push_key(&keys[0])
            .push_key(&keys[1])
            .push_opcode(OP_PUSHNUM_2)
            .push_opcode(OP_CHECKMULTISIG)
            .into_script())
    }
}

impl Default for MultisigDeriver {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDeriver for MultisigDeriver {
    fn derive_shared_address(
        &self,
        pos: u32,
        svr_master_prv_key: &str,
        cli_master_pub_key: &str,
        network: Network,
        kind: AddressKind,
    ) -> Result<String> {
        let script = self.shared_script(pos, svr_master_prv_key, cli_master_pub_key)?;

        let address = match kind {
            AddressKind::P2wsh => Address::p2wsh(&script, network),
            AddressKind::P2shP2wsh => Address::p2shwsh(&script, network),
            AddressKind::P2sh => Address::p2sh(&script, network)
                .map_err(|e| LedgerError::derivation(e.to_string()))?,
        };

        Ok(address.to_string())
    }

    fn derive_server_pubkey(
        &self,
        pos: u32,
        svr_master_prv_key: &str,
        _network: Network,
    ) -> Result<String> {
        Ok(self.server_child(pos, svr_master_prv_key)?.to_string())
    }
}
