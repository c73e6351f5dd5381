//! Chain selection - which Solana cluster the session points at
//!
//! Carries endpoint data for the external RPC collaborators; nothing here
//! opens a connection. The choice persists under its own storage key and
//! falls back to devnet when the stored value is unrecognized. Mainnet is
//! gated behind a config flag and resolves to testnet while the gate is
//! closed.

use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

/// Storage key for the persisted cluster choice.
pub const SELECTED_CHAIN_KEY: &str = "selected-chain";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChainId {
    #[default]
    #[serde(rename = "solana:devnet")]
    Devnet,
    #[serde(rename = "solana:testnet")]
    Testnet,
    #[serde(rename = "solana:mainnet")]
    Mainnet,
}

impl ChainId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainId::Devnet => "solana:devnet",
            ChainId::Testnet => "solana:testnet",
            ChainId::Mainnet => "solana:mainnet",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "solana:devnet" => Some(ChainId::Devnet),
            "solana:testnet" => Some(ChainId::Testnet),
            "solana:mainnet" => Some(ChainId::Mainnet),
            _ => None,
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection endpoints and display metadata for one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain: ChainId,
    pub display_name: String,
    /// Cluster name Solana Explorer expects in its `cluster` query param.
    pub explorer_cluster: String,
    pub rpc_url: String,
    pub rpc_subscriptions_url: String,
}

impl ChainConfig {
    pub fn devnet() -> Self {
        Self {
            chain: ChainId::Devnet,
            display_name: "Devnet".into(),
            explorer_cluster: "devnet".into(),
            rpc_url: "https://api.devnet.solana.com".into(),
            rpc_subscriptions_url: "wss://api.devnet.solana.com".into(),
        }
    }

    pub fn testnet() -> Self {
        Self {
            chain: ChainId::Testnet,
            display_name: "Testnet".into(),
            explorer_cluster: "testnet".into(),
            rpc_url: "https://api.testnet.solana.com".into(),
            rpc_subscriptions_url: "wss://api.testnet.solana.com".into(),
        }
    }

    pub fn mainnet() -> Self {
        Self {
            chain: ChainId::Mainnet,
            display_name: "Mainnet Beta".into(),
            explorer_cluster: "mainnet-beta".into(),
            rpc_url: "https://api.mainnet-beta.solana.com".into(),
            rpc_subscriptions_url: "wss://api.mainnet-beta.solana.com".into(),
        }
    }
}

/// The session's cluster choice plus the mainnet gate.
#[derive(Debug, Clone)]
pub struct ChainSelection {
    chain: ChainId,
    mainnet_enabled: bool,
}

impl ChainSelection {
    /// Restore the persisted choice. An unrecognized stored value is
    /// deleted, logged, and replaced by the devnet default.
    pub fn restore(store: &dyn KeyValueStore, mainnet_enabled: bool) -> Self {
        let chain = match store.get(SELECTED_CHAIN_KEY) {
            Some(saved) => match ChainId::from_str(&saved) {
                Some(chain) => chain,
                None => {
                    store.delete(SELECTED_CHAIN_KEY);
                    error!("Unrecognized chain `{}`", saved);
                    ChainId::default()
                }
            },
            None => ChainId::default(),
        };
        Self { chain, mainnet_enabled }
    }

    pub fn chain(&self) -> ChainId {
        self.chain
    }

    /// Persist and switch.
    pub fn set(&mut self, chain: ChainId, store: &dyn KeyValueStore) {
        store.set(SELECTED_CHAIN_KEY, chain.as_str());
        self.chain = chain;
    }

    /// Resolve the effective config. A mainnet choice while the gate is
    /// closed resolves to testnet rather than erroring.
    pub fn config(&self) -> ChainConfig {
        match self.chain {
            ChainId::Mainnet if self.mainnet_enabled => ChainConfig::mainnet(),
            ChainId::Mainnet | ChainId::Testnet => ChainConfig::testnet(),
            ChainId::Devnet => ChainConfig::devnet(),
        }
    }
}
