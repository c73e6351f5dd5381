//! Wallet data model - wallets, accounts, declared capabilities
//!
//! The host registry hands out fresh objects on every enumeration change, so
//! account identity is structural: owning wallet name + address. Nothing in
//! this module compares by pointer or by position.
//!
//! # Types
//!
//! | Type | Description |
//! |------|-------------|
//! | `Wallet` | one installed extension/signer: unique name, icon, ordered accounts, capability set |
//! | `WalletAccount` | one account a wallet exposes: base58 address + optional icon |
//! | `AccountRef` | a selection: owning wallet name + address, survives registry refreshes |
//! | `WalletFeature` | tagged capability, serialized under its wallet-standard identifier |
//! | `FeatureSet` | capability set checked by membership |

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One account exposed by a wallet. The address is a base58-encoded public
/// key string and never changes for a given account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl WalletAccount {
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), icon: None }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// A connected browser extension or signer. `name` is the unique display
/// identifier; the account list stays in the order the wallet reports.
/// Wallets come and go as the user installs/enables/disables extensions -
/// this crate never owns their lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub accounts: Vec<WalletAccount>,
    #[serde(default)]
    pub features: FeatureSet,
}

impl Wallet {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), icon: None, accounts: Vec::new(), features: FeatureSet::new() }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_accounts(mut self, accounts: Vec<WalletAccount>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    pub fn contains_address(&self, address: &str) -> bool {
        self.accounts.iter().any(|account| account.address == address)
    }

    pub fn first_account(&self) -> Option<&WalletAccount> {
        self.accounts.first()
    }
}

/// Reference to one account of one wallet - what the selector holds and the
/// UI renders. Carries the owning wallet's name so the account can be
/// re-resolved after the registry replaces its objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub wallet_name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl AccountRef {
    /// Pair an account with its owning wallet. The icon falls back to the
    /// wallet's own icon when the account has none.
    pub fn new(wallet: &Wallet, account: &WalletAccount) -> Self {
        Self {
            wallet_name: wallet.name.clone(),
            address: account.address.clone(),
            icon: account.icon.clone().or_else(|| wallet.icon.clone()),
        }
    }

    /// Same logical account iff owning wallet name and address both match.
    pub fn is_same_account(&self, wallet: &Wallet, account: &WalletAccount) -> bool {
        self.wallet_name == wallet.name && self.address == account.address
    }

    /// Membership test: does `wallet` currently expose this account?
    pub fn belongs_to(&self, wallet: &Wallet) -> bool {
        self.wallet_name == wallet.name && wallet.contains_address(&self.address)
    }

    /// Ownership by wallet identity alone; the wallet may have dropped the
    /// address since.
    pub fn is_owned_by(&self, wallet: &Wallet) -> bool {
        self.wallet_name == wallet.name
    }
}

/// A capability a wallet declares, serialized under its wallet-standard
/// identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WalletFeature {
    #[serde(rename = "standard:connect")]
    Connect,
    #[serde(rename = "standard:disconnect")]
    Disconnect,
    #[serde(rename = "standard:events")]
    Events,
    #[serde(rename = "solana:signAndSendTransaction")]
    SignAndSendTransaction,
    #[serde(rename = "solana:signTransaction")]
    SignTransaction,
    #[serde(rename = "solana:signMessage")]
    SignMessage,
}

impl WalletFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletFeature::Connect => "standard:connect",
            WalletFeature::Disconnect => "standard:disconnect",
            WalletFeature::Events => "standard:events",
            WalletFeature::SignAndSendTransaction => "solana:signAndSendTransaction",
            WalletFeature::SignTransaction => "solana:signTransaction",
            WalletFeature::SignMessage => "solana:signMessage",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "standard:connect" => Some(WalletFeature::Connect),
            "standard:disconnect" => Some(WalletFeature::Disconnect),
            "standard:events" => Some(WalletFeature::Events),
            "solana:signAndSendTransaction" => Some(WalletFeature::SignAndSendTransaction),
            "solana:signTransaction" => Some(WalletFeature::SignTransaction),
            "solana:signMessage" => Some(WalletFeature::SignMessage),
            _ => None,
        }
    }
}

impl fmt::Display for WalletFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared capability set, checked by membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeSet<WalletFeature>);

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(features: &[WalletFeature]) -> Self {
        Self(features.iter().copied().collect())
    }

    /// Connect + disconnect + change events: what a conforming wallet
    /// declares at minimum.
    pub fn standard() -> Self {
        Self::of(&[WalletFeature::Connect, WalletFeature::Disconnect, WalletFeature::Events])
    }

    pub fn supports(&self, feature: WalletFeature) -> bool {
        self.0.contains(&feature)
    }

    pub fn insert(&mut self, feature: WalletFeature) {
        self.0.insert(feature);
    }

    pub fn iter(&self) -> impl Iterator<Item = WalletFeature> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<WalletFeature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = WalletFeature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
