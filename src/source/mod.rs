//! Wallet source capability - the live wallet registry
//!
//! The host environment enumerates installed wallets and the accounts each
//! one has authorized. The enumeration is live: wallets appear and vanish as
//! extensions load or get disabled, account lists change as users authorize
//! and revoke. `connect`/`disconnect` may put a prompt in front of the user,
//! so their latency is the host's problem; this crate only observes the
//! account lists that come back.

use crate::error::SourceError;
use crate::wallet::{Wallet, WalletAccount};
use std::sync::Mutex;
use tracing::info;

pub trait WalletSource: Send + Sync {
    /// Snapshot of the current enumeration.
    fn wallets(&self) -> Vec<Wallet>;

    /// Authorize accounts for the named wallet. Returns the accounts the
    /// wallet now exposes.
    fn connect(&self, wallet_name: &str) -> Result<Vec<WalletAccount>, SourceError>;

    /// Revoke the named wallet's authorization, emptying its account list.
    fn disconnect(&self, wallet_name: &str) -> Result<(), SourceError>;
}

/// In-process registry. Hosts and tests script it: stage the accounts a
/// wallet would grant, then drive connect/disconnect and enumeration
/// changes by hand.
#[derive(Debug, Default)]
pub struct MemorySource {
    inner: Mutex<Vec<Entry>>,
}

#[derive(Debug, Clone)]
struct Entry {
    wallet: Wallet,
    /// Accounts a `connect` call grants. Kept apart from `wallet.accounts`
    /// so a wallet can be present but not yet connected.
    grantable: Vec<WalletAccount>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a wallet and the accounts it will grant on connect.
    pub fn add_wallet(&self, wallet: Wallet, grantable: Vec<WalletAccount>) {
        if let Ok(mut entries) = self.inner.lock() {
            entries.retain(|entry| entry.wallet.name != wallet.name);
            entries.push(Entry { wallet, grantable });
        }
    }

    /// Drop a wallet from the enumeration, as if its extension were
    /// disabled.
    pub fn remove_wallet(&self, wallet_name: &str) {
        if let Ok(mut entries) = self.inner.lock() {
            entries.retain(|entry| entry.wallet.name != wallet_name);
        }
    }

    /// Replace a wallet's exposed accounts, as if it re-authorized with a
    /// different list.
    pub fn set_accounts(&self, wallet_name: &str, accounts: Vec<WalletAccount>) {
        if let Ok(mut entries) = self.inner.lock() {
            if let Some(entry) = entries.iter_mut().find(|entry| entry.wallet.name == wallet_name) {
                entry.wallet.accounts = accounts;
            }
        }
    }
}

impl WalletSource for MemorySource {
    fn wallets(&self) -> Vec<Wallet> {
        self.inner
            .lock()
            .map(|entries| entries.iter().map(|entry| entry.wallet.clone()).collect())
            .unwrap_or_default()
    }

    fn connect(&self, wallet_name: &str) -> Result<Vec<WalletAccount>, SourceError> {
        let mut entries = self
            .inner
            .lock()
            .map_err(|_| SourceError::Wallet("registry lock".into()))?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.wallet.name == wallet_name)
            .ok_or_else(|| SourceError::UnknownWallet(wallet_name.to_string()))?;
        entry.wallet.accounts = entry.grantable.clone();
        info!("wallet {} connected with {} accounts", wallet_name, entry.wallet.accounts.len());
        Ok(entry.wallet.accounts.clone())
    }

    fn disconnect(&self, wallet_name: &str) -> Result<(), SourceError> {
        let mut entries = self
            .inner
            .lock()
            .map_err(|_| SourceError::Wallet("registry lock".into()))?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.wallet.name == wallet_name)
            .ok_or_else(|| SourceError::UnknownWallet(wallet_name.to_string()))?;
        entry.wallet.accounts.clear();
        info!("wallet {} disconnected", wallet_name);
        Ok(())
    }
}
