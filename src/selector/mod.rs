//! Selected-account state machine
//!
//! Tracks which wallet account the user has chosen, persists the choice as
//! `"<wallet-name>:<account-address>"`, and re-resolves it against every
//! change of the wallet enumeration. Misses are never errors: extensions
//! load late and permissions get revoked out-of-band, so "no resolvable
//! selection" is the steady state and every failure path degrades to `None`.
//!
//! Two pieces of state matter:
//! - `selected` is the sticky intent - the reference last restored or
//!   explicitly chosen. It survives registry refreshes until reconciliation
//!   finds nothing to resolve it to.
//! - `resolved` is what reconciliation last mapped `selected` onto, and the
//!   only value readers see. It is never left dangling.

use crate::store::KeyValueStore;
use crate::wallet::{AccountRef, Wallet};
use tracing::debug;

/// Storage key for the persisted selection.
pub const SELECTED_ACCOUNT_KEY: &str = "wallet";

#[derive(Debug, Default)]
pub struct Selector {
    selected: Option<AccountRef>,
    resolved: Option<AccountRef>,
    /// One-shot: set by the first explicit `select` and never cleared.
    /// While set, persisted restoration stays off for the rest of the
    /// process, even across rebuilds of the owning UI tree.
    user_has_chosen: bool,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct with the sticky-choice flag pre-set, for owners that carry
    /// it across selector rebuilds.
    pub fn with_user_choice(user_has_chosen: bool) -> Self {
        Self { user_has_chosen, ..Self::default() }
    }

    /// The account readers should use, as of the last reconciliation.
    pub fn current(&self) -> Option<&AccountRef> {
        self.resolved.as_ref()
    }

    pub fn user_has_chosen(&self) -> bool {
        self.user_has_chosen
    }

    /// Restore the persisted choice against the current enumeration.
    ///
    /// Returns `None` when the user already chose this process, when nothing
    /// (or something malformed) is stored, or when the stored wallet/address
    /// is not currently exposed. A hit replaces `selected`; a miss leaves it
    /// alone. Absence is a normal outcome, not a failure.
    pub fn initialize(&mut self, wallets: &[Wallet], store: &dyn KeyValueStore) -> Option<AccountRef> {
        if self.user_has_chosen {
            // After an explicit choice, stop trying to auto-select the
            // saved account, if and when it appears.
            return None;
        }
        let saved = store.get(SELECTED_ACCOUNT_KEY)?;
        let (wallet_name, address) = parse_saved(&saved)?;
        let wallet = wallets.iter().find(|wallet| wallet.name == wallet_name)?;
        let account = wallet.accounts.iter().find(|account| account.address == address)?;
        let restored = AccountRef::new(wallet, account);
        debug!("restored persisted selection {}:{}", wallet.name, restored.address);
        self.selected = Some(restored.clone());
        Some(restored)
    }

    /// Explicit selection. Sets the sticky-choice flag even when clearing.
    ///
    /// Selecting an account persists `"<wallet-name>:<address>"` if some
    /// enumerated wallet currently exposes it; otherwise persistence is
    /// skipped. Selecting `None` deletes the persisted entry.
    pub fn select(
        &mut self,
        account: Option<AccountRef>,
        wallets: &[Wallet],
        store: &dyn KeyValueStore,
    ) {
        self.user_has_chosen = true;
        match &account {
            Some(reference) => {
                if let Some(wallet) = wallets.iter().find(|wallet| reference.belongs_to(wallet)) {
                    store.set(SELECTED_ACCOUNT_KEY, &format_saved(&wallet.name, &reference.address));
                }
            }
            None => store.delete(SELECTED_ACCOUNT_KEY),
        }
        self.selected = account;
    }

    /// Re-resolve `selected` against a changed enumeration. First match
    /// wins: the same account under a fresh object, then the owning
    /// wallet's first account (the wallet re-authorized with a different
    /// address list), then `None`.
    ///
    /// A `None` resolution while a selection was held is an implicit
    /// disconnect: in-memory state clears but the persisted entry stays.
    /// Only an explicit `select(None, ..)` deletes storage, so a selection
    /// lost to flaky enumeration can still be restored later.
    pub fn reconcile(&mut self, wallets: &[Wallet]) -> Option<AccountRef> {
        self.resolved = self.resolve(wallets);
        if self.selected.is_some() && self.resolved.is_none() {
            debug!("selected account no longer resolvable, clearing");
            self.selected = None;
        }
        self.resolved.clone()
    }

    fn resolve(&self, wallets: &[Wallet]) -> Option<AccountRef> {
        let reference = self.selected.as_ref()?;
        for wallet in wallets {
            for account in &wallet.accounts {
                if reference.is_same_account(wallet, account) {
                    return Some(AccountRef::new(wallet, account));
                }
            }
        }
        for wallet in wallets {
            if reference.is_owned_by(wallet) {
                if let Some(first) = wallet.first_account() {
                    debug!(
                        "address {} gone from {}, falling back to its first account",
                        reference.address, wallet.name
                    );
                    return Some(AccountRef::new(wallet, first));
                }
            }
        }
        None
    }
}

/// Split a persisted value at the first `:`. Both halves must be non-empty;
/// anything else counts as absent.
fn parse_saved(saved: &str) -> Option<(&str, &str)> {
    let (wallet_name, address) = saved.split_once(':')?;
    if wallet_name.is_empty() || address.is_empty() {
        return None;
    }
    Some((wallet_name, address))
}

fn format_saved(wallet_name: &str, address: &str) -> String {
    format!("{}:{}", wallet_name, address)
}
