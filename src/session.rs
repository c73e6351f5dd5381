//! Session - long-lived owner of the wallet-session state
//!
//! One `Session` per process. It owns the selector and the chain choice,
//! holds the wallet-source and store capabilities, and hands the UI layer
//! cloneable handles. Every operation runs synchronously on the caller's
//! thread; the host invokes `refresh()` after each wallet-registry change so
//! readers never observe a stale or dangling selection.
//!
//! The `Arc<Mutex<_>>` wrapper exists for shared ownership between the
//! session and its handles, not for concurrent mutation - event dispatch is
//! single-threaded.

use crate::chain::{ChainConfig, ChainId, ChainSelection};
use crate::error::SourceError;
use crate::selector::Selector;
use crate::source::WalletSource;
use crate::store::KeyValueStore;
use crate::wallet::{AccountRef, Wallet, WalletFeature};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Session configuration. Embedders construct this.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub enable_mainnet: bool,
    /// Pre-set sticky-choice flag, for embedders that rebuild the session
    /// within one process lifetime.
    pub user_has_chosen: bool,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mainnet(mut self) -> Self {
        self.enable_mainnet = true;
        self
    }

    pub fn with_user_choice(mut self) -> Self {
        self.user_has_chosen = true;
        self
    }
}

pub struct Session {
    inner: Arc<Mutex<SessionInner>>,
}

struct SessionInner {
    source: Arc<dyn WalletSource>,
    store: Arc<dyn KeyValueStore>,
    selector: Selector,
    chain: ChainSelection,
}

impl Session {
    /// Build the session and run the startup pass: restore the persisted
    /// chain and selection, then reconcile against the current enumeration.
    pub fn new(
        source: Arc<dyn WalletSource>,
        store: Arc<dyn KeyValueStore>,
        config: SessionConfig,
    ) -> Self {
        let chain = ChainSelection::restore(store.as_ref(), config.enable_mainnet);
        let mut selector = Selector::with_user_choice(config.user_has_chosen);
        let wallets = source.wallets();
        selector.initialize(&wallets, store.as_ref());
        selector.reconcile(&wallets);
        info!("session ready on {} with {} wallets", chain.chain(), wallets.len());
        Self { inner: Arc::new(Mutex::new(SessionInner { source, store, selector, chain })) }
    }

    /// The account the UI should render, if any.
    pub fn current(&self) -> Option<AccountRef> {
        self.inner.lock().ok().and_then(|inner| inner.selector.current().cloned())
    }

    /// Snapshot of the wallet enumeration, for listing in the UI.
    pub fn wallets(&self) -> Vec<Wallet> {
        self.inner.lock().map(|inner| inner.source.wallets()).unwrap_or_default()
    }

    /// Explicit selection from the UI. `None` clears both the in-memory
    /// selection and the persisted entry.
    pub fn select(&self, account: Option<AccountRef>) {
        if let Ok(mut guard) = self.inner.lock() {
            let inner = &mut *guard;
            let wallets = inner.source.wallets();
            inner.selector.select(account, &wallets, inner.store.as_ref());
            inner.selector.reconcile(&wallets);
        }
    }

    /// Re-run restoration (while still permitted) and reconciliation.
    /// Call after every wallet-registry change, before any UI read.
    pub fn refresh(&self) -> Option<AccountRef> {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(_) => return None,
        };
        let inner = &mut *guard;
        let wallets = inner.source.wallets();
        inner.selector.initialize(&wallets, inner.store.as_ref());
        inner.selector.reconcile(&wallets)
    }

    /// Connect a wallet and select what it granted: the first account that
    /// was not exposed before the call, else the first granted account. A
    /// grant of nothing leaves the selection untouched.
    pub fn connect(&self, wallet_name: &str) -> Result<Option<AccountRef>, SourceError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| SourceError::Wallet("session lock".into()))?;
        let inner = &mut *guard;
        let wallets = inner.source.wallets();
        let wallet = find_wallet(&wallets, wallet_name)?;
        require_feature(wallet, WalletFeature::Connect)?;

        let existing = wallet.accounts.clone();
        let granted = inner.source.connect(wallet_name)?;
        let chosen = granted
            .iter()
            .find(|account| !existing.iter().any(|known| known.address == account.address))
            .or_else(|| granted.first())
            .map(|account| AccountRef::new(wallet, account));

        if let Some(reference) = chosen {
            let wallets = inner.source.wallets();
            inner.selector.select(Some(reference), &wallets, inner.store.as_ref());
            inner.selector.reconcile(&wallets);
        }
        Ok(inner.selector.current().cloned())
    }

    /// Disconnect a wallet. If the current selection belongs to it, the
    /// selection clears through the explicit path (persisted entry
    /// deleted).
    pub fn disconnect(&self, wallet_name: &str) -> Result<(), SourceError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| SourceError::Wallet("session lock".into()))?;
        let inner = &mut *guard;
        let wallets = inner.source.wallets();
        let wallet = find_wallet(&wallets, wallet_name)?;
        require_feature(wallet, WalletFeature::Disconnect)?;

        inner.source.disconnect(wallet_name)?;
        let owned = inner
            .selector
            .current()
            .map_or(false, |reference| reference.wallet_name == wallet_name);
        let wallets = inner.source.wallets();
        if owned {
            inner.selector.select(None, &wallets, inner.store.as_ref());
        }
        inner.selector.reconcile(&wallets);
        Ok(())
    }

    pub fn chain(&self) -> ChainId {
        self.inner.lock().map(|inner| inner.chain.chain()).unwrap_or_default()
    }

    /// Effective endpoints for the current choice (mainnet gate applied).
    pub fn chain_config(&self) -> ChainConfig {
        self.inner
            .lock()
            .map(|inner| inner.chain.config())
            .unwrap_or_else(|_| ChainConfig::devnet())
    }

    pub fn set_chain(&self, chain: ChainId) {
        if let Ok(mut guard) = self.inner.lock() {
            let inner = &mut *guard;
            inner.chain.set(chain, inner.store.as_ref());
        }
    }

    /// UI-facing handle sharing this session's state.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle { session: Session { inner: Arc::clone(&self.inner) } }
    }
}

/// The surface the UI layer consumes: the current selection and its setter,
/// with the chain accessors alongside. Clones all share one session.
pub struct SessionHandle {
    session: Session,
}

impl Clone for SessionHandle {
    fn clone(&self) -> Self {
        self.session.handle()
    }
}

impl SessionHandle {
    pub fn current(&self) -> Option<AccountRef> {
        self.session.current()
    }

    pub fn select(&self, account: Option<AccountRef>) {
        self.session.select(account)
    }

    pub fn wallets(&self) -> Vec<Wallet> {
        self.session.wallets()
    }

    pub fn chain(&self) -> ChainId {
        self.session.chain()
    }

    pub fn chain_config(&self) -> ChainConfig {
        self.session.chain_config()
    }

    pub fn set_chain(&self, chain: ChainId) {
        self.session.set_chain(chain)
    }
}

fn find_wallet<'a>(wallets: &'a [Wallet], name: &str) -> Result<&'a Wallet, SourceError> {
    wallets
        .iter()
        .find(|wallet| wallet.name == name)
        .ok_or_else(|| SourceError::UnknownWallet(name.to_string()))
}

fn require_feature(wallet: &Wallet, feature: WalletFeature) -> Result<(), SourceError> {
    if wallet.features.supports(feature) {
        return Ok(());
    }
    Err(SourceError::Unsupported { wallet: wallet.name.clone(), feature })
}
