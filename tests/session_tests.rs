//! Integration tests: the full session surface
//!
//! These tests verify:
//! 1. Startup restoration of a persisted selection
//! 2. Selection persistence, deletion, and the sticky-choice flag
//! 3. Reconciliation against wallet appearance/disappearance
//! 4. Connect/disconnect flows and capability checks
//! 5. Chain restoration, persistence, and the mainnet gate

use std::sync::Arc;
use wallet_session::{
    AccountRef, ChainId, FeatureSet, KeyValueStore, MemorySource, MemoryStore, NoopStore, Session,
    SessionConfig, SourceError, Wallet, WalletAccount, WalletFeature, SELECTED_ACCOUNT_KEY,
    SELECTED_CHAIN_KEY,
};

fn phantom_connected() -> Wallet {
    Wallet::new("Phantom")
        .with_features(FeatureSet::standard())
        .with_accounts(vec![WalletAccount::new("Addr1"), WalletAccount::new("Addr2")])
}

fn solflare_connected() -> Wallet {
    Wallet::new("Solflare")
        .with_features(FeatureSet::standard())
        .with_accounts(vec![WalletAccount::new("Addr3")])
}

/// Registry whose wallets are already connected (accounts exposed).
fn source_with(wallets: Vec<Wallet>) -> Arc<MemorySource> {
    let source = Arc::new(MemorySource::new());
    for wallet in wallets {
        let grantable = wallet.accounts.clone();
        source.add_wallet(wallet, grantable);
    }
    source
}

fn account(wallet_name: &str, address: &str) -> AccountRef {
    AccountRef { wallet_name: wallet_name.into(), address: address.into(), icon: None }
}

/// Test: a persisted `"<wallet>:<address>"` resolves at startup when the
/// wallet exposes that account.
#[test]
fn startup_restores_persisted_selection() {
    let store = Arc::new(MemoryStore::new());
    store.set(SELECTED_ACCOUNT_KEY, "Phantom:Addr1");

    let session = Session::new(
        source_with(vec![phantom_connected(), solflare_connected()]),
        store,
        SessionConfig::new(),
    );

    let current = session.current().expect("restored");
    assert_eq!(current.wallet_name, "Phantom");
    assert_eq!(current.address, "Addr1");
}

/// Test: malformed persisted values read as absent, without panicking.
#[test]
fn startup_ignores_malformed_persisted_value() {
    for bad in ["malformed-no-colon", ":Addr1", "Phantom:", ""] {
        let store = Arc::new(MemoryStore::new());
        store.set(SELECTED_ACCOUNT_KEY, bad);
        let session =
            Session::new(source_with(vec![phantom_connected()]), store, SessionConfig::new());
        assert_eq!(session.current(), None, "value {:?} should not restore", bad);
    }
}

/// Test: a persisted account that no wallet exposes stays unselected.
#[test]
fn startup_misses_when_account_is_not_exposed() {
    let store = Arc::new(MemoryStore::new());
    store.set(SELECTED_ACCOUNT_KEY, "Phantom:AddrGone");
    let session = Session::new(source_with(vec![phantom_connected()]), store, SessionConfig::new());
    assert_eq!(session.current(), None);
}

/// Test: a saved wallet that loads late is picked up by the next refresh,
/// as long as the user has not chosen explicitly.
#[test]
fn late_loading_wallet_restores_on_refresh() {
    let store = Arc::new(MemoryStore::new());
    store.set(SELECTED_ACCOUNT_KEY, "Phantom:Addr2");

    let source = source_with(vec![]);
    let session = Session::new(source.clone(), store, SessionConfig::new());
    assert_eq!(session.current(), None);

    let wallet = phantom_connected();
    let grantable = wallet.accounts.clone();
    source.add_wallet(wallet, grantable);
    let current = session.refresh().expect("restored after load");
    assert_eq!(current.address, "Addr2");
}

/// Test: selecting persists the owning wallet's name with the address;
/// clearing deletes the entry.
#[test]
fn select_persists_and_clear_deletes() {
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(
        source_with(vec![phantom_connected()]),
        store.clone(),
        SessionConfig::new(),
    );

    session.select(Some(account("Phantom", "Addr2")));
    assert_eq!(store.get(SELECTED_ACCOUNT_KEY).as_deref(), Some("Phantom:Addr2"));
    assert_eq!(session.current().expect("current").address, "Addr2");

    session.select(None);
    assert_eq!(store.get(SELECTED_ACCOUNT_KEY), None);
    assert_eq!(session.current(), None);
}

/// Test: once the user selects anything (even `None`), persisted content is
/// never auto-restored again in this process.
#[test]
fn explicit_choice_disables_restoration() {
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(
        source_with(vec![phantom_connected()]),
        store.clone(),
        SessionConfig::new(),
    );

    session.select(Some(account("Phantom", "Addr1")));
    // Simulate another tab writing a different choice.
    store.set(SELECTED_ACCOUNT_KEY, "Phantom:Addr2");
    let current = session.refresh().expect("still selected");
    assert_eq!(current.address, "Addr1");

    session.select(None);
    store.set(SELECTED_ACCOUNT_KEY, "Phantom:Addr2");
    assert_eq!(session.refresh(), None);
}

/// Test: the wallet disappearing clears the in-memory selection but leaves
/// the persisted entry alone.
#[test]
fn implicit_disconnect_clears_memory_only() {
    let store = Arc::new(MemoryStore::new());
    store.set(SELECTED_ACCOUNT_KEY, "Phantom:Addr1");
    let source = source_with(vec![phantom_connected(), solflare_connected()]);
    let session = Session::new(source.clone(), store.clone(), SessionConfig::new());
    assert!(session.current().is_some());

    source.remove_wallet("Phantom");
    assert_eq!(session.refresh(), None);
    assert_eq!(session.current(), None);
    assert_eq!(store.get(SELECTED_ACCOUNT_KEY).as_deref(), Some("Phantom:Addr1"));
}

/// Test: because an implicit disconnect keeps storage, a flaky enumeration
/// round-trips back to the saved account when the user never chose.
#[test]
fn transient_disconnect_restores_saved_selection() {
    let store = Arc::new(MemoryStore::new());
    store.set(SELECTED_ACCOUNT_KEY, "Phantom:Addr1");
    let source = source_with(vec![phantom_connected()]);
    let session = Session::new(source.clone(), store, SessionConfig::new());

    source.remove_wallet("Phantom");
    assert_eq!(session.refresh(), None);

    let wallet = phantom_connected();
    let grantable = wallet.accounts.clone();
    source.add_wallet(wallet, grantable);
    let current = session.refresh().expect("restored");
    assert_eq!(current.address, "Addr1");
}

/// Test: a wallet re-authorizing with a different address list resolves to
/// its first account.
#[test]
fn reauthorization_falls_back_to_first_account() {
    let store = Arc::new(MemoryStore::new());
    let source = source_with(vec![phantom_connected()]);
    let session = Session::new(source.clone(), store, SessionConfig::new());
    session.select(Some(account("Phantom", "Addr2")));

    source.set_accounts(
        "Phantom",
        vec![WalletAccount::new("AddrNew1"), WalletAccount::new("AddrNew2")],
    );
    let current = session.refresh().expect("fallback");
    assert_eq!(current.address, "AddrNew1");
    assert_eq!(current.wallet_name, "Phantom");
}

/// Test: refresh twice with an unchanged registry yields the same result.
#[test]
fn refresh_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(
        source_with(vec![phantom_connected(), solflare_connected()]),
        store,
        SessionConfig::new(),
    );
    session.select(Some(account("Solflare", "Addr3")));
    assert_eq!(session.refresh(), session.refresh());
}

/// Test: the whole surface works against a store that persists nothing.
#[test]
fn degrades_to_noop_storage() {
    let session = Session::new(
        source_with(vec![phantom_connected()]),
        Arc::new(NoopStore::new()),
        SessionConfig::new(),
    );
    session.select(Some(account("Phantom", "Addr1")));
    assert_eq!(session.current().expect("current").address, "Addr1");
    session.select(None);
    assert_eq!(session.current(), None);
}

/// Test: connect selects the first account that was not exposed before the
/// call.
#[test]
fn connect_prefers_newly_granted_account() {
    let source = Arc::new(MemorySource::new());
    // Addr1 is already exposed; connect additionally grants Addr2.
    source.add_wallet(
        Wallet::new("Phantom")
            .with_features(FeatureSet::standard())
            .with_accounts(vec![WalletAccount::new("Addr1")]),
        vec![WalletAccount::new("Addr1"), WalletAccount::new("Addr2")],
    );
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(source, store.clone(), SessionConfig::new());

    let selected = session.connect("Phantom").expect("connect").expect("selection");
    assert_eq!(selected.address, "Addr2");
    assert_eq!(store.get(SELECTED_ACCOUNT_KEY).as_deref(), Some("Phantom:Addr2"));
}

/// Test: disconnecting the owning wallet clears the selection through the
/// explicit path, deleting the persisted entry.
#[test]
fn disconnect_clears_owning_selection_and_storage() {
    let source = source_with(vec![phantom_connected(), solflare_connected()]);
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(source, store.clone(), SessionConfig::new());

    session.select(Some(account("Phantom", "Addr1")));
    session.disconnect("Phantom").expect("disconnect");
    assert_eq!(session.current(), None);
    assert_eq!(store.get(SELECTED_ACCOUNT_KEY), None);
}

/// Test: disconnecting some other wallet leaves the selection alone.
#[test]
fn disconnect_of_other_wallet_keeps_selection() {
    let source = source_with(vec![phantom_connected(), solflare_connected()]);
    let session = Session::new(source, Arc::new(MemoryStore::new()), SessionConfig::new());

    session.select(Some(account("Phantom", "Addr1")));
    session.disconnect("Solflare").expect("disconnect");
    assert_eq!(session.current().expect("current").address, "Addr1");
}

/// Test: connect/disconnect require the declared capability.
#[test]
fn capability_checks_guard_source_calls() {
    let source = Arc::new(MemorySource::new());
    source.add_wallet(
        Wallet::new("ViewOnly").with_features(FeatureSet::of(&[WalletFeature::SignMessage])),
        vec![WalletAccount::new("Addr1")],
    );
    let session = Session::new(source, Arc::new(MemoryStore::new()), SessionConfig::new());

    assert_eq!(
        session.connect("ViewOnly"),
        Err(SourceError::Unsupported { wallet: "ViewOnly".into(), feature: WalletFeature::Connect })
    );
    assert_eq!(
        session.connect("Missing"),
        Err(SourceError::UnknownWallet("Missing".into()))
    );
}

/// Test: chain choice persists, restores, and gates mainnet.
#[test]
fn chain_selection_persists_and_gates() {
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(source_with(vec![]), store.clone(), SessionConfig::new());
    assert_eq!(session.chain(), ChainId::Devnet);

    session.set_chain(ChainId::Testnet);
    assert_eq!(store.get(SELECTED_CHAIN_KEY).as_deref(), Some("solana:testnet"));

    let reloaded = Session::new(source_with(vec![]), store.clone(), SessionConfig::new());
    assert_eq!(reloaded.chain(), ChainId::Testnet);

    // Mainnet behind a closed gate resolves to testnet endpoints.
    session.set_chain(ChainId::Mainnet);
    assert_eq!(session.chain_config().chain, ChainId::Testnet);

    let open = Session::new(
        source_with(vec![]),
        store.clone(),
        SessionConfig::new().with_mainnet(),
    );
    assert_eq!(open.chain_config().chain, ChainId::Mainnet);
    assert_eq!(open.chain_config().rpc_url, "https://api.mainnet-beta.solana.com");
}

/// Test: an unrecognized persisted chain is dropped and devnet wins.
#[test]
fn unrecognized_chain_resets_to_devnet() {
    let store = Arc::new(MemoryStore::new());
    store.set(SELECTED_CHAIN_KEY, "solana:localnet");
    let session = Session::new(source_with(vec![]), store.clone(), SessionConfig::new());
    assert_eq!(session.chain(), ChainId::Devnet);
    assert_eq!(store.get(SELECTED_CHAIN_KEY), None);
}

/// Test: a rebuilt session carrying the sticky-choice flag never restores.
#[test]
fn carried_user_choice_blocks_restoration() {
    let store = Arc::new(MemoryStore::new());
    store.set(SELECTED_ACCOUNT_KEY, "Phantom:Addr1");
    let session = Session::new(
        source_with(vec![phantom_connected()]),
        store,
        SessionConfig::new().with_user_choice(),
    );
    assert_eq!(session.current(), None);
    assert_eq!(session.refresh(), None);
}

/// Test: handles observe and drive the same session state.
#[test]
fn handles_are_live_views() {
    let session = Session::new(
        source_with(vec![phantom_connected()]),
        Arc::new(MemoryStore::new()),
        SessionConfig::new(),
    );
    let handle = session.handle();
    let clone = handle.clone();

    handle.select(Some(account("Phantom", "Addr1")));
    assert_eq!(clone.current().expect("current").address, "Addr1");
    clone.set_chain(ChainId::Testnet);
    assert_eq!(handle.chain(), ChainId::Testnet);
}
