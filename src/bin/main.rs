//! wallet-session CLI - scripted wallet registry + session REPL
//!
//! Drives a session against an in-process wallet registry so the selection
//! flow can be exercised from a terminal:
//!   wallet-session              → REPL with the built-in roster
//!   wallet-session --roster f   → REPL with wallets loaded from JSON
//!
//! Roster format:
//!   [{"name": "Phantom",
//!     "features": ["standard:connect", "standard:disconnect"],
//!     "accounts": [{"address": "..."}]}]
//!
//! The `accounts` list is what the wallet grants on connect. Selection and
//! chain choices persist in a JSON file store, so quitting and relaunching
//! restores them the way a page reload would.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use wallet_session::logging::init_logging;
use wallet_session::{
    AccountRef, ChainId, FeatureSet, FileStore, KeyValueStore, MemorySource, MemoryStore, Session,
    SessionConfig, SessionHandle, Wallet, WalletAccount, WalletFeature,
};

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);
    if opts.help {
        print_usage();
        return Ok(());
    }
    if opts.version {
        println!("wallet-session 0.1.0");
        return Ok(());
    }

    let source = Arc::new(MemorySource::new());
    for (wallet, grantable) in load_roster(opts.roster.as_deref())? {
        source.add_wallet(wallet, grantable);
    }

    let store: Arc<dyn KeyValueStore> = if opts.memory {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::open(&opts.app))
    };

    let mut config = SessionConfig::new();
    if opts.mainnet {
        config = config.with_mainnet();
    }
    let session = Session::new(source.clone(), store, config);

    println!("wallet-session REPL - type 'help' or 'quit'\n");
    print_status(&session.handle());
    repl(&session, &source)
}

#[derive(Default)]
struct ParsedArgs {
    app: String,
    roster: Option<String>,
    mainnet: bool,
    memory: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs { app: "wallet-session-demo".into(), ..Default::default() };
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--mainnet" => opts.mainnet = true,
                "--memory" => opts.memory = true,
                "--app" | "-a" => {
                    if i + 1 < args.len() {
                        opts.app = args[i + 1].clone();
                        i += 1;
                    }
                }
                "--roster" | "-r" => {
                    if i + 1 < args.len() {
                        opts.roster = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }
        if let Ok(app) = env::var("WALLET_SESSION_APP") {
            if !app.is_empty() && opts.app == "wallet-session-demo" {
                opts.app = app;
            }
        }
        opts
    }
}

fn print_usage() {
    println!(
        r#"wallet-session - wallet selection session demo

USAGE:
    wallet-session [options]

OPTIONS:
    --app, -a <name>     Store namespace (default: wallet-session-demo,
                         env: WALLET_SESSION_APP)
    --roster, -r <file>  Wallet roster JSON (default: built-in roster)
    --mainnet            Open the mainnet gate
    --memory             In-memory store (nothing persists)
    --help, -h           This text
    --version, -V        Print version

REPL COMMANDS:
    wallets                    List the registry
    status                     Current selection + chain
    connect <wallet>           Authorize and select
    disconnect <wallet>        Revoke authorization
    select <wallet> <address>  Pick a specific account
    clear                      Clear the selection (deletes persisted entry)
    chain [id]                 Show or set the cluster (solana:devnet, ...)
    refresh                    Re-resolve against the registry
    drop <wallet>              Remove a wallet from the registry
    quit                       Exit
"#
    );
}

#[derive(Deserialize)]
struct RosterEntry {
    name: String,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    features: FeatureSet,
    #[serde(default)]
    accounts: Vec<WalletAccount>,
}

fn load_roster(path: Option<&str>) -> Result<Vec<(Wallet, Vec<WalletAccount>)>> {
    let entries: Vec<RosterEntry> = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read roster {}", path))?;
            serde_json::from_str(&raw).with_context(|| format!("invalid roster {}", path))?
        }
        None => return Ok(builtin_roster()),
    };
    if entries.is_empty() {
        return Err(anyhow!("roster {} lists no wallets", path.unwrap_or_default()));
    }
    Ok(entries
        .into_iter()
        .map(|entry| {
            let mut wallet = Wallet::new(entry.name).with_features(entry.features);
            if let Some(icon) = entry.icon {
                wallet = wallet.with_icon(icon);
            }
            (wallet, entry.accounts)
        })
        .collect())
}

fn builtin_roster() -> Vec<(Wallet, Vec<WalletAccount>)> {
    let mut signing = FeatureSet::standard();
    signing.insert(WalletFeature::SignAndSendTransaction);
    vec![
        (
            Wallet::new("Phantom").with_features(signing.clone()),
            vec![
                WalletAccount::new("9XQeKrrUvsHjK1fSF2WabRbnnffeJAaoJzSaSn3jrK9V"),
                WalletAccount::new("4rZoSK72jVaAW1ZwPMPuB6mYYgGzupNbDqSkEF8jxKzh"),
            ],
        ),
        (
            Wallet::new("Solflare").with_features(signing),
            vec![WalletAccount::new("7dHbWXmci3dT8UFYWYZweBLXgycu7Y3iL6trKn1Y7ARj")],
        ),
        (
            // Declares connect but not disconnect, to exercise the
            // capability check.
            Wallet::new("Ledger").with_features(FeatureSet::of(&[
                WalletFeature::Connect,
                WalletFeature::SignTransaction,
            ])),
            vec![WalletAccount::new("EsSkGzYtBvrd1BDS8GvmTLDpRZZBok3kGW8rwzn6dFeR")],
        ),
    ]
}

fn repl(session: &Session, source: &Arc<MemorySource>) -> Result<()> {
    let handle = session.handle();
    loop {
        print!("wallet-session> ");
        io::stdout().flush().ok();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts[0] {
            "quit" | "exit" | "q" => break,
            "help" | "?" => print_usage(),
            "wallets" => cmd_wallets(&handle),
            "status" => print_status(&handle),
            "connect" => match parts.get(1) {
                Some(name) => match session.connect(name) {
                    Ok(Some(account)) => println!("selected {}", describe(&account)),
                    Ok(None) => println!("connected, nothing granted"),
                    Err(e) => println!("error: {}", e),
                },
                None => println!("Usage: connect <wallet>"),
            },
            "disconnect" => match parts.get(1) {
                Some(name) => match session.disconnect(name) {
                    Ok(()) => print_status(&handle),
                    Err(e) => println!("error: {}", e),
                },
                None => println!("Usage: disconnect <wallet>"),
            },
            "select" => match (parts.get(1), parts.get(2)) {
                (Some(name), Some(address)) => cmd_select(&handle, name, address),
                _ => println!("Usage: select <wallet> <address>"),
            },
            "clear" => {
                handle.select(None);
                print_status(&handle);
            }
            "chain" => match parts.get(1) {
                Some(raw) => match ChainId::from_str(raw) {
                    Some(chain) => {
                        handle.set_chain(chain);
                        print_status(&handle);
                    }
                    None => println!("unknown chain: {}", raw),
                },
                None => {
                    let config = handle.chain_config();
                    println!("{} ({}) rpc {}", config.display_name, config.chain, config.rpc_url);
                }
            },
            "refresh" => {
                session.refresh();
                print_status(&handle);
            }
            "drop" => match parts.get(1) {
                Some(name) => {
                    source.remove_wallet(name);
                    session.refresh();
                    print_status(&handle);
                }
                None => println!("Usage: drop <wallet>"),
            },
            cmd => println!("Unknown: {}. Type 'help'.", cmd),
        }
    }
    println!("Goodbye!");
    Ok(())
}

fn cmd_wallets(handle: &SessionHandle) {
    let wallets = handle.wallets();
    if wallets.is_empty() {
        println!("no wallets registered");
        return;
    }
    for wallet in wallets {
        let features: Vec<&str> = wallet.features.iter().map(|f| f.as_str()).collect();
        println!("{} [{}]", wallet.name, features.join(", "));
        if wallet.accounts.is_empty() {
            println!("  (not connected)");
        }
        for account in &wallet.accounts {
            println!("  {}", account.address);
        }
    }
}

fn cmd_select(handle: &SessionHandle, name: &str, address: &str) {
    let wallets = handle.wallets();
    let found = wallets.iter().filter(|wallet| wallet.name == name).find_map(|wallet| {
        wallet
            .accounts
            .iter()
            .find(|account| account.address == address)
            .map(|account| AccountRef::new(wallet, account))
    });
    match found {
        Some(reference) => {
            handle.select(Some(reference));
            print_status(handle);
        }
        None => println!("no account {} under wallet {}", address, name),
    }
}

fn print_status(handle: &SessionHandle) {
    match handle.current() {
        Some(account) => println!("selected: {}", describe(&account)),
        None => println!("selected: (none)"),
    }
    let config = handle.chain_config();
    println!("chain: {} ({})", config.chain, config.display_name);
}

fn describe(account: &AccountRef) -> String {
    let short: String = account.address.chars().take(8).collect();
    format!("{}… of {}", short, account.wallet_name)
}
