//! Wallet session core for browser dapps.
//!
//! # Architecture
//!
//! ```text
//! Session (one per process)
//!   │
//!   ├── WalletSource (capability)   ← live wallet/account enumeration
//!   ├── KeyValueStore (capability)  ← origin-scoped persistence
//!   │
//!   ├── Selector                    ← selection state machine
//!   │     restore / select / reconcile
//!   │
//!   └── ChainSelection              ← cluster choice + endpoints
//!         ▲
//!   SessionHandle (UI surface): current selection + setter, chain accessors
//! ```
//!
//! The session tracks which wallet account the user chose, persists the
//! choice as `"<wallet-name>:<account-address>"`, and re-resolves it every
//! time the wallet registry changes. Accounts are compared structurally
//! (wallet name + address) because the registry returns fresh objects on
//! every refresh. A selection that stops resolving is cleared, never left
//! dangling; a resolution miss is a normal outcome, not an error.
//!
//! # Features
//!
//! - `native` - filesystem persistence (`FileStore`), subscriber init, CLI
//! - `wasm` - browser `localStorage` persistence (`LocalStorageStore`)
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use wallet_session::{MemorySource, MemoryStore, Session, SessionConfig};
//!
//! let source = Arc::new(MemorySource::new());
//! let store = Arc::new(MemoryStore::new());
//! let session = Session::new(source.clone(), store, SessionConfig::new());
//!
//! // wallet registry changed → re-resolve before the UI reads
//! session.refresh();
//! let handle = session.handle();
//! println!("{:?}", handle.current());
//! ```

pub mod chain;
pub mod error;
pub mod selector;
pub mod session;
pub mod source;
pub mod store;
pub mod wallet;

#[cfg(feature = "native")]
pub mod logging;

pub use chain::{ChainConfig, ChainId, ChainSelection, SELECTED_CHAIN_KEY};
pub use error::SourceError;
pub use selector::{Selector, SELECTED_ACCOUNT_KEY};
pub use session::{Session, SessionConfig, SessionHandle};
pub use source::{MemorySource, WalletSource};
pub use store::{KeyValueStore, MemoryStore, NoopStore};
pub use wallet::{AccountRef, FeatureSet, Wallet, WalletAccount, WalletFeature};

#[cfg(feature = "native")]
pub use store::FileStore;
#[cfg(feature = "wasm")]
pub use store::LocalStorageStore;
