//! Error type for the fallible wallet-source operations.
//!
//! Connect and disconnect are the only operations in this crate that can
//! fail: they cross into the host wallet and may put a prompt in front of
//! the user. Everything else (persistence, selection resolution) degrades
//! to absence instead of erroring.

use crate::wallet::WalletFeature;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("unknown wallet: {0}")]
    UnknownWallet(String),

    #[error("wallet {wallet} does not support {feature}")]
    Unsupported { wallet: String, feature: WalletFeature },

    /// The wallet itself refused or failed, e.g. the user dismissed the
    /// authorization prompt.
    #[error("wallet failure: {0}")]
    Wallet(String),
}
