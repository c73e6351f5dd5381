//! Subscriber setup for embedders and the CLI.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber: `RUST_LOG`-style filtering (default
/// `info`), human-readable output on stderr, JSON lines when
/// `WALLET_SESSION_LOG_JSON=1`. Safe to call more than once; later calls
/// are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let json = matches!(std::env::var("WALLET_SESSION_LOG_JSON").as_deref(), Ok("1"));
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.pretty().try_init();
    }
}
