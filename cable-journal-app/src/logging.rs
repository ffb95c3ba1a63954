//! Diagnostics on stderr, filtered by `RUST_LOG`.
//!
//! Stdout is left to command output (JSON replies, paths) so it can be piped.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Defaults to `info` for this app's crates and `warn` for everything else.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,cable_journal_app=info,cable_journal_json=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
