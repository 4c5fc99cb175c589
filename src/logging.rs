//! Logging setup for the `tally` binary
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary, which calls [`init`] once at startup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{TallyError, TallyResult};

/// Pick the filter directive: `RUST_LOG`, then `--verbose`, then the setting
pub fn filter_directive(rust_log: Option<String>, verbose: bool, configured: &str) -> String {
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ if verbose => "debug".to_string(),
        _ => configured.to_string(),
    }
}

/// Install the global subscriber, writing to stderr
pub fn init(verbose: bool, configured: &str) -> TallyResult<()> {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), verbose, configured);
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| TallyError::Config(format!("Invalid log filter '{}': {}", directive, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| TallyError::Config(format!("Failed to install logger: {}", e)))
}
