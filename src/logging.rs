//! Tracing setup for the `splitter` binary
//!
//! Log output goes to stderr so it never mixes with command output. The
//! filter comes from `RUST_LOG` when set, otherwise from the `log_filter`
//! setting, otherwise `warn`.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "warn";

/// Pick the filter directive to use
pub fn filter_directive(from_env: Option<String>, configured: &str) -> String {
    from_env
        .filter(|f| !f.trim().is_empty())
        .or_else(|| Some(configured.trim().to_string()).filter(|f| !f.is_empty()))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber
///
/// An unparsable directive falls back to `warn`. Calling this twice is
/// harmless; the second call is ignored.
pub fn init(configured: &str) {
    let directive = filter_directive(std::env::var(EnvFilter::DEFAULT_ENV).ok(), configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
