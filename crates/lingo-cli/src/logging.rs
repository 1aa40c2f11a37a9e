#![forbid(unsafe_code)]

//! Subscriber set-up for the binary. `RUST_LOG` overrides the default
//! `warn` level.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "warn";

#[must_use]
pub fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber, writing to stderr. A second call is a
/// no-op.
pub fn init(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(true)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
