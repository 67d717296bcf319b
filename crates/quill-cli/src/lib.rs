#![forbid(unsafe_code)]
#![deny(unused_must_use)]

pub mod commands;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr log subscriber. `RUST_LOG` overrides the default
/// `warn` filter, e.g. `RUST_LOG=quill_parse=trace` to see every token.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
