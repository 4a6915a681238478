// Logging setup for the server binary, driven by RUST_LOG

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the process-wide subscriber; defaults to `info` when
/// RUST_LOG is unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}

/// Subscriber for tests: more verbose, tolerant of repeated init.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
