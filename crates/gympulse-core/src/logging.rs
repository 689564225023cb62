//! Log subscriber setup.
//!
//! Library code logs through the `log` macros. `init` installs a
//! `tracing-subscriber` formatter that also picks up `log` records.
//!
//! # Environment
//! - `RUST_LOG`: filter directive, default `info`
//!   (e.g. `RUST_LOG=gympulse_core=debug`)

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Call once at startup.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Verbose subscriber for tests. Safe to call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
