//! GymPulse runtime.
//!
//! Wraps the pure logic in `gympulse-logic` with the pieces a running
//! dashboard needs:
//!
//! - [`config`]: dashboard configuration from JSON and the environment
//! - [`engine`]: shared, lockable dashboard state with an owned random source
//! - [`ticker`]: the live drift timer with a start/stop lifecycle
//! - [`logging`]: subscriber setup for the `log` macros used throughout

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod ticker;

pub use config::DashboardConfig;
pub use engine::DashboardEngine;
pub use error::ConfigError;
pub use ticker::DriftTicker;
