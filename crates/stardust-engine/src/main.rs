//! # Stardust
//!
//! Headless driver for the cursor-trail particle field.
//!
//! Loads `stardust.toml` (or the path given as the first argument), replays
//! a pointer script against the simulation on a virtual clock, and writes
//! the optional PNG snapshot and JSON run report.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod input;
mod timing;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EngineConfig;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "stardust_engine=info,stardust_kernel=info";

/// Log filter from a `RUST_LOG` value, falling back to the default.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(log_filter(rust_log.as_deref()))
        .init();

    info!("Stardust starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match std::env::args_os().nth(1) {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    config.validate();

    let report = app::run(&config)?;
    info!(
        "Ran {} frames: {} trail, {} pulse, {} explosion particles, peak {} live",
        report.stats.frames,
        report.stats.trail_spawned,
        report.stats.pulse_spawned,
        report.stats.explosion_spawned,
        report.stats.peak_live
    );

    info!("Stardust shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_defaults() {
        let filter = log_filter(None).to_string();
        assert!(filter.contains("stardust_engine=info"));
        assert!(filter.contains("stardust_kernel=info"));
    }

    #[test]
    fn test_log_filter_honours_rust_log() {
        let filter = log_filter(Some("stardust_kernel=trace")).to_string();
        assert!(filter.contains("stardust_kernel=trace"));
        assert!(!filter.contains("stardust_kernel=info"));
        assert!(!filter.contains("stardust_engine"));
    }

    #[test]
    fn test_log_filter_invalid_falls_back() {
        let filter = log_filter(Some("stardust_kernel=loud")).to_string();
        assert!(filter.contains("stardust_kernel=info"));
    }
}
