// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Logging initialization.
//!
//! The crate only emits through the `log` facade; these helpers install an
//! `env_logger` backend for binaries and tests that want console output.
//! Every entry point fails with [`Error::Config`] if a logger is already
//! installed.

use crate::config::DiscoveryConfig;
use crate::error::{Error, Result};
use log::LevelFilter;

/// Initialize console logging at a fixed level.
///
/// # Example
/// ```no_run
/// dps_graph::logging::init(log::LevelFilter::Info).ok();
/// ```
pub fn init(level: LevelFilter) -> Result<()> {
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .try_init()
        .map_err(already_initialized)
}

/// Initialize console logging from `RUST_LOG`, falling back to
/// `default_level` when it is unset.
pub fn init_env(default_level: LevelFilter) -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level.to_string()),
    )
    .format_timestamp_millis()
    .try_init()
    .map_err(already_initialized)
}

/// Initialize console logging with an `env_logger` filter string
/// (e.g. `"dps_graph=debug,info"`).
pub fn init_with_filter(filter: &str) -> Result<()> {
    if filter.trim().is_empty() {
        return Err(Error::InvalidArgument("empty log filter".into()));
    }
    env_logger::Builder::new()
        .parse_filters(filter)
        .format_timestamp_millis()
        .try_init()
        .map_err(already_initialized)
}

/// Initialize console logging with the level carried by `config`.
///
/// Accepts exactly the values [`DiscoveryConfig::validate`] accepts; use
/// [`init_with_filter`] for per-module filters.
pub fn init_from_config(config: &DiscoveryConfig) -> Result<()> {
    init(config.log_level_filter()?)
}

fn already_initialized(err: log::SetLoggerError) -> Error {
    Error::Config(format!("logger already initialized: {err}"))
}
