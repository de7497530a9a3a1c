// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime configuration for the discovery layer.
//!
//! Values come from an optional YAML file, then environment variables
//! override individual fields:
//!
//! - `DPS_DOMAIN_ID`: domain the node discovers peers in (default: 0, or
//!   `ROS_DOMAIN_ID` if set)
//! - `DPS_LOG_LEVEL`: logging level (default: "info")
//! - `DPS_CONFIG_FILE`: path to a YAML file with the same fields
//! - `DPS_DISCOVERY_TOPIC`: topic advertisements are published under
//!   (default: `$ROS/discovery/<domain_id>`)
//! - `DPS_ANNOUNCE_ON_DISCOVERY`: re-advertise when an unknown peer shows up
//!   ("1"/"true", default) or not ("0"/"false")
//!
//! # Example
//!
//! ```bash
//! export DPS_DOMAIN_ID=42
//! export DPS_LOG_LEVEL=debug
//! export DPS_CONFIG_FILE=/etc/dps/discovery.yaml
//! ```
//!
//! ```yaml
//! domain_id: 42
//! log_level: debug
//! announce_on_discovery: true
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_DOMAIN_ID: &str = "DPS_DOMAIN_ID";
pub const ENV_LOG_LEVEL: &str = "DPS_LOG_LEVEL";
pub const ENV_CONFIG_FILE: &str = "DPS_CONFIG_FILE";
pub const ENV_DISCOVERY_TOPIC: &str = "DPS_DISCOVERY_TOPIC";
pub const ENV_ANNOUNCE_ON_DISCOVERY: &str = "DPS_ANNOUNCE_ON_DISCOVERY";

/// ROS 2 environment variable for domain ID (fallback)
pub const ENV_ROS_DOMAIN_ID: &str = "ROS_DOMAIN_ID";

/// Highest domain id accepted (same range as DDS domains).
pub const MAX_DOMAIN_ID: u32 = 232;

/// Prefix of the derived discovery topic; the domain id is appended.
pub const DISCOVERY_TOPIC_PREFIX: &str = "$ROS/discovery/";

/// Discovery configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Domain ID (0-232)
    pub domain_id: u32,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Explicit discovery topic, overriding the domain-derived one
    pub discovery_topic: Option<String>,

    /// Re-advertise the local node whenever a new peer is discovered
    pub announce_on_discovery: bool,

    /// Path the configuration was loaded from, if any
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            domain_id: 0,
            log_level: "info".to_string(),
            discovery_topic: None,
            announce_on_discovery: true,
            config_file: None,
        }
    }
}

impl DiscoveryConfig {
    /// Defaults overridden by environment variables. Never touches the disk.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    /// Full load: YAML file named by `DPS_CONFIG_FILE` (if any), then
    /// environment overrides, then validation.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// [`load`](Self::load) with a custom variable lookup.
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match non_empty(lookup(ENV_CONFIG_FILE)) {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&text)?;
        config.config_file = Some(path.to_path_buf());
        log::debug!("[config] loaded {}", path.display());
        Ok(config)
    }

    /// Apply environment-style overrides.
    ///
    /// Priority for domain ID:
    /// 1. DPS_DOMAIN_ID
    /// 2. ROS_DOMAIN_ID
    /// 3. Current value
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(domain_id) = lookup(ENV_DOMAIN_ID)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .or_else(|| {
                lookup(ENV_ROS_DOMAIN_ID).and_then(|s| s.trim().parse::<u32>().ok())
            })
        {
            self.domain_id = domain_id;
        }

        if let Some(level) = non_empty(lookup(ENV_LOG_LEVEL)) {
            self.log_level = level;
        }

        if let Some(topic) = non_empty(lookup(ENV_DISCOVERY_TOPIC)) {
            self.discovery_topic = Some(topic);
        }

        if let Some(flag) = lookup(ENV_ANNOUNCE_ON_DISCOVERY).and_then(|s| parse_flag(&s)) {
            self.announce_on_discovery = flag;
        }

        if let Some(path) = non_empty(lookup(ENV_CONFIG_FILE)) {
            self.config_file = Some(PathBuf::from(path));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.domain_id > MAX_DOMAIN_ID {
            return Err(Error::Config(format!(
                "domain_id {} out of range (0-{})",
                self.domain_id, MAX_DOMAIN_ID
            )));
        }
        if matches!(self.discovery_topic.as_deref(), Some(topic) if topic.trim().is_empty()) {
            return Err(Error::Config("discovery_topic must not be empty".into()));
        }
        self.log_level_filter()?;
        Ok(())
    }

    /// `log_level` as a level filter; this is what logging is initialized with.
    pub fn log_level_filter(&self) -> Result<log::LevelFilter> {
        self.log_level
            .trim()
            .parse::<log::LevelFilter>()
            .map_err(|_| Error::Config(format!("unknown log level '{}'", self.log_level)))
    }

    /// Topic every node of the domain publishes and subscribes advertisements on.
    #[must_use]
    pub fn discovery_topic(&self) -> String {
        self.discovery_topic
            .clone()
            .unwrap_or_else(|| format!("{DISCOVERY_TOPIC_PREFIX}{}", self.domain_id))
    }

    /// Check if any non-default setting is present
    #[must_use]
    pub fn is_custom(&self) -> bool {
        *self != Self::default()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
