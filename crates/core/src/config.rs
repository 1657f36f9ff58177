// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `oq.toml` configuration
//!
//! Every field has a default, so an empty or missing file is a valid
//! configuration. Durations use humantime syntax (`"5s"`, `"2m"`).

use crate::envelope::DEFAULT_MAX_RETRIES;
use crate::queue::DEFAULT_MAX_QUEUE_SIZE;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub queue: QueueConfig,
    pub connectivity: ConnectivityConfig,
    /// HTTP executors keyed by action type
    pub executors: BTreeMap<String, ExecutorConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    pub max_queue_size: usize,
    pub default_max_retries: u32,
    /// Directory holding the persisted queue record
    pub store_dir: PathBuf,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
            default_max_retries: DEFAULT_MAX_RETRIES,
            store_dir: PathBuf::from(".oq"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectivityConfig {
    /// `host:port` reached with a TCP connect to decide reachability.
    /// Without one, the device is assumed online.
    pub probe_addr: Option<String>,
    #[serde(with = "humantime_serde")]
    pub probe_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub probe_timeout: Duration,
    /// Periodic sweep while online, in addition to reconnect sweeps
    #[serde(with = "humantime_serde", default)]
    pub sweep_interval: Option<Duration>,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_addr: None,
            probe_interval: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(2),
            sweep_interval: None,
        }
    }
}

/// HTTP method used to deliver a payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Post,
    Put,
    Patch,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
        })
    }
}

/// Delivery endpoint for one action type
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorConfig {
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(with = "humantime_serde", default)]
    pub timeout: Option<Duration>,
    /// Extra request headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.max_queue_size == 0 {
            return Err(ConfigError::Invalid(
                "queue.max_queue_size must be at least 1".into(),
            ));
        }
        if self.connectivity.probe_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "connectivity.probe_interval must be positive".into(),
            ));
        }
        if self.connectivity.probe_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "connectivity.probe_timeout must be positive".into(),
            ));
        }
        if self.connectivity.sweep_interval.is_some_and(|d| d.is_zero()) {
            return Err(ConfigError::Invalid(
                "connectivity.sweep_interval must be positive".into(),
            ));
        }
        for (action_type, executor) in &self.executors {
            if !(executor.url.starts_with("http://") || executor.url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "executors.{action_type}.url must be an http(s) URL, got '{}'",
                    executor.url
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
