//! Application configuration: parsing, validation, and loading.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! is a valid configuration. Precedence, lowest to highest:
//!
//! 1. built-in defaults
//! 2. the TOML file named by `--config` or [`CONFIG_ENV_VAR`]
//! 3. [`STORE_PATH_ENV_VAR`]
//! 4. command-line flags (applied by the binary)
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`load_config_str`]
//! - Parse + validate from a file path: [`load_config_path`]
//! - Full resolution including environment: [`resolve_config`]

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared_utils::env::get_optional_env_var;
use thiserror::Error;
use tracing::debug;

use crate::collector::CollectOptions;
use crate::providers::bcb_sgs::params::{CDI_SERIES_CODE, DEFAULT_BASE_URL, SgsParams};
use crate::sampler::{FallbackPolicy, InvalidBandError, RateBand};

/// Names a TOML file to load when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "CDI_COLLECTOR_CONFIG";

/// Overrides `store_path`.
pub const STORE_PATH_ENV_VAR: &str = "CDI_STORE_PATH";

/// Default store file, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "taxa-cdi.csv";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("store_path cannot be empty")]
    EmptyStorePath,

    #[error("source.base_url must be an http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("source.timeout_secs must be at least 1")]
    InvalidTimeout,

    #[error("collect.count must be at least 1")]
    InvalidCount,

    #[error("collect.interval_secs must be a non-negative number of seconds that fits a duration, got {0}")]
    InvalidInterval(f64),

    #[error("fallback band: {0}")]
    InvalidBand(#[from] InvalidBandError),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    /// CSV file observations are appended to.
    pub store_path: PathBuf,
    /// Directory charts are written to.
    pub out_dir: PathBuf,
    pub source: SourceCfg,
    pub collect: CollectCfg,
    pub fallback: FallbackCfg,
}

/// Remote source settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SourceCfg {
    pub base_url: String,
    pub series_code: u32,
    pub timeout_secs: u64,
}

/// Batch collection settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct CollectCfg {
    pub count: u32,
    pub interval_secs: f64,
}

/// Synthetic fallback settings. Disabled unless asked for.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct FallbackCfg {
    pub enabled: bool,
    pub low: f64,
    pub high: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            out_dir: PathBuf::from("."),
            source: SourceCfg::default(),
            collect: CollectCfg::default(),
            fallback: FallbackCfg::default(),
        }
    }
}

impl Default for SourceCfg {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            series_code: CDI_SERIES_CODE,
            timeout_secs: 10,
        }
    }
}

impl Default for CollectCfg {
    fn default() -> Self {
        Self {
            count: 10,
            interval_secs: 2.0,
        }
    }
}

impl Default for FallbackCfg {
    fn default() -> Self {
        Self {
            enabled: false,
            low: RateBand::CDI.low(),
            high: RateBand::CDI.high(),
        }
    }
}

impl AppConfig {
    /// Checks every field that has a constrained domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyStorePath);
        }
        let url = self.source.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.source.base_url.clone()));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        self.collect_options()?;
        RateBand::new(self.fallback.low, self.fallback.high)?;
        Ok(())
    }

    pub fn sgs_params(&self) -> SgsParams {
        SgsParams {
            base_url: self.source.base_url.trim().to_string(),
            series_code: self.source.series_code,
            timeout: Duration::from_secs(self.source.timeout_secs),
            ..Default::default()
        }
    }

    pub fn collect_options(&self) -> Result<CollectOptions, ConfigError> {
        let count = NonZeroU32::new(self.collect.count).ok_or(ConfigError::InvalidCount)?;
        let secs = self.collect.interval_secs;
        if secs < 0.0 {
            return Err(ConfigError::InvalidInterval(secs));
        }
        let interval =
            Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidInterval(secs))?;
        Ok(CollectOptions { count, interval })
    }

    pub fn fallback_policy(&self) -> Result<FallbackPolicy, ConfigError> {
        if !self.fallback.enabled {
            return Ok(FallbackPolicy::Disabled);
        }
        let band = RateBand::new(self.fallback.low, self.fallback.high)?;
        Ok(FallbackPolicy::Synthetic(band))
    }

    /// Applies [`STORE_PATH_ENV_VAR`] if it is set to a non-blank value.
    pub fn apply_env_overrides(&mut self) {
        if let Some(path) = get_optional_env_var(STORE_PATH_ENV_VAR) {
            debug!(%path, "store path overridden from environment");
            self.store_path = PathBuf::from(path);
        }
    }
}

/// Parse and validate a configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(toml_str).context("failed to parse config TOML")?;
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

/// Read a configuration TOML file from disk, parse, and validate it.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text).with_context(|| format!("load config file {}", path.as_ref().display()))
}

/// Resolves the configuration from `explicit`, then [`CONFIG_ENV_VAR`], then
/// defaults, and applies environment overrides on top.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let from_env = get_optional_env_var(CONFIG_ENV_VAR).map(PathBuf::from);
    let mut cfg = match explicit.map(Path::to_path_buf).or(from_env) {
        Some(path) => load_config_path(&path)?,
        None => AppConfig::default(),
    };
    cfg.apply_env_overrides();
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}
