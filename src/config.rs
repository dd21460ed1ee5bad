use std::env;
use std::path::PathBuf;

use serde::Serialize;

use crate::graph::WindowPreset;
use crate::logging::LogFormat;
use crate::models::Grouping;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DATA_PATH_VAR: &str = "LIFT_LOG_DATA_PATH";
pub const DEFAULT_GROUPING_VAR: &str = "LIFT_LOG_DEFAULT_GROUPING";
pub const DEFAULT_WINDOW_VAR: &str = "LIFT_LOG_DEFAULT_WINDOW";
pub const LOG_FILTER_VAR: &str = "LIFT_LOG_LOG";
pub const LOG_FORMAT_VAR: &str = "LIFT_LOG_LOG_FORMAT";

const DEFAULT_LOG_FILTER: &str = "info";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Missing configuration: {0}")]
  Missing(String),

  #[error("Invalid value for {key}: {value}")]
  Invalid { key: String, value: String },
}

impl Serialize for ConfigError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// App Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub data_path: Option<PathBuf>,
  pub default_grouping: Grouping,
  pub default_window: WindowPreset,
  pub log_filter: String,
  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      data_path: None,
      default_grouping: Grouping::default(),
      default_window: WindowPreset::default(),
      log_filter: DEFAULT_LOG_FILTER.to_string(),
      log_format: LogFormat::default(),
    }
  }
}

impl AppConfig {
  /// Read configuration from the environment (and `.env`, when present)
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();

    let defaults = Self::default();
    Ok(Self {
      data_path: env::var(DATA_PATH_VAR).ok().filter(|p| !p.is_empty()).map(PathBuf::from),
      default_grouping: parse_var(DEFAULT_GROUPING_VAR)?.unwrap_or(defaults.default_grouping),
      default_window: parse_var(DEFAULT_WINDOW_VAR)?.unwrap_or(defaults.default_window),
      log_filter: env::var(LOG_FILTER_VAR)
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or(defaults.log_filter),
      log_format: parse_var(LOG_FORMAT_VAR)?.unwrap_or(defaults.log_format),
    })
  }

  /// Snapshot path, preferring an explicit override
  pub fn resolve_data_path(&self, cli_override: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    cli_override
      .or_else(|| self.data_path.clone())
      .ok_or_else(|| ConfigError::Missing(DATA_PATH_VAR.into()))
  }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
  match env::var(key) {
    Ok(value) if value.trim().is_empty() => Ok(None),
    Ok(value) => value
      .trim()
      .parse()
      .map(Some)
      .map_err(|_| ConfigError::Invalid { key: key.to_string(), value }),
    Err(_) => Ok(None),
  }
}
