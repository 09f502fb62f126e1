use std::str::FromStr;

pub use reqwest::Url;
use serde::Deserialize;
use tracing::{
  Level,
  debug,
  info,
  warn
};

use crate::storage::StorageKeys;

pub const DEFAULT_API_BASE_URL: &str =
  "https://backend-todo-1612.onrender.com/";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("invalid config document: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("invalid api.base_url {url:?}: {reason}")]
  InvalidBaseUrl {
    url:    String,
    reason: String
  },

  #[error("invalid log.level {0:?}")]
  InvalidLogLevel(String)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub api_base_url: Url,
  pub storage:      StorageKeys,
  pub log_level:    Level
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
  api:     RawApi,
  storage: RawStorage,
  log:     RawLog
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawApi {
  base_url: Option<String>
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStorage {
  current_user_key: Option<String>,
  users_key:        Option<String>,
  tasks_key:        Option<String>
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLog {
  level: Option<String>
}

impl AppConfig {
  /// Built-in values. The base URL goes
  /// through the same validation as a
  /// configured one.
  pub fn defaults(
  ) -> Result<Self, ConfigError> {
    Ok(Self {
      api_base_url: parse_base_url(
        DEFAULT_API_BASE_URL
      )?,
      storage:      StorageKeys::default(),
      log_level:    Level::INFO
    })
  }

  /// Layers a TOML document over the
  /// built-in defaults. Absent keys
  /// keep their default value.
  #[tracing::instrument(skip(text))]
  pub fn from_toml_str(
    text: &str
  ) -> Result<Self, ConfigError> {
    let raw: RawConfig =
      toml::from_str(text)?;
    let mut cfg = Self::defaults()?;

    if let Some(url) = raw.api.base_url {
      cfg.api_base_url =
        parse_base_url(&url)?;
    }
    if let Some(key) =
      raw.storage.current_user_key
    {
      cfg.storage.current_user = key;
    }
    if let Some(key) =
      raw.storage.users_key
    {
      cfg.storage.users = key;
    }
    if let Some(key) =
      raw.storage.tasks_key
    {
      cfg.storage.tasks = key;
    }
    if let Some(level) = raw.log.level {
      cfg.log_level =
        parse_level(&level)?;
    }

    info!(
      api = %cfg.api_base_url,
      level = %cfg.log_level,
      "loaded config"
    );
    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> Result<(), ConfigError>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("tdlst.")
        .unwrap_or(&k);
      debug!(key = %key, value = %v, "applying override");

      match key {
        | "api.base_url" => {
          self.api_base_url =
            parse_base_url(&v)?;
        }
        | "storage.current_user_key" => {
          self.storage.current_user = v;
        }
        | "storage.users_key" => {
          self.storage.users = v;
        }
        | "storage.tasks_key" => {
          self.storage.tasks = v;
        }
        | "log.level" => {
          self.log_level =
            parse_level(&v)?;
        }
        | _ => {
          warn!(key = %key, "ignoring unknown config override");
        }
      }
    }

    Ok(())
  }
}

/// Accepts absolute http(s) URLs and
/// normalizes the path to end in `/`.
pub fn parse_base_url(
  raw: &str
) -> Result<Url, ConfigError> {
  let invalid = |reason: String| {
    ConfigError::InvalidBaseUrl {
      url: raw.to_string(),
      reason
    }
  };

  let mut url = Url::parse(raw.trim())
    .map_err(|e| invalid(e.to_string()))?;

  if !matches!(
    url.scheme(),
    "http" | "https"
  ) {
    return Err(invalid(format!(
      "unsupported scheme {}",
      url.scheme()
    )));
  }

  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }

  Ok(url)
}

fn parse_level(
  raw: &str
) -> Result<Level, ConfigError> {
  Level::from_str(raw.trim()).map_err(
    |_| {
      ConfigError::InvalidLogLevel(
        raw.to_string()
      )
    }
  )
}
