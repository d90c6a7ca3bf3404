//! Runtime configuration: an optional TOML file layered under `CXR_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use config::{Config, ConfigError, Environment, File};
use cxr_core::join::GdpMultiplier;
use cxr_gateway::{DEFAULT_COUNTRIES_URL, DEFAULT_RATES_URL, GatewayConfig};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "CXR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub summary_path:       PathBuf,
  pub countries_url:      String,
  pub rates_url:          String,
  pub fetch_timeout_secs: u64,
  pub gdp_multiplier:     GdpMultiplier,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               "0.0.0.0".to_owned(),
      port:               8000,
      store_path:         PathBuf::from("cxr.sqlite3"),
      summary_path:       PathBuf::from("cache/summary.svg"),
      countries_url:      DEFAULT_COUNTRIES_URL.to_owned(),
      rates_url:          DEFAULT_RATES_URL.to_owned(),
      fetch_timeout_secs: 30,
      gdp_multiplier:     GdpMultiplier::default(),
    }
  }
}

impl ServerConfig {
  /// Read `path` (if it exists) and the process environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::load_from(path, environment())
  }

  fn load_from(path: &Path, env: Environment) -> Result<Self, ConfigError> {
    let mut cfg: Self = Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()?;

    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.summary_path = expand_tilde(&cfg.summary_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn gateway(&self) -> GatewayConfig {
    GatewayConfig {
      countries_url: self.countries_url.clone(),
      rates_url:     self.rates_url.clone(),
      timeout:       Duration::from_secs(self.fetch_timeout_secs),
    }
  }
}

/// `CXR_PORT=9000`, `CXR_GDP_MULTIPLIER__MODE=fixed`, ...
fn environment() -> Environment {
  Environment::with_prefix(ENV_PREFIX)
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
