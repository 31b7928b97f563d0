//! Runtime configuration: an optional TOML file overlaid by `FOLIO_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// HMAC secret for session tokens. Required; there is no default.
  pub jwt_secret:     String,
  pub token_ttl_secs: u64,
}

impl ServerConfig {
  pub fn token_ttl(&self) -> Duration { Duration::from_secs(self.token_ttl_secs) }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// Layer defaults, the file at `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::from_builder(
      config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("FOLIO")),
    )
  }

  fn from_builder(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
  ) -> anyhow::Result<Self> {
    builder
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "folio.db")?
      .set_default("token_ttl_secs", 60 * 60 * 24)?
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }
}

#[cfg(test)]
mod tests {
  use config::{File, FileFormat};

  use super::*;

  fn from_toml(toml: &str) -> anyhow::Result<ServerConfig> {
    ServerConfig::from_builder(
      config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
    )
  }

  #[test]
  fn defaults_fill_everything_but_the_secret() {
    let cfg = from_toml(r#"jwt_secret = "s3cret""#).unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.store_path, PathBuf::from("folio.db"));
    assert_eq!(cfg.token_ttl(), Duration::from_secs(86_400));
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = from_toml(
      r#"
        host = "0.0.0.0"
        port = 3000
        jwt_secret = "s3cret"
        token_ttl_secs = 60
      "#,
    )
    .unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:3000");
    assert_eq!(cfg.token_ttl(), Duration::from_secs(60));
  }

  #[test]
  fn missing_secret_is_an_error() {
    assert!(from_toml("port = 3000").is_err());
  }
}
