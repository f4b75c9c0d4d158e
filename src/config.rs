use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default catalog endpoint, kept in one place rather than scattered
/// through the client code.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

/// Fixed connect/read timeout for the HTTP client, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  /// Custom title for the list header (defaults to the endpoint host)
  pub title: Option<String>,
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Full URL of the catalog endpoint
  pub url: String,
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: DEFAULT_ENDPOINT.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Override for the cache database path (default: platform data dir)
  pub path: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./catview.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/catview/config.yaml
  ///
  /// Every field has a default, so a missing config file yields a working
  /// configuration rather than an error.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("catview.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("catview").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Title shown in the list header.
  pub fn display_title(&self) -> String {
    if let Some(title) = &self.title {
      return title.clone();
    }

    url::Url::parse(&self.api.url)
      .ok()
      .and_then(|u| u.host_str().map(String::from))
      .unwrap_or_else(|| "catalog".to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_point_at_the_public_endpoint() {
    let config = Config::default();
    assert_eq!(config.api.url, DEFAULT_ENDPOINT);
    assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert!(config.cache.path.is_none());
  }

  #[test]
  fn parses_partial_yaml_with_defaults() {
    let config: Config = serde_yaml::from_str("api:\n  url: https://example.com/items\n").unwrap();
    assert_eq!(config.api.url, "https://example.com/items");
    assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
  }

  #[test]
  fn display_title_prefers_configured_title() {
    let config: Config = serde_yaml::from_str("title: My Catalog\n").unwrap();
    assert_eq!(config.display_title(), "My Catalog");
  }

  #[test]
  fn display_title_falls_back_to_endpoint_host() {
    let config = Config::default();
    assert_eq!(config.display_title(), "jsonplaceholder.typicode.com");
  }
}
