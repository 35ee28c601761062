//! TOML configuration.
//!
//! ```toml
//! [search]
//! debounce-ms = 500
//! page-size   = 100
//! endpoint    = "https://en.wikipedia.org/w/api.php"
//!
//! [list]
//! item-height        = 120
//! viewport-height    = 560
//! buffer-items       = 5
//! sentinel-height    = 1
//! sentinel-threshold = 0.0
//! title-max-chars    = 40
//! ```
//!
//! Every key is optional. A missing file means the defaults above.

use std::{
  fs,
  io,
  path::{
    Path,
    PathBuf,
  },
  time::Duration,
};

use serde::Deserialize;
use the_typeahead_lib::{
  selection::DEFAULT_TITLE_MAX_CHARS,
  sentinel::SentinelTrigger,
  window::{
    Viewport,
    WindowError,
  },
};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Upper bound for `search.debounce-ms`.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
  pub search: SearchConfig,
  pub list:   ListConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SearchConfig {
  /// Quiet period after the last keystroke before a query is accepted.
  pub debounce_ms: u64,
  pub page_size:   u32,
  pub endpoint:    String,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      debounce_ms: 500,
      page_size:   100,
      endpoint:    DEFAULT_ENDPOINT.to_owned(),
    }
  }
}

impl SearchConfig {
  /// The quiet period, capped at [`MAX_DEBOUNCE_MS`].
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms.min(MAX_DEBOUNCE_MS))
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ListConfig {
  pub item_height:        u32,
  pub viewport_height:    u32,
  pub buffer_items:       usize,
  pub sentinel_height:    u32,
  pub sentinel_threshold: f32,
  pub title_max_chars:    usize,
}

impl Default for ListConfig {
  fn default() -> Self {
    Self {
      item_height:        120,
      viewport_height:    560,
      buffer_items:       5,
      sentinel_height:    1,
      sentinel_threshold: 0.0,
      title_max_chars:    DEFAULT_TITLE_MAX_CHARS,
    }
  }
}

impl ListConfig {
  pub fn viewport(&self) -> Result<Viewport, WindowError> {
    Viewport::new(self.item_height, self.viewport_height, self.buffer_items)
  }

  pub fn sentinel(&self) -> SentinelTrigger {
    SentinelTrigger::new(self.sentinel_height, self.sentinel_threshold)
  }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
  #[error("bad config: {0}")]
  BadConfig(#[from] toml::de::Error),
  #[error("invalid config: {0}")]
  Invalid(&'static str),
  #[error("failed to read {}: {source}", path.display())]
  Error {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}

impl Config {
  pub fn from_toml(source: &str) -> Result<Self, ConfigLoadError> {
    let config: Config = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  /// Loads `path`, falling back to the defaults when it does not exist.
  pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
    match fs::read_to_string(path) {
      Ok(source) => Self::from_toml(&source),
      Err(err) if err.kind() == io::ErrorKind::NotFound => {
        log::info!("no config at {}, using defaults", path.display());
        Ok(Self::default())
      },
      Err(source) => {
        Err(ConfigLoadError::Error {
          path: path.to_owned(),
          source,
        })
      },
    }
  }

  fn validate(&self) -> Result<(), ConfigLoadError> {
    if self.search.page_size == 0 {
      return Err(ConfigLoadError::Invalid("search.page-size must be positive"));
    }
    if self.search.debounce_ms > MAX_DEBOUNCE_MS {
      return Err(ConfigLoadError::Invalid(
        "search.debounce-ms must be at most 60000",
      ));
    }
    if self.list.item_height == 0 {
      return Err(ConfigLoadError::Invalid("list.item-height must be positive"));
    }
    if !(0.0..=1.0).contains(&self.list.sentinel_threshold) {
      return Err(ConfigLoadError::Invalid(
        "list.sentinel-threshold must be between 0 and 1",
      ));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn empty_source_is_default() {
    assert_eq!(Config::from_toml("").unwrap(), Config::default());
  }

  #[test]
  fn partial_sections_keep_defaults() {
    let config = Config::from_toml(
      r#"
      [search]
      debounce-ms = 250

      [list]
      title-max-chars = 20
      "#,
    )
    .unwrap();
    assert_eq!(config.search.debounce(), Duration::from_millis(250));
    assert_eq!(config.search.page_size, 100);
    assert_eq!(config.search.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.list.title_max_chars, 20);
    assert_eq!(config.list.item_height, 120);
  }

  #[test]
  fn unknown_keys_are_rejected() {
    assert!(matches!(
      Config::from_toml("[search]\ndebounce = 10\n"),
      Err(ConfigLoadError::BadConfig(_))
    ));
    assert!(matches!(
      Config::from_toml("[colors]\n"),
      Err(ConfigLoadError::BadConfig(_))
    ));
  }

  #[test]
  fn zero_sizes_are_rejected() {
    assert!(matches!(
      Config::from_toml("[search]\npage-size = 0\n"),
      Err(ConfigLoadError::Invalid(_))
    ));
    assert!(matches!(
      Config::from_toml("[list]\nitem-height = 0\n"),
      Err(ConfigLoadError::Invalid(_))
    ));
  }

  #[test]
  fn out_of_range_values_are_rejected() {
    for source in [
      "[search]\ndebounce-ms = 86400000\n",
      "[list]\nsentinel-threshold = nan\n",
      "[list]\nsentinel-threshold = 1.5\n",
      "[list]\nsentinel-threshold = -0.1\n",
    ] {
      assert!(
        matches!(Config::from_toml(source), Err(ConfigLoadError::Invalid(_))),
        "{source}"
      );
    }
    assert!(Config::from_toml("[search]\ndebounce-ms = 60000\n").is_ok());
    assert!(Config::from_toml("[list]\nsentinel-threshold = 1.0\n").is_ok());
  }

  #[test]
  fn debounce_is_capped() {
    let search = SearchConfig {
      debounce_ms: u64::MAX,
      ..SearchConfig::default()
    };
    assert_eq!(search.debounce(), Duration::from_millis(MAX_DEBOUNCE_MS));
  }

  #[test]
  fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[list]\nviewport-height = 300").unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.list.viewport_height, 300);
    assert_eq!(config.list.viewport().unwrap().items_in_view(), 3);
  }

  #[test]
  fn missing_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
  }

  #[test]
  fn malformed_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[search\n").unwrap();
    assert!(matches!(
      Config::load(file.path()),
      Err(ConfigLoadError::BadConfig(_))
    ));
  }
}
