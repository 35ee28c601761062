//! Per-user directories for configuration and logs.

use std::{
  fs,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use etcetera::{
  HomeDirError,
  base_strategy::{
    BaseStrategy,
    choose_base_strategy,
  },
};

const APP_DIR: &str = "the-typeahead";

pub fn config_dir() -> Result<PathBuf, HomeDirError> {
  if let Some(dir) = std::env::var_os("THE_TYPEAHEAD_CONFIG_DIR") {
    return Ok(dir.into());
  }
  let strategy = choose_base_strategy()?;
  Ok(strategy.config_dir().join(APP_DIR))
}

pub fn cache_dir() -> Result<PathBuf, HomeDirError> {
  if let Some(dir) = std::env::var_os("THE_TYPEAHEAD_CACHE_DIR") {
    return Ok(dir.into());
  }
  let strategy = choose_base_strategy()?;
  Ok(strategy.cache_dir().join(APP_DIR))
}

pub fn default_config_file() -> Result<PathBuf, HomeDirError> {
  Ok(config_dir()?.join("config.toml"))
}

pub fn default_log_file() -> Result<PathBuf, HomeDirError> {
  Ok(cache_dir()?.join("typeahead.log"))
}

/// Creates the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
  match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
    _ => Ok(()),
  }
}
