use std::path::PathBuf;

use anyhow::Result;
use log::LevelFilter;
use the_typeahead::paths;

/// Routes `log` records to a file. Verbosity 0 logs warnings and errors,
/// each `-v` adds a level.
pub fn setup(verbosity: u8, log_file: Option<PathBuf>) -> Result<()> {
  let level = match verbosity {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };

  let log_file = match log_file {
    Some(path) => path,
    None => paths::default_log_file()?,
  };
  paths::ensure_parent_dir(&log_file)?;

  fern::Dispatch::new()
    .level(level)
    .level_for("hyper_util", LevelFilter::Warn)
    .level_for("reqwest", LevelFilter::Warn)
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    })
    .chain(fern::log_file(&log_file)?)
    .apply()?;

  Ok(())
}
