// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, WhenChangedError};

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "WhenChanged.toml";

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// Only TOML deserialization happens here. Relative `[watch].dir` and
/// `[pipeline].log_dir` are resolved against the config file's directory.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut config: RawConfigFile = toml::from_str(&contents)?;
    anchor_paths(&mut config, &config_root_dir(path));

    Ok(config)
}

/// Load the config at `path`, or fall back to built-in defaults when `path`
/// is the default file name and it does not exist.
///
/// An explicitly chosen file that is missing is an error.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    if !path.exists() && path == Path::new(DEFAULT_CONFIG_FILE) {
        let mut config = RawConfigFile::default();
        anchor_paths(&mut config, &config_root_dir(path));
        return Ok(config);
    }
    if !path.exists() {
        return Err(WhenChangedError::ConfigError(format!(
            "config file {:?} does not exist",
            path
        )));
    }
    load_from_path(path)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Directory a config path is relative to.
///
/// - If the config path has a non-empty parent (e.g. "conf/WhenChanged.toml"),
///   that directory.
/// - For a bare file name, the current working directory.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn anchor_paths(config: &mut RawConfigFile, root: &Path) {
    let watch_dir = match config.watch.dir.take() {
        Some(dir) if dir.is_relative() => root.join(dir),
        Some(dir) => dir,
        None => root.to_path_buf(),
    };
    config.watch.dir = Some(watch_dir);

    if let Some(log_dir) = config.pipeline.log_dir.take() {
        config.pipeline.log_dir = Some(if log_dir.is_relative() {
            root.join(log_dir)
        } else {
            log_dir
        });
    }
}
