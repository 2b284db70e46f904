// src/config/mod.rs

//! Configuration loading and validation for whenchanged.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Provide per-language defaults (`presets.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it and apply presets (`validate.rs`).

pub mod loader;
pub mod model;
pub mod presets;
pub mod validate;

pub use loader::{
    config_root_dir, load_and_validate, load_from_path, load_or_default, DEFAULT_CONFIG_FILE,
};
pub use model::{
    ConfigFile, PipelineSection, RawConfigFile, RunSection, StageConfig, WatchSection,
};
pub use presets::{log_file_glob, preset_for, Preset};
pub use validate::validate_config;
