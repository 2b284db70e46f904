// src/config/validate.rs

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile, StageConfig};
use crate::config::presets::{log_file_glob, preset_for};
use crate::errors::{Result, WhenChangedError};
use crate::types::Language;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = WhenChangedError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(resolve(raw))
    }
}

/// Check a raw config without building it.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_run_section(cfg)?;
    validate_stages(cfg)?;
    validate_watch_section(cfg)?;
    Ok(())
}

fn validate_run_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.run.settle_ms == 0 {
        return Err(WhenChangedError::ConfigError(
            "[run].settle_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.run.timeout_secs == Some(0) {
        return Err(WhenChangedError::ConfigError(
            "[run].timeout_secs must be >= 1 when set (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_stages(cfg: &RawConfigFile) -> Result<()> {
    let stages = &cfg.pipeline.stages;

    if cfg.pipeline.language == Language::Custom && stages.is_empty() {
        return Err(WhenChangedError::ConfigError(
            "language \"custom\" requires at least one [[pipeline.stage]]".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for stage in stages {
        if stage.name.trim().is_empty() {
            return Err(WhenChangedError::ConfigError(
                "[[pipeline.stage]] entries must have a non-empty name".to_string(),
            ));
        }
        if stage.program.trim().is_empty() {
            return Err(WhenChangedError::ConfigError(format!(
                "stage '{}' has an empty program",
                stage.name
            )));
        }
        if !seen.insert(stage.name.as_str()) {
            return Err(WhenChangedError::ConfigError(format!(
                "duplicate stage name '{}'",
                stage.name
            )));
        }
    }
    Ok(())
}

fn validate_watch_section(cfg: &RawConfigFile) -> Result<()> {
    let include_empty = match &cfg.watch.include {
        Some(list) => list.is_empty(),
        None => cfg.pipeline.language == Language::Custom,
    };
    if include_empty {
        return Err(WhenChangedError::ConfigError(
            "[watch].include must list at least one pattern".to_string(),
        ));
    }
    Ok(())
}

/// Apply language presets and defaults to an already validated config.
fn resolve(raw: RawConfigFile) -> ConfigFile {
    let preset = preset_for(raw.pipeline.language);

    let watch_dir = raw.watch.dir.unwrap_or_else(|| PathBuf::from("."));
    let log_dir = raw.pipeline.log_dir.unwrap_or_else(|| watch_dir.clone());

    let mut exclude = raw.watch.exclude.unwrap_or(preset.exclude);
    let log_glob = log_file_glob();
    if !exclude.contains(&log_glob) {
        exclude.push(log_glob);
    }

    let stages: Vec<StageConfig> = if raw.pipeline.stages.is_empty() {
        preset.stages
    } else {
        raw.pipeline.stages
    };

    ConfigFile {
        watch_dir,
        include: raw.watch.include.unwrap_or(preset.include),
        exclude,
        recursive: raw.watch.recursive.unwrap_or(preset.recursive),
        settle: Duration::from_millis(raw.run.settle_ms),
        scope: raw.run.scope,
        timeout: raw.run.timeout_secs.map(Duration::from_secs),
        language: raw.pipeline.language,
        stages,
        cleanup: raw.pipeline.cleanup.unwrap_or(preset.cleanup),
        log_dir,
    }
}
