// src/config/presets.rs

//! Built-in toolchain presets.

use crate::config::model::StageConfig;
use crate::record::LOG_FILE_SUFFIX;
use crate::types::Language;

/// Defaults a language contributes when the config leaves them unset.
#[derive(Debug, Clone)]
pub struct Preset {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub recursive: bool,
    pub stages: Vec<StageConfig>,
    pub cleanup: Vec<String>,
}

/// Glob that keeps run logs from re-triggering runs.
pub fn log_file_glob() -> String {
    format!("*{LOG_FILE_SUFFIX}")
}

pub fn preset_for(language: Language) -> Preset {
    match language {
        Language::Java => Preset {
            include: vec!["*.java".to_string()],
            exclude: vec!["*.class".to_string()],
            recursive: false,
            stages: vec![
                StageConfig::new("Compiling", "javac", &["{file}"]),
                StageConfig::new("Running", "java", &["-cp", "{dir}", "{stem}"]),
            ],
            cleanup: vec!["{dir}/{stem}.class".to_string()],
        },
        Language::Python => Preset {
            include: vec!["**/*.py".to_string()],
            exclude: vec!["**/__pycache__/**".to_string()],
            recursive: true,
            stages: vec![StageConfig::new("Running", python_program(), &["{file}"])],
            cleanup: Vec::new(),
        },
        Language::Custom => Preset {
            include: Vec::new(),
            exclude: Vec::new(),
            recursive: false,
            stages: Vec::new(),
            cleanup: Vec::new(),
        },
    }
}

fn python_program() -> &'static str {
    if cfg!(windows) { "python" } else { "python3" }
}
