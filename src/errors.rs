// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::coordinator::RunState;

#[derive(Error, Debug)]
pub enum WhenChangedError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    /// The coordinator observed a state that no correct interleaving can
    /// produce at this point. Always fatal.
    #[error("run coordinator invariant violated: state {state} observed {during}")]
    InvariantViolation {
        state: RunState,
        during: &'static str,
    },

    #[error("run coordinator state lock poisoned")]
    LockPoisoned,

    #[error("settle/run task aborted: {0}")]
    TaskAborted(String),

    #[error("no Tokio runtime available to spawn settle/run tasks")]
    NoRuntime,

    #[error("fatal coordinator failure: {0}")]
    Fatal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WhenChangedError>;
