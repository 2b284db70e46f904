// src/exec/mod.rs

//! Pipeline execution layer.
//!
//! - [`backend`] provides the `PipelineRunner` trait the coordinator calls.
//! - [`pipeline`] is the production runner: ordered stages, stop at first
//!   failure, best-effort cleanup of build artifacts.
//! - [`stage`] spawns one stage with `tokio::process::Command` and captures
//!   its output.
//! - [`template`] expands `{file}`-style placeholders in stage commands.

pub mod backend;
pub mod pipeline;
pub mod stage;
pub mod template;

pub use backend::PipelineRunner;
pub use pipeline::CommandPipeline;
pub use stage::{run_stage, StageCommand};
pub use template::FileContext;
