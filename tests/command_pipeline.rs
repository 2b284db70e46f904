// tests/command_pipeline.rs
//
// Runs real processes through `sh`, so Unix only.
#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use whenchanged::config::StageConfig;
use whenchanged::exec::{run_stage, CommandPipeline, FileContext, PipelineRunner, StageCommand};
use whenchanged::record::StageStatus;
use whenchanged_test_utils::init_tracing;

fn sh(name: &str, script: &str) -> StageConfig {
    StageConfig::new(name, "sh", &["-c", script])
}

fn touch(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, "").expect("write source file");
    path
}

#[tokio::test]
async fn stages_run_in_order_and_capture_both_streams() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let file = touch(tmp.path(), "Hello.java");

    let pipeline = CommandPipeline::new(
        vec![
            sh("Compiling", "echo compiling; echo warning >&2"),
            sh("Running", "echo hello from run"),
        ],
        Vec::new(),
        None,
    );

    let record = pipeline.execute(file.clone()).await;

    assert!(record.succeeded);
    assert_eq!(record.path, file);
    assert_eq!(record.stages.len(), 2);
    assert_eq!(record.stages[0].name, "Compiling");
    assert_eq!(record.stages[0].stdout, "compiling\n");
    assert_eq!(record.stages[0].stderr, "warning\n");
    assert_eq!(record.stages[1].stdout, "hello from run\n");
    assert!(record.finished_at >= record.started_at);
}

#[tokio::test]
async fn failing_stage_stops_the_pipeline() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let file = touch(tmp.path(), "Broken.java");

    let pipeline = CommandPipeline::new(
        vec![
            sh("Compiling", "echo 'Broken.java:1: error' >&2; exit 1"),
            sh("Running", "echo should not run"),
        ],
        Vec::new(),
        None,
    );

    let record = pipeline.execute(file).await;

    assert!(!record.succeeded);
    assert_eq!(record.stages.len(), 1);
    assert_eq!(record.stages[0].status, StageStatus::Exited(1));
    assert!(record.stderr().contains("Broken.java:1: error"));
    assert!(!record.stdout().contains("should not run"));
}

#[tokio::test]
async fn stages_run_in_the_file_directory_with_placeholders_expanded() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let file = touch(tmp.path(), "Main.java");

    let pipeline = CommandPipeline::new(
        vec![sh("Running", "echo {name} {stem}; pwd")],
        Vec::new(),
        None,
    );

    let record = pipeline.execute(file).await;
    assert!(record.succeeded);

    let mut lines = record.stages[0].stdout.lines();
    assert_eq!(lines.next(), Some("Main.java Main"));
    let cwd = Path::new(lines.next().expect("pwd output"));
    assert_eq!(
        cwd.canonicalize().unwrap(),
        tmp.path().canonicalize().unwrap()
    );
}

#[tokio::test]
async fn missing_program_is_reported_as_spawn_failure() {
    init_tracing();
    let tmp = TempDir::new().unwrap();

    let command = StageCommand {
        name: "Compiling".to_string(),
        program: "definitely-not-a-real-compiler-xyz".to_string(),
        args: vec!["A.java".to_string()],
    };
    let record = run_stage(&command, tmp.path(), None).await;

    assert_eq!(record.status, StageStatus::SpawnFailed);
    assert!(!record.succeeded());
    assert!(record.stderr.contains("definitely-not-a-real-compiler-xyz"));
    assert_eq!(record.command, "definitely-not-a-real-compiler-xyz A.java");
}

#[tokio::test]
async fn stage_exceeding_its_timeout_is_killed() {
    init_tracing();
    let tmp = TempDir::new().unwrap();

    let command = StageCommand {
        name: "Running".to_string(),
        program: "sleep".to_string(),
        args: vec!["5".to_string()],
    };
    let record = run_stage(&command, tmp.path(), Some(Duration::from_millis(200))).await;

    assert_eq!(record.status, StageStatus::TimedOut);
    assert_eq!(record.status.to_string(), "timed out");
}

#[tokio::test]
async fn cleanup_removes_artifacts_even_after_failure() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let file = touch(tmp.path(), "Prog.java");

    let pipeline = CommandPipeline::new(
        vec![sh("Compiling", "touch {stem}.class; exit 3")],
        vec!["{dir}/{stem}.class".to_string(), "{dir}/missing.tmp".to_string()],
        None,
    );

    let record = pipeline.execute(file).await;

    assert!(!record.succeeded);
    assert_eq!(record.stages[0].status, StageStatus::Exited(3));
    assert!(!tmp.path().join("Prog.class").exists());
}

#[test]
fn file_context_expands_every_placeholder() {
    let ctx = FileContext::from_path(Path::new("/work/src/Main.java"));
    assert_eq!(ctx.name, "Main.java");
    assert_eq!(ctx.stem, "Main");
    assert_eq!(ctx.dir, Path::new("/work/src"));

    assert_eq!(
        ctx.expand("java -cp {dir} {stem} # {file} {name} {unknown}"),
        "java -cp /work/src Main # /work/src/Main.java Main.java {unknown}"
    );
}

#[test]
fn bare_file_name_runs_in_current_directory() {
    let ctx = FileContext::from_path(Path::new("B.py"));
    assert_eq!(ctx.dir, Path::new("."));
    assert_eq!(ctx.expand("{dir}/{stem}.pyc"), "./B.pyc");
}

#[test]
fn commands_for_expands_program_and_args() {
    let pipeline = CommandPipeline::new(
        vec![
            StageConfig::new("Compiling", "javac", &["{file}"]),
            StageConfig::new("Running", "java", &["-cp", "{dir}", "{stem}"]),
        ],
        Vec::new(),
        None,
    );
    let ctx = FileContext::from_path(Path::new("/w/A.java"));
    let commands = pipeline.commands_for(&ctx);

    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].display(), "javac /w/A.java");
    assert_eq!(commands[1].display(), "java -cp /w A");
}
