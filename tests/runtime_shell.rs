// tests/runtime_shell.rs

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;

use whenchanged::coordinator::{CoordinatorEvent, CoordinatorSet, RunState};
use whenchanged::errors::WhenChangedError;
use whenchanged::record::{RunRecord, StageRecord, StageStatus};
use whenchanged::runtime::{RunSummary, Runtime, RuntimeOptions};
use whenchanged::types::CoordinatorScope;
use whenchanged_test_utils::builders::{collaborators_with, SETTLE};
use whenchanged_test_utils::fake_runner::FakeRunner;
use whenchanged_test_utils::{init_tracing, with_timeout};

fn finished(path: &str, code: i32) -> CoordinatorEvent {
    let stage = StageRecord {
        name: "Running".to_string(),
        command: format!("python3 {path}"),
        stdout: String::new(),
        stderr: String::new(),
        status: StageStatus::Exited(code),
    };
    CoordinatorEvent::RunFinished {
        record: RunRecord::from_stages(path, Local::now(), vec![stage]),
    }
}

#[tokio::test]
async fn fatal_event_stops_the_runtime_with_an_error() {
    init_tracing();
    let (tx, rx) = mpsc::unbounded_channel();
    let runtime = Runtime::new(rx, RuntimeOptions::default());

    tx.send(CoordinatorEvent::Scheduled { path: PathBuf::from("A.java") }).unwrap();
    tx.send(CoordinatorEvent::Fatal { message: "state lock poisoned".to_string() }).unwrap();

    let result = with_timeout(runtime.run_until(std::future::pending::<()>())).await;
    match result {
        Err(WhenChangedError::Fatal(msg)) => assert_eq!(msg, "state lock poisoned"),
        other => panic!("expected Fatal, got {other:?}"),
    }
}

#[tokio::test]
async fn exit_when_idle_returns_the_run_summary() {
    init_tracing();
    let (tx, rx) = mpsc::unbounded_channel();
    let options = RuntimeOptions { exit_when_idle: true, echo_output: false };
    let runtime = Runtime::new(rx, options);

    let path = PathBuf::from("B.py");
    tx.send(CoordinatorEvent::Scheduled { path: path.clone() }).unwrap();
    tx.send(CoordinatorEvent::RunStarted { path: path.clone() }).unwrap();
    tx.send(finished("B.py", 1)).unwrap();
    tx.send(CoordinatorEvent::Rerunning { path: path.clone() }).unwrap();
    tx.send(CoordinatorEvent::RunStarted { path: path.clone() }).unwrap();
    tx.send(finished("B.py", 0)).unwrap();
    tx.send(CoordinatorEvent::Idle { path }).unwrap();
    // Never reached.
    tx.send(finished("B.py", 1)).unwrap();

    let summary = with_timeout(runtime.run_until(std::future::pending::<()>())).await.unwrap();
    assert_eq!(summary, RunSummary { runs: 2, failed: 1 });
}

#[tokio::test]
async fn shutdown_future_and_closed_channel_both_end_the_loop() {
    init_tracing();

    let (_tx, rx) = mpsc::unbounded_channel();
    let summary = Runtime::new(rx, RuntimeOptions::default())
        .run_until(async {})
        .await
        .unwrap();
    assert_eq!(summary, RunSummary::default());

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(CoordinatorEvent::Coalesced {
        path: PathBuf::from("A.java"),
        state: RunState::RunningDirty,
    })
    .unwrap();
    drop(tx);
    let summary = with_timeout(
        Runtime::new(rx, RuntimeOptions::default()).run_until(std::future::pending::<()>()),
    )
    .await
    .unwrap();
    assert_eq!(summary.runs, 0);
}

#[tokio::test(start_paused = true)]
async fn runtime_drives_a_real_coordinator_set_to_idle() {
    init_tracing();

    let runner = FakeRunner::new(Duration::from_millis(400));
    let (collaborators, rx, log) = collaborators_with(runner.clone());
    let set = CoordinatorSet::new(CoordinatorScope::Global, collaborators, SETTLE).unwrap();
    let runtime = Runtime::new(rx, RuntimeOptions { exit_when_idle: true, echo_output: true });

    set.notify("C.java").unwrap();
    let summary = with_timeout(runtime.run_until(std::future::pending::<()>())).await.unwrap();

    assert_eq!(summary, RunSummary { runs: 1, failed: 0 });
    assert_eq!(runner.executed(), vec![PathBuf::from("C.java")]);
    assert_eq!(log.records().len(), 1);
}
