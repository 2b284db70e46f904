// tests/coordinator_scope.rs

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use tokio::time::sleep;

use whenchanged::coordinator::{CoordinatorSet, RunState};
use whenchanged::types::CoordinatorScope;
use whenchanged_test_utils::builders::{collaborators_with, SETTLE};
use whenchanged_test_utils::fake_runner::FakeRunner;
use whenchanged_test_utils::{collect_until_idle, init_tracing, runs_started, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test(start_paused = true)]
async fn global_scope_runs_only_the_latest_file() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new(Duration::from_millis(200));
    let (collaborators, mut rx, _log) = collaborators_with(runner.clone());
    let set = CoordinatorSet::new(CoordinatorScope::Global, collaborators, SETTLE)?;

    set.notify("A.java")?;
    sleep(Duration::from_millis(100)).await;
    set.notify("B.java")?;

    let events = with_timeout(collect_until_idle(&mut rx, 1)).await;
    assert_eq!(runs_started(&events), 1);
    assert_eq!(runner.executed(), vec![PathBuf::from("B.java")]);
    assert_eq!(set.len(), 1);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn per_file_scope_runs_every_changed_file() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new(Duration::from_millis(200));
    let (collaborators, mut rx, _log) = collaborators_with(runner.clone());
    let set = CoordinatorSet::new(CoordinatorScope::PerFile, collaborators, SETTLE)?;
    assert!(set.is_empty());

    set.notify("A.java")?;
    sleep(Duration::from_millis(100)).await;
    set.notify("B.java")?;
    set.notify("B.java")?;

    let events = with_timeout(collect_until_idle(&mut rx, 2)).await;
    assert_eq!(runs_started(&events), 2);

    let mut executed = runner.executed();
    executed.sort();
    assert_eq!(executed, vec![PathBuf::from("A.java"), PathBuf::from("B.java")]);
    assert_eq!(set.len(), 2);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn per_file_scope_reuses_the_coordinator_for_a_path() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new(Duration::from_millis(1000));
    let (collaborators, mut rx, _log) = collaborators_with(runner.clone());
    let set = CoordinatorSet::new(CoordinatorScope::PerFile, collaborators, SETTLE)?;

    set.notify("A.java")?;
    sleep(SETTLE + Duration::from_millis(100)).await;

    let a = set.coordinator_for(&PathBuf::from("A.java"))?;
    assert_eq!(a.state()?, RunState::Running);

    set.notify("A.java")?;
    assert_eq!(a.state()?, RunState::RunningDirty);
    assert_eq!(set.len(), 1);

    let events = with_timeout(collect_until_idle(&mut rx, 1)).await;
    assert_eq!(runs_started(&events), 2);
    assert_eq!(a.state()?, RunState::Idle);

    Ok(())
}

#[test]
fn building_a_set_outside_a_runtime_fails() {
    let runner = FakeRunner::new(Duration::from_millis(1));
    let (collaborators, _rx, _log) = collaborators_with(runner);
    let err = CoordinatorSet::new(CoordinatorScope::Global, collaborators, SETTLE).unwrap_err();
    assert!(err.to_string().contains("no Tokio runtime"));
}

#[tokio::test(start_paused = true)]
async fn per_file_scope_drops_idle_coordinators_on_next_notify() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new(Duration::from_millis(200));
    let (collaborators, mut rx, _log) = collaborators_with(runner.clone());
    let set = CoordinatorSet::new(CoordinatorScope::PerFile, collaborators, SETTLE)?;

    set.notify("A.java")?;
    with_timeout(collect_until_idle(&mut rx, 1)).await;
    assert_eq!(set.len(), 1);

    // A is idle now; notifying B prunes it.
    set.notify("B.java")?;
    assert_eq!(set.len(), 1);
    with_timeout(collect_until_idle(&mut rx, 1)).await;

    // A later change to A gets a fresh coordinator and still runs.
    set.notify("A.java")?;
    with_timeout(collect_until_idle(&mut rx, 1)).await;
    assert_eq!(
        runner.executed(),
        vec![
            PathBuf::from("A.java"),
            PathBuf::from("B.java"),
            PathBuf::from("A.java")
        ]
    );

    Ok(())
}
