pub mod builders;
pub mod fake_runner;

use std::sync::Once;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};
use whenchanged::coordinator::CoordinatorEvent;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 60-second timeout.
///
/// Scheduling tests run on a paused clock, so the limit is virtual time and
/// only trips when the coordinator stops making progress.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(60), f)
        .await
        .expect("Test timed out after 60 seconds")
}

/// Collect events until `count` `Idle` events have been seen.
///
/// Panics on `Fatal` so scheduling bugs fail loudly.
pub async fn collect_until_idle(
    rx: &mut mpsc::UnboundedReceiver<CoordinatorEvent>,
    count: usize,
) -> Vec<CoordinatorEvent> {
    let mut events = Vec::new();
    let mut idles = 0;
    while idles < count {
        let event = rx.recv().await.expect("event channel closed");
        match &event {
            CoordinatorEvent::Idle { .. } => idles += 1,
            CoordinatorEvent::Fatal { message } => panic!("coordinator failed: {message}"),
            _ => {}
        }
        events.push(event);
    }
    events
}

/// Drain everything currently buffered without waiting.
pub fn drain_ready(rx: &mut mpsc::UnboundedReceiver<CoordinatorEvent>) -> Vec<CoordinatorEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Number of `RunStarted` events in `events`.
pub fn runs_started(events: &[CoordinatorEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, CoordinatorEvent::RunStarted { .. }))
        .count()
}
