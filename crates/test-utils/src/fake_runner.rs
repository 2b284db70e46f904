use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;
use whenchanged::exec::PipelineRunner;
use whenchanged::record::{RunRecord, StageRecord, StageStatus};

/// A fake pipeline runner that:
/// - records which paths were "run", in start order
/// - takes `duration` of (virtual) time per run
/// - reports success or a failed stage depending on `succeed`
/// - tracks how many runs overlap, to check single-flight.
#[derive(Clone)]
pub struct FakeRunner {
    executed: Arc<Mutex<Vec<PathBuf>>>,
    duration: Duration,
    succeed: bool,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
}

impl FakeRunner {
    pub fn new(duration: Duration) -> Self {
        Self {
            executed: Arc::new(Mutex::new(Vec::new())),
            duration,
            succeed: true,
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(mut self) -> Self {
        self.succeed = false;
        self
    }

    pub fn executed(&self) -> Vec<PathBuf> {
        self.executed.lock().unwrap().clone()
    }

    /// Highest number of simultaneously executing runs seen so far.
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl PipelineRunner for FakeRunner {
    fn execute(&self, path: PathBuf) -> Pin<Box<dyn Future<Output = RunRecord> + Send + '_>> {
        Box::pin(async move {
            let started_at = Local::now();
            let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now_active, Ordering::SeqCst);
            self.executed.lock().unwrap().push(path.clone());

            tokio::time::sleep(self.duration).await;

            self.active.fetch_sub(1, Ordering::SeqCst);

            let (status, stderr) = if self.succeed {
                (StageStatus::Exited(0), String::new())
            } else {
                (StageStatus::Exited(1), "error: fake compile failure\n".to_string())
            };
            let stage = StageRecord {
                name: "Running".to_string(),
                command: format!("fake {}", path.display()),
                stdout: format!("ran {}\n", path.display()),
                stderr,
                status,
            };
            RunRecord::from_stages(path, started_at, vec![stage])
        })
    }
}
