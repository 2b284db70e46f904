// src/timer.rs

//! Debounce settle timer.
//!
//! The coordinator never cancels a settle wait: it re-reads the slot after
//! waking, and notifications arriving during the wait are coalesced into the
//! recorded path. The timer therefore only has to sleep.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Default quiescence interval, long enough to absorb the burst of events a
/// single editor save produces.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(1500);

/// Cancellable-by-drop delay primitive used before each run.
pub trait SettleTimer: Send + Sync {
    fn wait(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// `tokio::time::sleep` based timer used in production.
///
/// Under `tokio::time::pause()` it follows the virtual clock, which is what
/// the scheduling tests rely on.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSettleTimer;

impl SettleTimer for TokioSettleTimer {
    fn wait(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}
