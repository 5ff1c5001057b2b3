//! Bounded polling for conditions that flip outside our control
//! (a navigation finishing, a human completing a sign-in).

use notescrape_common::NotescrapeError;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// How a [`poll_until`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Satisfied { elapsed: Duration },
    TimedOut { waited: Duration },
}

impl WaitOutcome {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, WaitOutcome::Satisfied { .. })
    }

    /// Turn a timeout into [`NotescrapeError::Timeout`] naming `what`.
    pub fn into_result(self, what: &'static str, timeout: Duration) -> notescrape_common::Result<Duration> {
        match self {
            WaitOutcome::Satisfied { elapsed } => Ok(elapsed),
            WaitOutcome::TimedOut { .. } => Err(NotescrapeError::Timeout {
                what,
                after: timeout,
            }),
        }
    }
}

/// Call `check` every `interval` until it yields `Ok(true)` or `timeout`
/// elapses. Check errors count as "not yet".
///
/// The check always runs at least once, even with a zero timeout.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut check: F) -> WaitOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<bool>>,
{
    let start = Instant::now();
    loop {
        match check().await {
            Ok(true) => {
                return WaitOutcome::Satisfied {
                    elapsed: start.elapsed(),
                }
            }
            Ok(false) => {}
            Err(err) => debug!(target: "browser.wait", error = %err, "check failed"),
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return WaitOutcome::TimedOut { waited: elapsed };
        }
        sleep(interval.min(timeout - elapsed)).await;
    }
}
