//! Run progress events for callers watching a long run.
//!
//! Delivery is lossy: a run never waits on a slow or absent subscriber.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Stage a progress event belongs to. `Complete` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    Analysis,
    Logos,
    Mockups,
    Imagery,
    Tokens,
    Complete,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunProgress {
    pub run_id: Uuid,
    pub stage: ProgressStage,
    pub percentage: u8,
    pub message: String,
    pub elapsed_ms: u64,
}

/// Create a progress channel. Keep the receiver (or call `subscribe`) before
/// starting a run; events sent with no receiver are discarded.
pub fn progress_channel(
    capacity: usize,
) -> (broadcast::Sender<RunProgress>, broadcast::Receiver<RunProgress>) {
    broadcast::channel(capacity)
}

/// Per-run emitter. Percentages never go backwards.
pub(crate) struct ProgressReporter {
    tx: Option<broadcast::Sender<RunProgress>>,
    run_id: Uuid,
    started: Instant,
    last: AtomicU8,
}

impl ProgressReporter {
    pub(crate) fn new(tx: Option<broadcast::Sender<RunProgress>>, run_id: Uuid) -> Self {
        Self {
            tx,
            run_id,
            started: Instant::now(),
            last: AtomicU8::new(0),
        }
    }

    pub(crate) fn emit(&self, stage: ProgressStage, percentage: u8, message: impl Into<String>) {
        let percentage = percentage.min(100);
        let percentage = self.last.fetch_max(percentage, Ordering::SeqCst).max(percentage);

        let Some(tx) = &self.tx else {
            return;
        };
        let _ = tx.send(RunProgress {
            run_id: self.run_id,
            stage,
            percentage,
            message: message.into(),
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        });
    }

    /// Terminal failure event at the last percentage reached.
    pub(crate) fn fail(&self, message: impl Into<String>) {
        let reached = self.last.load(Ordering::SeqCst);
        self.emit(ProgressStage::Failed, reached, message);
    }
}
