//! ProgressSink implementations.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::domain::{PipelineBoard, PipelineStep, StepStatus};
use crate::ports::ProgressSink;

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _step: &PipelineStep) {}
}

/// Logs each report as a tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, step: &PipelineStep) {
        if step.status == StepStatus::Failed {
            warn!(
                meeting_note_id = %step.meeting_note_id,
                stage = ?step.stage,
                can_retry = step.can_retry,
                "pipeline step failed"
            );
        } else {
            info!(
                meeting_note_id = %step.meeting_note_id,
                stage = ?step.stage,
                status = ?step.status,
                "{}",
                step.stage.label()
            );
        }
    }
}

/// Forwards reports into an unbounded channel. Reports after the receiver is
/// dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    tx: mpsc::UnboundedSender<PipelineStep>,
}

impl ChannelProgress {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PipelineStep>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&self, step: &PipelineStep) {
        let _ = self.tx.send(step.clone());
    }
}

/// Records every report on a `PipelineBoard`, then hands it to `inner`.
pub struct BoardProgress {
    inner: Arc<dyn ProgressSink>,
    board: Mutex<PipelineBoard>,
}

impl BoardProgress {
    pub fn new(inner: Arc<dyn ProgressSink>) -> Self {
        Self {
            inner,
            board: Mutex::new(PipelineBoard::default()),
        }
    }

    pub fn board(&self) -> PipelineBoard {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PipelineBoard> {
        self.board.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProgressSink for BoardProgress {
    fn report(&self, step: &PipelineStep) {
        self.lock().record(step);
        self.inner.report(step);
    }
}

impl std::fmt::Debug for BoardProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardProgress")
            .field("board", &self.board())
            .finish_non_exhaustive()
    }
}
