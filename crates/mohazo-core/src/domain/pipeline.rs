//! Pipeline stages and their progress reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::MeetingNoteId;

/// Named stages of the ingestion pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Upload,
    Analyze,
    Describe,
    Extract,
    Sync,
}

impl PipelineStage {
    pub const INGESTION: [PipelineStage; 5] = [
        PipelineStage::Upload,
        PipelineStage::Analyze,
        PipelineStage::Describe,
        PipelineStage::Extract,
        PipelineStage::Sync,
    ];

    /// Regeneration re-runs analysis and description only.
    pub const REGENERATION: [PipelineStage; 2] = [PipelineStage::Analyze, PipelineStage::Describe];

    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::Upload => "Upload meeting note",
            PipelineStage::Analyze => "Analyze",
            PipelineStage::Describe => "Generate explanation",
            PipelineStage::Extract => "Extract tasks",
            PipelineStage::Sync => "Workspace sync",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Progress report for one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStep {
    pub meeting_note_id: MeetingNoteId,
    pub stage: PipelineStage,
    pub status: StepStatus,
    pub timestamp: DateTime<Utc>,
    /// Failed steps can be retried by re-running the pipeline from the caller.
    pub can_retry: bool,
}

impl PipelineStep {
    pub fn new(
        meeting_note_id: MeetingNoteId,
        stage: PipelineStage,
        status: StepStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            meeting_note_id,
            stage,
            status,
            timestamp,
            can_retry: status == StepStatus::Failed,
        }
    }
}

/// Latest status of one stage on the pipeline board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageState {
    pub stage: PipelineStage,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// The five ingestion stages of the most recent run.
///
/// A report for another note, or an `Upload` that starts processing, resets
/// every stage to `Pending` first. Regeneration and re-sync reports for the
/// same note update their stages in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineBoard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_note_id: Option<MeetingNoteId>,
    pub stages: Vec<StageState>,
}

impl Default for PipelineBoard {
    fn default() -> Self {
        Self {
            meeting_note_id: None,
            stages: PipelineStage::INGESTION
                .iter()
                .map(|stage| StageState {
                    stage: *stage,
                    status: StepStatus::Pending,
                    timestamp: None,
                })
                .collect(),
        }
    }
}

impl PipelineBoard {
    pub fn record(&mut self, step: &PipelineStep) {
        let new_run = step.stage == PipelineStage::Upload && step.status == StepStatus::Processing;
        if new_run || self.meeting_note_id.as_ref() != Some(&step.meeting_note_id) {
            *self = PipelineBoard {
                meeting_note_id: Some(step.meeting_note_id.clone()),
                ..PipelineBoard::default()
            };
        }
        if let Some(entry) = self.stages.iter_mut().find(|s| s.stage == step.stage) {
            entry.status = step.status;
            entry.timestamp = Some(step.timestamp);
        }
    }

    pub fn statuses(&self) -> Vec<StepStatus> {
        self.stages.iter().map(|s| s.status).collect()
    }
}
