//! Meeting notes and their processing state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DashboardError;
use super::ids::{MeetingNoteId, RemoteMeetingId};
use super::sync_run::SyncResult;

/// Processing state of a meeting note.
///
/// State transitions:
/// - Uploaded -> ExplanationComplete -> TaskComplete -> AssignmentComplete -> SyncComplete
/// - any non-terminal state -> Failed
///
/// The success path moves one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingNoteStatus {
    Uploaded,
    ExplanationComplete,
    TaskComplete,
    AssignmentComplete,
    SyncComplete,
    Failed,
}

impl MeetingNoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MeetingNoteStatus::Uploaded => "uploaded",
            MeetingNoteStatus::ExplanationComplete => "explanation_complete",
            MeetingNoteStatus::TaskComplete => "task_complete",
            MeetingNoteStatus::AssignmentComplete => "assignment_complete",
            MeetingNoteStatus::SyncComplete => "sync_complete",
            MeetingNoteStatus::Failed => "failed",
        }
    }

    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MeetingNoteStatus::SyncComplete | MeetingNoteStatus::Failed
        )
    }

    /// The next state on the success path, if any.
    pub fn next(self) -> Option<MeetingNoteStatus> {
        match self {
            MeetingNoteStatus::Uploaded => Some(MeetingNoteStatus::ExplanationComplete),
            MeetingNoteStatus::ExplanationComplete => Some(MeetingNoteStatus::TaskComplete),
            MeetingNoteStatus::TaskComplete => Some(MeetingNoteStatus::AssignmentComplete),
            MeetingNoteStatus::AssignmentComplete => Some(MeetingNoteStatus::SyncComplete),
            MeetingNoteStatus::SyncComplete | MeetingNoteStatus::Failed => None,
        }
    }

    pub fn can_transition_to(self, to: MeetingNoteStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == MeetingNoteStatus::Failed || self.next() == Some(to)
    }
}

impl std::fmt::Display for MeetingNoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded meeting record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingNote {
    pub id: MeetingNoteId,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub uploaded_by: String,
    pub status: MeetingNoteStatus,
    /// Starts at 1.
    pub version: u32,

    /// Id handed out by the meeting service on upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<RemoteMeetingId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unassigned_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_result: Option<SyncResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl MeetingNote {
    /// Creates a note in the `Uploaded` state, version 1.
    pub fn uploaded(
        id: MeetingNoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        uploaded_by: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            date,
            uploaded_by: uploaded_by.into(),
            status: MeetingNoteStatus::Uploaded,
            version: 1,
            remote_id: None,
            task_count: None,
            unassigned_count: None,
            last_sync_result: None,
            last_sync_at: None,
        }
    }

    /// Moves to `to`, rejecting anything the state machine does not allow.
    pub fn transition(&mut self, to: MeetingNoteStatus) -> Result<(), DashboardError> {
        if !self.status.can_transition_to(to) {
            return Err(DashboardError::InvalidTransition {
                id: self.id.to_string(),
                from: self.status.as_str(),
                to: to.as_str(),
            });
        }
        self.status = to;
        Ok(())
    }

    /// Advances one step along the success path.
    pub fn advance(&mut self) -> Result<MeetingNoteStatus, DashboardError> {
        let next = self
            .status
            .next()
            .ok_or_else(|| DashboardError::InvalidTransition {
                id: self.id.to_string(),
                from: self.status.as_str(),
                to: "next",
            })?;
        self.transition(next)?;
        Ok(next)
    }

    /// Marks the note failed. No-op when it already reached a terminal state.
    pub fn mark_failed(&mut self) {
        if !self.status.is_terminal() {
            self.status = MeetingNoteStatus::Failed;
        }
    }

    pub fn record_sync(&mut self, result: SyncResult, at: DateTime<Utc>) {
        self.last_sync_result = Some(result);
        self.last_sync_at = Some(at);
    }
}
