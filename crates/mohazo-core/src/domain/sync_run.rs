//! Sync runs: append-only audit records of pushes to the external workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{MeetingNoteId, SyncRunId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncType {
    Explanation,
    Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncResult {
    Success,
    #[serde(alias = "failure")]
    Failed,
}

/// Added / modified / deleted counts of one sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncDiff {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
}

impl SyncDiff {
    pub fn added(added: usize) -> Self {
        Self {
            added,
            ..Self::default()
        }
    }
}

impl std::ops::Add for SyncDiff {
    type Output = SyncDiff;

    fn add(self, rhs: SyncDiff) -> SyncDiff {
        SyncDiff {
            added: self.added + rhs.added,
            modified: self.modified + rhs.modified,
            deleted: self.deleted + rhs.deleted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRun {
    pub id: SyncRunId,
    #[serde(rename = "type")]
    pub sync_type: SyncType,
    pub meeting_note_id: MeetingNoteId,
    pub version: u32,
    pub result: SyncResult,
    pub diff: SyncDiff,
    pub log: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
}

impl SyncRun {
    pub fn is_failure(&self) -> bool {
        self.result == SyncResult::Failed
    }
}
