//! WorkspaceSync port - 外部ワークスペースツールへの一方向 push

use async_trait::async_trait;

use crate::domain::{DashboardError, ExplanationScript, MeetingNote, SyncDiff, Task};

/// What the workspace reported back for one push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReceipt {
    pub diff: SyncDiff,
    pub log: String,
    pub external_url: Option<String>,
}

#[async_trait]
pub trait WorkspaceSync: Send + Sync {
    async fn push_explanation(
        &self,
        note: &MeetingNote,
        script: &ExplanationScript,
    ) -> Result<SyncReceipt, DashboardError>;

    async fn push_tasks(
        &self,
        note: &MeetingNote,
        tasks: &[Task],
    ) -> Result<SyncReceipt, DashboardError>;
}
