//! Workspace sync that records pushes locally instead of calling a remote tool.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::domain::{DashboardError, ExplanationScript, MeetingNote, SyncDiff, SyncType, Task};
use crate::ports::{SyncReceipt, WorkspaceSync};

#[derive(Debug, Default)]
pub struct LocalWorkspaceSync {
    base_url: Option<String>,
    fail_explanation: AtomicBool,
    fail_tasks: AtomicBool,
    pushes: Mutex<Vec<(SyncType, String)>>,
}

impl LocalWorkspaceSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receipts carry `{base_url}/{note id}` as their external URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Makes every push fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.set_failing_for(SyncType::Explanation, fail);
        self.set_failing_for(SyncType::Task, fail);
    }

    /// Makes pushes of one type fail.
    pub fn set_failing_for(&self, sync_type: SyncType, fail: bool) {
        self.switch(sync_type).store(fail, Ordering::SeqCst);
    }

    fn switch(&self, sync_type: SyncType) -> &AtomicBool {
        match sync_type {
            SyncType::Explanation => &self.fail_explanation,
            SyncType::Task => &self.fail_tasks,
        }
    }

    /// `(type, meeting note id)` of every successful push, oldest first.
    pub fn pushes(&self) -> Vec<(SyncType, String)> {
        self.pushes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(
        &self,
        sync_type: SyncType,
        note: &MeetingNote,
        added: usize,
        log: String,
    ) -> Result<SyncReceipt, DashboardError> {
        if self.switch(sync_type).load(Ordering::SeqCst) {
            return Err(DashboardError::collaborator("workspace rejected the push"));
        }
        self.pushes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((sync_type, note.id.to_string()));
        Ok(SyncReceipt {
            diff: SyncDiff::added(added),
            log,
            external_url: self
                .base_url
                .as_ref()
                .map(|base| format!("{}/{}", base.trim_end_matches('/'), note.id)),
        })
    }
}

#[async_trait]
impl WorkspaceSync for LocalWorkspaceSync {
    async fn push_explanation(
        &self,
        note: &MeetingNote,
        script: &ExplanationScript,
    ) -> Result<SyncReceipt, DashboardError> {
        self.record(
            SyncType::Explanation,
            note,
            1,
            format!("explanation v{} synced", script.version),
        )
    }

    async fn push_tasks(
        &self,
        note: &MeetingNote,
        tasks: &[Task],
    ) -> Result<SyncReceipt, DashboardError> {
        self.record(
            SyncType::Task,
            note,
            tasks.len(),
            format!("{} tasks synced", tasks.len()),
        )
    }
}
