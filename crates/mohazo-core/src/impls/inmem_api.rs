//! In-memory meeting service for tests and the demo.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{DashboardError, RemoteMeetingId};
use crate::ports::{MeetingApi, MeetingSummary};

/// Which call should fail next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Upload,
    List,
    Description,
}

#[derive(Debug, Default)]
struct Inner {
    meetings: BTreeMap<i64, (String, String)>,
    next_id: i64,
    fail_on: Option<FailOn>,
    hide_from_list: bool,
}

/// Stores uploads in a map; the description of a meeting is its record text.
#[derive(Debug, Default)]
pub struct InMemoryMeetingApi {
    inner: Mutex<Inner>,
    uploads: AtomicUsize,
    list_calls: AtomicUsize,
    description_calls: AtomicUsize,
}

impl InMemoryMeetingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a meeting as if it had been uploaded earlier.
    pub fn with_meeting(self, id: i64, title: &str, record: &str) -> Self {
        {
            let mut inner = self.lock();
            inner.meetings.insert(id, (title.to_string(), record.to_string()));
            inner.next_id = inner.next_id.max(id);
        }
        self
    }

    /// Makes every subsequent call of `op` fail.
    pub fn fail_on(&self, op: FailOn) {
        self.lock().fail_on = Some(op);
    }

    /// Uploads still succeed but never show up in the list.
    pub fn hide_uploads_from_list(&self) {
        self.lock().hide_from_list = true;
    }

    pub fn upload_calls(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn description_calls(&self) -> usize {
        self.description_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, op: FailOn) -> Result<(), DashboardError> {
        if self.lock().fail_on == Some(op) {
            return Err(DashboardError::Collaborator {
                status: Some(500),
                message: format!("{op:?} unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MeetingApi for InMemoryMeetingApi {
    async fn upload_meeting(
        &self,
        title: &str,
        content: &str,
    ) -> Result<RemoteMeetingId, DashboardError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.check(FailOn::Upload)?;
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        if !inner.hide_from_list {
            inner.meetings.insert(id, (title.to_string(), content.to_string()));
        }
        RemoteMeetingId::new(id).ok_or(DashboardError::InvalidMeetingId(id))
    }

    async fn get_meeting_list(&self) -> Result<Vec<MeetingSummary>, DashboardError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check(FailOn::List)?;
        Ok(self
            .lock()
            .meetings
            .iter()
            .map(|(id, (title, _))| MeetingSummary {
                meeting_id: *id,
                title: title.clone(),
            })
            .collect())
    }

    async fn get_meeting_description(
        &self,
        meeting_id: RemoteMeetingId,
    ) -> Result<String, DashboardError> {
        self.description_calls.fetch_add(1, Ordering::SeqCst);
        self.check(FailOn::Description)?;
        self.lock()
            .meetings
            .get(&meeting_id.get())
            .map(|(_, record)| record.clone())
            .filter(|r| !r.trim().is_empty())
            .ok_or(DashboardError::NoData("description"))
    }
}
