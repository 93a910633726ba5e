//! Meeting list refresh with an in-flight guard.
//!
//! A refresh that starts while another one is running is dropped, not queued:
//! it returns [`RefreshOutcome::Skipped`] without calling the service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::DashboardError;
use crate::ports::{Clock, MeetingApi, MeetingSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The list was fetched; carries its length.
    Refreshed(usize),
    /// Another refresh was in flight.
    Skipped,
}

#[derive(Debug, Default)]
struct Cache {
    meetings: Vec<MeetingSummary>,
    refreshed_at: Option<DateTime<Utc>>,
}

pub struct MeetingListRefresher {
    api: Arc<dyn MeetingApi>,
    clock: Arc<dyn Clock>,
    in_flight: AtomicBool,
    cache: Mutex<Cache>,
}

/// Clears the in-flight flag when the refresh ends, including on error.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl MeetingListRefresher {
    pub fn new(api: Arc<dyn MeetingApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            in_flight: AtomicBool::new(false),
            cache: Mutex::new(Cache::default()),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, DashboardError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("meeting list refresh already in flight; skipped");
            return Ok(RefreshOutcome::Skipped);
        }
        let _guard = InFlight(&self.in_flight);

        let meetings = self.api.get_meeting_list().await?;
        let count = meetings.len();
        {
            let mut cache = self.lock();
            cache.meetings = meetings;
            cache.refreshed_at = Some(self.clock.now());
        }
        info!(count, "meeting list refreshed");
        Ok(RefreshOutcome::Refreshed(count))
    }

    /// Last fetched list; empty before the first refresh.
    pub fn meetings(&self) -> Vec<MeetingSummary> {
        self.lock().meetings.clone()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.lock().refreshed_at
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{FailOn, InMemoryMeetingApi};
    use crate::ports::SystemClock;

    #[tokio::test]
    async fn refresh_caches_the_list() {
        let api = Arc::new(InMemoryMeetingApi::new().with_meeting(1, "Kickoff", "x"));
        let refresher = MeetingListRefresher::new(api.clone(), Arc::new(SystemClock));

        assert!(refresher.meetings().is_empty());
        assert_eq!(refresher.refresh().await.unwrap(), RefreshOutcome::Refreshed(1));
        assert_eq!(refresher.meetings()[0].title, "Kickoff");
        assert!(refresher.refreshed_at().is_some());
        assert!(!refresher.is_refreshing());
    }

    #[tokio::test]
    async fn failed_refresh_releases_the_guard() {
        let api = Arc::new(InMemoryMeetingApi::new());
        api.fail_on(FailOn::List);
        let refresher = MeetingListRefresher::new(api.clone(), Arc::new(SystemClock));

        assert!(refresher.refresh().await.is_err());
        assert!(!refresher.is_refreshing());
        assert!(refresher.refresh().await.is_err());
        assert_eq!(api.list_calls(), 2);
    }
}
