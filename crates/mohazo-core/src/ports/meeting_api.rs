//! MeetingApi port - 外部の会議サービス
//!
//! 実装:
//! - `HttpMeetingApi`（reqwest、本番用）
//! - `InMemoryMeetingApi`（テスト・デモ用）

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DashboardError, RemoteMeetingId};

/// One entry of the remote meeting list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSummary {
    #[serde(rename = "meetingid")]
    pub meeting_id: i64,
    pub title: String,
}

/// The three collaborator operations the workflows consume.
///
/// Every call is a suspension point; callers await one before issuing the next.
#[async_trait]
pub trait MeetingApi: Send + Sync {
    /// Uploads a meeting record and returns the id the service assigned.
    async fn upload_meeting(
        &self,
        title: &str,
        content: &str,
    ) -> Result<RemoteMeetingId, DashboardError>;

    /// Empty when the service has no meetings.
    async fn get_meeting_list(&self) -> Result<Vec<MeetingSummary>, DashboardError>;

    /// Description script for a meeting.
    async fn get_meeting_description(
        &self,
        meeting_id: RemoteMeetingId,
    ) -> Result<String, DashboardError>;
}
