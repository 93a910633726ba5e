//! HttpMeetingApi - 会議サービスの reqwest クライアント
//!
//! レスポンスはすべて `{"message": string, "data": T | null}` で包まれている。

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ApiConfig;
use crate::domain::{DashboardError, RemoteMeetingId};
use crate::ports::{MeetingApi, MeetingSummary};

#[derive(Debug, Clone)]
pub struct HttpMeetingApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpMeetingApi {
    pub fn with_config(config: ApiConfig) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// 生の id で説明を取得する。0 以下の id はリクエスト前に失敗する。
    pub async fn describe_raw(&self, meeting_id: i64) -> Result<String, DashboardError> {
        let id = RemoteMeetingId::new(meeting_id)
            .ok_or(DashboardError::InvalidMeetingId(meeting_id))?;
        self.get_meeting_description(id).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        default_error: &str,
    ) -> Result<Option<T>, DashboardError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response, default_error).await);
        }
        let envelope: Envelope<T> = response.json().await?;
        debug!(message = %envelope.message, "meeting service responded");
        Ok(envelope.data)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Serialize)]
struct UploadRequest<'a> {
    title: &'a str,
    record: &'a str,
}

#[derive(Deserialize)]
struct UploadResponse {
    meetingid: i64,
}

#[derive(Deserialize)]
struct DescriptionResponse {
    #[serde(default)]
    script: String,
}

async fn error_from_response(
    status: StatusCode,
    response: Response,
    default_error: &str,
) -> DashboardError {
    let message = response
        .json::<Envelope<serde_json::Value>>()
        .await
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default_error.to_string());
    DashboardError::Collaborator {
        status: Some(status.as_u16()),
        message,
    }
}

#[async_trait]
impl MeetingApi for HttpMeetingApi {
    async fn upload_meeting(
        &self,
        title: &str,
        content: &str,
    ) -> Result<RemoteMeetingId, DashboardError> {
        let request = self
            .client
            .post(self.config.endpoint("/api/meetings"))
            .json(&UploadRequest {
                title,
                record: content,
            });
        let data: UploadResponse = self
            .send(request, "failed to upload meeting record")
            .await?
            .ok_or(DashboardError::NoData("upload"))?;
        RemoteMeetingId::new(data.meetingid).ok_or(DashboardError::InvalidMeetingId(data.meetingid))
    }

    async fn get_meeting_list(&self) -> Result<Vec<MeetingSummary>, DashboardError> {
        let request = self.client.get(self.config.endpoint("/api/meeting"));
        let data: Option<Vec<MeetingSummary>> =
            self.send(request, "failed to fetch meeting list").await?;
        Ok(data.unwrap_or_default())
    }

    async fn get_meeting_description(
        &self,
        meeting_id: RemoteMeetingId,
    ) -> Result<String, DashboardError> {
        let request = self
            .client
            .get(self.config.endpoint(&format!("/api/description/{meeting_id}")));
        let data: Option<DescriptionResponse> = self
            .send(request, "failed to fetch meeting description")
            .await?;
        data.map(|d| d.script)
            .filter(|s| !s.trim().is_empty())
            .ok_or(DashboardError::NoData("description"))
    }
}
