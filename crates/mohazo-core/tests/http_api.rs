use std::time::Duration;

use mohazo_core::config::ApiConfig;
use mohazo_core::domain::{DashboardError, ErrorKind, RemoteMeetingId};
use mohazo_core::impls::HttpMeetingApi;
use mohazo_core::ports::MeetingApi;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpMeetingApi {
    let config = ApiConfig::new(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    HttpMeetingApi::with_config(config).unwrap()
}

fn remote(id: i64) -> RemoteMeetingId {
    RemoteMeetingId::new(id).unwrap()
}

#[tokio::test]
async fn upload_posts_title_and_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/meetings"))
        .and(body_json(json!({ "title": "Kickoff", "record": "agenda" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "created",
            "data": { "meetingid": 42 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server).upload_meeting("Kickoff", "agenda").await.unwrap();
    assert_eq!(id.get(), 42);
}

#[tokio::test]
async fn upload_without_data_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "data": null
        })))
        .mount(&server)
        .await;

    let err = client(&server).upload_meeting("t", "c").await.unwrap_err();
    assert!(matches!(err, DashboardError::NoData("upload")));
    assert_eq!(err.kind(), ErrorKind::Collaborator);
}

#[tokio::test]
async fn error_message_comes_from_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/meetings"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "title too long",
            "data": null
        })))
        .mount(&server)
        .await;

    let err = client(&server).upload_meeting("t", "c").await.unwrap_err();
    match err {
        DashboardError::Collaborator { status, message } => {
            assert_eq!(status, Some(400));
            assert_eq!(message, "title too long");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unparsable_error_body_uses_default_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/meeting"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client(&server).get_meeting_list().await.unwrap_err();
    match err {
        DashboardError::Collaborator { status, message } => {
            assert_eq!(status, Some(502));
            assert_eq!(message, "failed to fetch meeting list");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn meeting_list_parses_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/meeting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "data": [
                { "meetingid": 1, "title": "Kickoff" },
                { "meetingid": 2, "title": "Design" }
            ]
        })))
        .mount(&server)
        .await;

    let list = client(&server).get_meeting_list().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1].meeting_id, 2);
    assert_eq!(list[1].title, "Design");
}

#[tokio::test]
async fn meeting_list_without_data_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/meeting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "no meetings",
            "data": null
        })))
        .mount(&server)
        .await;

    assert!(client(&server).get_meeting_list().await.unwrap().is_empty());
}

#[tokio::test]
async fn description_returns_the_script() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/description/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "data": { "script": "Purpose: ship it" }
        })))
        .mount(&server)
        .await;

    let script = client(&server).get_meeting_description(remote(7)).await.unwrap();
    assert_eq!(script, "Purpose: ship it");
}

#[tokio::test]
async fn empty_script_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/description/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "data": { "script": "" }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_meeting_description(remote(7))
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::NoData("description")));
}

#[tokio::test]
async fn non_positive_meeting_id_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = client(&server);
    for id in [0, -1] {
        let err = api.describe_raw(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let config = ApiConfig::new("http://127.0.0.1:9")
        .unwrap()
        .with_timeout(Duration::from_secs(2));
    let api = HttpMeetingApi::with_config(config).unwrap();

    let err = api.get_meeting_list().await.unwrap_err();
    assert!(matches!(err, DashboardError::Transport(_)));
}
