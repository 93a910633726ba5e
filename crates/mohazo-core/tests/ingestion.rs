use std::sync::Arc;

use mohazo_core::app::{Dashboard, DashboardBuilder, MeetingInput, seed};
use mohazo_core::domain::{
    DashboardError, MeetingNoteStatus, MemberId, PipelineStage, PipelineStep, StepStatus,
    SyncResult, SyncType, WorkId,
};
use mohazo_core::impls::{ChannelProgress, FailOn, InMemoryMeetingApi, LocalWorkspaceSync};
use tokio::sync::mpsc::UnboundedReceiver;

struct Harness {
    dashboard: Dashboard,
    api: Arc<InMemoryMeetingApi>,
    sync: Arc<LocalWorkspaceSync>,
    steps: UnboundedReceiver<PipelineStep>,
}

fn harness() -> Harness {
    let api = Arc::new(InMemoryMeetingApi::new());
    let sync = Arc::new(LocalWorkspaceSync::new().with_base_url("https://workspace.example"));
    let (progress, steps) = ChannelProgress::new();
    let dashboard = DashboardBuilder::new()
        .state(seed::demo_state())
        .meeting_api(api.clone())
        .workspace_sync(sync.clone())
        .progress(Arc::new(progress))
        .build()
        .unwrap();
    Harness {
        dashboard,
        api,
        sync,
        steps,
    }
}

fn drain(rx: &mut UnboundedReceiver<PipelineStep>) -> Vec<(PipelineStage, StepStatus)> {
    let mut out = Vec::new();
    while let Ok(step) = rx.try_recv() {
        out.push((step.stage, step.status));
    }
    out
}

const CONTENT: &str = "- collect click logs\n- build ranking model\n- design result cards";

#[tokio::test]
async fn valid_meeting_reaches_sync_complete_with_one_work() {
    let mut h = harness();
    let works_before = h.dashboard.state().works.len();
    let tasks_before = h.dashboard.state().tasks.len();

    let report = h
        .dashboard
        .ingest(&MeetingInput::new("Search revamp", CONTENT))
        .await
        .unwrap();

    let state = h.dashboard.state();
    let note = state.meeting_note(&report.meeting_note_id).unwrap();
    assert_eq!(note.status, MeetingNoteStatus::SyncComplete);
    assert_eq!(note.version, 1);
    assert_eq!(note.remote_id, Some(report.remote_id));
    assert_eq!(note.last_sync_result, Some(SyncResult::Success));

    assert_eq!(state.works.len(), works_before + 1);
    let work = state.work(&report.work_id).unwrap();
    assert!(work.assignee_id.is_none());
    assert_eq!(work.task_count, 3);
    assert_eq!(work.meeting_note_id.as_ref(), Some(&report.meeting_note_id));

    let new_tasks = &state.tasks[tasks_before..];
    assert!((1..=5).contains(&new_tasks.len()));
    assert!(new_tasks.iter().all(|t| t.work_id == report.work_id));
    assert_eq!(new_tasks[0].title, "collect click logs");

    assert_eq!(state.latest_script(&report.meeting_note_id).unwrap().version, 1);
    assert_eq!(report.sync_run_ids.len(), 2);
    assert_eq!(h.sync.pushes().len(), 2);
}

#[tokio::test]
async fn each_stage_reports_before_the_next_begins() {
    let mut h = harness();
    h.dashboard
        .ingest(&MeetingInput::new("Search revamp", CONTENT))
        .await
        .unwrap();

    let expected: Vec<_> = PipelineStage::INGESTION
        .iter()
        .flat_map(|s| [(*s, StepStatus::Processing), (*s, StepStatus::Completed)])
        .collect();
    assert_eq!(drain(&mut h.steps), expected);
}

#[tokio::test]
async fn empty_title_is_rejected_before_any_call() {
    let mut h = harness();
    let notes_before = h.dashboard.state().meeting_notes.len();

    let err = h
        .dashboard
        .ingest(&MeetingInput::new("", CONTENT))
        .await
        .unwrap_err();

    assert!(matches!(err, DashboardError::EmptyField("title")));
    assert_eq!(h.api.upload_calls(), 0);
    assert_eq!(h.dashboard.state().meeting_notes.len(), notes_before);
    assert!(drain(&mut h.steps).is_empty());
}

#[tokio::test]
async fn failed_description_marks_the_note_failed() {
    let mut h = harness();
    h.api.fail_on(FailOn::Description);
    let works_before = h.dashboard.state().works.len();
    let tasks_before = h.dashboard.state().tasks.len();

    let err = h
        .dashboard
        .ingest(&MeetingInput::new("Search revamp", CONTENT))
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Collaborator { .. }));

    let state = h.dashboard.state();
    let note = state.meeting_notes.last().unwrap();
    assert_eq!(note.status, MeetingNoteStatus::Failed);
    assert_eq!(state.works.len(), works_before);
    assert_eq!(state.tasks.len(), tasks_before);
    assert_eq!(state.kpi().failed_count, 1);

    let steps = drain(&mut h.steps);
    assert_eq!(steps.last(), Some(&(PipelineStage::Describe, StepStatus::Failed)));
}

#[tokio::test]
async fn upload_missing_from_list_fails_analysis() {
    let mut h = harness();
    h.api.hide_uploads_from_list();

    let result = h
        .dashboard
        .ingest(&MeetingInput::new("Search revamp", CONTENT))
        .await;
    assert!(result.is_err());
    assert_eq!(h.api.description_calls(), 0);
    assert_eq!(
        h.dashboard.state().meeting_notes.last().unwrap().status,
        MeetingNoteStatus::Failed
    );
}

#[tokio::test]
async fn failed_sync_is_recorded_but_creates_no_work() {
    let mut h = harness();
    h.sync.set_failing(true);
    let runs_before = h.dashboard.state().sync_runs.len();
    let works_before = h.dashboard.state().works.len();

    let err = h
        .dashboard
        .ingest(&MeetingInput::new("Search revamp", CONTENT))
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Collaborator { .. }));

    let state = h.dashboard.state();
    let note = state.meeting_notes.last().unwrap();
    assert_eq!(note.status, MeetingNoteStatus::Failed);
    assert_eq!(note.last_sync_result, Some(SyncResult::Failed));
    assert_eq!(state.sync_runs.len(), runs_before + 1);
    assert!(state.sync_runs.last().unwrap().is_failure());
    assert_eq!(state.works.len(), works_before);
}

#[tokio::test]
async fn ingested_work_goes_through_the_inbox() {
    let mut h = harness();
    let report = h
        .dashboard
        .ingest(&MeetingInput::new("Search revamp", CONTENT))
        .await
        .unwrap();
    assert_eq!(h.dashboard.unassigned_works().len(), 1);

    let member = MemberId::new("1");
    h.dashboard.stage_assignment(&report.work_id, &member).unwrap();
    let confirmed = h.dashboard.confirm_assignment(&report.work_id).unwrap();

    assert_eq!(confirmed, Some(member.clone()));
    assert_eq!(h.dashboard.pending_assignment(&report.work_id), None);
    let work = h.dashboard.state().work(&report.work_id).unwrap();
    assert_eq!(work.assignee_id, Some(member));
    assert!(h.dashboard.unassigned_works().is_empty());
    assert_eq!(h.dashboard.confirm_assignment(&report.work_id).unwrap(), None);

    let note = h.dashboard.state().meeting_note(&report.meeting_note_id).unwrap();
    assert_eq!(note.unassigned_count, Some(0));
}

#[tokio::test]
async fn partial_sync_failure_does_not_reuse_the_pushed_version() {
    let mut h = harness();
    h.sync.set_failing_for(SyncType::Task, true);

    let result = h
        .dashboard
        .ingest(&MeetingInput::new("Search revamp", CONTENT))
        .await;
    assert!(result.is_err());

    let note_id = h.dashboard.state().meeting_notes.last().unwrap().id.clone();
    let runs: Vec<_> = h
        .dashboard
        .state()
        .sync_runs
        .iter()
        .filter(|r| r.meeting_note_id == note_id)
        .map(|r| (r.sync_type, r.version, r.result))
        .collect();
    assert_eq!(
        runs,
        vec![
            (SyncType::Explanation, 1, SyncResult::Success),
            (SyncType::Task, 1, SyncResult::Failed),
        ]
    );
    assert!(h.dashboard.latest_script(&note_id).is_none());

    h.sync.set_failing_for(SyncType::Task, false);
    let script = h.dashboard.regenerate(&note_id).await.unwrap();
    assert_eq!(script.version, 2);
}

#[tokio::test]
async fn failed_regeneration_keeps_status_and_scripts() {
    let mut h = harness();
    let report = h
        .dashboard
        .ingest(&MeetingInput::new("Search revamp", CONTENT))
        .await
        .unwrap();
    drain(&mut h.steps);
    let scripts_before = h.dashboard.state().scripts.len();

    h.api.fail_on(FailOn::Description);
    let err = h.dashboard.regenerate(&report.meeting_note_id).await.unwrap_err();
    assert!(matches!(err, DashboardError::Collaborator { .. }));

    let state = h.dashboard.state();
    let note = state.meeting_note(&report.meeting_note_id).unwrap();
    assert_eq!(note.status, MeetingNoteStatus::SyncComplete);
    assert_eq!(state.scripts.len(), scripts_before);
    assert_eq!(state.latest_script(&report.meeting_note_id).unwrap().version, 1);
    assert_eq!(
        drain(&mut h.steps).last(),
        Some(&(PipelineStage::Describe, StepStatus::Failed))
    );
}

#[tokio::test]
async fn failed_resync_is_recorded_and_status_stays() {
    let mut h = harness();
    let report = h
        .dashboard
        .ingest(&MeetingInput::new("Search revamp", CONTENT))
        .await
        .unwrap();
    let runs_before = h.dashboard.state().sync_runs.len();

    h.sync.set_failing(true);
    let err = h.dashboard.resync(&report.meeting_note_id).await.unwrap_err();
    assert!(matches!(err, DashboardError::Collaborator { .. }));

    let state = h.dashboard.state();
    let note = state.meeting_note(&report.meeting_note_id).unwrap();
    assert_eq!(note.status, MeetingNoteStatus::SyncComplete);
    assert_eq!(note.last_sync_result, Some(SyncResult::Failed));
    assert_eq!(state.sync_runs.len(), runs_before + 1);
    let run = state.sync_runs.last().unwrap();
    assert!(run.is_failure());
    assert_eq!(run.meeting_note_id, report.meeting_note_id);
}

#[tokio::test]
async fn regenerate_fetches_a_new_description() {
    let mut h = harness();
    let report = h
        .dashboard
        .ingest(&MeetingInput::new("Search revamp", CONTENT))
        .await
        .unwrap();
    drain(&mut h.steps);

    let script = h.dashboard.regenerate(&report.meeting_note_id).await.unwrap();
    assert_eq!(script.version, 2);
    assert_eq!(h.api.description_calls(), 2);
    assert_eq!(
        drain(&mut h.steps),
        vec![
            (PipelineStage::Analyze, StepStatus::Processing),
            (PipelineStage::Analyze, StepStatus::Completed),
            (PipelineStage::Describe, StepStatus::Processing),
            (PipelineStage::Describe, StepStatus::Completed),
        ]
    );
    let note = h.dashboard.state().meeting_note(&report.meeting_note_id).unwrap();
    assert_eq!(note.status, MeetingNoteStatus::SyncComplete);
}

#[tokio::test]
async fn unknown_work_is_not_found() {
    let mut h = harness();
    let err = h
        .dashboard
        .stage_assignment(&WorkId::new("nope"), &MemberId::new("1"))
        .unwrap_err();
    assert_eq!(err.kind(), mohazo_core::ErrorKind::NotFound);
}
