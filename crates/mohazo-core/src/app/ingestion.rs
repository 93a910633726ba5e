//! Ingestion pipeline - 会議録から Work / Task / 説明を作る
//!
//! # ステージ（順に実行、並行しない）
//! 1. Upload   - 会議サービスへ登録（remote id を得る）
//! 2. Analyze  - 会議一覧に登録されたことを確認
//! 3. Describe - 説明スクリプトを取得（note: explanation_complete）
//! 4. Extract  - Work 1 件 + Task 1..=5 件を導出（note: task_complete → assignment_complete）
//! 5. Sync     - ワークスペースへ push（note: sync_complete）
//!
//! 各ステージは開始前に `Processing`、終了時に `Completed` を ProgressSink へ通知する。
//! 途中で失敗すると note は `failed` になり、Work / Task は 1 件も作られない。

use serde::Serialize;
use tracing::{info, warn};

use super::state::AppState;
use crate::domain::{
    Category, Confidence, DashboardError, ExplanationContent, ExplanationScript, MeetingNote,
    MeetingNoteId, MeetingNoteStatus, PipelineStage, PipelineStep, RemoteMeetingId, StepStatus,
    SyncResult, SyncRun, SyncRunId, SyncType, Task, TaskId, Work, WorkId,
};
use crate::ports::{
    Clock, IdGenerator, IdGeneratorExt, MeetingApi, ProgressSink, SyncReceipt, WorkspaceSync,
};

/// Upper bound of tasks derived from one meeting note.
pub const MAX_DERIVED_TASKS: usize = 5;

/// Leading tasks tagged `meeting_based`; the rest are `inferred`.
pub const MEETING_BASED_TASKS: usize = 3;

/// The collaborators one pipeline run talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub api: &'a dyn MeetingApi,
    pub sync: &'a dyn WorkspaceSync,
    pub progress: &'a dyn ProgressSink,
    pub clock: &'a dyn Clock,
    pub ids: &'a dyn IdGenerator,
}

impl Collaborators<'_> {
    fn report(&self, note_id: &MeetingNoteId, stage: PipelineStage, status: StepStatus) {
        self.progress
            .report(&PipelineStep::new(note_id.clone(), stage, status, self.clock.now()));
    }

    /// Runs one stage between `Processing` and `Completed`/`Failed` reports.
    async fn stage<T, F>(
        &self,
        note_id: &MeetingNoteId,
        stage: PipelineStage,
        fut: F,
    ) -> Result<T, (PipelineStage, DashboardError)>
    where
        F: std::future::Future<Output = Result<T, DashboardError>>,
    {
        self.report(note_id, stage, StepStatus::Processing);
        match fut.await {
            Ok(value) => {
                self.report(note_id, stage, StepStatus::Completed);
                Ok(value)
            }
            Err(err) => {
                self.report(note_id, stage, StepStatus::Failed);
                Err((stage, err))
            }
        }
    }
}

/// Input of one ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingInput {
    pub title: String,
    pub content: String,
    pub uploaded_by: String,
}

impl MeetingInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            uploaded_by: String::from("me"),
        }
    }

    pub fn uploaded_by(mut self, who: impl Into<String>) -> Self {
        self.uploaded_by = who.into();
        self
    }

    /// Both fields must be non-blank; values are returned trimmed.
    fn validated(&self) -> Result<(&str, &str), DashboardError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DashboardError::EmptyField("title"));
        }
        let content = self.content.trim();
        if content.is_empty() {
            return Err(DashboardError::EmptyField("content"));
        }
        Ok((title, content))
    }
}

/// What a successful ingestion produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionReport {
    pub meeting_note_id: MeetingNoteId,
    pub remote_id: RemoteMeetingId,
    pub work_id: WorkId,
    pub task_ids: Vec<TaskId>,
    pub sync_run_ids: Vec<SyncRunId>,
}

/// Runs the whole pipeline for one meeting record.
///
/// Validation failures return before any note is created or any call is made.
pub async fn ingest(
    ctx: Collaborators<'_>,
    state: &mut AppState,
    input: &MeetingInput,
) -> Result<IngestionReport, DashboardError> {
    let (title, content) = input.validated()?;

    let note_id: MeetingNoteId = ctx.ids.generate();
    state.meeting_notes.push(MeetingNote::uploaded(
        note_id.clone(),
        title,
        content,
        input.uploaded_by.trim(),
        ctx.clock.now(),
    ));
    info!(meeting_note_id = %note_id, "ingestion started");

    match run_stages(ctx, state, &note_id, title, content).await {
        Ok(report) => {
            info!(
                meeting_note_id = %note_id,
                work_id = %report.work_id,
                tasks = report.task_ids.len(),
                "ingestion complete"
            );
            Ok(report)
        }
        Err((stage, err)) => {
            warn!(meeting_note_id = %note_id, stage = ?stage, error = %err, "ingestion failed");
            if let Ok(note) = state.meeting_note_mut(&note_id) {
                note.mark_failed();
            }
            Err(err)
        }
    }
}

async fn run_stages(
    ctx: Collaborators<'_>,
    state: &mut AppState,
    note_id: &MeetingNoteId,
    title: &str,
    content: &str,
) -> Result<IngestionReport, (PipelineStage, DashboardError)> {
    let at = |stage: PipelineStage| move |err: DashboardError| (stage, err);

    // Upload
    let remote_id = ctx
        .stage(note_id, PipelineStage::Upload, ctx.api.upload_meeting(title, content))
        .await?;
    state.meeting_note_mut(note_id).map_err(at(PipelineStage::Upload))?.remote_id = Some(remote_id);

    // Analyze
    ctx.stage(note_id, PipelineStage::Analyze, confirm_listed(ctx.api, remote_id))
        .await?;

    // Describe
    let description = ctx
        .stage(
            note_id,
            PipelineStage::Describe,
            ctx.api.get_meeting_description(remote_id),
        )
        .await?;
    let script = ExplanationScript {
        id: ctx.ids.generate(),
        meeting_note_id: note_id.clone(),
        version: 1,
        content: ExplanationContent::from_script(&description),
        created_at: ctx.clock.now(),
        references: Vec::new(),
    };
    advance(state, note_id).map_err(at(PipelineStage::Describe))?;

    // Extract
    ctx.report(note_id, PipelineStage::Extract, StepStatus::Processing);
    let work_id: WorkId = ctx.ids.generate();
    let tasks = derive_tasks(ctx.ids, &work_id, title, content);
    let work = derive_work(work_id.clone(), note_id, title, content, tasks.len());
    {
        let note = state.meeting_note_mut(note_id).map_err(at(PipelineStage::Extract))?;
        note.advance().map_err(at(PipelineStage::Extract))?;
        note.task_count = Some(tasks.len());
        // Derived Works land in the inbox unassigned.
        note.advance().map_err(at(PipelineStage::Extract))?;
        note.unassigned_count = Some(1);
    }
    ctx.report(note_id, PipelineStage::Extract, StepStatus::Completed);

    // Sync
    let sync_run_ids = {
        let note = state.meeting_note(note_id).map_err(at(PipelineStage::Sync))?.clone();
        ctx.report(note_id, PipelineStage::Sync, StepStatus::Processing);
        let result = push_all(ctx, state, &note, Some(&script), &tasks).await;
        let status = if result.is_ok() { StepStatus::Completed } else { StepStatus::Failed };
        ctx.report(note_id, PipelineStage::Sync, status);
        result.map_err(at(PipelineStage::Sync))?
    };
    advance(state, note_id).map_err(at(PipelineStage::Sync))?;

    let task_ids = tasks.iter().map(|t| t.id.clone()).collect();
    state.commit_derived(work, tasks, script);

    Ok(IngestionReport {
        meeting_note_id: note_id.clone(),
        remote_id,
        work_id,
        task_ids,
        sync_run_ids,
    })
}

fn advance(state: &mut AppState, note_id: &MeetingNoteId) -> Result<MeetingNoteStatus, DashboardError> {
    state.meeting_note_mut(note_id)?.advance()
}

async fn confirm_listed(api: &dyn MeetingApi, remote_id: RemoteMeetingId) -> Result<(), DashboardError> {
    let listed = api
        .get_meeting_list()
        .await?
        .iter()
        .any(|m| m.meeting_id == remote_id.get());
    if !listed {
        return Err(DashboardError::collaborator(format!(
            "meeting {remote_id} is missing from the meeting list"
        )));
    }
    Ok(())
}

/// Pushes the explanation (if any) and the tasks, appending one SyncRun per push.
///
/// A failed push is still recorded, with `failed` result, before the error is
/// returned. The note's last-sync fields follow the outcome.
pub(crate) async fn push_all(
    ctx: Collaborators<'_>,
    state: &mut AppState,
    note: &MeetingNote,
    script: Option<&ExplanationScript>,
    tasks: &[Task],
) -> Result<Vec<SyncRunId>, DashboardError> {
    let mut ids = Vec::with_capacity(2);

    if let Some(script) = script {
        let receipt = ctx.sync.push_explanation(note, script).await;
        ids.push(record_run(ctx, state, note, SyncType::Explanation, script.version, receipt)?);
    }
    let receipt = ctx.sync.push_tasks(note, tasks).await;
    ids.push(record_run(ctx, state, note, SyncType::Task, note.version, receipt)?);
    Ok(ids)
}

fn record_run(
    ctx: Collaborators<'_>,
    state: &mut AppState,
    note: &MeetingNote,
    sync_type: SyncType,
    version: u32,
    receipt: Result<SyncReceipt, DashboardError>,
) -> Result<SyncRunId, DashboardError> {
    let now = ctx.clock.now();
    let id: SyncRunId = ctx.ids.generate();
    let (result, run) = match receipt {
        Ok(receipt) => (
            Ok(id.clone()),
            SyncRun {
                id,
                sync_type,
                meeting_note_id: note.id.clone(),
                version,
                result: SyncResult::Success,
                diff: receipt.diff,
                log: receipt.log,
                created_at: now,
                external_url: receipt.external_url,
            },
        ),
        Err(err) => {
            let run = SyncRun {
                id,
                sync_type,
                meeting_note_id: note.id.clone(),
                version,
                result: SyncResult::Failed,
                diff: Default::default(),
                log: err.to_string(),
                created_at: now,
                external_url: None,
            };
            (Err(err), run)
        }
    };
    info!(
        meeting_note_id = %note.id,
        sync_type = ?sync_type,
        result = ?run.result,
        "sync run recorded"
    );
    if let Ok(stored) = state.meeting_note_mut(&note.id) {
        stored.record_sync(run.result, now);
    }
    state.sync_runs.push(run);
    result
}

/// Re-runs analysis and description for an existing note.
///
/// The note's status is left alone and no Work/Task is created. The new script
/// version is one past every version already stored or pushed for the note.
/// Notes that were never uploaded are described from their own content.
pub async fn regenerate(
    ctx: Collaborators<'_>,
    state: &mut AppState,
    note_id: &MeetingNoteId,
) -> Result<ExplanationScript, DashboardError> {
    let note = state.meeting_note(note_id)?;
    let remote_id = note.remote_id;
    let fallback = note.content.clone();

    let description = match remote_id {
        Some(remote_id) => {
            let analyzed = ctx
                .stage(note_id, PipelineStage::Analyze, confirm_listed(ctx.api, remote_id))
                .await;
            let described = match analyzed {
                Ok(()) => {
                    ctx.stage(
                        note_id,
                        PipelineStage::Describe,
                        ctx.api.get_meeting_description(remote_id),
                    )
                    .await
                }
                Err(failed) => Err(failed),
            };
            described.map_err(|(stage, err)| {
                warn!(meeting_note_id = %note_id, stage = ?stage, error = %err, "regeneration failed");
                err
            })?
        }
        None => {
            for stage in PipelineStage::REGENERATION {
                ctx.report(note_id, stage, StepStatus::Processing);
                ctx.report(note_id, stage, StepStatus::Completed);
            }
            fallback
        }
    };

    let version = state.next_script_version(note_id);
    let previous_refs = state
        .latest_script(note_id)
        .map(|s| s.references.clone())
        .unwrap_or_default();
    let script = ExplanationScript {
        id: ctx.ids.generate(),
        meeting_note_id: note_id.clone(),
        version,
        content: ExplanationContent::from_script(&description),
        created_at: ctx.clock.now(),
        references: previous_refs,
    };
    info!(meeting_note_id = %note_id, version, "explanation regenerated");
    state.scripts.push(script.clone());
    Ok(script)
}

/// Pushes a `sync_complete` note again: latest explanation plus the tasks of
/// the Works derived from it. Status stays `sync_complete`.
pub async fn resync(
    ctx: Collaborators<'_>,
    state: &mut AppState,
    note_id: &MeetingNoteId,
) -> Result<Vec<SyncRunId>, DashboardError> {
    let note = state.meeting_note(note_id)?.clone();
    if note.status != MeetingNoteStatus::SyncComplete {
        return Err(DashboardError::InvalidTransition {
            id: note.id.to_string(),
            from: note.status.as_str(),
            to: "resync",
        });
    }
    let script = state.latest_script(note_id).cloned();
    let tasks = state.tasks_from_note(note_id);

    ctx.report(note_id, PipelineStage::Sync, StepStatus::Processing);
    let result = push_all(ctx, state, &note, script.as_ref(), &tasks).await;
    let status = if result.is_ok() { StepStatus::Completed } else { StepStatus::Failed };
    ctx.report(note_id, PipelineStage::Sync, status);
    result
}

/// One task per non-blank content line (list markers stripped), at most
/// [`MAX_DERIVED_TASKS`]. Falls back to a single task named after the title.
///
/// Categories cycle through [`Category::ALL`] by position.
pub fn derive_tasks(ids: &dyn IdGenerator, work_id: &WorkId, title: &str, content: &str) -> Vec<Task> {
    let mut lines: Vec<&str> = content
        .lines()
        .map(strip_list_marker)
        .filter(|l| !l.is_empty())
        .take(MAX_DERIVED_TASKS)
        .collect();
    if lines.is_empty() {
        lines.push(title);
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let confidence = if i < MEETING_BASED_TASKS {
                Confidence::MeetingBased
            } else {
                Confidence::Inferred
            };
            let id: TaskId = ids.generate();
            Task::new(id, line, Category::cycled(i), work_id.clone(), confidence)
                .with_description(format!("From meeting \"{title}\""))
        })
        .collect()
}

fn derive_work(
    id: WorkId,
    note_id: &MeetingNoteId,
    title: &str,
    content: &str,
    task_count: usize,
) -> Work {
    let mut work = Work::new(id, title, Category::Planning).with_task_count(task_count);
    if let Some(first) = content.lines().map(strip_list_marker).find(|l| !l.is_empty()) {
        work = work.with_objective(first);
    }
    work.meeting_note_id = Some(note_id.clone());
    work
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    if matches!(line, "-" | "*" | "•") {
        return "";
    }
    let rest = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
        .unwrap_or_else(|| {
            let digits = line.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return line;
            }
            line[digits..]
                .strip_prefix(". ")
                .or_else(|| line[digits..].strip_prefix(") "))
                .unwrap_or(line)
        });
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{SystemClock, UlidGenerator};
    use rstest::rstest;

    #[rstest]
    #[case("- collect logs", "collect logs")]
    #[case("* collect logs", "collect logs")]
    #[case("2. collect logs", "collect logs")]
    #[case("10) collect logs", "collect logs")]
    #[case("2024 roadmap", "2024 roadmap")]
    #[case("  plain  ", "plain")]
    #[case("-", "")]
    fn list_markers_are_stripped(#[case] line: &str, #[case] want: &str) {
        assert_eq!(strip_list_marker(line), want);
    }

    #[test]
    fn at_most_five_tasks_with_cycled_categories() {
        let ids = UlidGenerator::new(SystemClock);
        let work_id = WorkId::new("g1");
        let content = "a\nb\n\nc\nd\ne\nf\ng";
        let tasks = derive_tasks(&ids, &work_id, "Kickoff", content);

        assert_eq!(tasks.len(), MAX_DERIVED_TASKS);
        let categories: Vec<_> = tasks.iter().map(|t| t.category).collect();
        assert_eq!(categories, Category::ALL[..5].to_vec());
        let confidences: Vec<_> = tasks.iter().map(|t| t.confidence).collect();
        assert_eq!(
            confidences,
            vec![
                Confidence::MeetingBased,
                Confidence::MeetingBased,
                Confidence::MeetingBased,
                Confidence::Inferred,
                Confidence::Inferred,
            ]
        );
        assert!(tasks.iter().all(|t| t.work_id == work_id));
    }

    #[test]
    fn marker_only_content_falls_back_to_the_title() {
        let ids = UlidGenerator::new(SystemClock);
        let tasks = derive_tasks(&ids, &WorkId::new("g1"), "Kickoff", "- \n* ");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Kickoff");
    }

    #[test]
    fn blank_input_is_rejected() {
        assert!(matches!(
            MeetingInput::new("  ", "x").validated(),
            Err(DashboardError::EmptyField("title"))
        ));
        assert!(matches!(
            MeetingInput::new("t", "\n\t").validated(),
            Err(DashboardError::EmptyField("content"))
        ));
    }
}
