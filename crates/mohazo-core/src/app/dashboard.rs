//! Dashboard - アプリケーションのコントローラ
//!
//! AppState（エンティティ）と AssignmentDesk（仮選択）を唯一所有し、
//! 表示層からの操作をすべてここで受ける。
//! 変更のたびに集計し直すのは安価なので、KPI などはキャッシュしない。

use std::sync::Arc;

use super::assignment::AssignmentDesk;
use super::ingestion::{self, Collaborators, IngestionReport, MeetingInput};
use super::refresh::{MeetingListRefresher, RefreshOutcome};
use super::state::AppState;
use super::status::{DashboardSnapshot, InboxItem, RECENT_SYNC_RUNS, TeamMemberLoad};
use crate::derived::{self, DashboardKpi, MemberWorkload, TaskFilter, WorkFilter};
use crate::domain::{
    DashboardError, ExplanationScript, MeetingNote, MeetingNoteId, Member, MemberId, NewMember,
    PipelineBoard, SyncRunId, Task, TaskId, TaskUpdate, Work, WorkId, WorkUpdate,
};
use crate::impls::BoardProgress;
use crate::ports::{
    Clock, IdGenerator, IdGeneratorExt, MeetingApi, MeetingSummary, ProgressSink, WorkspaceSync,
};

/// ダッシュボードが保持する協調先。
pub(crate) struct Services {
    pub(crate) api: Arc<dyn MeetingApi>,
    pub(crate) sync: Arc<dyn WorkspaceSync>,
    pub(crate) progress: Arc<dyn ProgressSink>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) ids: Arc<dyn IdGenerator>,
}

impl Services {
    fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            api: &*self.api,
            sync: &*self.sync,
            progress: &*self.progress,
            clock: &*self.clock,
            ids: &*self.ids,
        }
    }
}

pub struct Dashboard {
    state: AppState,
    desk: AssignmentDesk,
    services: Services,
    refresher: MeetingListRefresher,
    board: Arc<BoardProgress>,
}

impl Dashboard {
    pub(crate) fn from_parts(state: AppState, mut services: Services) -> Self {
        let refresher = MeetingListRefresher::new(services.api.clone(), services.clock.clone());
        // 進捗はボードに記録してから元のシンクへ渡す
        let board = Arc::new(BoardProgress::new(services.progress.clone()));
        services.progress = board.clone();
        Self {
            state,
            desk: AssignmentDesk::new(),
            services,
            refresher,
            board,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    // ========================================
    // 派生状態
    // ========================================

    pub fn kpi(&self) -> DashboardKpi {
        self.state.kpi()
    }

    pub fn unassigned_works(&self) -> Vec<&Work> {
        self.state.unassigned_works()
    }

    pub fn member_workload(&self, member_id: &MemberId) -> Result<MemberWorkload, DashboardError> {
        self.state.member(member_id)?;
        Ok(derived::compute_member_workload(member_id, &self.state.works))
    }

    pub fn work_progress(&self, work_id: &WorkId) -> Result<u32, DashboardError> {
        self.state.work(work_id)?;
        Ok(derived::compute_work_progress(work_id, &self.state.tasks))
    }

    pub fn recommend_assignee(&self, work_id: &WorkId) -> Result<Option<&Member>, DashboardError> {
        let work = self.state.work(work_id)?;
        Ok(derived::recommend_assignee(work, &self.state.members))
    }

    pub fn filter_works(&self, filter: &WorkFilter) -> Vec<&Work> {
        filter.apply(&self.state.works)
    }

    pub fn filter_tasks(&self, filter: &TaskFilter) -> Vec<&Task> {
        filter.apply(&self.state.tasks, &self.state.works)
    }

    pub fn search_meeting_notes(&self, query: &str) -> Vec<&MeetingNote> {
        derived::search_meeting_notes(&self.state.meeting_notes, query)
    }

    pub fn latest_script(&self, note_id: &MeetingNoteId) -> Option<&ExplanationScript> {
        self.state.latest_script(note_id)
    }

    /// 直近のパイプライン実行のステージ状態。
    pub fn pipeline(&self) -> PipelineBoard {
        self.board.board()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let inbox = self
            .state
            .unassigned_works()
            .into_iter()
            .map(|w| InboxItem {
                work_id: w.id.clone(),
                title: w.title.clone(),
                category: w.category,
                task_count: w.task_count,
                recommended: derived::recommend_assignee(w, &self.state.members)
                    .map(|m| m.id.clone()),
                staged: self.desk.pending(&w.id).cloned(),
            })
            .collect();
        let team = derived::team_workload(&self.state.members, &self.state.works)
            .into_iter()
            .map(|(m, workload)| TeamMemberLoad {
                member_id: m.id.clone(),
                name: m.name.clone(),
                role: m.role,
                status: workload.status(),
                workload,
            })
            .collect();
        let pipeline = self.board.board();
        let mut recent = self.state.sync_runs.clone();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(RECENT_SYNC_RUNS);

        DashboardSnapshot {
            generated_at: self.services.clock.now(),
            kpi: self.kpi(),
            inbox,
            pending_assignments: self.desk.pending_count(),
            failed_sync_runs: derived::failed_sync_count(&self.state.sync_runs),
            team,
            team_assigned_total: derived::team_assigned_total(&self.state.works),
            pipeline_progress: derived::pipeline_progress(&pipeline.statuses()),
            pipeline: pipeline.stages,
            recent_sync_runs: recent,
        }
    }

    // ========================================
    // 設定・割り当て
    // ========================================

    pub fn add_member(&mut self, input: NewMember) -> Result<&Member, DashboardError> {
        let id: MemberId = self.services.ids.generate();
        self.state.add_member(input, id)
    }

    pub fn stage_assignment(
        &mut self,
        work_id: &WorkId,
        member_id: &MemberId,
    ) -> Result<(), DashboardError> {
        self.desk.stage(&self.state, work_id, member_id)
    }

    pub fn unstage_assignment(&mut self, work_id: &WorkId) -> Option<MemberId> {
        self.desk.unstage(work_id)
    }

    pub fn pending_assignment(&self, work_id: &WorkId) -> Option<&MemberId> {
        self.desk.pending(work_id)
    }

    /// `work_id` に仮選択がなければ `Ok(None)`。
    pub fn confirm_assignment(&mut self, work_id: &WorkId) -> Result<Option<MemberId>, DashboardError> {
        self.desk.confirm(&mut self.state, work_id)
    }

    pub fn confirm_all_staged(&mut self) -> Result<Vec<(WorkId, MemberId)>, DashboardError> {
        self.desk.confirm_all(&mut self.state)
    }

    pub fn update_work(&mut self, work_id: &WorkId, update: WorkUpdate) -> Result<&Work, DashboardError> {
        self.state.update_work(work_id, update)
    }

    pub fn update_task(&mut self, task_id: &TaskId, update: TaskUpdate) -> Result<&Task, DashboardError> {
        self.state.update_task(task_id, update)
    }

    // ========================================
    // パイプライン
    // ========================================

    pub async fn ingest(&mut self, input: &MeetingInput) -> Result<IngestionReport, DashboardError> {
        ingestion::ingest(self.services.collaborators(), &mut self.state, input).await
    }

    pub async fn regenerate(
        &mut self,
        note_id: &MeetingNoteId,
    ) -> Result<ExplanationScript, DashboardError> {
        ingestion::regenerate(self.services.collaborators(), &mut self.state, note_id).await
    }

    pub async fn resync(&mut self, note_id: &MeetingNoteId) -> Result<Vec<SyncRunId>, DashboardError> {
        ingestion::resync(self.services.collaborators(), &mut self.state, note_id).await
    }

    /// 会議一覧を更新する。実行中の呼び出しはスキップされる。
    pub async fn refresh_meetings(&self) -> Result<RefreshOutcome, DashboardError> {
        self.refresher.refresh().await
    }

    pub fn meetings(&self) -> Vec<MeetingSummary> {
        self.refresher.meetings()
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("members", &self.state.members.len())
            .field("works", &self.state.works.len())
            .field("tasks", &self.state.tasks.len())
            .field("pending_assignments", &self.desk.pending_count())
            .finish_non_exhaustive()
    }
}
