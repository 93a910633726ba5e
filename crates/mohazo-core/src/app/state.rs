//! AppState - エンティティコレクションの正本
//!
//! Dashboard（コントローラ）が所有し、各ワークフローには `&`/`&mut` で渡す。
//! static なグローバル状態は持たない。
//!
//! # 整合性
//! - Task.work_id は常に存在する Work を指す
//! - Work.assignee_id は None か、存在する Member を指す
//!
//! 変更系メソッドはこの 2 つを検証してから書き込む。

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::derived::{self, DashboardKpi};
use crate::domain::{
    DashboardError, Entity, ExplanationScript, FieldUpdate, MeetingNote, MeetingNoteId, Member,
    MemberId, NewMember, SyncRun, SyncType, Task, TaskId, TaskUpdate, Work, WorkId, WorkUpdate,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub members: Vec<Member>,
    pub meeting_notes: Vec<MeetingNote>,
    pub works: Vec<Work>,
    pub tasks: Vec<Task>,
    /// 追記のみ。
    pub sync_runs: Vec<SyncRun>,
    pub scripts: Vec<ExplanationScript>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================
    // 参照
    // ========================================

    pub fn member(&self, id: &MemberId) -> Result<&Member, DashboardError> {
        self.members
            .iter()
            .find(|m| &m.id == id)
            .ok_or_else(|| DashboardError::not_found(Entity::Member, id))
    }

    pub fn work(&self, id: &WorkId) -> Result<&Work, DashboardError> {
        self.works
            .iter()
            .find(|w| &w.id == id)
            .ok_or_else(|| DashboardError::not_found(Entity::Work, id))
    }

    pub fn task(&self, id: &TaskId) -> Result<&Task, DashboardError> {
        self.tasks
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| DashboardError::not_found(Entity::Task, id))
    }

    pub fn meeting_note(&self, id: &MeetingNoteId) -> Result<&MeetingNote, DashboardError> {
        self.meeting_notes
            .iter()
            .find(|n| &n.id == id)
            .ok_or_else(|| DashboardError::not_found(Entity::MeetingNote, id))
    }

    pub(crate) fn meeting_note_mut(
        &mut self,
        id: &MeetingNoteId,
    ) -> Result<&mut MeetingNote, DashboardError> {
        self.meeting_notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| DashboardError::not_found(Entity::MeetingNote, id))
    }

    fn work_mut(&mut self, id: &WorkId) -> Result<&mut Work, DashboardError> {
        self.works
            .iter_mut()
            .find(|w| &w.id == id)
            .ok_or_else(|| DashboardError::not_found(Entity::Work, id))
    }

    /// `note_id` に保存済みの説明の最大バージョン。
    pub fn latest_script(&self, note_id: &MeetingNoteId) -> Option<&ExplanationScript> {
        self.scripts
            .iter()
            .filter(|s| &s.meeting_note_id == note_id)
            .max_by_key(|s| s.version)
    }

    /// 次に採番する説明スクリプトのバージョン
    ///
    /// 保存済みスクリプトと explanation の SyncRun の両方の最大値 + 1。
    /// push 済みで commit されなかったバージョンを再利用しない。
    pub fn next_script_version(&self, note_id: &MeetingNoteId) -> u32 {
        let stored = self
            .scripts
            .iter()
            .filter(|s| &s.meeting_note_id == note_id)
            .map(|s| s.version);
        let pushed = self
            .sync_runs
            .iter()
            .filter(|r| &r.meeting_note_id == note_id && r.sync_type == SyncType::Explanation)
            .map(|r| r.version);
        stored.chain(pushed).max().map_or(1, |v| v + 1)
    }

    /// `note_id` から抽出された全 Work のタスク。
    pub fn tasks_from_note(&self, note_id: &MeetingNoteId) -> Vec<Task> {
        let works: Vec<&WorkId> = self
            .works
            .iter()
            .filter(|w| w.meeting_note_id.as_ref() == Some(note_id))
            .map(|w| &w.id)
            .collect();
        self.tasks
            .iter()
            .filter(|t| works.contains(&&t.work_id))
            .cloned()
            .collect()
    }

    // ========================================
    // 派生状態
    // ========================================

    pub fn unassigned_works(&self) -> Vec<&Work> {
        derived::compute_unassigned_works(&self.works)
    }

    pub fn failed_count(&self) -> usize {
        derived::compute_failed_count(&self.meeting_notes)
    }

    /// 失敗した議事録の件数を含む KPI。
    pub fn kpi(&self) -> DashboardKpi {
        derived::compute_dashboard_kpi(&self.tasks, &self.works).with_failed_count(self.failed_count())
    }

    // ========================================
    // 変更
    // ========================================

    pub fn add_member(&mut self, input: NewMember, id: MemberId) -> Result<&Member, DashboardError> {
        let member = input.into_member(id)?;
        debug!(member_id = %member.id, role = %member.role, "member added");
        self.members.push(member);
        Ok(&self.members[self.members.len() - 1])
    }

    /// 既存の Work へ浅いマージ。
    ///
    /// 新しい担当者は既存メンバーであること。新しいタイトルは空にできない。
    pub fn update_work(&mut self, id: &WorkId, update: WorkUpdate) -> Result<&Work, DashboardError> {
        self.work(id)?;
        if let FieldUpdate::Set(member) = &update.assignee_id {
            self.member(member)?;
        }
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DashboardError::EmptyField("title"));
        }

        let assignment_changed = update.assignee_id != FieldUpdate::Keep;
        let work = self.work_mut(id)?;
        work.apply(update);
        let origin = work.meeting_note_id.clone();
        if assignment_changed && let Some(note_id) = origin {
            self.recount_unassigned(&note_id);
        }
        self.work(id)
    }

    /// 会議録の unassigned_count を、その会議録から導出された Work から数え直す
    fn recount_unassigned(&mut self, note_id: &MeetingNoteId) {
        let count = self
            .works
            .iter()
            .filter(|w| w.meeting_note_id.as_ref() == Some(note_id) && !w.is_assigned())
            .count();
        if let Ok(note) = self.meeting_note_mut(note_id) {
            note.unassigned_count = Some(count);
            debug!(meeting_note_id = %note_id, unassigned = count, "unassigned count updated");
        }
    }

    /// 既存の Task へ浅いマージ。
    ///
    /// 別の Work へ移すときは移動先が存在しなければならず、
    /// 両方の Work の `task_count` を合わせる。
    pub fn update_task(&mut self, id: &TaskId, update: TaskUpdate) -> Result<&Task, DashboardError> {
        let previous_work = self.task(id)?.work_id.clone();
        if let Some(target) = &update.work_id {
            self.work(target)?;
        }
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DashboardError::EmptyField("title"));
        }

        let moved_to = update.work_id.clone().filter(|w| w != &previous_work);
        if let Some(target) = &moved_to {
            let from = self.work_mut(&previous_work)?;
            from.task_count = from.task_count.saturating_sub(1);
            self.work_mut(target)?.task_count += 1;
        }

        let idx = self
            .tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| DashboardError::not_found(Entity::Task, id))?;
        self.tasks[idx].apply(update);
        Ok(&self.tasks[idx])
    }

    /// 抽出したばかりの Work をタスク・説明と一緒に追加する。
    pub(crate) fn commit_derived(
        &mut self,
        work: Work,
        tasks: Vec<Task>,
        script: ExplanationScript,
    ) {
        self.works.push(work);
        self.tasks.extend(tasks);
        self.scripts.push(script);
    }
}
