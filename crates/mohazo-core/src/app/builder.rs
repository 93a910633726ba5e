//! DashboardBuilder - Dashboard の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - MeetingApi は必須（未設定なら BuildError）
//! - 初期データの参照整合性を build() 時に検証する
//!   （Task → Work、Work → Member、note を参照するレコード → MeetingNote、ID 重複）
//! - それ以外の collaborator は既定実装で埋める

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use super::dashboard::{Dashboard, Services};
use super::state::AppState;
use crate::domain::{Entity, MeetingNoteId};
use crate::impls::{LocalWorkspaceSync, TracingProgress};
use crate::ports::{Clock, IdGenerator, MeetingApi, ProgressSink, SystemClock, UlidGenerator, WorkspaceSync};

/// BuildError は Dashboard 構築時のエラー
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("no meeting API configured")]
    MissingMeetingApi,

    #[error("duplicate {entity} id: {id}")]
    DuplicateId { entity: Entity, id: String },

    #[error("task {task} references missing work {work}")]
    DanglingWork { task: String, work: String },

    #[error("work {work} is assigned to missing member {member}")]
    UnknownAssignee { work: String, member: String },

    #[error("{owner} references missing meeting note {note}")]
    DanglingMeetingNote { owner: String, note: String },
}

/// # 使用例
/// ```ignore
/// let dashboard = DashboardBuilder::new()
///     .state(seed::demo_state())
///     .meeting_api(Arc::new(InMemoryMeetingApi::new()))
///     .build()?;
/// ```
#[derive(Default)]
pub struct DashboardBuilder {
    state: AppState,
    api: Option<Arc<dyn MeetingApi>>,
    sync: Option<Arc<dyn WorkspaceSync>>,
    progress: Option<Arc<dyn ProgressSink>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl DashboardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial entity collections.
    pub fn state(mut self, state: AppState) -> Self {
        self.state = state;
        self
    }

    pub fn meeting_api(mut self, api: Arc<dyn MeetingApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Defaults to [`LocalWorkspaceSync`].
    pub fn workspace_sync(mut self, sync: Arc<dyn WorkspaceSync>) -> Self {
        self.sync = Some(sync);
        self
    }

    /// Defaults to [`TracingProgress`].
    pub fn progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to a [`UlidGenerator`] over the configured clock.
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> Result<Dashboard, BuildError> {
        let api = self.api.ok_or(BuildError::MissingMeetingApi)?;
        validate(&self.state)?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(clock.clone())));
        let services = Services {
            api,
            sync: self
                .sync
                .unwrap_or_else(|| Arc::new(LocalWorkspaceSync::new())),
            progress: self.progress.unwrap_or_else(|| Arc::new(TracingProgress)),
            clock,
            ids,
        };
        Ok(Dashboard::from_parts(self.state, services))
    }
}

/// Checks referential integrity of an initial dataset.
pub fn validate(state: &AppState) -> Result<(), BuildError> {
    unique(Entity::Member, state.members.iter().map(|m| &m.id))?;
    unique(Entity::MeetingNote, state.meeting_notes.iter().map(|n| &n.id))?;
    unique(Entity::Work, state.works.iter().map(|w| &w.id))?;
    unique(Entity::Task, state.tasks.iter().map(|t| &t.id))?;

    let members: HashSet<_> = state.members.iter().map(|m| &m.id).collect();
    let works: HashSet<_> = state.works.iter().map(|w| &w.id).collect();
    let notes: HashSet<_> = state.meeting_notes.iter().map(|n| &n.id).collect();

    for work in &state.works {
        if let Some(member) = &work.assignee_id
            && !members.contains(member)
        {
            return Err(BuildError::UnknownAssignee {
                work: work.id.to_string(),
                member: member.to_string(),
            });
        }
        check_note(&notes, work.meeting_note_id.as_ref(), || format!("work {}", work.id))?;
    }
    for task in &state.tasks {
        if !works.contains(&task.work_id) {
            return Err(BuildError::DanglingWork {
                task: task.id.to_string(),
                work: task.work_id.to_string(),
            });
        }
    }
    for run in &state.sync_runs {
        check_note(&notes, Some(&run.meeting_note_id), || format!("sync run {}", run.id))?;
    }
    for script in &state.scripts {
        check_note(&notes, Some(&script.meeting_note_id), || format!("script {}", script.id))?;
    }
    Ok(())
}

fn unique<'a, T>(entity: Entity, ids: impl Iterator<Item = &'a T>) -> Result<(), BuildError>
where
    T: Eq + Hash + std::fmt::Display + 'a,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(BuildError::DuplicateId {
                entity,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn check_note(
    notes: &HashSet<&MeetingNoteId>,
    note: Option<&MeetingNoteId>,
    owner: impl FnOnce() -> String,
) -> Result<(), BuildError> {
    match note {
        Some(note) if !notes.contains(note) => Err(BuildError::DanglingMeetingNote {
            owner: owner(),
            note: note.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::seed;
    use crate::domain::{Category, Confidence, Member, Task, Work};
    use crate::impls::InMemoryMeetingApi;

    fn api() -> Arc<dyn MeetingApi> {
        Arc::new(InMemoryMeetingApi::new())
    }

    #[test]
    fn build_fails_without_meeting_api() {
        let result = DashboardBuilder::new().build();
        assert_eq!(result.err(), Some(BuildError::MissingMeetingApi));
    }

    #[test]
    fn seed_dataset_is_consistent() {
        assert_eq!(validate(&seed::demo_state()), Ok(()));
        let dashboard = DashboardBuilder::new()
            .state(seed::demo_state())
            .meeting_api(api())
            .build()
            .unwrap();
        assert_eq!(dashboard.state().members.len(), 5);
    }

    #[test]
    fn dangling_task_is_rejected() {
        let state = AppState {
            tasks: vec![Task::new("t1", "x", Category::Data, "g9", Confidence::Inferred)],
            ..AppState::default()
        };
        let err = DashboardBuilder::new().state(state).meeting_api(api()).build().err();
        assert_eq!(
            err,
            Some(BuildError::DanglingWork {
                task: "t1".into(),
                work: "g9".into()
            })
        );
    }

    #[test]
    fn unknown_assignee_is_rejected() {
        let state = AppState {
            works: vec![Work::new("g1", "x", Category::Data).with_assignee("ghost")],
            ..AppState::default()
        };
        assert!(matches!(validate(&state), Err(BuildError::UnknownAssignee { .. })));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let state = AppState {
            members: vec![
                Member::new("1", "a", Category::Pm),
                Member::new("1", "b", Category::Data),
            ],
            ..AppState::default()
        };
        assert_eq!(
            validate(&state),
            Err(BuildError::DuplicateId {
                entity: Entity::Member,
                id: "1".into()
            })
        );
    }
}
