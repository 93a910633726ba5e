//! Work - タスクのまとまり
//!
//! 1 つの Work は 1 人の担当者にまとめて割り当てられる。

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::ids::{MeetingNoteId, MemberId, WorkId};

/// Work と Task で共通の進捗ステータス。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// 関連するタスクのまとまり。
///
/// `assignee_id` が `None` のときだけ未割り当て。割り当て受信箱はこれで決まる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: WorkId,
    pub title: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<MemberId>,
    pub status: WorkStatus,
    /// この Work に属するタスク数（非正規化）。
    pub task_count: usize,
    /// 抽出元の議事録。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_note_id: Option<MeetingNoteId>,
}

impl Work {
    pub fn new(id: impl Into<WorkId>, title: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category,
            description: None,
            objective: None,
            assignee_id: None,
            status: WorkStatus::NotStarted,
            task_count: 0,
            meeting_note_id: None,
        }
    }

    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = Some(objective.into());
        self
    }

    pub fn with_assignee(mut self, member: impl Into<MemberId>) -> Self {
        self.assignee_id = Some(member.into());
        self
    }

    pub fn with_status(mut self, status: WorkStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_task_count(mut self, count: usize) -> Self {
        self.task_count = count;
        self
    }

    pub fn is_assigned(&self) -> bool {
        self.assignee_id.is_some()
    }

    /// 浅いマージ。`update` に含まれるフィールドだけ変わる。
    pub fn apply(&mut self, update: WorkUpdate) {
        let WorkUpdate {
            title,
            category,
            description,
            objective,
            assignee_id,
            status,
        } = update;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(category) = category {
            self.category = category;
        }
        description.apply_to(&mut self.description);
        objective.apply_to(&mut self.objective);
        assignee_id.apply_to(&mut self.assignee_id);
        if let Some(status) = status {
            self.status = status;
        }
    }
}

/// Option フィールドの更新（維持・設定・消去）。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Set(T),
    Clear,
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            FieldUpdate::Keep => {}
            FieldUpdate::Set(value) => *slot = Some(value),
            FieldUpdate::Clear => *slot = None,
        }
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            FieldUpdate::Set(value) => Some(value),
            _ => None,
        }
    }
}

/// Work の部分更新。
///
/// `task_count` はタスク集合に従うので更新できない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkUpdate {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub description: FieldUpdate<String>,
    pub objective: FieldUpdate<String>,
    pub assignee_id: FieldUpdate<MemberId>,
    pub status: Option<WorkStatus>,
}

impl WorkUpdate {
    pub fn status(status: WorkStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn assign(member: impl Into<MemberId>) -> Self {
        Self {
            assignee_id: FieldUpdate::Set(member.into()),
            ..Self::default()
        }
    }

    pub fn unassign() -> Self {
        Self {
            assignee_id: FieldUpdate::Clear,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_only_touches_provided_fields() {
        let mut work = Work::new("g1", "Data pipeline", Category::Backend)
            .with_objective("collect events")
            .with_task_count(6);

        work.apply(WorkUpdate::status(WorkStatus::InProgress));

        assert_eq!(work.status, WorkStatus::InProgress);
        assert_eq!(work.objective.as_deref(), Some("collect events"));
        assert_eq!(work.title, "Data pipeline");
        assert_eq!(work.task_count, 6);
        assert!(!work.is_assigned());
    }

    #[test]
    fn assign_and_unassign() {
        let mut work = Work::new("g1", "Data pipeline", Category::Backend);
        work.apply(WorkUpdate::assign("4"));
        assert_eq!(work.assignee_id, Some(MemberId::new("4")));

        work.apply(WorkUpdate::unassign());
        assert_eq!(work.assignee_id, None);
    }

    #[test]
    fn field_update_clear_removes_value() {
        let mut slot = Some("x".to_string());
        FieldUpdate::<String>::Keep.apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("x"));
        FieldUpdate::<String>::Clear.apply_to(&mut slot);
        assert_eq!(slot, None);
    }
}
