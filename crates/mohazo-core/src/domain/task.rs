//! Task - 作業の最小単位
//!
//! 各 Task はちょうど 1 つの Work に属する。

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::ids::{TaskId, WorkId};
use super::work::WorkStatus;

/// Task は Work と同じステータスを使う。
pub type TaskStatus = WorkStatus;

/// タスクの出どころ。
///
/// 抽出時に決まり、以後は更新されない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// 会議で明示された。
    MeetingBased,
    /// 分析による推定。
    Inferred,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub work_id: WorkId,
    pub status: TaskStatus,
    pub confidence: Confidence,
    /// 表示用。スケジュール上の制約としては扱わない。
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default)]
    pub prerequisites: Vec<TaskId>,
}

impl Task {
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        category: Category,
        work_id: impl Into<WorkId>,
        confidence: Confidence,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category,
            work_id: work_id.into(),
            status: TaskStatus::NotStarted,
            confidence,
            dependencies: Vec::new(),
            prerequisites: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = deps.into_iter().collect();
        self
    }

    pub fn with_prerequisites(mut self, prereqs: impl IntoIterator<Item = TaskId>) -> Self {
        self.prerequisites = prereqs.into_iter().collect();
        self
    }

    /// 依存関係の表示が必要か。
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty() || !self.prerequisites.is_empty()
    }

    /// 浅いマージ。`update` に含まれるフィールドだけ変わる。
    ///
    /// `confidence` は出どころなので更新対象に含まない。
    pub fn apply(&mut self, update: TaskUpdate) {
        let TaskUpdate {
            title,
            description,
            category,
            work_id,
            status,
            dependencies,
            prerequisites,
        } = update;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(work_id) = work_id {
            self.work_id = work_id;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(dependencies) = dependencies {
            self.dependencies = dependencies;
        }
        if let Some(prerequisites) = prerequisites {
            self.prerequisites = prerequisites;
        }
    }
}

/// Task の部分更新。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    /// 別の Work へ移す。移動先は存在しなければならない。
    pub work_id: Option<WorkId>,
    pub status: Option<TaskStatus>,
    pub dependencies: Option<Vec<TaskId>>,
    pub prerequisites: Option<Vec<TaskId>>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn move_to(work_id: impl Into<WorkId>) -> Self {
        Self {
            work_id: Some(work_id.into()),
            ..Self::default()
        }
    }
}
