//! Filter - Work / Task / 会議録の一覧フィルタ
//!
//! `None` の条件はすべてに一致する。文字列検索は大文字小文字を区別しない。

use std::collections::HashMap;

use crate::domain::{Category, MeetingNote, MemberId, Task, TaskStatus, Work, WorkId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkFilter {
    pub category: Option<Category>,
    pub assignee: Option<MemberId>,
}

impl WorkFilter {
    pub fn matches(&self, work: &Work) -> bool {
        if let Some(category) = self.category
            && work.category != category
        {
            return false;
        }
        if let Some(assignee) = &self.assignee
            && work.assignee_id.as_ref() != Some(assignee)
        {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, works: &'a [Work]) -> Vec<&'a Work> {
        works.iter().filter(|w| self.matches(w)).collect()
    }
}

/// Task 一覧のフィルタ。担当者の条件は所属 Work の assignee で判定する
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    /// タイトルの部分一致
    pub query: Option<String>,
    pub category: Option<Category>,
    pub status: Option<TaskStatus>,
    pub assignee: Option<MemberId>,
    /// 所属 Work が未割り当ての Task だけ
    pub unassigned_only: bool,
}

impl TaskFilter {
    pub fn is_active(&self) -> bool {
        self.query.as_deref().is_some_and(|q| !q.trim().is_empty())
            || self.category.is_some()
            || self.status.is_some()
            || self.assignee.is_some()
            || self.unassigned_only
    }

    pub fn apply<'a>(&self, tasks: &'a [Task], works: &[Work]) -> Vec<&'a Task> {
        let owners: HashMap<&WorkId, &Work> = works.iter().map(|w| (&w.id, w)).collect();
        let query = self
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        tasks
            .iter()
            .filter(|task| {
                if let Some(q) = &query
                    && !task.title.to_lowercase().contains(q.as_str())
                {
                    return false;
                }
                if self.category.is_some_and(|c| c != task.category) {
                    return false;
                }
                if self.status.is_some_and(|s| s != task.status) {
                    return false;
                }
                let assignee = owners
                    .get(&task.work_id)
                    .and_then(|w| w.assignee_id.as_ref());
                if let Some(wanted) = &self.assignee
                    && assignee != Some(wanted)
                {
                    return false;
                }
                !(self.unassigned_only && assignee.is_some())
            })
            .collect()
    }
}

/// タイトルに `query` を含む会議録。空白だけのクエリは全件
pub fn search_meeting_notes<'a>(notes: &'a [MeetingNote], query: &str) -> Vec<&'a MeetingNote> {
    let query = query.trim().to_lowercase();
    notes
        .iter()
        .filter(|n| query.is_empty() || n.title.to_lowercase().contains(&query))
        .collect()
}

/// `work_id` に属する Task（入力順）
pub fn tasks_of<'a>(work_id: &WorkId, tasks: &'a [Task]) -> Vec<&'a Task> {
    tasks.iter().filter(|t| &t.work_id == work_id).collect()
}
