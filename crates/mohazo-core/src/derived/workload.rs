//! Workload - メンバー負荷、Work 進捗、担当者推薦
//!
//! すべて入力スライスだけを見る純粋関数。順序は入力順を保つ。

use serde::{Deserialize, Serialize};

use super::kpi::rounded_percent;
use crate::domain::{Member, MemberId, Task, TaskStatus, Work, WorkId, WorkStatus};

/// 担当 Work がこの件数を超えると過多
pub const OVERLOAD_THRESHOLD: usize = 2;

/// メンバー 1 人分の担当 Work 集計（状態別）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWorkload {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
}

/// 担当件数による負荷区分
///
/// - NoWork: 0 件
/// - Adequate: 1..=OVERLOAD_THRESHOLD 件
/// - Overloaded: それ以上
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadStatus {
    NoWork,
    Adequate,
    Overloaded,
}

impl MemberWorkload {
    /// 担当 Work の完了率（%）
    pub fn completion_rate(&self) -> u32 {
        rounded_percent(self.completed, self.total)
    }

    pub fn status(&self) -> WorkloadStatus {
        match self.total {
            0 => WorkloadStatus::NoWork,
            n if n <= OVERLOAD_THRESHOLD => WorkloadStatus::Adequate,
            _ => WorkloadStatus::Overloaded,
        }
    }
}

/// `member_id` に割り当てられた Work を状態別に数える
pub fn compute_member_workload(member_id: &MemberId, works: &[Work]) -> MemberWorkload {
    works
        .iter()
        .filter(|w| w.assignee_id.as_ref() == Some(member_id))
        .fold(MemberWorkload::default(), |mut acc, w| {
            acc.total += 1;
            match w.status {
                WorkStatus::Completed => acc.completed += 1,
                WorkStatus::InProgress => acc.in_progress += 1,
                WorkStatus::NotStarted => acc.not_started += 1,
            }
            acc
        })
}

/// 全メンバーの負荷（メンバー順）
pub fn team_workload<'a>(members: &'a [Member], works: &[Work]) -> Vec<(&'a Member, MemberWorkload)> {
    members
        .iter()
        .map(|m| (m, compute_member_workload(&m.id, works)))
        .collect()
}

/// チーム全体で担当者が決まっている Work の件数
pub fn team_assigned_total(works: &[Work]) -> usize {
    works.iter().filter(|w| w.is_assigned()).count()
}

/// `work_id` に属する Task の完了率（%）。Task が無ければ 0
pub fn compute_work_progress(work_id: &WorkId, tasks: &[Task]) -> u32 {
    let (total, completed) = tasks
        .iter()
        .filter(|t| &t.work_id == work_id)
        .fold((0, 0), |(total, completed), t| {
            let done = usize::from(t.status == TaskStatus::Completed);
            (total + 1, completed + done)
        });
    rounded_percent(completed, total)
}

/// role が Work の category と一致する最初のメンバー（メンバー順で先勝ち）
pub fn recommend_assignee<'a>(work: &Work, members: &'a [Member]) -> Option<&'a Member> {
    members.iter().find(|m| m.role == work.category)
}
