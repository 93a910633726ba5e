//! KPI - ダッシュボード指標の集計
//!
//! # 指標
//! - generated / inferred: Task の confidence 別件数
//! - unassigned_works / assignment_rate: Work の割り当て状況
//! - sync_diff: added = Task 総数（modified / deleted は 0）
//! - failed_count: failed の会議録数（会議録を持つ呼び出し側が埋める）

use serde::{Deserialize, Serialize};

use crate::domain::{
    Confidence, MeetingNote, MeetingNoteStatus, StepStatus, SyncDiff, SyncRun, Task, Work,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpi {
    /// 会議で明示された Task
    pub generated_tasks: usize,
    /// 分析で推定された Task
    pub inferred_tasks: usize,
    pub unassigned_works: usize,
    /// 0〜100
    pub assignment_rate: u32,
    pub sync_diff: SyncDiff,
    pub failed_count: usize,
}

impl DashboardKpi {
    pub fn with_failed_count(mut self, failed_count: usize) -> Self {
        self.failed_count = failed_count;
        self
    }
}

/// 担当者のいない Work（入力順）
pub fn compute_unassigned_works(works: &[Work]) -> Vec<&Work> {
    works.iter().filter(|w| !w.is_assigned()).collect()
}

pub fn unassigned_count(works: &[Work]) -> usize {
    works.iter().filter(|w| !w.is_assigned()).count()
}

/// `round(100 * assigned / total)`。Work が空なら 0
pub fn assignment_rate(works: &[Work]) -> u32 {
    let assigned = works.len() - unassigned_count(works);
    rounded_percent(assigned, works.len())
}

/// 処理に失敗した会議録の件数
pub fn compute_failed_count(notes: &[MeetingNote]) -> usize {
    notes
        .iter()
        .filter(|n| n.status == MeetingNoteStatus::Failed)
        .count()
}

/// 監査ログ中の失敗 SyncRun の件数
pub fn failed_sync_count(runs: &[SyncRun]) -> usize {
    runs.iter().filter(|r| r.is_failure()).count()
}

pub fn compute_dashboard_kpi(tasks: &[Task], works: &[Work]) -> DashboardKpi {
    let generated_tasks = tasks
        .iter()
        .filter(|t| t.confidence == Confidence::MeetingBased)
        .count();
    let inferred_tasks = tasks
        .iter()
        .filter(|t| t.confidence == Confidence::Inferred)
        .count();
    DashboardKpi {
        generated_tasks,
        inferred_tasks,
        unassigned_works: unassigned_count(works),
        assignment_rate: assignment_rate(works),
        sync_diff: SyncDiff::added(tasks.len()),
        failed_count: 0,
    }
}

/// パイプラインの進捗（%）: completed のステップ数 / 全ステップ数。空なら 0
pub fn pipeline_progress(steps: &[StepStatus]) -> u32 {
    let completed = steps.iter().filter(|s| **s == StepStatus::Completed).count();
    rounded_percent(completed, steps.len())
}

/// 整数の `round(100 * part / whole)`（0.5 は切り上げ）。`whole` が 0 なら 0
pub(crate) fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((200 * part + whole) / (2 * whole)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, MeetingNoteId};
    use chrono::Utc;
    use rstest::rstest;

    fn work(id: &str, assignee: Option<&str>) -> Work {
        let w = Work::new(id, id, Category::Backend);
        match assignee {
            Some(m) => w.with_assignee(m),
            None => w,
        }
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(0, 4, 0)]
    #[case(4, 4, 100)]
    #[case(1, 3, 33)]
    #[case(2, 3, 67)]
    #[case(1, 8, 13)]
    #[case(7, 8, 88)]
    fn rounded_percent_rounds_half_up(#[case] part: usize, #[case] whole: usize, #[case] want: u32) {
        assert_eq!(rounded_percent(part, whole), want);
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&[StepStatus::Pending; 5], 0)]
    #[case(&[StepStatus::Completed, StepStatus::Processing, StepStatus::Pending, StepStatus::Pending, StepStatus::Pending], 20)]
    #[case(&[StepStatus::Completed, StepStatus::Completed, StepStatus::Failed], 67)]
    #[case(&[StepStatus::Completed; 5], 100)]
    fn pipeline_progress_counts_completed_steps(#[case] steps: &[StepStatus], #[case] want: u32) {
        assert_eq!(pipeline_progress(steps), want);
    }

    #[test]
    fn empty_works_give_zero_rate() {
        let kpi = compute_dashboard_kpi(&[], &[]);
        assert_eq!(kpi.assignment_rate, 0);
        assert_eq!(kpi.unassigned_works, 0);
        assert_eq!(kpi.sync_diff, SyncDiff::default());
    }

    #[test]
    fn unassigned_works_preserve_input_order() {
        let works = vec![
            work("g1", None),
            work("g2", Some("1")),
            work("g3", None),
            work("g4", None),
        ];
        let ids: Vec<_> = compute_unassigned_works(&works)
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(ids, vec!["g1", "g3", "g4"]);
    }

    #[test]
    fn unassigned_count_is_total_minus_assigned() {
        let works = vec![work("g1", None), work("g2", Some("1")), work("g3", Some("2"))];
        let assigned = works.iter().filter(|w| w.assignee_id.is_some()).count();
        assert_eq!(unassigned_count(&works), works.len() - assigned);
        assert_eq!(assignment_rate(&works), 67);
    }

    #[test]
    fn kpi_counts_confidence() {
        let tasks = vec![
            Task::new("t1", "a", Category::Backend, "g1", Confidence::MeetingBased),
            Task::new("t2", "b", Category::Data, "g1", Confidence::MeetingBased),
            Task::new("t3", "c", Category::Data, "g1", Confidence::Inferred),
        ];
        let works = vec![work("g1", Some("4"))];

        let kpi = compute_dashboard_kpi(&tasks, &works);
        assert_eq!(kpi.generated_tasks, 2);
        assert_eq!(kpi.inferred_tasks, 1);
        assert_eq!(kpi.assignment_rate, 100);
        assert_eq!(kpi.sync_diff.added, 3);
        assert_eq!(kpi.failed_count, 0);
    }

    #[test]
    fn failed_count_only_counts_failed_notes() {
        let mut failed = MeetingNote::uploaded(MeetingNoteId::new("n1"), "a", "b", "c", Utc::now());
        failed.mark_failed();
        let ok = MeetingNote::uploaded(MeetingNoteId::new("n2"), "a", "b", "c", Utc::now());
        assert_eq!(compute_failed_count(&[failed, ok]), 1);
    }
}
