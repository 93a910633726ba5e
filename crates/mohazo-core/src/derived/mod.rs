//! Derived - 派生状態の計算
//!
//! エンティティコレクションに対する副作用のない関数群。
//! 変更のたびに計算し直す前提で、キャッシュは持たない。

pub mod filter;
pub mod kpi;
pub mod workload;

pub use self::filter::{TaskFilter, WorkFilter, search_meeting_notes, tasks_of};
pub use self::kpi::{
    DashboardKpi, assignment_rate, compute_dashboard_kpi, compute_failed_count,
    compute_unassigned_works, failed_sync_count, pipeline_progress, unassigned_count,
};
pub use self::workload::{
    MemberWorkload, OVERLOAD_THRESHOLD, WorkloadStatus, compute_member_workload,
    compute_work_progress, recommend_assignee, team_assigned_total, team_workload,
};
