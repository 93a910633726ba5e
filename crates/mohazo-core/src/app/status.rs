//! Status - ダッシュボードのスナップショット
//!
//! 画面（外部の表示層）が 1 回で描画に使える、シリアライズ可能なビュー。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::derived::{DashboardKpi, MemberWorkload, WorkloadStatus};
use crate::domain::{Category, MemberId, StageState, SyncRun, WorkId};

/// スナップショットに載せる同期履歴の件数。
pub const RECENT_SYNC_RUNS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub kpi: DashboardKpi,
    /// 担当者待ちの Work（登録順）。
    pub inbox: Vec<InboxItem>,
    pub pending_assignments: usize,
    pub failed_sync_runs: usize,
    pub team: Vec<TeamMemberLoad>,
    /// 担当者が付いている Work の数（チーム全体）。
    pub team_assigned_total: usize,
    /// 直近のパイプライン実行の各ステージ。
    pub pipeline: Vec<StageState>,
    /// `pipeline` の完了ステージ割合（0-100）。
    pub pipeline_progress: u32,
    /// 新しい順。
    pub recent_sync_runs: Vec<SyncRun>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxItem {
    pub work_id: WorkId,
    pub title: String,
    pub category: Category,
    pub task_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended: Option<MemberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staged: Option<MemberId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberLoad {
    pub member_id: MemberId,
    pub name: String,
    pub role: Category,
    pub workload: MemberWorkload,
    pub status: WorkloadStatus,
}
