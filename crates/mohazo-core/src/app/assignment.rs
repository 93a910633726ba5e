//! AssignmentDesk - 割り当ての仮選択（inbox）と確定
//!
//! 選択は `stage` で仮置きし、`confirm` で Work.assignee_id に書き込む。
//! 仮選択はメモリ上だけの一時状態で、AppState には含めない。

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::state::AppState;
use crate::domain::{DashboardError, MemberId, WorkId, WorkUpdate};

#[derive(Debug, Clone, Default)]
pub struct AssignmentDesk {
    pending: BTreeMap<WorkId, MemberId>,
}

impl AssignmentDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// `work_id` の仮選択を記録（上書き）する。
    ///
    /// 両方の id が存在すること。割り当て済みの Work も仮選択できる。
    pub fn stage(
        &mut self,
        state: &AppState,
        work_id: &WorkId,
        member_id: &MemberId,
    ) -> Result<(), DashboardError> {
        state.work(work_id)?;
        state.member(member_id)?;
        debug!(work_id = %work_id, member_id = %member_id, "assignment staged");
        self.pending.insert(work_id.clone(), member_id.clone());
        Ok(())
    }

    /// 仮選択を反映して消す。
    ///
    /// 仮選択がなければ状態に触れず `Ok(None)` を返すので、確定後の 2 回目は何もしない。
    /// 更新に失敗したときは仮選択を残す。
    pub fn confirm(
        &mut self,
        state: &mut AppState,
        work_id: &WorkId,
    ) -> Result<Option<MemberId>, DashboardError> {
        let Some(member_id) = self.pending.get(work_id).cloned() else {
            debug!(work_id = %work_id, "confirm ignored: nothing staged");
            return Ok(None);
        };
        state.update_work(work_id, WorkUpdate::assign(member_id.clone()))?;
        self.pending.remove(work_id);
        info!(work_id = %work_id, member_id = %member_id, "assignment confirmed");
        Ok(Some(member_id))
    }

    /// すべての仮選択を確定し、全部消す。
    ///
    /// 確定はそれぞれ独立していて、残りを反映したあとで最初の失敗を返す。
    pub fn confirm_all(
        &mut self,
        state: &mut AppState,
    ) -> Result<Vec<(WorkId, MemberId)>, DashboardError> {
        let staged = std::mem::take(&mut self.pending);
        let mut applied = Vec::with_capacity(staged.len());
        let mut first_error = None;
        for (work_id, member_id) in staged {
            match state.update_work(&work_id, WorkUpdate::assign(member_id.clone())) {
                Ok(_) => applied.push((work_id, member_id)),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        info!(count = applied.len(), "staged assignments confirmed");
        match first_error {
            Some(err) => Err(err),
            None => Ok(applied),
        }
    }

    /// `work_id` の仮選択を取り消す。
    pub fn unstage(&mut self, work_id: &WorkId) -> Option<MemberId> {
        self.pending.remove(work_id)
    }

    pub fn pending(&self, work_id: &WorkId) -> Option<&MemberId> {
        self.pending.get(work_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
