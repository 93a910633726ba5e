//! Domain model (ids, entities, state machine, errors).

pub mod category;
pub mod errors;
pub mod explanation;
pub mod ids;
pub mod meeting;
pub mod member;
pub mod pipeline;
pub mod sync_run;
pub mod task;
pub mod work;

pub use self::category::{Category, ParseCategoryError};
pub use self::errors::{DashboardError, Entity, ErrorKind};
pub use self::explanation::{ExplanationContent, ExplanationScript};
pub use self::ids::{
    Id, IdMarker, MeetingNoteId, MemberId, RemoteMeetingId, ScriptId, SyncRunId, TaskId, WorkId,
};
pub use self::meeting::{MeetingNote, MeetingNoteStatus};
pub use self::member::{Member, NewMember, SkillLevel};
pub use self::pipeline::{PipelineBoard, PipelineStage, PipelineStep, StageState, StepStatus};
pub use self::sync_run::{SyncDiff, SyncResult, SyncRun, SyncType};
pub use self::task::{Confidence, Task, TaskStatus, TaskUpdate};
pub use self::work::{FieldUpdate, Work, WorkStatus, WorkUpdate};
