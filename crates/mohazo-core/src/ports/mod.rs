//! Ports - 抽象化レイヤー
//!
//! 外部システム（会議サービス、ワークスペースツール）と
//! 実行環境（時刻、ID 生成、進捗通知）への境界を trait で定義します。

pub mod clock;
pub mod id_generator;
pub mod meeting_api;
pub mod progress;
pub mod workspace_sync;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, IdGeneratorExt, UlidGenerator};
pub use self::meeting_api::{MeetingApi, MeetingSummary};
pub use self::progress::ProgressSink;
pub use self::workspace_sync::{SyncReceipt, WorkspaceSync};
