//! App - アプリケーション層
//!
//! ports を組み合わせてワークフローを実装します。
//!
//! # 主要コンポーネント
//! - **Dashboard**: コントローラ（状態の唯一の所有者）
//! - **DashboardBuilder**: 構築とワイヤリング、初期データの検証
//! - **AssignmentDesk**: 割り当ての仮選択と確定
//! - **ingestion**: upload → analyze → describe → extract → sync
//! - **MeetingListRefresher**: 会議一覧の再取得（多重実行ガード付き）

pub mod assignment;
pub mod builder;
pub mod dashboard;
pub mod ingestion;
pub mod refresh;
pub mod seed;
pub mod state;
pub mod status;

pub use self::assignment::AssignmentDesk;
pub use self::builder::{BuildError, DashboardBuilder};
pub use self::dashboard::Dashboard;
pub use self::ingestion::{Collaborators, IngestionReport, MeetingInput};
pub use self::refresh::{MeetingListRefresher, RefreshOutcome};
pub use self::state::AppState;
pub use self::status::{DashboardSnapshot, InboxItem, TeamMemberLoad};
