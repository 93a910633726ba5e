//! mohazo-core
//!
//! Domain model and workflows of the mohazo team dashboard: meeting notes are
//! ingested into Works and Tasks, Works are assigned to members, and results
//! are synced to an external workspace.
//!
//! # モジュール構成
//! - **domain**: エンティティ、ID、状態遷移、エラー
//! - **derived**: KPI・負荷・進捗・推薦などの純粋関数
//! - **ports**: 外部との境界（MeetingApi, WorkspaceSync, ProgressSink, Clock, IdGenerator）
//! - **impls**: ports の実装（reqwest クライアント、インメモリ、進捗シンク）
//! - **app**: Dashboard コントローラとワークフロー
//! - **config**: 会議サービスのアドレス解決

pub mod app;
pub mod config;
pub mod derived;
pub mod domain;
pub mod impls;
pub mod ports;

pub use crate::app::{Dashboard, DashboardBuilder};
pub use crate::domain::{DashboardError, ErrorKind};
