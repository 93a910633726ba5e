//! Implementations of the ports.
//!
//! - `HttpMeetingApi`: reqwest client for the meeting service
//! - `InMemoryMeetingApi` / `LocalWorkspaceSync`: tests and demo
//! - progress sinks: noop, tracing, tokio channel, pipeline board

pub mod http_api;
pub mod inmem_api;
pub mod local_sync;
pub mod progress;

pub use self::http_api::HttpMeetingApi;
pub use self::inmem_api::{FailOn, InMemoryMeetingApi};
pub use self::local_sync::LocalWorkspaceSync;
pub use self::progress::{BoardProgress, ChannelProgress, NoopProgress, TracingProgress};
