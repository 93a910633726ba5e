//! Errors - エラー型と分類
//!
//! # 分類（ErrorKind）
//! - Validation: 入力不正（空文字、不正な ID）。状態を変更する前に弾く
//! - Collaborator: 外部サービス（meeting API, workspace sync）の失敗
//! - NotFound: 存在しない ID を参照した操作
//! - Config: 設定の解決に失敗
//!
//! NotFound は常に明示的なエラーとして返す（黙って無視しない）。

use thiserror::Error;

/// ErrorKind は DashboardError の運用分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Collaborator,
    NotFound,
    Config,
}

/// Entity names used in `NotFound` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Member,
    MeetingNote,
    Work,
    Task,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Entity::Member => "member",
            Entity::MeetingNote => "meeting note",
            Entity::Work => "work",
            Entity::Task => "task",
        })
    }
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("meeting id must be a positive integer, got {0}")]
    InvalidMeetingId(i64),

    #[error("meeting note {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: &'static str,
        to: &'static str,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("{message}")]
    Collaborator {
        status: Option<u16>,
        message: String,
    },

    #[error("no data returned: {0}")]
    NoData(&'static str),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("config error: {0}")]
    Config(String),
}

impl DashboardError {
    pub fn not_found(entity: Entity, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator {
            status: None,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::EmptyField(_)
            | DashboardError::InvalidMeetingId(_)
            | DashboardError::InvalidTransition { .. } => ErrorKind::Validation,
            DashboardError::NotFound { .. } => ErrorKind::NotFound,
            DashboardError::Collaborator { .. }
            | DashboardError::NoData(_)
            | DashboardError::Transport(_) => ErrorKind::Collaborator,
            DashboardError::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty(DashboardError::EmptyField("title"), ErrorKind::Validation)]
    #[case::meeting_id(DashboardError::InvalidMeetingId(0), ErrorKind::Validation)]
    #[case::not_found(DashboardError::not_found(Entity::Work, "g9"), ErrorKind::NotFound)]
    #[case::no_data(DashboardError::NoData("upload"), ErrorKind::Collaborator)]
    #[case::remote(DashboardError::collaborator("boom"), ErrorKind::Collaborator)]
    #[case::config(DashboardError::Config("missing".into()), ErrorKind::Config)]
    fn errors_are_classified(#[case] err: DashboardError, #[case] kind: ErrorKind) {
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = DashboardError::not_found(Entity::MeetingNote, "n1");
        assert_eq!(err.to_string(), "meeting note not found: n1");
    }
}
