//! Domain identifiers (strongly-typed IDs).
//!
//! # Phantom Type パターン
//! `Id<T>` というジェネリック型で共通実装を提供しつつ、
//! `T` は実行時には使わない（PhantomData）マーカー型として、
//! コンパイル時の型安全性を提供します（WorkId と MemberId は混同できない）。
//!
//! # 値の形式
//! - 既存データ（seed など）は任意の文字列 ID をそのまま使う（例: `"g1"`, `"4"`）
//! - 新規生成は `IdGenerator` が `"{prefix}{ULID}"` を作る（例: `"work-01J..."`）
//!
//! どちらも同じ型で扱えるように、内部表現は `String` にしています。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// IdMarker は各 ID 型のマーカー trait
///
/// 新規生成時のプレフィックス（"work-", "task-" など）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T: IdMarker> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

// ========================================
// マーカー型の定義
// ========================================

pub mod marker {
    use super::IdMarker;

    macro_rules! id_marker {
        ($name:ident, $prefix:literal) => {
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub enum $name {}

            impl IdMarker for $name {
                fn prefix() -> &'static str {
                    $prefix
                }
            }
        };
    }

    id_marker!(Member, "member-");
    id_marker!(MeetingNote, "note-");
    id_marker!(Work, "work-");
    id_marker!(Task, "task-");
    id_marker!(SyncRun, "sync-");
    id_marker!(Script, "script-");
}

// ========================================
// Type Alias（使いやすさのため）
// ========================================

/// Identifier of a team member.
pub type MemberId = Id<marker::Member>;

/// Identifier of a meeting note.
pub type MeetingNoteId = Id<marker::MeetingNote>;

/// Identifier of a Work (the unit of assignment).
pub type WorkId = Id<marker::Work>;

/// Identifier of a Task (belongs to exactly one Work).
pub type TaskId = Id<marker::Task>;

/// Identifier of a sync-run audit record.
pub type SyncRunId = Id<marker::SyncRun>;

/// Identifier of an explanation script version.
pub type ScriptId = Id<marker::Script>;

/// Meeting identifier assigned by the remote meeting service.
///
/// The remote side uses positive integers only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteMeetingId(i64);

impl RemoteMeetingId {
    /// Returns `None` unless `value` is a positive integer.
    pub fn new(value: i64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RemoteMeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let work = WorkId::new("g1");
        let member = MemberId::new("g1");

        // 値は同じでも型が違う
        assert_eq!(work.as_str(), member.as_str());
        // let _: WorkId = member; // <- does not compile
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = TaskId::new("t1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"t1\"");

        let back: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn marker_prefixes_are_distinct() {
        let prefixes = [
            marker::Member::prefix(),
            marker::MeetingNote::prefix(),
            marker::Work::prefix(),
            marker::Task::prefix(),
            marker::SyncRun::prefix(),
            marker::Script::prefix(),
        ];
        let unique: std::collections::HashSet<_> = prefixes.iter().collect();
        assert_eq!(unique.len(), prefixes.len());
    }

    #[test]
    fn remote_meeting_id_must_be_positive() {
        assert!(RemoteMeetingId::new(0).is_none());
        assert!(RemoteMeetingId::new(-3).is_none());
        assert_eq!(RemoteMeetingId::new(7).map(RemoteMeetingId::get), Some(7));
    }
}
