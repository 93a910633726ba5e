//! IdGenerator port - ID 生成の抽象化
//!
//! 新規エンティティの ID は `"{prefix}{ULID}"` 形式（例: `"work-01J..."`）。
//! seed データの ID（`"g1"` など）とは衝突しない。

use crate::domain::ids::{Id, IdMarker};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は一意で時刻順にソート可能な ULID を払い出す
///
/// dyn で持ち回れるように非ジェネリックにしている。
/// 型付き ID は [`IdGeneratorExt::generate`] で作る。
pub trait IdGenerator: Send + Sync {
    fn next_ulid(&self) -> Ulid;
}

pub trait IdGeneratorExt {
    fn generate<T: IdMarker>(&self) -> Id<T>;
}

impl<G: IdGenerator + ?Sized> IdGeneratorExt for G {
    fn generate<T: IdMarker>(&self) -> Id<T> {
        Id::new(format!("{}{}", T::prefix(), self.next_ulid()))
    }
}

/// UlidGenerator は Clock ベースの ULID 生成器
///
/// FixedClock を渡すと timestamp 部分が決定的になる。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}
