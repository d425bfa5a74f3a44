//! IdGenerator port - ID 生成の抽象化
//!
//! テスト容易性のために trait として抽象化しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::domain::ids::{PersonId, PhaseId, ProjectId};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は Person / Project / Phase の ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（spawn した phase 生成タスクからも使う）
pub trait IdGenerator: Send + Sync {
    fn generate_person_id(&self) -> PersonId;

    fn generate_project_id(&self) -> ProjectId;

    fn generate_phase_id(&self) -> PhaseId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// FixedClock を使えば timestamp 部分が決定的になります。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_person_id(&self) -> PersonId {
        PersonId::from(self.next_ulid())
    }

    fn generate_project_id(&self) -> ProjectId {
        ProjectId::from(self.next_ulid())
    }

    fn generate_phase_id(&self) -> PhaseId {
        PhaseId::from(self.next_ulid())
    }
}
