//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（entity store, 推論サービス, 学習リソース, 時刻, ID）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - EntityStore が source of truth（正本）
//! - Oracle は遅くて失敗しうる black box
//! - Clock / IdGenerator はテストで差し替える

pub mod clock;
pub mod entity_store;
pub mod id_generator;
pub mod oracle;
pub mod training;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::entity_store::{EntityStore, Snapshot};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::oracle::{Oracle, OracleError, StructuredResponse};
pub use self::training::{NoTraining, TrainingCatalog};
