//! App - アプリケーション層
//!
//! このモジュールは、ports と lifecycle を組み合わせてユースケースを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: アプリケーションの構築とワイヤリング
//! - **ProjectService**: store への唯一の書き込み経路（writer lock で直列化）
//! - **EditSession**: 編集バッファと in-flight 状態
//! - **MatchingOrchestrator / ExtractionOrchestrator / PhasePlanner**: oracle 呼び出し
//! - **bootstrap**: 空の store への seed 投入

pub mod bootstrap;
pub mod builder;
pub mod extraction;
pub mod matching;
pub mod phase_planner;
pub mod service;
pub mod session;

// 主要な型を再エクスポート
pub use self::bootstrap::{SeedError, bootstrap_if_empty, load_seed};
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::extraction::{ACCEPTED_MIME_TYPES, ExtractionOrchestrator, accepted_mime_type};
pub use self::matching::MatchingOrchestrator;
pub use self::phase_planner::PhasePlanner;
pub use self::service::{PhaseGenerationHandle, ProjectService, SavedProject, ServiceError};
pub use self::session::{Delivery, EditSession, RequestKind, SessionError};
