//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryEntityStore**: セッション内の EntityStore
//! - **StaticTrainingCatalog**: 設定ファイルから作る TrainingCatalog
//! - **GeminiOracle**: Google Generative Language API の Oracle
//!
//! 永続化する EntityStore は外部の collaborator が提供します。

pub mod gemini_oracle;
pub mod inmem_store;
pub mod static_training;

// 主要な型を再エクスポート
pub use self::gemini_oracle::{GeminiOracle, GeminiSetupError};
pub use self::inmem_store::InMemoryEntityStore;
pub use self::static_training::StaticTrainingCatalog;
