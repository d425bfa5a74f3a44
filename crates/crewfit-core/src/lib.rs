//! crewfit-core
//!
//! Core building blocks for crewfit: projects, the people who staff them, and
//! oracle-assisted matching / document extraction / phase planning.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, person, project, draft, matching, extraction, errors）
//! - **lifecycle**: status 遷移と日付の導出、phase 操作（純粋関数）
//! - **ports**: 抽象化レイヤー（EntityStore, Oracle, TrainingCatalog, Clock, IdGenerator）
//! - **oracle**: oracle に渡す request / 出力 schema / 応答の decode
//! - **app**: アプリケーションロジック（builder, service, session, orchestrators）
//! - **impls**: 実装（InMemoryEntityStore, StaticTrainingCatalog, GeminiOracle）
//! - **config**: `crewfit.toml` の読み込み
//! - **observability**: tracing の初期化と status 集計

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod lifecycle;
pub mod observability;
pub mod oracle;
pub mod ports;

#[cfg(test)]
pub(crate) mod test_support;
