//! Oracle port - 外部推論サービス（LLM）の抽象化
//!
//! core はこの capability にだけ依存し、特定の provider には依存しません。
//! どのメソッドも出力 schema を一緒に受け取り、構造化された JSON テキストを返します。
//! 応答の検証は呼び出し側（orchestrator）の責務です。
//!
//! # 実装
//! - **GeminiOracle**（impls）: Generative Language API
//! - テストでは scripted / counting な test double

use async_trait::async_trait;
use thiserror::Error;

use crate::oracle::{EncodedDocument, OutputSchema, PhasePlanRequest, ScoringRequest};

/// Raw structured output: JSON text the provider claims matches the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredResponse {
    body: String,
}

impl StructuredResponse {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl From<serde_json::Value> for StructuredResponse {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value.to_string())
    }
}

/// OracleError は provider 呼び出しの失敗
///
/// - Transport / Unavailable: 到達できない・応答できない（リトライ可能）
/// - Protocol: provider の封筒（envelope）自体が壊れている、または要求が拒否された（408/429 以外の 4xx）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Oracle は採点・抽出・phase 提案の 3 つの capability を持つ
///
/// # 設計原則
/// - 失敗しうる・遅い（呼び出し側で timeout を掛ける）
/// - 出力は schema で構造を縛るが、信用せずに検証する
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn score(
        &self,
        request: &ScoringRequest,
        schema: &OutputSchema,
    ) -> Result<StructuredResponse, OracleError>;

    async fn extract(
        &self,
        document: &EncodedDocument,
        schema: &OutputSchema,
    ) -> Result<StructuredResponse, OracleError>;

    async fn propose_phases(
        &self,
        request: &PhasePlanRequest,
        schema: &OutputSchema,
    ) -> Result<StructuredResponse, OracleError>;
}
