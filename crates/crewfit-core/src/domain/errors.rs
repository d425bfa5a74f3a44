//! Errors - エラー型
//!
//! lifecycle / phase 操作は total function なのでここには現れません。
//! 失敗しうるのは orchestrator（oracle 呼び出し）と store だけです。

use thiserror::Error;

/// Required edit-buffer fields are missing; blocks `save`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl ValidationError {
    pub fn missing(missing: Vec<&'static str>) -> Self {
        Self { missing }
    }
}

/// Why a matching request was refused before reaching the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsufficientInput {
    #[error("project description is empty")]
    BlankDescription,

    #[error("project has no required skills")]
    NoRequiredSkills,

    #[error("candidate pool is empty")]
    NoCandidates,

    #[error("top_n must be greater than zero")]
    ZeroTopN,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("insufficient input for matching: {0}")]
    InsufficientInput(InsufficientInput),

    #[error("oracle response does not match the scoring schema: {0}")]
    OracleResponse(String),

    #[error("oracle unavailable: {0}")]
    OracleUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("failed to read document: {0}")]
    FileRead(String),

    #[error("oracle response does not match the extraction schema: {0}")]
    OracleResponse(String),

    #[error("oracle unavailable: {0}")]
    OracleUnavailable(String),
}

/// Phase generation failure. Logged by the service, never shown to `save`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("oracle response does not match the phase schema: {0}")]
    OracleResponse(String),

    #[error("oracle unavailable: {0}")]
    OracleUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("entity store unavailable: {0}")]
    Unavailable(String),
}
