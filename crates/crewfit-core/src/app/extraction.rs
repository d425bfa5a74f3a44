//! ExtractionOrchestrator - アップロードされた文書から project のフィールドを抽出
//!
//! # フロー
//! 1. mime type の allow-list チェック（I/O や oracle 呼び出しより前）
//! 2. base64 に変換して抽出 schema と一緒に oracle へ（timeout 付き）
//! 3. 応答を decode（空文字・空リストは「見つからなかった」であってエラーではない）
//!
//! 編集バッファへの反映は `ExtractionResult::merge_into` / EditSession が行います。

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{info, warn};

use crate::domain::{ExtractionError, ExtractionResult};
use crate::oracle::response::{RawExtraction, decode};
use crate::oracle::{CallFailure, EncodedDocument, OutputSchema, bounded};
use crate::ports::Oracle;

/// Mime types accepted for extraction: common images, PDF, Word (.doc/.docx).
pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/heic",
    "image/heif",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Normalize a mime type (lowercase, parameters dropped) and check it against
/// the allow-list.
pub fn accepted_mime_type(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ACCEPTED_MIME_TYPES.iter().copied().find(|m| *m == essence)
}

pub struct ExtractionOrchestrator {
    oracle: Arc<dyn Oracle>,
    timeout: Duration,
}

impl ExtractionOrchestrator {
    pub fn new(oracle: Arc<dyn Oracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    pub async fn extract_from_document(
        &self,
        file_bytes: &[u8],
        mime_type: &str,
    ) -> Result<ExtractionResult, ExtractionError> {
        let mime = accepted_mime_type(mime_type)
            .ok_or_else(|| ExtractionError::UnsupportedFileType(mime_type.to_string()))?;
        if file_bytes.is_empty() {
            return Err(ExtractionError::FileRead("document is empty".to_string()));
        }
        self.submit(file_bytes, mime).await
    }

    /// Read `path` and extract from it. The mime type is checked before the
    /// file is touched.
    pub async fn extract_from_file(
        &self,
        path: impl AsRef<Path>,
        mime_type: &str,
    ) -> Result<ExtractionResult, ExtractionError> {
        let path = path.as_ref();
        let mime = accepted_mime_type(mime_type)
            .ok_or_else(|| ExtractionError::UnsupportedFileType(mime_type.to_string()))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ExtractionError::FileRead(format!("{}: {e}", path.display())))?;
        if bytes.is_empty() {
            return Err(ExtractionError::FileRead(format!(
                "{}: document is empty",
                path.display()
            )));
        }
        self.submit(&bytes, mime).await
    }

    async fn submit(
        &self,
        bytes: &[u8],
        mime: &'static str,
    ) -> Result<ExtractionResult, ExtractionError> {
        let document = EncodedDocument::new(mime, STANDARD.encode(bytes));
        let schema = OutputSchema::extraction();
        info!(mime_type = mime, size = bytes.len(), "requesting document extraction");

        let response = bounded(self.timeout, self.oracle.extract(&document, &schema))
            .await
            .map_err(|failure| match failure {
                CallFailure::Unavailable(msg) => {
                    warn!(error = %msg, "extraction oracle unavailable");
                    ExtractionError::OracleUnavailable(msg)
                }
                CallFailure::Malformed(msg) => {
                    warn!(error = %msg, "extraction oracle returned a malformed envelope");
                    ExtractionError::OracleResponse(msg)
                }
            })?;

        let raw: RawExtraction = decode(&response).map_err(|msg| {
            warn!(error = %msg, "extraction response does not conform to schema");
            ExtractionError::OracleResponse(msg)
        })?;

        Ok(ExtractionResult {
            name: raw.project_name.unwrap_or_default(),
            description: raw.project_description.unwrap_or_default(),
            skills: raw.project_skills.unwrap_or_default(),
        })
    }
}
