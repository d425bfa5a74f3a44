//! GeminiOracle - Google Generative Language API (`generateContent`) の Oracle 実装
//!
//! - 出力 schema は `generationConfig.responseSchema` で渡し、JSON 応答を強制
//! - 文書は `inlineData`（base64）として送る
//! - 応答 envelope から最初の candidate の text を取り出して StructuredResponse にする
//!
//! timeout は orchestrator 側でも掛かるので、ここでは HTTP client 側の上限だけ設定します。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::OracleConfig;
use crate::oracle::{EncodedDocument, OutputSchema, PhasePlanRequest, ScoringRequest};
use crate::ports::{Oracle, OracleError, StructuredResponse};

#[derive(Debug, Error)]
pub enum GeminiSetupError {
    #[error("environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

pub struct GeminiOracle {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiOracle {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeminiSetupError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeminiSetupError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Build from `[oracle]`, reading the key from `api_key_env`.
    pub fn new_from_config(config: &OracleConfig) -> Result<Self, GeminiSetupError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GeminiSetupError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(&config.base_url, &config.model, api_key, config.timeout())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn generate(
        &self,
        parts: Vec<Part>,
        schema: &OutputSchema,
    ) -> Result<StructuredResponse, OracleError> {
        let body = GenerateRequest::new(parts, schema);
        debug!(model = %self.model, schema = schema.name(), "calling generateContent");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        candidate_text(&text).map(StructuredResponse::new)
    }
}

#[async_trait]
impl Oracle for GeminiOracle {
    async fn score(
        &self,
        request: &ScoringRequest,
        schema: &OutputSchema,
    ) -> Result<StructuredResponse, OracleError> {
        self.generate(vec![Part::text(&request.prompt)], schema).await
    }

    async fn extract(
        &self,
        document: &EncodedDocument,
        schema: &OutputSchema,
    ) -> Result<StructuredResponse, OracleError> {
        let parts = vec![
            Part::inline(&document.mime_type, &document.data),
            Part::text(&document.instruction),
        ];
        self.generate(parts, schema).await
    }

    async fn propose_phases(
        &self,
        request: &PhasePlanRequest,
        schema: &OutputSchema,
    ) -> Result<StructuredResponse, OracleError> {
        self.generate(vec![Part::text(&request.prompt)], schema).await
    }
}

// generateContent request / response envelope

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content>,
    generation_config: GenerationConfig<'a>,
}

impl<'a> GenerateRequest<'a> {
    fn new(parts: Vec<Part>, schema: &'a OutputSchema) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema.as_json(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: String,
        data: String,
    },
}

impl Part {
    fn text(text: &str) -> Self {
        Part::Text(text.to_string())
    }

    fn inline(mime_type: &str, data: &str) -> Self {
        Part::InlineData {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// 4xx other than 408 and 429 is a rejected request, not an outage.
fn status_error(status: StatusCode, body: &str) -> OracleError {
    let message = format!("HTTP {status}: {body}");
    if status.is_client_error()
        && status != StatusCode::REQUEST_TIMEOUT
        && status != StatusCode::TOO_MANY_REQUESTS
    {
        OracleError::Protocol(message)
    } else {
        OracleError::Unavailable(message)
    }
}

/// Pull the generated text out of a `generateContent` response body.
fn candidate_text(body: &str) -> Result<String, OracleError> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| OracleError::Protocol(format!("unreadable envelope: {e}")))?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(OracleError::Protocol("response has no candidate text".into()));
    }
    Ok(text)
}
