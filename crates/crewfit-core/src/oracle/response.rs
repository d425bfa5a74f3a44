//! Typed views of oracle output.
//!
//! Every response is decoded into one of these DTOs before anything else looks
//! at it. Decoding failure means the response does not conform to the schema.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::ports::StructuredResponse;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMatchResponse {
    pub best_matches: Vec<RawBestMatch>,
    pub training_recommendations: Vec<RawTrainingRecommendation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBestMatch {
    pub person_id: String,
    pub match_percentage: f64,
    pub justification: String,
    #[serde(default)]
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTrainingRecommendation {
    pub person_id: String,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    pub reason: String,
}

/// All fields optional; `null` is treated like absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawExtraction {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default)]
    pub project_skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPhasePlan {
    pub phases: Vec<RawPhase>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPhase {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Decode a structured response into `T`.
///
/// Surrounding whitespace and a single markdown code fence are tolerated;
/// anything else that is not valid JSON of the expected shape is an error.
pub(crate) fn decode<T: DeserializeOwned>(response: &StructuredResponse) -> Result<T, String> {
    let body = strip_code_fence(response.body().trim());
    if body.is_empty() {
        return Err("empty response body".to_string());
    }
    serde_json::from_str(body).map_err(|e| e.to_string())
}

fn strip_code_fence(body: &str) -> &str {
    let Some(rest) = body.strip_prefix("```") else {
        return body;
    };
    // drop an optional language tag on the opening line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
