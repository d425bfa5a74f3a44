//! Match result model: what the matching orchestrator hands back.
//!
//! Transient. Nothing here is written to a project unless the caller selects a
//! candidate explicitly.

use serde::{Deserialize, Serialize};

use super::ids::PersonId;

/// A skill a candidate lacks, with an optional training link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingSkill {
    pub skill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_url: Option<String>,
}

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestMatch {
    pub person_id: PersonId,

    /// Always within `[0, 100]`.
    pub match_percentage: f64,

    pub justification: String,

    #[serde(default)]
    pub missing_skills: Vec<MissingSkill>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecommendation {
    pub person_id: PersonId,
    #[serde(default)]
    pub missing_skills: Vec<MissingSkill>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Ranked by the oracle, best first.
    pub best_matches: Vec<BestMatch>,
    pub training_recommendations: Vec<TrainingRecommendation>,
}

