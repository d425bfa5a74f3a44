//! MatchingOrchestrator - oracle による候補者ランキング
//!
//! # フロー
//! 1. 前提条件チェック（満たさなければ oracle を呼ばない）
//! 2. ScoringRequest + 出力 schema を組み立てて oracle を呼ぶ（timeout 付き）
//! 3. 応答を型付き DTO に decode（失敗したら部分的に使わず OracleResponse）
//! 4. 正規化: 未知の personId を捨てる、matchPercentage を [0,100] に丸める
//!
//! 結果は返すだけで、store にも編集バッファにも書き込みません。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{
    BestMatch, InsufficientInput, MatchError, MatchResult, MissingSkill, Person, PersonId,
    TrainingRecommendation,
};
use crate::oracle::response::{RawMatchResponse, decode};
use crate::oracle::{CallFailure, OutputSchema, ProjectBrief, ScoringRequest, bounded};
use crate::ports::{Oracle, TrainingCatalog};

pub struct MatchingOrchestrator {
    oracle: Arc<dyn Oracle>,
    training: Arc<dyn TrainingCatalog>,
    timeout: Duration,
}

impl MatchingOrchestrator {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        training: Arc<dyn TrainingCatalog>,
        timeout: Duration,
    ) -> Self {
        Self {
            oracle,
            training,
            timeout,
        }
    }

    /// Rank `candidates` against `project`, asking for at most `top_n` matches.
    pub async fn find_matches(
        &self,
        project: impl Into<ProjectBrief>,
        candidates: &[Person],
        top_n: usize,
    ) -> Result<MatchResult, MatchError> {
        let brief = project.into();
        check_preconditions(&brief, candidates, top_n).map_err(MatchError::InsufficientInput)?;

        let request = ScoringRequest::new(brief, candidates, top_n);
        let schema = OutputSchema::matching();
        info!(
            project = %request.project.name,
            candidates = candidates.len(),
            top_n,
            "requesting candidate matches"
        );

        let response = bounded(self.timeout, self.oracle.score(&request, &schema))
            .await
            .map_err(|failure| match failure {
                CallFailure::Unavailable(msg) => {
                    warn!(error = %msg, "matching oracle unavailable");
                    MatchError::OracleUnavailable(msg)
                }
                CallFailure::Malformed(msg) => {
                    warn!(error = %msg, "matching oracle returned a malformed envelope");
                    MatchError::OracleResponse(msg)
                }
            })?;

        let raw: RawMatchResponse = decode(&response).map_err(|msg| {
            warn!(error = %msg, "matching response does not conform to schema");
            MatchError::OracleResponse(msg)
        })?;

        let result = normalize(raw, candidates, top_n, self.training.as_ref());
        debug!(
            best_matches = result.best_matches.len(),
            training = result.training_recommendations.len(),
            "matching finished"
        );
        Ok(result)
    }
}

fn check_preconditions(
    brief: &ProjectBrief,
    candidates: &[Person],
    top_n: usize,
) -> Result<(), InsufficientInput> {
    if brief.description.trim().is_empty() {
        return Err(InsufficientInput::BlankDescription);
    }
    if brief.required_skills.iter().all(|s| s.trim().is_empty()) {
        return Err(InsufficientInput::NoRequiredSkills);
    }
    if candidates.is_empty() {
        return Err(InsufficientInput::NoCandidates);
    }
    if top_n == 0 {
        return Err(InsufficientInput::ZeroTopN);
    }
    Ok(())
}

/// Turn a decoded response into a `MatchResult`.
///
/// Keeps the oracle's order. Drops unknown and repeated person ids, clamps
/// percentages into `[0, 100]`, truncates to `top_n`.
fn normalize(
    raw: RawMatchResponse,
    candidates: &[Person],
    top_n: usize,
    training: &dyn TrainingCatalog,
) -> MatchResult {
    let known: HashMap<String, PersonId> = candidates
        .iter()
        .map(|p| (p.id.to_string(), p.id))
        .collect();
    let resolve = |raw_id: &str| -> Option<PersonId> {
        let id = known.get(raw_id.trim()).copied();
        if id.is_none() {
            warn!(person_id = raw_id, "dropping unknown candidate from oracle response");
        }
        id
    };

    let mut best_matches: Vec<BestMatch> = Vec::with_capacity(top_n);
    for m in raw.best_matches {
        if best_matches.len() == top_n {
            break;
        }
        let Some(person_id) = resolve(&m.person_id) else {
            continue;
        };
        if best_matches.iter().any(|b| b.person_id == person_id) {
            continue;
        }
        best_matches.push(BestMatch {
            person_id,
            match_percentage: m.match_percentage.clamp(0.0, 100.0),
            justification: m.justification,
            missing_skills: decorate(m.missing_skills, training),
        });
    }

    let mut training_recommendations: Vec<TrainingRecommendation> = Vec::new();
    for r in raw.training_recommendations {
        let Some(person_id) = resolve(&r.person_id) else {
            continue;
        };
        training_recommendations.push(TrainingRecommendation {
            person_id,
            missing_skills: decorate(r.missing_skills, training),
            reason: r.reason,
        });
    }

    MatchResult {
        best_matches,
        training_recommendations,
    }
}

fn decorate(skills: Vec<String>, training: &dyn TrainingCatalog) -> Vec<MissingSkill> {
    crate::domain::person::dedup_tags(skills)
        .into_iter()
        .map(|skill| MissingSkill {
            training_url: training.lookup(&skill),
            skill,
        })
        .collect()
}
