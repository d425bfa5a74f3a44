//! Request payloads for the oracle.

use serde::Serialize;

use crate::domain::{Person, Project, ProjectDraft};

/// The parts of a project the oracle needs to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBrief {
    pub name: String,
    pub description: String,
    pub required_skills: Vec<String>,
}

impl From<&Project> for ProjectBrief {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            required_skills: project.skills.clone(),
        }
    }
}

impl From<&ProjectDraft> for ProjectBrief {
    fn from(draft: &ProjectDraft) -> Self {
        Self {
            name: draft.name.clone(),
            description: draft.description.clone(),
            required_skills: draft.skills.clone(),
        }
    }
}

/// One candidate as serialized into the scoring request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    /// Prefixed id string; the oracle must echo it back verbatim.
    pub id: String,
    pub name: String,
    pub role: String,
    pub experience_years: u32,
    pub skills: Vec<String>,
}

impl From<&Person> for CandidateProfile {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.to_string(),
            name: person.name.clone(),
            role: person.role.clone(),
            experience_years: person.experience_years,
            skills: person.skills.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRequest {
    pub project: ProjectBrief,
    pub candidates: Vec<CandidateProfile>,
    pub top_n: usize,

    /// Rendered instructions for text-prompted providers.
    pub prompt: String,
}

impl ScoringRequest {
    pub fn new(project: ProjectBrief, candidates: &[Person], top_n: usize) -> Self {
        let candidates: Vec<CandidateProfile> = candidates.iter().map(Into::into).collect();
        let prompt = render_scoring_prompt(&project, &candidates, top_n);
        Self {
            project,
            candidates,
            top_n,
            prompt,
        }
    }
}

fn render_scoring_prompt(
    project: &ProjectBrief,
    candidates: &[CandidateProfile],
    top_n: usize,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are staffing a project. Rank the candidates against its requirements.\n\n",
    );
    prompt.push_str(&format!("Project name: {}\n", project.name));
    prompt.push_str(&format!("Project description: {}\n", project.description));
    prompt.push_str(&format!(
        "Required skills: {}\n",
        project.required_skills.join(", ")
    ));
    prompt.push_str("\nCandidates (JSON):\n");
    let candidates_json = serde_json::to_string_pretty(candidates).unwrap_or_else(|_| "[]".into());
    prompt.push_str(&candidates_json);
    prompt.push_str("\n\nRules:\n");
    prompt.push_str(&format!(
        "1) Return at most {top_n} entries in bestMatches, best first.\n"
    ));
    prompt.push_str("2) personId must be copied exactly from the candidate's id field.\n");
    prompt.push_str("3) matchPercentage is a number between 0 and 100.\n");
    prompt.push_str("4) missingSkills lists required skills the candidate lacks.\n");
    prompt.push_str(
        "5) trainingRecommendations names candidates worth training, with the skills and a reason.\n",
    );
    prompt.push_str("Return JSON only.\n");
    prompt
}

/// A document transcoded for transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedDocument {
    pub mime_type: String,

    /// Base64 (standard alphabet, padded).
    pub data: String,

    pub instruction: String,
}

impl EncodedDocument {
    pub const INSTRUCTION: &'static str =
        "Analyze the attached project document. Extract the project name, description, and required skills. \
         Use an empty string or empty list for anything the document does not state.";

    pub fn new(mime_type: impl Into<String>, data: String) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
            instruction: Self::INSTRUCTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasePlanRequest {
    pub project: ProjectBrief,
    pub prompt: String,
}

impl PhasePlanRequest {
    pub fn new(project: ProjectBrief) -> Self {
        let mut prompt = String::new();
        prompt.push_str("Break the following project into an ordered list of phases.\n\n");
        prompt.push_str(&format!("Project name: {}\n", project.name));
        prompt.push_str(&format!("Project description: {}\n", project.description));
        if !project.required_skills.is_empty() {
            prompt.push_str(&format!(
                "Skills involved: {}\n",
                project.required_skills.join(", ")
            ));
        }
        prompt.push_str("\nEach phase needs a short name and a one-sentence description.\n");
        prompt.push_str("Return JSON only.\n");
        Self { project, prompt }
    }
}
