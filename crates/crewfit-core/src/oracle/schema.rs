//! Output schemas sent alongside every oracle request.
//!
//! The shape follows the `responseSchema` dialect of structured-output LLM APIs
//! (`type` / `properties` / `items` / `required`). The orchestrators still
//! validate the response themselves; the schema only constrains generation.

use serde::Serialize;
use serde_json::{Value, json};

/// A named JSON schema for structured oracle output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSchema {
    name: &'static str,
    schema: Value,
}

impl OutputSchema {
    pub fn new(name: &'static str, schema: Value) -> Self {
        Self { name, schema }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn as_json(&self) -> &Value {
        &self.schema
    }

    /// Ranked best matches plus training recommendations. Both lists required.
    pub fn matching() -> Self {
        let skills = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
        Self::new(
            "matching",
            json!({
                "type": "OBJECT",
                "properties": {
                    "bestMatches": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "personId": { "type": "STRING" },
                                "matchPercentage": { "type": "NUMBER" },
                                "justification": { "type": "STRING" },
                                "missingSkills": skills.clone(),
                            },
                            "required": ["personId", "matchPercentage", "justification", "missingSkills"],
                        },
                    },
                    "trainingRecommendations": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "personId": { "type": "STRING" },
                                "missingSkills": skills,
                                "reason": { "type": "STRING" },
                            },
                            "required": ["personId", "missingSkills", "reason"],
                        },
                    },
                },
                "required": ["bestMatches", "trainingRecommendations"],
            }),
        )
    }

    /// Project fields from a document. Every field is optional.
    pub fn extraction() -> Self {
        Self::new(
            "extraction",
            json!({
                "type": "OBJECT",
                "properties": {
                    "projectName": { "type": "STRING" },
                    "projectDescription": { "type": "STRING" },
                    "projectSkills": { "type": "ARRAY", "items": { "type": "STRING" } },
                },
            }),
        )
    }

    /// Ordered work breakdown for a new project.
    pub fn phase_plan() -> Self {
        Self::new(
            "phase_plan",
            json!({
                "type": "OBJECT",
                "properties": {
                    "phases": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "name": { "type": "STRING" },
                                "description": { "type": "STRING" },
                            },
                            "required": ["name", "description"],
                        },
                    },
                },
                "required": ["phases"],
            }),
        )
    }
}
