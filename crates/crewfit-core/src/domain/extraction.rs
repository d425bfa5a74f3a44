//! Fields extracted from an uploaded project document.

use serde::{Deserialize, Serialize};

use super::draft::ProjectDraft;

/// Partial project fields. Empty values mean "not found in the document".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub name: String,
    pub description: String,
    pub skills: Vec<String>,
}

impl ExtractionResult {

    /// Merge into an edit buffer.
    ///
    /// A field is overwritten only when the extracted value is non-empty, so an
    /// empty extraction never erases what the user typed.
    pub fn merge_into(&self, draft: &mut ProjectDraft) {
        let name = self.name.trim();
        if !name.is_empty() {
            draft.name = name.to_string();
        }
        let description = self.description.trim();
        if !description.is_empty() {
            draft.description = description.to_string();
        }
        let skills = super::person::dedup_tags(self.skills.clone());
        if !skills.is_empty() {
            draft.skills = skills;
        }
    }
}
