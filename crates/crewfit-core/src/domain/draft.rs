//! Edit buffer for creating or editing a project.

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;
use super::ids::{PersonId, ProjectId};
use super::project::{Phase, Project, ProjectStatus};

/// Uncommitted copy of a project.
///
/// `id` is `None` until the first save. `status` defaults to NotStarted for a
/// fresh draft but may be cleared by the caller, which `validate` rejects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    #[serde(default)]
    pub id: Option<ProjectId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub assigned_to: Vec<PersonId>,

    /// `None` means "keep whatever phases the stored project has".
    #[serde(default)]
    pub phases: Option<Vec<Phase>>,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectDraft {
    pub fn new() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            status: Some(ProjectStatus::NotStarted),
            skills: Vec::new(),
            assigned_to: Vec::new(),
            phases: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Check the fields `save` requires.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.status.is_none() {
            missing.push("status");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::missing(missing))
        }
    }

    /// Add a person to the buffer's assignment list if not already there.
    pub fn select_candidate(&mut self, person_id: PersonId) {
        if !self.assigned_to.contains(&person_id) {
            self.assigned_to.push(person_id);
        }
    }
}

impl From<&Project> for ProjectDraft {
    fn from(project: &Project) -> Self {
        Self {
            id: Some(project.id),
            name: project.name.clone(),
            description: project.description.clone(),
            status: Some(project.status),
            skills: project.skills.clone(),
            assigned_to: project.assigned_to.clone(),
            phases: project.phases.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[test]
    fn new_draft_defaults_to_not_started() {
        let draft = ProjectDraft::new();
        assert!(draft.is_new());
        assert_eq!(draft.status, Some(ProjectStatus::NotStarted));
    }

    #[test]
    fn validate_lists_every_missing_field() {
        let mut draft = ProjectDraft::new().with_name("   ");
        draft.status = None;
        let err = draft.validate().unwrap_err();
        assert_eq!(err.missing, vec!["name", "description", "status"]);
    }

    #[test]
    fn validate_accepts_complete_draft() {
        let draft = ProjectDraft::new()
            .with_name("Site Revamp")
            .with_description("Rebuild the marketing site");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn select_candidate_is_idempotent() {
        let person = PersonId::from_ulid(Ulid::new());
        let mut draft = ProjectDraft::new();
        draft.select_candidate(person);
        draft.select_candidate(person);
        assert_eq!(draft.assigned_to, vec![person]);
    }
}
