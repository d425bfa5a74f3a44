//! Project and phase records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{PersonId, PhaseId, ProjectId};

/// Project status.
///
/// Every status is reachable from every other one. Only the timestamps that
/// the lifecycle engine derives depend on the edge taken:
/// - NotStarted -> InProgress sets `start_date`
/// - * -> Completed sets `end_date` (and `start_date` if still unset)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,

    #[serde(rename = "In Progress")]
    InProgress,

    #[serde(rename = "Completed")]
    Completed,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Not Started",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,

    #[serde(rename = "Completed")]
    Completed,
}

impl PhaseStatus {
    pub fn toggled(self) -> Self {
        match self {
            PhaseStatus::ToDo => PhaseStatus::Completed,
            PhaseStatus::Completed => PhaseStatus::ToDo,
        }
    }
}

/// One step of a project's work breakdown. Owned by its project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: PhaseId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: PhaseStatus,
}

impl Phase {
    pub fn new(id: PhaseId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            status: PhaseStatus::ToDo,
        }
    }
}

/// Stored project.
///
/// `start_date` / `end_date` are written only by `lifecycle`; nothing else in
/// the crate assigns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,

    /// Required skills, in the order the user entered them.
    #[serde(default)]
    pub skills: Vec<String>,

    /// Assigned people. May reference people that no longer exist.
    #[serde(default)]
    pub assigned_to: Vec<PersonId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<Vec<Phase>>,
}

/// Completed / total phase counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseProgress {
    pub completed: usize,
    pub total: usize,
}

impl PhaseProgress {
    /// `completed / total`, or `None` when the project has no phases.
    pub fn ratio(self) -> Option<f64> {
        (self.total > 0).then(|| self.completed as f64 / self.total as f64)
    }
}

impl Project {
    pub fn phases(&self) -> &[Phase] {
        self.phases.as_deref().unwrap_or_default()
    }

    pub fn has_phases(&self) -> bool {
        !self.phases().is_empty()
    }

    pub fn phase(&self, phase_id: PhaseId) -> Option<&Phase> {
        self.phases().iter().find(|p| p.id == phase_id)
    }

    pub fn phase_progress(&self) -> PhaseProgress {
        let phases = self.phases();
        PhaseProgress {
            completed: phases
                .iter()
                .filter(|p| p.status == PhaseStatus::Completed)
                .count(),
            total: phases.len(),
        }
    }

    /// Share of completed phases. Never stored, always recomputed.
    pub fn progress(&self) -> Option<f64> {
        self.phase_progress().ratio()
    }

    pub fn is_assigned(&self, person_id: PersonId) -> bool {
        self.assigned_to.contains(&person_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use ulid::Ulid;

    fn phase(status: PhaseStatus) -> Phase {
        Phase {
            status,
            ..Phase::new(PhaseId::from_ulid(Ulid::new()), "p", "")
        }
    }

    fn project(phases: Option<Vec<Phase>>) -> Project {
        Project {
            id: ProjectId::from_ulid(Ulid::new()),
            name: "n".to_string(),
            description: "d".to_string(),
            status: ProjectStatus::NotStarted,
            skills: vec![],
            assigned_to: vec![],
            start_date: None,
            end_date: None,
            phases,
        }
    }

    #[test]
    fn status_serializes_with_display_labels() {
        let s = serde_json::to_string(&ProjectStatus::NotStarted).unwrap();
        assert_eq!(s, "\"Not Started\"");
        let s = serde_json::to_string(&PhaseStatus::ToDo).unwrap();
        assert_eq!(s, "\"To Do\"");
        let back: ProjectStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(back, ProjectStatus::InProgress);
    }

    #[rstest]
    #[case::no_phases(None, None)]
    #[case::empty_phases(Some(vec![]), None)]
    #[case::all_todo(Some(vec![phase(PhaseStatus::ToDo), phase(PhaseStatus::ToDo)]), Some(0.0))]
    #[case::half(Some(vec![phase(PhaseStatus::Completed), phase(PhaseStatus::ToDo)]), Some(0.5))]
    #[case::all_done(Some(vec![phase(PhaseStatus::Completed)]), Some(1.0))]
    fn progress_is_completed_over_total(
        #[case] phases: Option<Vec<Phase>>,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(project(phases).progress(), expected);
    }

    #[test]
    fn missing_optional_fields_deserialize_to_defaults() {
        let json = format!(
            r#"{{ "id": "{}", "name": "n", "description": "d" }}"#,
            ProjectId::from_ulid(Ulid::new())
        );
        let p: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(p.status, ProjectStatus::NotStarted);
        assert!(p.start_date.is_none());
        assert!(p.phases.is_none());
        assert!(p.assigned_to.is_empty());
    }
}
