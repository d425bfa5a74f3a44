//! Phase manager: per-phase edits on a project.
//!
//! Phases are never reordered or removed here. An unknown phase id leaves the
//! project untouched.

use serde::{Deserialize, Serialize};

use crate::domain::{PhaseId, Project};

/// Editable text fields of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseField {
    Name,
    Description,
}

pub fn edit_phase(
    mut project: Project,
    phase_id: PhaseId,
    field: PhaseField,
    value: impl Into<String>,
) -> Project {
    if let Some(phase) = phase_mut(&mut project, phase_id) {
        match field {
            PhaseField::Name => phase.name = value.into(),
            PhaseField::Description => phase.description = value.into(),
        }
    }
    project
}

/// Flip ToDo <-> Completed for one phase.
pub fn toggle_phase(mut project: Project, phase_id: PhaseId) -> Project {
    if let Some(phase) = phase_mut(&mut project, phase_id) {
        phase.status = phase.status.toggled();
    }
    project
}

fn phase_mut(project: &mut Project, phase_id: PhaseId) -> Option<&mut crate::domain::Phase> {
    project
        .phases
        .as_mut()
        .and_then(|phases| phases.iter_mut().find(|p| p.id == phase_id))
}
