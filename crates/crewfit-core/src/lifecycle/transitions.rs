//! Lifecycle engine: status changes and the dates derived from them.
//!
//! Pure functions over a single project. No transition is forbidden; the
//! previous status only decides which dates get filled in. Both dates are
//! set-if-absent and are never cleared here.

use chrono::{DateTime, Utc};

use crate::domain::{PersonId, Project, ProjectDraft, ProjectId, ProjectStatus};

/// Change the status of a stored project.
///
/// The project's current status is taken as the previous persisted status.
pub fn apply_status_change(
    mut project: Project,
    new_status: ProjectStatus,
    now: DateTime<Utc>,
) -> Project {
    let previous = project.status;
    project.status = new_status;
    derive_dates(&mut project, previous, now);
    project
}

/// Fill in `start_date` / `end_date` for a project whose status just went
/// from `previous` to `project.status`.
pub fn derive_dates(project: &mut Project, previous: ProjectStatus, now: DateTime<Utc>) {
    match project.status {
        ProjectStatus::InProgress => {
            if previous == ProjectStatus::NotStarted && project.start_date.is_none() {
                project.start_date = Some(now);
            }
        }
        ProjectStatus::Completed => {
            if project.end_date.is_none() {
                project.end_date = Some(now);
                if project.start_date.is_none() {
                    project.start_date = Some(now);
                }
            }
        }
        ProjectStatus::NotStarted => {}
    }
}

/// Build the project that a save of `draft` produces.
///
/// `existing` is the stored version (`None` for a first save, in which case
/// the previous status is taken to be NotStarted). Stored dates are carried
/// over and then re-derived; stored phases are kept unless the draft carries
/// its own. The caller validates the draft first; a draft without status keeps
/// the previous one.
pub fn commit_draft(
    existing: Option<&Project>,
    draft: ProjectDraft,
    id: ProjectId,
    now: DateTime<Utc>,
) -> Project {
    let previous = existing.map_or(ProjectStatus::NotStarted, |p| p.status);
    let mut project = Project {
        id,
        name: draft.name.trim().to_string(),
        description: draft.description.trim().to_string(),
        status: draft.status.unwrap_or(previous),
        skills: crate::domain::person::dedup_tags(draft.skills),
        assigned_to: dedup_ids(draft.assigned_to),
        start_date: existing.and_then(|p| p.start_date),
        end_date: existing.and_then(|p| p.end_date),
        phases: draft.phases.or_else(|| existing.and_then(|p| p.phases.clone())),
    };
    derive_dates(&mut project, previous, now);
    project
}

/// Add `person_id` to the project's assignments unless already present.
pub fn select_candidate(mut project: Project, person_id: PersonId) -> Project {
    if !project.is_assigned(person_id) {
        project.assigned_to.push(person_id);
    }
    project
}

fn dedup_ids(ids: Vec<PersonId>) -> Vec<PersonId> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;
    use ulid::Ulid;

    const ALL: [ProjectStatus; 3] = [
        ProjectStatus::NotStarted,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
    ];

    fn t(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn fresh() -> Project {
        commit_draft(
            None,
            ProjectDraft::new().with_name("Site Revamp").with_description("..."),
            ProjectId::from_ulid(Ulid::new()),
            t(0),
        )
    }

    #[test]
    fn first_save_of_not_started_sets_no_dates() {
        let p = fresh();
        assert_eq!(p.status, ProjectStatus::NotStarted);
        assert!(p.start_date.is_none());
        assert!(p.end_date.is_none());
    }

    #[test]
    fn entering_in_progress_sets_start_date() {
        let p = apply_status_change(fresh(), ProjectStatus::InProgress, t(1));
        assert_eq!(p.start_date, Some(t(1)));
        assert!(p.end_date.is_none());
    }

    #[test]
    fn jump_to_completed_sets_both_dates_to_same_instant() {
        let p = apply_status_change(fresh(), ProjectStatus::Completed, t(5));
        assert_eq!(p.start_date, Some(t(5)));
        assert_eq!(p.end_date, Some(t(5)));
    }

    #[test]
    fn completing_after_start_keeps_start_date() {
        let p = apply_status_change(fresh(), ProjectStatus::InProgress, t(1));
        let p = apply_status_change(p, ProjectStatus::Completed, t(2));
        assert_eq!(p.start_date, Some(t(1)));
        assert_eq!(p.end_date, Some(t(2)));
    }

    #[test]
    fn reopening_never_clears_dates() {
        let p = apply_status_change(fresh(), ProjectStatus::Completed, t(1));
        let p = apply_status_change(p, ProjectStatus::InProgress, t(2));
        let p = apply_status_change(p, ProjectStatus::NotStarted, t(3));
        assert_eq!(p.start_date, Some(t(1)));
        assert_eq!(p.end_date, Some(t(1)));
    }

    #[rstest]
    #[case::first_save_in_progress(ProjectStatus::InProgress, true, false)]
    #[case::first_save_completed(ProjectStatus::Completed, true, true)]
    #[case::first_save_not_started(ProjectStatus::NotStarted, false, false)]
    fn first_save_assumes_not_started_as_previous(
        #[case] status: ProjectStatus,
        #[case] has_start: bool,
        #[case] has_end: bool,
    ) {
        let p = commit_draft(
            None,
            ProjectDraft::new()
                .with_name("n")
                .with_description("d")
                .with_status(status),
            ProjectId::from_ulid(Ulid::new()),
            t(0),
        );
        assert_eq!(p.start_date.is_some(), has_start);
        assert_eq!(p.end_date.is_some(), has_end);
    }

    #[test]
    fn save_uses_stored_status_as_previous() {
        // stored as InProgress without a start date (e.g. imported data):
        // re-saving as InProgress must not invent one
        let mut stored = fresh();
        stored.status = ProjectStatus::InProgress;
        let draft = ProjectDraft::from(&stored);

        let saved = commit_draft(Some(&stored), draft, stored.id, t(9));
        assert!(saved.start_date.is_none());
    }

    #[test]
    fn save_keeps_stored_phases_when_draft_has_none() {
        let mut stored = fresh();
        stored.phases = Some(vec![crate::domain::Phase::new(
            crate::domain::PhaseId::from_ulid(Ulid::new()),
            "Discovery",
            "",
        )]);
        let mut draft = ProjectDraft::from(&stored);
        draft.phases = None;
        draft.name = "Renamed".into();

        let saved = commit_draft(Some(&stored), draft, stored.id, t(1));
        assert_eq!(saved.name, "Renamed");
        assert_eq!(saved.phases, stored.phases);
    }

    /// Every sequence of four status changes keeps the date invariants.
    #[test]
    fn date_invariants_hold_for_every_short_sequence() {
        for a in ALL {
            for b in ALL {
                for c in ALL {
                    for d in ALL {
                        let mut p = fresh();
                        let mut first_start = None;
                        let mut reached_completed = false;
                        for (step, status) in [a, b, c, d].into_iter().enumerate() {
                            p = apply_status_change(p, status, t(step as i64 + 1));
                            reached_completed |= status == ProjectStatus::Completed;

                            if let Some(start) = first_start {
                                assert_eq!(p.start_date, Some(start), "start_date moved");
                            } else {
                                first_start = p.start_date;
                            }
                            assert_eq!(p.end_date.is_some(), reached_completed);
                            if p.start_date.is_none() {
                                assert!(
                                    [a, b, c, d][..=step]
                                        .iter()
                                        .all(|s| *s == ProjectStatus::NotStarted)
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn select_candidate_is_idempotent() {
        let person = PersonId::from_ulid(Ulid::new());
        let p = select_candidate(fresh(), person);
        let p = select_candidate(p, person);
        assert_eq!(p.assigned_to, vec![person]);
    }
}
