//! Observability - tracing の初期化と一覧用の集計
//!
//! - `init_tracing`: `RUST_LOG` があればそれを優先、なければ verbose で切り替え
//! - `StatusCounts`: project の status 別件数（ダッシュボード表示用）

use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::{Project, ProjectStatus};

/// Install the global fmt subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("crewfit_core=debug,crewfit=debug,info")
            } else {
                EnvFilter::try_new("crewfit_core=info,crewfit=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_thread_ids(false)
                .with_line_number(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn tally<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Self {
        projects
            .into_iter()
            .fold(Self::default(), |mut counts, project| {
                match project.status {
                    ProjectStatus::NotStarted => counts.not_started += 1,
                    ProjectStatus::InProgress => counts.in_progress += 1,
                    ProjectStatus::Completed => counts.completed += 1,
                }
                counts
            })
    }

    pub fn total(&self) -> usize {
        self.not_started + self.in_progress + self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectId;
    use ulid::Ulid;

    fn project(status: ProjectStatus) -> Project {
        Project {
            id: ProjectId::from_ulid(Ulid::new()),
            name: "p".into(),
            description: "d".into(),
            status,
            skills: vec![],
            assigned_to: vec![],
            start_date: None,
            end_date: None,
            phases: None,
        }
    }

    #[test]
    fn tally_counts_each_status() {
        let projects = vec![
            project(ProjectStatus::InProgress),
            project(ProjectStatus::Completed),
            project(ProjectStatus::InProgress),
        ];
        let counts = StatusCounts::tally(&projects);
        assert_eq!(
            counts,
            StatusCounts {
                not_started: 0,
                in_progress: 2,
                completed: 1
            }
        );
        assert_eq!(counts.total(), 3);
    }
}
