//! ProjectService - EntityStore に対する唯一の書き込み経路
//!
//! # 設計原則
//! - すべての変更は writer lock を取ってから「load_all → 純粋関数で次を計算 → replace_all」
//! - lifecycle / phase のロジックは lifecycle モジュールの total function に任せる
//! - 新規 project の保存後、PhasePlanner を spawn して phase を提案させる
//!   （結果は同じ直列化された経路で、phase がまだ無い場合だけ反映）

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::phase_planner::PhasePlanner;
use crate::domain::{
    NewPerson, Person, PersonId, Phase, PhaseId, Project, ProjectDraft, ProjectId, ProjectStatus,
    StoreError, ValidationError,
};
use crate::lifecycle::{self, PhaseField};
use crate::observability::StatusCounts;
use crate::ports::{Clock, EntityStore, IdGenerator, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What `save` returns: the committed project, plus the phase generation task
/// when one was started.
#[derive(Debug)]
pub struct SavedProject {
    pub project: Project,
    pub phase_generation: Option<PhaseGenerationHandle>,
}

/// Handle to a spawned phase generation.
#[derive(Debug)]
pub struct PhaseGenerationHandle {
    project_id: ProjectId,
    task: JoinHandle<bool>,
}

impl PhaseGenerationHandle {
    /// Wait for the generation to finish. `true` if phases were attached.
    pub async fn join(self) -> bool {
        match self.task.await {
            Ok(attached) => attached,
            Err(e) => {
                warn!(project_id = %self.project_id, error = %e, "phase generation task aborted");
                false
            }
        }
    }
}

/// Serialized read-compute-write over the store. Cloned into spawned tasks.
#[derive(Clone)]
struct Writer {
    store: Arc<dyn EntityStore>,
    lock: Arc<Mutex<()>>,
}

impl Writer {
    async fn update<T, F>(&self, compute: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Snapshot) -> Result<T, ServiceError> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.store.load_all().await?;
        let out = compute(&mut snapshot)?;
        self.store.replace_all(snapshot).await?;
        Ok(out)
    }

    async fn update_project<F>(&self, id: ProjectId, change: F) -> Result<Project, ServiceError>
    where
        F: FnOnce(Project) -> Project + Send,
    {
        self.update(|snapshot| {
            let current = snapshot
                .project(id)
                .cloned()
                .ok_or(ServiceError::ProjectNotFound(id))?;
            let next = change(current);
            snapshot.replace_project(next.clone());
            Ok(next)
        })
        .await
    }

    /// Attach generated phases if the project still exists and has none.
    async fn attach_phases(
        &self,
        id: ProjectId,
        phases: Vec<Phase>,
    ) -> Result<bool, ServiceError> {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.store.load_all().await?;
        let Some(current) = snapshot.project(id) else {
            debug!(project_id = %id, "project gone before phases arrived");
            return Ok(false);
        };
        if current.has_phases() {
            debug!(project_id = %id, "project already has phases; keeping them");
            return Ok(false);
        }
        let mut next = current.clone();
        next.phases = Some(phases);
        snapshot.replace_project(next);
        self.store.replace_all(snapshot).await?;
        Ok(true)
    }
}

pub struct ProjectService {
    writer: Writer,
    clock: Arc<dyn Clock>,
    id_gen: Arc<dyn IdGenerator>,
    planner: Option<Arc<PhasePlanner>>,
}

impl ProjectService {
    pub fn new(
        store: Arc<dyn EntityStore>,
        clock: Arc<dyn Clock>,
        id_gen: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            writer: Writer {
                store,
                lock: Arc::new(Mutex::new(())),
            },
            clock,
            id_gen,
            planner: None,
        }
    }

    /// Generate phases for every newly created project.
    pub fn with_phase_planner(mut self, planner: Arc<PhasePlanner>) -> Self {
        self.planner = Some(planner);
        self
    }

    pub async fn people(&self) -> Result<Vec<Person>, ServiceError> {
        Ok(self.writer.store.load_all().await?.people)
    }

    pub async fn projects(&self) -> Result<Vec<Project>, ServiceError> {
        Ok(self.writer.store.load_all().await?.projects)
    }

    pub async fn project(&self, id: ProjectId) -> Result<Project, ServiceError> {
        self.writer
            .store
            .load_all()
            .await?
            .project(id)
            .cloned()
            .ok_or(ServiceError::ProjectNotFound(id))
    }

    pub async fn status_counts(&self) -> Result<StatusCounts, ServiceError> {
        let snapshot = self.writer.store.load_all().await?;
        Ok(StatusCounts::tally(&snapshot.projects))
    }

    pub async fn add_person(&self, new_person: NewPerson) -> Result<Person, ServiceError> {
        let mut missing = Vec::new();
        if new_person.name.trim().is_empty() {
            missing.push("name");
        }
        if new_person.role.trim().is_empty() {
            missing.push("role");
        }
        if !missing.is_empty() {
            return Err(ValidationError::missing(missing).into());
        }

        let person = new_person.into_person(self.id_gen.generate_person_id());

        let added = person.clone();
        self.writer
            .update(move |snapshot| {
                snapshot.people.push(added);
                Ok(())
            })
            .await?;
        info!(person_id = %person.id, name = %person.name, "person added");
        Ok(person)
    }

    /// Commit an edit buffer.
    ///
    /// A draft without id creates a project (and, with a planner configured,
    /// starts phase generation); a draft with id replaces that project.
    pub async fn save(&self, draft: ProjectDraft) -> Result<SavedProject, ServiceError> {
        draft.validate()?;
        let now = self.clock.now();
        let is_new = draft.is_new();
        let new_id = draft.id.unwrap_or_else(|| self.id_gen.generate_project_id());

        let project = self
            .writer
            .update(move |snapshot| {
                let existing = if is_new {
                    None
                } else {
                    Some(
                        snapshot
                            .project(new_id)
                            .ok_or(ServiceError::ProjectNotFound(new_id))?,
                    )
                };
                let project = lifecycle::commit_draft(existing, draft, new_id, now);
                if !snapshot.replace_project(project.clone()) {
                    snapshot.projects.push(project.clone());
                }
                Ok(project)
            })
            .await?;
        info!(
            project_id = %project.id,
            status = %project.status,
            created = is_new,
            "project saved"
        );

        let phase_generation = match &self.planner {
            Some(planner) if is_new && !project.has_phases() => {
                Some(self.spawn_phase_generation(planner.clone(), project.clone()))
            }
            _ => None,
        };

        Ok(SavedProject {
            project,
            phase_generation,
        })
    }

    pub async fn change_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
    ) -> Result<Project, ServiceError> {
        let now = self.clock.now();
        let project = self
            .writer
            .update_project(id, move |p| lifecycle::apply_status_change(p, status, now))
            .await?;
        info!(project_id = %id, status = %status, "project status changed");
        Ok(project)
    }

    pub async fn edit_phase(
        &self,
        id: ProjectId,
        phase_id: PhaseId,
        field: PhaseField,
        value: impl Into<String>,
    ) -> Result<Project, ServiceError> {
        let value = value.into();
        self.writer
            .update_project(id, move |p| lifecycle::edit_phase(p, phase_id, field, value))
            .await
    }

    pub async fn toggle_phase(
        &self,
        id: ProjectId,
        phase_id: PhaseId,
    ) -> Result<Project, ServiceError> {
        self.writer
            .update_project(id, move |p| lifecycle::toggle_phase(p, phase_id))
            .await
    }

    pub async fn select_candidate(
        &self,
        id: ProjectId,
        person_id: PersonId,
    ) -> Result<Project, ServiceError> {
        let project = self
            .writer
            .update_project(id, move |p| lifecycle::select_candidate(p, person_id))
            .await?;
        info!(project_id = %id, person_id = %person_id, "candidate assigned");
        Ok(project)
    }

    fn spawn_phase_generation(
        &self,
        planner: Arc<PhasePlanner>,
        project: Project,
    ) -> PhaseGenerationHandle {
        let writer = self.writer.clone();
        let project_id = project.id;
        info!(project_id = %project_id, "phase generation requested");

        let task = tokio::spawn(async move {
            let phases = match planner.plan(&project).await {
                Ok(phases) if phases.is_empty() => {
                    info!(project_id = %project_id, "oracle proposed no phases");
                    return false;
                }
                Ok(phases) => phases,
                Err(e) => {
                    warn!(project_id = %project_id, error = %e, "phase generation failed");
                    return false;
                }
            };
            let count = phases.len();
            match writer.attach_phases(project_id, phases).await {
                Ok(attached) => {
                    if attached {
                        info!(
                            project_id = %project_id,
                            phases = count,
                            "generated phases attached"
                        );
                    }
                    attached
                }
                Err(e) => {
                    warn!(
                        project_id = %project_id,
                        error = %e,
                        "could not store generated phases"
                    );
                    false
                }
            }
        });

        PhaseGenerationHandle { project_id, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PhaseStatus;
    use crate::impls::InMemoryEntityStore;
    use crate::ports::{FixedClock, OracleError, UlidGenerator};
    use crate::test_support::ScriptedOracle;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    struct Fixture {
        service: ProjectService,
        clock: FixedClock,
    }

    fn fixture(oracle: Option<Arc<ScriptedOracle>>) -> Fixture {
        let clock = FixedClock::new(t0());
        let id_gen: Arc<dyn IdGenerator> = Arc::new(UlidGenerator::new(clock.clone()));
        let mut service = ProjectService::new(
            Arc::new(InMemoryEntityStore::new()),
            Arc::new(clock.clone()),
            id_gen.clone(),
        );
        if let Some(oracle) = oracle {
            service = service.with_phase_planner(Arc::new(PhasePlanner::new(
                oracle,
                id_gen,
                Duration::from_secs(5),
            )));
        }
        Fixture { service, clock }
    }

    fn site_revamp() -> ProjectDraft {
        ProjectDraft::new()
            .with_name("Site Revamp")
            .with_description("Rebuild the marketing site")
            .with_skills(["React", "Design"])
    }

    fn two_phases() -> serde_json::Value {
        json!({
            "phases": [
                { "name": "Discovery", "description": "Interview stakeholders" },
                { "name": "Build", "description": "Ship it" },
            ]
        })
    }

    #[tokio::test]
    async fn site_revamp_end_to_end() {
        let oracle = Arc::new(ScriptedOracle::new().with_phases(Ok(two_phases().into())));
        let Fixture { service, clock } = fixture(Some(oracle.clone()));

        let saved = service.save(site_revamp()).await.unwrap();
        let id = saved.project.id;
        assert_eq!(saved.project.status, ProjectStatus::NotStarted);
        assert_eq!(saved.project.start_date, None);
        assert!(saved.phase_generation.unwrap().join().await);
        assert_eq!(oracle.schemas(), vec!["phase_plan"]);

        let stored = service.project(id).await.unwrap();
        assert_eq!(stored.phases().len(), 2);
        assert!(stored.phases().iter().all(|p| p.status == PhaseStatus::ToDo));
        assert_eq!(stored.progress(), Some(0.0));

        clock.advance(chrono::Duration::days(1));
        let t1 = clock.now();
        let started = service
            .change_status(id, ProjectStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(started.start_date, Some(t1));
        assert_eq!(started.end_date, None);

        clock.advance(chrono::Duration::days(30));
        let t2 = clock.now();
        let done = service
            .change_status(id, ProjectStatus::Completed)
            .await
            .unwrap();
        assert_eq!(done.start_date, Some(t1));
        assert_eq!(done.end_date, Some(t2));
        assert_eq!(service.project(id).await.unwrap(), done);
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_without_writing() {
        let Fixture { service, .. } = fixture(None);
        let draft = ProjectDraft {
            status: None,
            ..ProjectDraft::new()
        };

        let err = service.save(draft).await.unwrap_err();

        assert_eq!(
            err,
            ServiceError::Validation(ValidationError::missing(vec![
                "name",
                "description",
                "status"
            ]))
        );
        assert!(service.projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resaving_keeps_id_and_dates() {
        let Fixture { service, clock } = fixture(None);
        let saved = service.save(site_revamp()).await.unwrap();
        assert!(saved.phase_generation.is_none());
        let started = service
            .change_status(saved.project.id, ProjectStatus::InProgress)
            .await
            .unwrap();

        clock.advance(chrono::Duration::hours(3));
        let mut draft = ProjectDraft::from(&started);
        draft.description = "Rebuild the marketing site and blog".into();
        let resaved = service.save(draft).await.unwrap();

        assert_eq!(resaved.project.id, started.id);
        assert_eq!(resaved.project.start_date, Some(t0()));
        assert_eq!(service.projects().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn saving_an_unknown_id_is_not_found() {
        let Fixture { service, .. } = fixture(None);
        let mut draft = site_revamp();
        let ghost = ProjectId::from_ulid(ulid::Ulid::new());
        draft.id = Some(ghost);

        assert_eq!(
            service.save(draft).await.unwrap_err(),
            ServiceError::ProjectNotFound(ghost)
        );
    }

    #[tokio::test]
    async fn failed_generation_does_not_fail_the_save() {
        let oracle = Arc::new(
            ScriptedOracle::new().with_phases(Err(OracleError::Unavailable("quota".into()))),
        );
        let Fixture { service, .. } = fixture(Some(oracle));

        let saved = service.save(site_revamp()).await.unwrap();
        let id = saved.project.id;

        assert!(!saved.phase_generation.unwrap().join().await);
        assert!(!service.project(id).await.unwrap().has_phases());
    }

    #[tokio::test]
    async fn late_phases_do_not_overwrite_newer_edits() {
        let gate = Arc::new(Notify::new());
        let oracle = Arc::new(
            ScriptedOracle::new()
                .with_gate(gate.clone())
                .with_phases(Ok(two_phases().into())),
        );
        let Fixture { service, .. } = fixture(Some(oracle));

        let saved = service.save(site_revamp()).await.unwrap();
        let handle = saved.phase_generation.unwrap();

        // user adds their own phase while generation is still pending
        let mut draft = ProjectDraft::from(&saved.project);
        draft.phases = Some(vec![Phase::new(
            PhaseId::from_ulid(ulid::Ulid::new()),
            "Kickoff",
            "Agree on scope",
        )]);
        service.save(draft).await.unwrap();

        gate.notify_one();
        assert!(!handle.join().await);

        let stored = service.project(saved.project.id).await.unwrap();
        assert_eq!(stored.phases().len(), 1);
        assert_eq!(stored.phases()[0].name, "Kickoff");
    }

    #[tokio::test]
    async fn phase_edits_go_through_the_store() {
        let oracle = Arc::new(ScriptedOracle::new().with_phases(Ok(two_phases().into())));
        let Fixture { service, .. } = fixture(Some(oracle));
        let saved = service.save(site_revamp()).await.unwrap();
        let id = saved.project.id;
        saved.phase_generation.unwrap().join().await;
        let phase_id = service.project(id).await.unwrap().phases()[0].id;

        service
            .edit_phase(id, phase_id, PhaseField::Name, "Research")
            .await
            .unwrap();
        let toggled = service.toggle_phase(id, phase_id).await.unwrap();

        assert_eq!(toggled.phases()[0].name, "Research");
        assert_eq!(toggled.phases()[0].status, PhaseStatus::Completed);
        assert_eq!(toggled.progress(), Some(0.5));
        assert_eq!(service.project(id).await.unwrap(), toggled);
    }

    #[tokio::test]
    async fn add_person_requires_name_and_role() {
        let Fixture { service, .. } = fixture(None);

        let err = service
            .add_person(NewPerson::new("  ", ""))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Validation(ValidationError::missing(vec!["name", "role"]))
        );

        let ada = service
            .add_person(NewPerson::new(" Ada ", "Engineer").with_skills(["Rust", "Rust"]))
            .await
            .unwrap();
        assert_eq!(ada.name, "Ada");
        assert_eq!(ada.skills, vec!["Rust"]);
        assert_eq!(service.people().await.unwrap(), vec![ada]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_assignments_are_not_lost() {
        let Fixture { service, .. } = fixture(None);
        let service = Arc::new(service);
        let id = service.save(site_revamp()).await.unwrap().project.id;

        let people: Vec<PersonId> = (0..16)
            .map(|_| PersonId::from_ulid(ulid::Ulid::new()))
            .collect();
        let tasks: Vec<_> = people
            .iter()
            .map(|&person_id| {
                let service = service.clone();
                tokio::spawn(async move { service.select_candidate(id, person_id).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = service.project(id).await.unwrap();
        assert_eq!(stored.assigned_to.len(), people.len());
        assert!(people.iter().all(|p| stored.is_assigned(*p)));
    }

    #[tokio::test]
    async fn status_counts_reflect_the_store() {
        let Fixture { service, .. } = fixture(None);
        let a = service.save(site_revamp()).await.unwrap().project.id;
        service.save(site_revamp().with_name("Other")).await.unwrap();
        service.change_status(a, ProjectStatus::Completed).await.unwrap();

        let counts = service.status_counts().await.unwrap();
        assert_eq!(counts.not_started, 1);
        assert_eq!(counts.completed, 1);
    }

    struct BrokenStore;

    #[async_trait]
    impl EntityStore for BrokenStore {
        async fn load_all(&self) -> Result<Snapshot, StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }

        async fn replace_all(&self, _snapshot: Snapshot) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
    }

    #[tokio::test]
    async fn store_failures_surface_as_store_errors() {
        let clock = FixedClock::new(t0());
        let service = ProjectService::new(
            Arc::new(BrokenStore),
            Arc::new(clock.clone()),
            Arc::new(UlidGenerator::new(clock)),
        );

        assert_eq!(
            service.save(site_revamp()).await.unwrap_err(),
            ServiceError::Store(StoreError::Unavailable("disk gone".into()))
        );
        assert!(matches!(
            service.projects().await.unwrap_err(),
            ServiceError::Store(_)
        ));
    }
}
