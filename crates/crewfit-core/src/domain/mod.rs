//! Domain model (IDs, people, projects, drafts, match/extraction results, errors).

pub mod draft;
pub mod errors;
pub mod extraction;
pub mod ids;
pub mod matching;
pub mod person;
pub mod project;

pub use draft::ProjectDraft;
pub use errors::{
    ExtractionError, InsufficientInput, MatchError, PlanError, StoreError, ValidationError,
};
pub use extraction::ExtractionResult;
pub use ids::{PersonId, PhaseId, ProjectId};
pub use matching::{BestMatch, MatchResult, MissingSkill, TrainingRecommendation};
pub use person::{NewPerson, Person};
pub use project::{Phase, PhaseProgress, PhaseStatus, Project, ProjectStatus};
