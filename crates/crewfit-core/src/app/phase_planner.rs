//! PhasePlanner - 新規 project の phase 分割を oracle に提案させる
//!
//! 結果は返すだけです。project への反映は ProjectService が
//! 直列化された read-compute-write で行います。

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::{Phase, PlanError, Project};
use crate::oracle::response::{RawPhasePlan, decode};
use crate::oracle::{CallFailure, OutputSchema, PhasePlanRequest, ProjectBrief, bounded};
use crate::ports::{IdGenerator, Oracle};

pub struct PhasePlanner {
    oracle: Arc<dyn Oracle>,
    id_gen: Arc<dyn IdGenerator>,
    timeout: Duration,
}

impl PhasePlanner {
    pub fn new(oracle: Arc<dyn Oracle>, id_gen: Arc<dyn IdGenerator>, timeout: Duration) -> Self {
        Self {
            oracle,
            id_gen,
            timeout,
        }
    }

    /// Ask for a phase breakdown of `project`. Every returned phase gets a
    /// fresh id and starts as ToDo; phases without a name are dropped.
    pub async fn plan(&self, project: &Project) -> Result<Vec<Phase>, PlanError> {
        let request = PhasePlanRequest::new(ProjectBrief::from(project));
        let schema = OutputSchema::phase_plan();
        info!(project_id = %project.id, "requesting phase plan");

        let response = bounded(self.timeout, self.oracle.propose_phases(&request, &schema))
            .await
            .map_err(|failure| match failure {
                CallFailure::Unavailable(msg) => PlanError::OracleUnavailable(msg),
                CallFailure::Malformed(msg) => PlanError::OracleResponse(msg),
            })?;

        let raw: RawPhasePlan = decode(&response).map_err(PlanError::OracleResponse)?;

        let phases: Vec<Phase> = raw
            .phases
            .into_iter()
            .filter_map(|p| {
                let name = p.name.trim();
                if name.is_empty() {
                    warn!(project_id = %project.id, "dropping unnamed phase");
                    return None;
                }
                let description = p.description.unwrap_or_default();
                Some(Phase::new(
                    self.id_gen.generate_phase_id(),
                    name,
                    description.trim(),
                ))
            })
            .collect();
        Ok(phases)
    }
}
