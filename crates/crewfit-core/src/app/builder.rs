//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 省略可能な port には既定の実装を入れる

use std::sync::Arc;
use std::time::Duration;

use crate::app::extraction::ExtractionOrchestrator;
use crate::app::matching::MatchingOrchestrator;
use crate::app::phase_planner::PhasePlanner;
use crate::app::service::{ProjectService, ServiceError};
use crate::app::session::EditSession;
use crate::config::{CrewfitConfig, DEFAULT_TIMEOUT_MS, DEFAULT_TOP_N};
use crate::domain::{ProjectDraft, ProjectId};
use crate::impls::StaticTrainingCatalog;
use crate::ports::{
    Clock, EntityStore, IdGenerator, NoTraining, Oracle, SystemClock, TrainingCatalog,
    UlidGenerator,
};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .store(Arc::new(InMemoryEntityStore::new()))
///     .oracle(Arc::new(GeminiOracle::new_from_config(&config.oracle)?))
///     .with_config(&config)
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - EntityStore と Oracle は必須（無ければ BuildError::MissingPort）
/// - Clock / IdGenerator / TrainingCatalog は省略すると既定の実装
pub struct AppBuilder {
    store: Option<Arc<dyn EntityStore>>,
    oracle: Option<Arc<dyn Oracle>>,
    clock: Option<Arc<dyn Clock>>,
    id_gen: Option<Arc<dyn IdGenerator>>,
    training: Option<Arc<dyn TrainingCatalog>>,
    timeout: Duration,
    top_n: usize,
    generate_phases: bool,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing port: {0}. It must be provided before build().")]
    MissingPort(&'static str),

    #[error("Invalid setting: {0}")]
    InvalidSetting(&'static str),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            oracle: None,
            clock: None,
            id_gen: None,
            training: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            top_n: DEFAULT_TOP_N,
            generate_phases: true,
        }
    }

    pub fn store(mut self, store: Arc<dyn EntityStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn oracle(mut self, oracle: Arc<dyn Oracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, id_gen: Arc<dyn IdGenerator>) -> Self {
        self.id_gen = Some(id_gen);
        self
    }

    pub fn training(mut self, training: Arc<dyn TrainingCatalog>) -> Self {
        self.training = Some(training);
        self
    }

    /// Upper bound for every oracle call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Turn phase generation after the first save on or off.
    pub fn generate_phases(mut self, enabled: bool) -> Self {
        self.generate_phases = enabled;
        self
    }

    /// Timeout, top_n and the training catalog from a loaded config.
    pub fn with_config(self, config: &CrewfitConfig) -> Self {
        let builder = self
            .timeout(config.oracle.timeout())
            .top_n(config.matching.top_n);
        if config.training.is_empty() {
            builder
        } else {
            builder.training(Arc::new(StaticTrainingCatalog::from_map(
                config.training.clone(),
            )))
        }
    }

    /// AppBuilder を構築して App を生成
    ///
    /// # 検証
    /// - store / oracle が設定されているか
    /// - timeout と top_n が 0 でないか
    pub fn build(self) -> Result<App, BuildError> {
        let store = self.store.ok_or(BuildError::MissingPort("entity store"))?;
        let oracle = self.oracle.ok_or(BuildError::MissingPort("oracle"))?;
        if self.timeout.is_zero() {
            return Err(BuildError::InvalidSetting("timeout must be greater than zero"));
        }
        if self.top_n == 0 {
            return Err(BuildError::InvalidSetting("top_n must be greater than zero"));
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let id_gen = self
            .id_gen
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(clock.clone())));
        let training = self.training.unwrap_or_else(|| Arc::new(NoTraining));

        let mut service = ProjectService::new(store, clock, id_gen.clone());
        if self.generate_phases {
            service = service.with_phase_planner(Arc::new(PhasePlanner::new(
                oracle.clone(),
                id_gen,
                self.timeout,
            )));
        }

        Ok(App {
            service: Arc::new(service),
            matching: Arc::new(MatchingOrchestrator::new(
                oracle.clone(),
                training,
                self.timeout,
            )),
            extraction: Arc::new(ExtractionOrchestrator::new(oracle, self.timeout)),
            top_n: self.top_n,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App は配線済みの service と orchestrator のひとそろい
pub struct App {
    pub service: Arc<ProjectService>,
    pub matching: Arc<MatchingOrchestrator>,
    pub extraction: Arc<ExtractionOrchestrator>,
    /// Default number of matches to ask for.
    pub top_n: usize,
}

impl App {
    /// Edit session for a brand-new project.
    pub fn new_session(&self) -> EditSession {
        self.session_for(ProjectDraft::new())
    }

    /// Edit session seeded from a stored project.
    pub async fn edit_session(&self, id: ProjectId) -> Result<EditSession, ServiceError> {
        let project = self.service.project(id).await?;
        Ok(self.session_for(ProjectDraft::from(&project)))
    }

    fn session_for(&self, draft: ProjectDraft) -> EditSession {
        EditSession::new(draft, self.matching.clone(), self.extraction.clone())
    }
}
