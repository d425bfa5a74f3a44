//! Test doubles shared by the unit tests.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

use crate::oracle::{EncodedDocument, OutputSchema, PhasePlanRequest, ScoringRequest};
use crate::ports::{Oracle, OracleError, StructuredResponse};

type Scripted = Option<Result<StructuredResponse, OracleError>>;

/// Oracle that replays canned responses and counts calls.
#[derive(Default)]
pub(crate) struct ScriptedOracle {
    score: Scripted,
    extract: Scripted,
    phases: Scripted,
    delay: Option<Duration>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
    documents: Mutex<Vec<EncodedDocument>>,
    schemas: Mutex<Vec<&'static str>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(mut self, response: Result<StructuredResponse, OracleError>) -> Self {
        self.score = Some(response);
        self
    }

    pub fn with_extract(mut self, response: Result<StructuredResponse, OracleError>) -> Self {
        self.extract = Some(response);
        self
    }

    pub fn with_phases(mut self, response: Result<StructuredResponse, OracleError>) -> Self {
        self.phases = Some(response);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Hold every call until the gate is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn documents(&self) -> Vec<EncodedDocument> {
        self.documents.lock().unwrap().clone()
    }

    pub fn schemas(&self) -> Vec<&'static str> {
        self.schemas.lock().unwrap().clone()
    }

    async fn reply(
        &self,
        scripted: &Scripted,
        schema: &OutputSchema,
    ) -> Result<StructuredResponse, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.schemas.lock().unwrap().push(schema.name());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        scripted
            .clone()
            .unwrap_or_else(|| Err(OracleError::Unavailable("no scripted response".into())))
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn score(
        &self,
        _request: &ScoringRequest,
        schema: &OutputSchema,
    ) -> Result<StructuredResponse, OracleError> {
        self.reply(&self.score, schema).await
    }

    async fn extract(
        &self,
        document: &EncodedDocument,
        schema: &OutputSchema,
    ) -> Result<StructuredResponse, OracleError> {
        self.documents.lock().unwrap().push(document.clone());
        self.reply(&self.extract, schema).await
    }

    async fn propose_phases(
        &self,
        _request: &PhasePlanRequest,
        schema: &OutputSchema,
    ) -> Result<StructuredResponse, OracleError> {
        self.reply(&self.phases, schema).await
    }
}
