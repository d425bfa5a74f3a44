//! EditSession - 1 つの project の編集バッファと in-flight 状態
//!
//! # 並行性
//! - matching / extraction はそれぞれ同時に 1 件まで（2 件目は `Busy`）
//! - in-flight フラグは guard で解放するので、エラーでも残らない
//! - バッファの lock は oracle を待っている間は持たない
//! - `close` 後に届いた結果は `Delivery::Discarded` になり、バッファには触れない
//!
//! 失敗した要求はバッファを変更しません。

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::app::extraction::ExtractionOrchestrator;
use crate::app::matching::MatchingOrchestrator;
use crate::app::service::{ProjectService, SavedProject, ServiceError};
use crate::domain::{
    ExtractionError, ExtractionResult, MatchError, MatchResult, Person, PersonId, ProjectDraft,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Matching,
    Extraction,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Matching => f.write_str("matching"),
            RequestKind::Extraction => f.write_str("extraction"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a {0} request is already in flight")]
    Busy(RequestKind),

    #[error("edit session is closed")]
    Closed,

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Outcome of a request that completed.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery<T> {
    /// Result handed back to the caller; the buffer is untouched.
    Ready(T),
    /// Result already merged into the buffer.
    Applied(T),
    /// The session closed while the request was in flight.
    Discarded,
}

struct Buffer {
    draft: ProjectDraft,
    open: bool,
}

/// Clears the in-flight flag on drop.
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, kind: RequestKind) -> Result<Self, SessionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self { flag })
            .map_err(|_| SessionError::Busy(kind))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct EditSession {
    buffer: Mutex<Buffer>,
    matching: AtomicBool,
    extracting: AtomicBool,
    matcher: Arc<MatchingOrchestrator>,
    extractor: Arc<ExtractionOrchestrator>,
}

impl EditSession {
    pub fn new(
        draft: ProjectDraft,
        matcher: Arc<MatchingOrchestrator>,
        extractor: Arc<ExtractionOrchestrator>,
    ) -> Self {
        Self {
            buffer: Mutex::new(Buffer { draft, open: true }),
            matching: AtomicBool::new(false),
            extracting: AtomicBool::new(false),
            matcher,
            extractor,
        }
    }

    pub async fn draft(&self) -> ProjectDraft {
        self.buffer.lock().await.draft.clone()
    }

    pub async fn update_draft<F>(&self, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut ProjectDraft),
    {
        let mut buffer = self.buffer.lock().await;
        if !buffer.open {
            return Err(SessionError::Closed);
        }
        edit(&mut buffer.draft);
        Ok(())
    }

    /// Accept a suggested candidate into the buffer. Idempotent.
    pub async fn select_candidate(&self, person_id: PersonId) -> Result<(), SessionError> {
        self.update_draft(|draft| draft.select_candidate(person_id)).await
    }

    pub fn is_matching(&self) -> bool {
        self.matching.load(Ordering::Acquire)
    }

    pub fn is_extracting(&self) -> bool {
        self.extracting.load(Ordering::Acquire)
    }

    pub async fn is_open(&self) -> bool {
        self.buffer.lock().await.open
    }

    /// Abandon the session. Results still in flight will be discarded.
    pub async fn close(&self) {
        self.buffer.lock().await.open = false;
    }

    /// Commit the buffer. After the first save the buffer carries the new id,
    /// so later saves update the same project.
    pub async fn save(&self, service: &ProjectService) -> Result<SavedProject, SessionError> {
        let draft = self.open_draft().await?;
        let saved = service.save(draft).await?;
        let mut buffer = self.buffer.lock().await;
        if buffer.open {
            buffer.draft.id = Some(saved.project.id);
        }
        Ok(saved)
    }

    /// Rank `candidates` for the current buffer. The result is returned, not
    /// applied; accepting a match goes through `select_candidate`.
    pub async fn request_matches(
        &self,
        candidates: &[Person],
        top_n: usize,
    ) -> Result<Delivery<MatchResult>, SessionError> {
        let _in_flight = InFlight::acquire(&self.matching, RequestKind::Matching)?;
        let draft = self.open_draft().await?;

        let outcome = self.matcher.find_matches(&draft, candidates, top_n).await;

        if !self.is_open().await {
            debug!("session closed; discarding match result");
            return Ok(Delivery::Discarded);
        }
        Ok(Delivery::Ready(outcome?))
    }

    /// Extract fields from a document and merge them into the buffer.
    pub async fn request_extraction(
        &self,
        file_bytes: &[u8],
        mime_type: &str,
    ) -> Result<Delivery<ExtractionResult>, SessionError> {
        let _in_flight = InFlight::acquire(&self.extracting, RequestKind::Extraction)?;
        self.open_draft().await?;

        let outcome = self
            .extractor
            .extract_from_document(file_bytes, mime_type)
            .await;
        self.apply_extraction(outcome).await
    }

    pub async fn request_extraction_from_file(
        &self,
        path: impl AsRef<Path>,
        mime_type: &str,
    ) -> Result<Delivery<ExtractionResult>, SessionError> {
        let _in_flight = InFlight::acquire(&self.extracting, RequestKind::Extraction)?;
        self.open_draft().await?;

        let outcome = self.extractor.extract_from_file(path, mime_type).await;
        self.apply_extraction(outcome).await
    }

    async fn apply_extraction(
        &self,
        outcome: Result<ExtractionResult, ExtractionError>,
    ) -> Result<Delivery<ExtractionResult>, SessionError> {
        let mut buffer = self.buffer.lock().await;
        if !buffer.open {
            debug!("session closed; discarding extraction result");
            return Ok(Delivery::Discarded);
        }
        let result = outcome?;
        result.merge_into(&mut buffer.draft);
        Ok(Delivery::Applied(result))
    }

    async fn open_draft(&self) -> Result<ProjectDraft, SessionError> {
        let buffer = self.buffer.lock().await;
        if !buffer.open {
            return Err(SessionError::Closed);
        }
        Ok(buffer.draft.clone())
    }
}
