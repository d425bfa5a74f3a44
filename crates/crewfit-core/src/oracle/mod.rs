//! Oracle contract: request payloads, output schemas, typed responses.
//!
//! The `Oracle` trait itself lives in `ports::oracle`; this module holds what
//! goes over the wire and how the orchestrators bound each call.

pub mod request;
pub(crate) mod response;
pub mod schema;

pub use request::{
    CandidateProfile, EncodedDocument, PhasePlanRequest, ProjectBrief, ScoringRequest,
};
pub use schema::OutputSchema;

use std::future::Future;
use std::time::Duration;

use crate::ports::{OracleError, StructuredResponse};

/// Why a bounded oracle call produced no usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CallFailure {
    /// Transport, availability, or timeout. Worth retrying.
    Unavailable(String),

    /// The provider answered with something that is not a response.
    Malformed(String),
}

/// Await an oracle call for at most `timeout`.
pub(crate) async fn bounded<F>(
    timeout: Duration,
    call: F,
) -> Result<StructuredResponse, CallFailure>
where
    F: Future<Output = Result<StructuredResponse, OracleError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(OracleError::Transport(msg))) | Ok(Err(OracleError::Unavailable(msg))) => {
            Err(CallFailure::Unavailable(msg))
        }
        Ok(Err(OracleError::Protocol(msg))) => Err(CallFailure::Malformed(msg)),
        Err(_) => Err(CallFailure::Unavailable(format!(
            "no response within {} ms",
            timeout.as_millis()
        ))),
    }
}
