//! Collector error types.
//!
//! Defined in `quizbuilder-core` so callers can downcast and classify
//! submission failures for logging decisions without string matching.

use thiserror::Error;

/// Errors that can occur when submitting a result to the collector.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The session carries no API token, so the collector cannot be called.
    #[error("session has no API token")]
    MissingToken,

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The collector returned an error response.
    #[error("collector error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

impl SubmitError {
    /// Returns `true` if retrying with the same session could never succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SubmitError::MissingToken
                | SubmitError::Api {
                    status: 401 | 403,
                    ..
                }
        )
    }
}
