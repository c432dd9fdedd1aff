//! Port definitions for persistence and result submission.
//!
//! These traits are implemented by the `quizbuilder-store` and
//! `quizbuilder-sync` crates respectively.

use async_trait::async_trait;

use crate::model::{QuizResult, Session};

// ---------------------------------------------------------------------------
// Storage port
// ---------------------------------------------------------------------------

/// Key-value persistence port.
///
/// Implementations are synchronous on purpose: the execution model is a
/// single logical thread and every call is atomic at call granularity, so
/// no read-modify-write races are possible across callers.
pub trait StorageBackend: Send + Sync {
    /// Fetch the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Result collector port
// ---------------------------------------------------------------------------

/// Outbound port for the optional result collector endpoint.
#[async_trait]
pub trait ResultSubmitter: Send + Sync {
    /// Collector name used in logs.
    fn name(&self) -> &str;

    /// Push one completed result to the collector.
    async fn submit(&self, session: &Session, result: &QuizResult) -> anyhow::Result<()>;
}

/// Submit a result without letting collector failures interrupt the local
/// flow. Returns whether the collector accepted the record.
pub async fn submit_best_effort(
    submitter: &dyn ResultSubmitter,
    session: &Session,
    result: &QuizResult,
) -> bool {
    match submitter.submit(session, result).await {
        Ok(()) => {
            tracing::debug!(collector = submitter.name(), "result submitted");
            true
        }
        Err(err) => {
            tracing::warn!(
                collector = submitter.name(),
                "result submission failed, keeping local copy only: {err:#}"
            );
            false
        }
    }
}
