//! quizbuilder-sync — best-effort result submission.
//!
//! Implements the `ResultSubmitter` port with an HTTP client that POSTs a
//! completed result to an external collector. The collector is optional:
//! callers are expected to go through `submit_best_effort` and fall back to
//! local persistence when anything fails.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use quizbuilder_core::error::SubmitError;
use quizbuilder_core::model::{AnswerMap, QuizResult, Session};
use quizbuilder_core::traits::ResultSubmitter;

/// The collector the original deployment shipped with.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP implementation of the result collector port.
pub struct HttpResultSubmitter {
    base_url: String,
    client: reqwest::Client,
}

impl HttpResultSubmitter {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");
        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

impl Default for HttpResultSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Wire body for the collector. The collector derives the submitting user
/// from the bearer token, so no user id travels in the payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBody<'a> {
    quiz_id: Uuid,
    answers: &'a AnswerMap,
    score: u8,
    total_score: f64,
    total_points: u32,
}

#[derive(Deserialize)]
struct CollectorError {
    message: String,
}

#[async_trait]
impl ResultSubmitter for HttpResultSubmitter {
    fn name(&self) -> &str {
        "http-collector"
    }

    #[instrument(skip(self, session, result), fields(quiz_id = %result.quiz_id))]
    async fn submit(&self, session: &Session, result: &QuizResult) -> anyhow::Result<()> {
        let Some(token) = session.token.as_deref() else {
            return Err(SubmitError::MissingToken.into());
        };

        let body = SubmitBody {
            quiz_id: result.quiz_id,
            answers: &result.answers,
            score: result.score,
            total_score: result.total_score,
            total_points: result.total_points,
        };

        let response = self
            .client
            .post(format!("{}/api/quiz-results", self.base_url))
            .bearer_auth(token)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SubmitError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    SubmitError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<CollectorError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(SubmitError::Api { status, message }.into());
        }

        Ok(())
    }
}
