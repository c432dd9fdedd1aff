//! Quiz import/export exchange format.
//!
//! Exports are a human-pasteable JSON array of quiz definitions with the
//! owner stripped and export metadata stamped on each entry. Imports
//! validate per quiz and accumulate successes and failures instead of
//! failing the whole batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::migrate::align_quiz;
use crate::model::{Question, Quiz, QuizCategory};

/// Version stamped on every exported quiz.
pub const EXPORT_VERSION: &str = "1.0";

/// A quiz as it appears in an export payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedQuiz {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: QuizCategory,
    #[serde(default)]
    pub time_limit: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub is_published: bool,
    pub exported_at: DateTime<Utc>,
    pub export_version: String,
}

/// Serialize the selected quizzes for sharing. Owner attribution is
/// stripped; everything else travels as stored.
pub fn export_quizzes(
    quizzes: &[Quiz],
    selected: &[Uuid],
    exported_at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    let payload: Vec<ExportedQuiz> = quizzes
        .iter()
        .filter(|quiz| selected.contains(&quiz.id))
        .map(|quiz| ExportedQuiz {
            id: quiz.id,
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            category: quiz.category,
            time_limit: quiz.time_limit,
            questions: quiz.questions.clone(),
            is_published: quiz.is_published,
            exported_at,
            export_version: EXPORT_VERSION.to_string(),
        })
        .collect();
    serde_json::to_string_pretty(&payload)
}

/// The whole payload was unusable.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid import data format, expected an array of quizzes")]
    NotAnArray,
    #[error("failed to parse import data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One quiz that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub title: String,
    pub reason: String,
}

/// Outcome of one import run.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub imported: Vec<Quiz>,
    pub failures: Vec<ImportFailure>,
}

/// Field subset an incoming quiz must provide. Export metadata and any
/// stale owner attribution are ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingQuiz {
    title: String,
    #[serde(default)]
    description: String,
    category: QuizCategory,
    #[serde(default)]
    time_limit: u32,
    questions: Vec<Question>,
}

/// Import a pasted export payload. Each quiz is validated independently;
/// accepted quizzes get a fresh id, the importer as owner, and start
/// unpublished.
pub fn import_quizzes(
    payload: &str,
    owner: Uuid,
    now: DateTime<Utc>,
) -> Result<ImportOutcome, ImportError> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    let mut outcome = ImportOutcome::default();
    for item in items {
        let title = item
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Unknown Quiz")
            .to_string();
        match serde_json::from_value::<IncomingQuiz>(item) {
            Ok(incoming) if incoming.title.trim().is_empty() => {
                outcome.failures.push(ImportFailure {
                    title,
                    reason: "missing required fields".to_string(),
                });
            }
            Ok(incoming) => {
                let mut quiz = Quiz {
                    id: Uuid::new_v4(),
                    title: incoming.title,
                    description: incoming.description,
                    category: incoming.category,
                    time_limit: incoming.time_limit,
                    questions: incoming.questions,
                    created_by: owner,
                    created_at: Some(now),
                    is_published: false,
                };
                align_quiz(&mut quiz);
                outcome.imported.push(quiz);
            }
            Err(err) => {
                outcome.failures.push(ImportFailure {
                    title,
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok(outcome)
}
