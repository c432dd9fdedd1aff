//! Core data model types for quizbuilder.
//!
//! These are the fundamental types the entire system uses to represent
//! quizzes, questions, submitted answers, attempt results, and accounts.
//! Wire names are camelCase so data exported by older deployments imports
//! cleanly.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// The question format governing a quiz's entire question set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum QuizCategory {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Matching,
}

impl QuizCategory {
    pub const ALL: [QuizCategory; 4] = [
        QuizCategory::MultipleChoice,
        QuizCategory::TrueFalse,
        QuizCategory::ShortAnswer,
        QuizCategory::Matching,
    ];

    /// Human-readable label (hyphen replaced by a space).
    pub fn label(&self) -> &'static str {
        match self {
            QuizCategory::MultipleChoice => "multiple choice",
            QuizCategory::TrueFalse => "true false",
            QuizCategory::ShortAnswer => "short answer",
            QuizCategory::Matching => "matching",
        }
    }
}

impl fmt::Display for QuizCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizCategory::MultipleChoice => write!(f, "multiple-choice"),
            QuizCategory::TrueFalse => write!(f, "true-false"),
            QuizCategory::ShortAnswer => write!(f, "short-answer"),
            QuizCategory::Matching => write!(f, "matching"),
        }
    }
}

impl FromStr for QuizCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiple-choice" => Ok(QuizCategory::MultipleChoice),
            "true-false" => Ok(QuizCategory::TrueFalse),
            "short-answer" => Ok(QuizCategory::ShortAnswer),
            "matching" => Ok(QuizCategory::Matching),
            other => Err(format!("unknown quiz category: {other}")),
        }
    }
}

/// One left/right pair of a matching question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub left: String,
    pub right: String,
}

impl MatchingPair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

fn default_points() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// Accepts a native boolean or the legacy `"true"`/`"false"` strings older
/// exports carry for true/false answer keys.
fn bool_or_legacy_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Bool(value) => Ok(value),
        Raw::Text(text) => match text.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean or \"true\"/\"false\", got \"{other}\""
            ))),
        },
    }
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// The prompt shown to the learner.
    #[serde(rename = "question")]
    pub prompt: String,
    /// Points this question is worth.
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Per-category question payload, discriminated by the wire field `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuestionKind {
    #[serde(rename = "multiple-choice", rename_all = "camelCase")]
    MultipleChoice {
        #[serde(default)]
        options: Vec<String>,
        /// Index into `options`.
        #[serde(default)]
        correct_answer: usize,
    },
    #[serde(rename = "true-false", rename_all = "camelCase")]
    TrueFalse {
        #[serde(default = "default_true", deserialize_with = "bool_or_legacy_string")]
        correct_answer: bool,
    },
    #[serde(rename = "short-answer", rename_all = "camelCase")]
    ShortAnswer {
        /// Expected keyword or phrase. Legacy `options` arrays on the wire
        /// are dropped at parse time.
        #[serde(default)]
        correct_answer: String,
    },
    #[serde(rename = "matching", rename_all = "camelCase")]
    Matching {
        #[serde(default)]
        matching_pairs: Vec<MatchingPair>,
    },
}

impl QuestionKind {
    pub fn category(&self) -> QuizCategory {
        match self {
            QuestionKind::MultipleChoice { .. } => QuizCategory::MultipleChoice,
            QuestionKind::TrueFalse { .. } => QuizCategory::TrueFalse,
            QuestionKind::ShortAnswer { .. } => QuizCategory::ShortAnswer,
            QuestionKind::Matching { .. } => QuizCategory::Matching,
        }
    }
}

impl Question {
    pub fn multiple_choice(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            points: 1,
            kind: QuestionKind::MultipleChoice {
                options,
                correct_answer,
            },
        }
    }

    pub fn true_false(prompt: impl Into<String>, correct_answer: bool) -> Self {
        Self {
            prompt: prompt.into(),
            points: 1,
            kind: QuestionKind::TrueFalse { correct_answer },
        }
    }

    pub fn short_answer(prompt: impl Into<String>, correct_answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            points: 1,
            kind: QuestionKind::ShortAnswer {
                correct_answer: correct_answer.into(),
            },
        }
    }

    pub fn matching(prompt: impl Into<String>, matching_pairs: Vec<MatchingPair>) -> Self {
        Self {
            prompt: prompt.into(),
            points: 1,
            kind: QuestionKind::Matching { matching_pairs },
        }
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }
}

/// A quiz definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: QuizCategory,
    /// Minutes allowed for one attempt; 0 means untimed.
    #[serde(default)]
    pub time_limit: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub created_by: Uuid,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_published: bool,
}

/// A learner's submitted answer for one question, stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Index-as-string (multiple choice), `"true"`/`"false"`, or free text.
    Text(String),
    /// Matching selections: left index (as a string key, the wire form) to
    /// chosen right index; an empty string marks an unassigned row.
    Matches(BTreeMap<String, String>),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            AnswerValue::Matches(_) => None,
        }
    }
}

/// Submitted answers keyed by question index.
pub type AnswerMap = BTreeMap<usize, AnswerValue>;

/// One completed attempt. Records are append-only: attempts accumulate per
/// quiz and user, and "current result" views pick the most recent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quiz_id: Uuid,
    pub quiz_title: String,
    /// Normalized score on the closed 0-10 scale.
    pub score: u8,
    /// Raw points earned; fractional when matching questions score partially.
    pub total_score: f64,
    /// Raw points attainable.
    pub total_points: u32,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub answers: AnswerMap,
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// The signed-in identity persisted under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Bearer token for the optional result collector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            token: None,
        }
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}
