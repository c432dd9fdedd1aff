//! TOML quiz authoring files.
//!
//! Teachers author quizzes as TOML documents with a `[quiz]` header and
//! `[[questions]]` entries. The answer-key field depends on the quiz
//! category: `correct_option` for multiple choice, `answer` for true/false,
//! `expected` for short answer, and `[[questions.pairs]]` for matching.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::model::{MatchingPair, Question, QuestionKind, Quiz, QuizCategory};

/// Intermediate TOML structure for parsing quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    title: String,
    #[serde(default)]
    description: String,
    category: String,
    #[serde(default)]
    time_limit: u32,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    prompt: String,
    #[serde(default = "default_points")]
    points: u32,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_option: Option<usize>,
    #[serde(default)]
    answer: Option<bool>,
    #[serde(default)]
    expected: Option<String>,
    #[serde(default)]
    pairs: Vec<TomlPair>,
}

#[derive(Debug, Deserialize)]
struct TomlPair {
    left: String,
    right: String,
}

fn default_points() -> u32 {
    1
}

/// A parsed, not-yet-owned quiz definition.
#[derive(Debug, Clone)]
pub struct QuizDraft {
    pub title: String,
    pub description: String,
    pub category: QuizCategory,
    pub time_limit: u32,
    pub questions: Vec<Question>,
}

impl QuizDraft {
    /// Attach an owner and mint the stored form. New quizzes always start
    /// unpublished.
    pub fn into_quiz(self, owner: Uuid, now: DateTime<Utc>) -> Quiz {
        Quiz {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            category: self.category,
            time_limit: self.time_limit,
            questions: self.questions,
            created_by: owner,
            created_at: Some(now),
            is_published: false,
        }
    }
}

/// Parse a single TOML file into a `QuizDraft`.
pub fn parse_quiz(path: &Path) -> Result<QuizDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
    parse_quiz_str(&content, path)
}

/// Parse a TOML string into a `QuizDraft` (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<QuizDraft> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let category: QuizCategory = parsed
        .quiz
        .category
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let mut questions = Vec::with_capacity(parsed.questions.len());
    for (number, q) in parsed.questions.into_iter().enumerate() {
        let number = number + 1;
        let kind = match category {
            QuizCategory::MultipleChoice => {
                let Some(correct_answer) = q.correct_option else {
                    bail!("question {number}: multiple-choice needs correct_option");
                };
                QuestionKind::MultipleChoice {
                    options: q.options,
                    correct_answer,
                }
            }
            QuizCategory::TrueFalse => {
                let Some(correct_answer) = q.answer else {
                    bail!("question {number}: true-false needs answer");
                };
                QuestionKind::TrueFalse { correct_answer }
            }
            QuizCategory::ShortAnswer => {
                let Some(correct_answer) = q.expected else {
                    bail!("question {number}: short-answer needs expected");
                };
                QuestionKind::ShortAnswer { correct_answer }
            }
            QuizCategory::Matching => QuestionKind::Matching {
                matching_pairs: q
                    .pairs
                    .into_iter()
                    .map(|pair| MatchingPair::new(pair.left, pair.right))
                    .collect(),
            },
        };
        questions.push(Question {
            prompt: q.prompt,
            points: q.points,
            kind,
        });
    }

    Ok(QuizDraft {
        title: parsed.quiz.title,
        description: parsed.quiz.description,
        category,
        time_limit: parsed.quiz.time_limit,
        questions,
    })
}

/// Authoring problems that make a draft unpublishable. An empty list means
/// the draft is good.
pub fn validate(draft: &QuizDraft) -> Vec<String> {
    let mut issues = Vec::new();
    if draft.title.trim().is_empty() {
        issues.push("quiz title is empty".to_string());
    }
    if draft.questions.is_empty() {
        issues.push("quiz has no questions".to_string());
    }
    for (number, question) in draft.questions.iter().enumerate() {
        let number = number + 1;
        if question.prompt.trim().is_empty() {
            issues.push(format!("question {number}: prompt is empty"));
        }
        match &question.kind {
            QuestionKind::MultipleChoice {
                options,
                correct_answer,
            } => {
                if options.is_empty() {
                    issues.push(format!("question {number}: no options"));
                } else if options.iter().any(|option| option.trim().is_empty()) {
                    issues.push(format!("question {number}: blank option"));
                }
                if *correct_answer >= options.len() {
                    issues.push(format!(
                        "question {number}: correct_option {correct_answer} is out of range"
                    ));
                }
            }
            QuestionKind::TrueFalse { .. } => {}
            QuestionKind::ShortAnswer { correct_answer } => {
                if correct_answer.trim().is_empty() {
                    issues.push(format!("question {number}: expected answer is empty"));
                }
            }
            QuestionKind::Matching { matching_pairs } => {
                if matching_pairs.is_empty() {
                    issues.push(format!("question {number}: no matching pairs"));
                } else if matching_pairs
                    .iter()
                    .any(|pair| pair.left.trim().is_empty() || pair.right.trim().is_empty())
                {
                    issues.push(format!("question {number}: incomplete matching pair"));
                }
            }
        }
    }
    issues
}
