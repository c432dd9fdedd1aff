//! Teacher-facing review projection over a stored attempt.
//!
//! Re-derives a per-question verdict and display text from a quiz and one of
//! its stored results. This is a pure projection, not a re-score: it calls
//! the exact correctness predicates the scorer used, so what was scored and
//! what is displayed cannot drift.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, MatchingPair, QuestionKind, Quiz, QuizCategory, QuizResult};
use crate::scoring::{
    choice_is_correct, matching_matches, parse_index, short_answer_matches, true_false_is_correct,
};

/// Placeholder for a question the learner left blank.
pub const NO_ANSWER: &str = "No answer";

/// Placeholder for an answer key the author never filled in.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Re-derived judgement for one reviewed question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Keyword heuristic matched; still subject to teacher confirmation.
    LikelyCorrect,
    /// Keyword heuristic found nothing; grade by hand.
    NeedsReview,
    /// Matching questions score per pair rather than whole.
    Partial { matched: usize, total: usize },
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "Correct"),
            Verdict::Incorrect => write!(f, "Incorrect"),
            Verdict::LikelyCorrect => write!(f, "Likely correct"),
            Verdict::NeedsReview => write!(f, "Needs review"),
            Verdict::Partial { matched, total } => write!(f, "{matched}/{total} matched"),
        }
    }
}

/// One row of the question-by-question analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub index: usize,
    pub prompt: String,
    pub category: QuizCategory,
    pub points: u32,
    /// Display text for the learner's answer.
    pub submitted: String,
    /// Display text for the answer key.
    pub expected: String,
    pub verdict: Verdict,
}

/// Project a stored result into per-question verdicts and display text.
///
/// Pure and idempotent: the same quiz and result always project to the same
/// rows. Answers for indices past the question list are ignored, matching
/// the scorer.
pub fn review_attempt(quiz: &Quiz, result: &QuizResult) -> Vec<QuestionReview> {
    quiz.questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let answer = result.answers.get(&index);
            let (submitted, expected, verdict) = match &question.kind {
                QuestionKind::MultipleChoice {
                    options,
                    correct_answer,
                } => {
                    let text = answer.and_then(AnswerValue::as_text).unwrap_or("");
                    let submitted = selected_option(options, text)
                        .unwrap_or_else(|| NO_ANSWER.to_string());
                    let expected = options
                        .get(*correct_answer)
                        .cloned()
                        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
                    let verdict = if choice_is_correct(text, *correct_answer) {
                        Verdict::Correct
                    } else {
                        Verdict::Incorrect
                    };
                    (submitted, expected, verdict)
                }
                QuestionKind::TrueFalse { correct_answer } => {
                    let text = answer.and_then(AnswerValue::as_text).unwrap_or("");
                    let submitted = if text.is_empty() {
                        NO_ANSWER.to_string()
                    } else {
                        text.to_string()
                    };
                    let expected = if *correct_answer { "True" } else { "False" }.to_string();
                    let verdict = if true_false_is_correct(text, *correct_answer) {
                        Verdict::Correct
                    } else {
                        Verdict::Incorrect
                    };
                    (submitted, expected, verdict)
                }
                QuestionKind::ShortAnswer { correct_answer } => {
                    let text = answer.and_then(AnswerValue::as_text).unwrap_or("");
                    let submitted = if text.is_empty() {
                        NO_ANSWER.to_string()
                    } else {
                        text.to_string()
                    };
                    let expected = if correct_answer.is_empty() {
                        NOT_SPECIFIED.to_string()
                    } else {
                        correct_answer.clone()
                    };
                    let verdict = if short_answer_matches(text, correct_answer) {
                        Verdict::LikelyCorrect
                    } else {
                        Verdict::NeedsReview
                    };
                    (submitted, expected, verdict)
                }
                QuestionKind::Matching { matching_pairs } => {
                    let (submitted, matched, total) = match answer {
                        Some(AnswerValue::Matches(chosen)) => {
                            let (matched, total) = matching_matches(matching_pairs, chosen);
                            (render_matches(matching_pairs, chosen), matched, total)
                        }
                        _ => (NO_ANSWER.to_string(), 0, matching_pairs.len()),
                    };
                    (
                        submitted,
                        "See matching pairs".to_string(),
                        Verdict::Partial { matched, total },
                    )
                }
            };
            QuestionReview {
                index,
                prompt: question.prompt.clone(),
                category: question.kind.category(),
                points: question.points,
                submitted,
                expected,
                verdict,
            }
        })
        .collect()
}

/// The option text a submitted index points at, if it points anywhere.
fn selected_option(options: &[String], submitted: &str) -> Option<String> {
    if submitted.is_empty() {
        return None;
    }
    let index = parse_index(submitted).and_then(|i| usize::try_from(i).ok())?;
    options.get(index).cloned()
}

/// Render assigned matching rows as "left -> chosen right" for display.
fn render_matches(
    pairs: &[MatchingPair],
    chosen: &std::collections::BTreeMap<String, String>,
) -> String {
    let mut rows = Vec::new();
    for (left_raw, right_raw) in chosen {
        if right_raw.is_empty() {
            continue;
        }
        let left = parse_index(left_raw).and_then(|i| usize::try_from(i).ok());
        let right = parse_index(right_raw).and_then(|i| usize::try_from(i).ok());
        if let (Some(left_pair), Some(right_pair)) = (
            left.and_then(|i| pairs.get(i)),
            right.and_then(|i| pairs.get(i)),
        ) {
            rows.push(format!("{} -> {}", left_pair.left, right_pair.right));
        }
    }
    if rows.is_empty() {
        NO_ANSWER.to_string()
    } else {
        rows.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerMap, Question};
    use crate::scoring::build_result;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn quiz_with(questions: Vec<Question>, category: QuizCategory) -> Quiz {
        Quiz {
            id: Uuid::new_v4(),
            title: "Review Me".into(),
            description: String::new(),
            category,
            time_limit: 0,
            questions,
            created_by: Uuid::new_v4(),
            created_at: None,
            is_published: true,
        }
    }

    #[test]
    fn multiple_choice_verdicts_and_text() {
        let quiz = quiz_with(
            vec![
                Question::multiple_choice(
                    "Capital of France?",
                    vec!["Paris".into(), "London".into(), "Berlin".into(), "Madrid".into()],
                    0,
                ),
                Question::multiple_choice(
                    "Capital of Spain?",
                    vec!["Paris".into(), "London".into(), "Berlin".into(), "Madrid".into()],
                    3,
                ),
            ],
            QuizCategory::MultipleChoice,
        );
        let mut answers = AnswerMap::new();
        answers.insert(0, AnswerValue::text("0"));
        // Question 1 left blank.
        let result = build_result(&quiz, Uuid::new_v4(), answers, Utc::now());

        let rows = review_attempt(&quiz, &result);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].verdict, Verdict::Correct);
        assert_eq!(rows[0].submitted, "Paris");
        assert_eq!(rows[0].expected, "Paris");
        assert_eq!(rows[1].verdict, Verdict::Incorrect);
        assert_eq!(rows[1].submitted, NO_ANSWER);
        assert_eq!(rows[1].expected, "Madrid");
    }

    #[test]
    fn short_answer_heuristic_verdicts() {
        let quiz = quiz_with(
            vec![
                Question::short_answer("Powerhouse?", "mitochondria"),
                Question::short_answer("Chlorophyll color?", "green"),
            ],
            QuizCategory::ShortAnswer,
        );
        let mut answers = AnswerMap::new();
        answers.insert(0, AnswerValue::text("The Mitochondria, of course"));
        answers.insert(1, AnswerValue::text("blue"));
        let result = build_result(&quiz, Uuid::new_v4(), answers, Utc::now());

        let rows = review_attempt(&quiz, &result);
        assert_eq!(rows[0].verdict, Verdict::LikelyCorrect);
        assert_eq!(rows[1].verdict, Verdict::NeedsReview);
        assert_eq!(rows[1].submitted, "blue");
        assert_eq!(rows[1].expected, "green");
    }

    #[test]
    fn matching_partial_verdict_and_rendering() {
        let pairs = vec![
            MatchingPair::new("H2O", "water"),
            MatchingPair::new("NaCl", "salt"),
        ];
        let quiz = quiz_with(
            vec![Question::matching("Match", pairs)],
            QuizCategory::Matching,
        );
        let mut chosen = BTreeMap::new();
        chosen.insert("0".to_string(), "0".to_string());
        chosen.insert("1".to_string(), String::new());
        let mut answers = AnswerMap::new();
        answers.insert(0, AnswerValue::Matches(chosen));
        let result = build_result(&quiz, Uuid::new_v4(), answers, Utc::now());

        let rows = review_attempt(&quiz, &result);
        assert_eq!(
            rows[0].verdict,
            Verdict::Partial {
                matched: 1,
                total: 2
            }
        );
        assert_eq!(rows[0].submitted, "H2O -> water");
        assert_eq!(rows[0].expected, "See matching pairs");
    }

    #[test]
    fn true_false_expected_text_follows_the_typed_key() {
        let quiz = quiz_with(
            vec![Question::true_false("Water is dry", false)],
            QuizCategory::TrueFalse,
        );
        let mut answers = AnswerMap::new();
        answers.insert(0, AnswerValue::text("false"));
        let result = build_result(&quiz, Uuid::new_v4(), answers, Utc::now());

        let rows = review_attempt(&quiz, &result);
        assert_eq!(rows[0].verdict, Verdict::Correct);
        assert_eq!(rows[0].submitted, "false");
        assert_eq!(rows[0].expected, "False");
    }

    #[test]
    fn projection_is_idempotent() {
        let quiz = quiz_with(
            vec![
                Question::true_false("q0", true),
                Question::short_answer("q1", "key"),
            ],
            QuizCategory::TrueFalse,
        );
        let mut answers = AnswerMap::new();
        answers.insert(0, AnswerValue::text("true"));
        let result = build_result(&quiz, Uuid::new_v4(), answers, Utc::now());

        let first = review_attempt(&quiz, &result);
        let second = review_attempt(&quiz, &result);
        assert_eq!(first, second);
    }

    #[test]
    fn verdict_display() {
        assert_eq!(Verdict::Correct.to_string(), "Correct");
        assert_eq!(Verdict::NeedsReview.to_string(), "Needs review");
        assert_eq!(
            Verdict::Partial {
                matched: 2,
                total: 3
            }
            .to_string(),
            "2/3 matched"
        );
    }
}
