//! Quiz scoring and result-record construction.
//!
//! Each question type has its own correctness predicate; the review
//! projection reuses the same predicates so graded and displayed verdicts
//! cannot drift. Structurally broken questions never panic the grader, they
//! just contribute zero.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{AnswerMap, AnswerValue, MatchingPair, Question, QuestionKind, Quiz, QuizResult};

/// Raw and normalized totals for one graded attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    /// Sum of per-question contributions; fractional when matching
    /// questions score partially.
    pub raw_score: f64,
    /// Sum of every question's points, answered or not.
    pub total_points: u32,
    /// `round(raw / total * 10)` on the closed 0-10 range.
    pub normalized: u8,
}

/// Parse a submitted option index with lenient decimal semantics: leading
/// whitespace skipped, optional sign, longest digit prefix. `"02"` parses
/// to 2, `"3 "` to 3; no digits means no number.
pub fn parse_index(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Correct iff the submitted text parses to the stored option index.
pub fn choice_is_correct(submitted: &str, correct_answer: usize) -> bool {
    parse_index(submitted) == Some(correct_answer as i64)
}

/// Correct iff the submitted text equals the stringified key. Only the
/// exact strings `"true"` and `"false"` can ever match.
pub fn true_false_is_correct(submitted: &str, correct_answer: bool) -> bool {
    submitted == if correct_answer { "true" } else { "false" }
}

/// Keyword heuristic: the submission must contain the key as a substring,
/// case-insensitively, and both sides must be non-empty after trimming.
/// Approximate by design; short-answer verdicts stay subject to teacher
/// review.
pub fn short_answer_matches(submitted: &str, correct_answer: &str) -> bool {
    let submitted = submitted.to_lowercase();
    let submitted = submitted.trim();
    let correct = correct_answer.to_lowercase();
    let correct = correct.trim();
    !submitted.is_empty() && !correct.is_empty() && submitted.contains(correct)
}

/// Count text-correct matching selections, returning `(correct, total)`.
///
/// Correctness is keyed on pair identity, not position: the chosen pair's
/// right-hand text must equal the right-hand text originally paired at that
/// left index. Unassigned rows and out-of-range indices are skipped.
pub fn matching_matches(
    pairs: &[MatchingPair],
    chosen: &BTreeMap<String, String>,
) -> (usize, usize) {
    let total = pairs.len();
    let mut correct = 0;
    for (left_raw, right_raw) in chosen {
        if right_raw.is_empty() {
            continue;
        }
        let Some(left) = parse_index(left_raw).and_then(|i| usize::try_from(i).ok()) else {
            continue;
        };
        let Some(right) = parse_index(right_raw).and_then(|i| usize::try_from(i).ok()) else {
            continue;
        };
        let (Some(expected), Some(picked)) = (pairs.get(left), pairs.get(right)) else {
            continue;
        };
        if picked.right == expected.right {
            correct += 1;
        }
    }
    (correct, total)
}

/// Points contributed by a single question given the submitted answer.
pub fn question_contribution(question: &Question, answer: Option<&AnswerValue>) -> f64 {
    let points = f64::from(question.points);
    match &question.kind {
        QuestionKind::MultipleChoice { correct_answer, .. } => match answer {
            Some(AnswerValue::Text(text)) if choice_is_correct(text, *correct_answer) => points,
            _ => 0.0,
        },
        QuestionKind::TrueFalse { correct_answer } => match answer {
            Some(AnswerValue::Text(text)) if true_false_is_correct(text, *correct_answer) => points,
            _ => 0.0,
        },
        QuestionKind::ShortAnswer { correct_answer } => match answer {
            Some(AnswerValue::Text(text)) if short_answer_matches(text, correct_answer) => points,
            _ => 0.0,
        },
        QuestionKind::Matching { matching_pairs } => {
            let Some(AnswerValue::Matches(chosen)) = answer else {
                return 0.0;
            };
            let (correct, total) = matching_matches(matching_pairs, chosen);
            if total == 0 {
                return 0.0;
            }
            (correct as f64 / total as f64) * points
        }
    }
}

/// Scale a raw score to the closed 0-10 range, rounding to the nearest
/// integer. A zero maximum yields 0 rather than a NaN.
pub fn normalize_score(raw_score: f64, total_points: u32) -> u8 {
    if total_points == 0 {
        return 0;
    }
    let scaled = (raw_score / f64::from(total_points) * 10.0).round();
    scaled.clamp(0.0, 10.0) as u8
}

/// Grade one attempt. Inputs are borrowed and never mutated; answers keyed
/// outside the question list are ignored.
pub fn score_attempt(questions: &[Question], answers: &AnswerMap) -> ScoreSummary {
    let mut raw_score = 0.0;
    let mut total_points = 0u32;
    for (index, question) in questions.iter().enumerate() {
        total_points += question.points;
        raw_score += question_contribution(question, answers.get(&index));
    }
    ScoreSummary {
        raw_score,
        total_points,
        normalized: normalize_score(raw_score, total_points),
    }
}

/// Build the append-only record for a graded attempt. Answers are stored
/// verbatim so the review projection can reconstruct the attempt later.
pub fn build_result(
    quiz: &Quiz,
    user_id: Uuid,
    answers: AnswerMap,
    completed_at: DateTime<Utc>,
) -> QuizResult {
    let summary = score_attempt(&quiz.questions, &answers);
    QuizResult {
        id: Uuid::new_v4(),
        user_id,
        quiz_id: quiz.id,
        quiz_title: quiz.title.clone(),
        score: summary.normalized,
        total_score: summary.raw_score,
        total_points: summary.total_points,
        completed_at,
        answers,
    }
}
