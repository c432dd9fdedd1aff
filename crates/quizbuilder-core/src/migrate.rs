//! Load-time repair of stored quizzes.
//!
//! Imported or legacy data can carry questions whose variant no longer
//! matches the quiz category, or that lost their authoring defaults. The
//! repair runs as an explicit pass over the quiz store, separate from the
//! scoring engine, and running it twice changes nothing.

use crate::model::{MatchingPair, Question, QuestionKind, Quiz, QuizCategory};

/// Blank option slots a repaired multiple-choice question gets.
pub const DEFAULT_OPTION_SLOTS: usize = 4;

fn default_kind(category: QuizCategory) -> QuestionKind {
    match category {
        QuizCategory::MultipleChoice => QuestionKind::MultipleChoice {
            options: vec![String::new(); DEFAULT_OPTION_SLOTS],
            correct_answer: 0,
        },
        QuizCategory::TrueFalse => QuestionKind::TrueFalse {
            correct_answer: true,
        },
        QuizCategory::ShortAnswer => QuestionKind::ShortAnswer {
            correct_answer: String::new(),
        },
        QuizCategory::Matching => QuestionKind::Matching {
            matching_pairs: vec![MatchingPair::default()],
        },
    }
}

/// Align every question with the quiz category and restore authoring
/// defaults. Prompt and points survive; a drifted variant's answer key is
/// reset to the category default. Returns true when anything changed.
pub fn align_quiz(quiz: &mut Quiz) -> bool {
    let mut changed = false;
    for question in &mut quiz.questions {
        changed |= align_question(question, quiz.category);
    }
    changed
}

fn align_question(question: &mut Question, category: QuizCategory) -> bool {
    let mut changed = false;
    if question.kind.category() != category {
        question.kind = default_kind(category);
        changed = true;
    }
    match &mut question.kind {
        QuestionKind::MultipleChoice { options, .. } if options.is_empty() => {
            *options = vec![String::new(); DEFAULT_OPTION_SLOTS];
            changed = true;
        }
        QuestionKind::Matching { matching_pairs } if matching_pairs.is_empty() => {
            matching_pairs.push(MatchingPair::default());
            changed = true;
        }
        _ => {}
    }
    changed
}

/// Repair every quiz in place; returns how many quizzes changed.
pub fn repair_quizzes(quizzes: &mut [Quiz]) -> usize {
    quizzes.iter_mut().map(align_quiz).filter(|changed| *changed).count()
}
