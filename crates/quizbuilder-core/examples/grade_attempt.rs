//! Minimal programmatic grading example.
//!
//! Builds a quiz in memory, grades one attempt, and prints the review
//! projection.
//!
//! ```bash
//! cargo run --example grade_attempt
//! ```

use chrono::Utc;
use uuid::Uuid;

use quizbuilder_core::model::{AnswerMap, AnswerValue, Question, Quiz, QuizCategory};
use quizbuilder_core::review::review_attempt;
use quizbuilder_core::scoring::build_result;

fn main() {
    let quiz = Quiz {
        id: Uuid::new_v4(),
        title: "Geography Warm-up".into(),
        description: "Two quick questions".into(),
        category: QuizCategory::MultipleChoice,
        time_limit: 0,
        questions: vec![
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
        created_by: Uuid::new_v4(),
        created_at: Some(Utc::now()),
        is_published: true,
    };

    let mut answers = AnswerMap::new();
    answers.insert(0, AnswerValue::text("0"));
    answers.insert(1, AnswerValue::text("1"));

    let result = build_result(&quiz, Uuid::new_v4(), answers, Utc::now());
    println!(
        "{}: {}/10 ({}/{} raw)",
        result.quiz_title, result.score, result.total_score, result.total_points
    );

    for row in review_attempt(&quiz, &result) {
        println!(
            "  Q{}: {} | submitted '{}', expected '{}' [{}]",
            row.index + 1,
            row.prompt,
            row.submitted,
            row.expected,
            row.verdict
        );
    }
}
