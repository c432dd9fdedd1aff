//! Result viewing: the learner's latest score and the teacher review.

use anyhow::{bail, Result};
use comfy_table::Table;
use uuid::Uuid;

use quizbuilder_core::model::QuizCategory;
use quizbuilder_core::review::review_attempt;
use quizbuilder_core::stats::{UNKNOWN_QUIZ, UNKNOWN_STUDENT};
use quizbuilder_store::Store;

use super::{require_session, require_teacher};

/// Show the signed-in user's most recent result for a quiz.
pub fn latest(store: &Store, quiz_id: Uuid) -> Result<()> {
    let session = require_session(store)?;

    let Some(result) = store.latest_result(quiz_id, session.id)? else {
        bail!("no completed attempt for this quiz yet");
    };
    let title = store
        .find_quiz(quiz_id)?
        .map(|quiz| quiz.title)
        .unwrap_or_else(|| UNKNOWN_QUIZ.to_string());

    let percentage = (f64::from(result.score) / 10.0 * 100.0).round() as u32;
    println!("{title}: {}/10 ({percentage}%)", result.score);
    println!("Completed at {}", result.completed_at);
    let message = if percentage >= 70 {
        "Excellent! You have mastered this material."
    } else if percentage >= 40 {
        "Good effort. You have a basic understanding but could improve."
    } else {
        "You may need additional help with this material."
    };
    println!("{message}");
    Ok(())
}

/// Teacher review of one attempt, question by question.
pub fn review(store: &Store, attempt_id: Uuid) -> Result<()> {
    let session = require_teacher(store)?;

    let Some(result) = store.find_result(attempt_id)? else {
        bail!("quiz attempt not found");
    };
    let Some(quiz) = store.find_quiz(result.quiz_id)? else {
        bail!("quiz data not found");
    };
    if quiz.created_by != session.id {
        bail!("you do not have permission to view this quiz attempt");
    }

    let users = store.users()?;
    let student_name = users
        .iter()
        .find(|user| user.id == result.user_id)
        .map(|user| user.name.as_str())
        .unwrap_or(UNKNOWN_STUDENT);

    println!("{} taken by {}", quiz.title, student_name);
    println!(
        "Score: {}/10 ({:.2}/{} raw points), completed {}",
        result.score, result.total_score, result.total_points, result.completed_at
    );

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Submitted", "Expected", "Verdict"]);
    for row in review_attempt(&quiz, &result) {
        table.add_row(vec![
            (row.index + 1).to_string(),
            row.prompt,
            row.submitted,
            row.expected,
            row.verdict.to_string(),
        ]);
    }
    println!("{table}");

    if quiz.category == QuizCategory::ShortAnswer {
        println!("Short-answer verdicts come from keyword matching and need teacher review.");
    }
    Ok(())
}
