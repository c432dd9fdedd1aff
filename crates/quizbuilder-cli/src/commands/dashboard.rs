//! The `quizbuilder dashboard` command.

use anyhow::Result;
use comfy_table::Table;

use quizbuilder_core::stats::dashboard_stats;
use quizbuilder_store::Store;

use super::require_teacher;

pub fn execute(store: &Store) -> Result<()> {
    let session = require_teacher(store)?;

    let quizzes = store.quizzes()?;
    let results = store.results()?;
    let users = store.users()?;
    let stats = dashboard_stats(session.id, &quizzes, &results, &users);

    println!(
        "{} quizzes, {} students, {} completed attempts, average score {:.1}/10",
        stats.total_quizzes, stats.total_students, stats.completed_attempts, stats.average_score
    );

    let mut categories = Table::new();
    categories.set_header(vec!["Category", "Quizzes"]);
    for (category, count) in &stats.quizzes_by_category {
        categories.add_row(vec![category.label().to_string(), count.to_string()]);
    }
    println!("\nQuizzes by category\n{categories}");

    if !stats.top_quizzes.is_empty() {
        let mut top = Table::new();
        top.set_header(vec!["Quiz", "Average", "Attempts"]);
        for quiz in &stats.top_quizzes {
            top.add_row(vec![
                quiz.title.clone(),
                format!("{:.2}/10", quiz.average_score),
                quiz.times_completed.to_string(),
            ]);
        }
        println!("\nTop performing quizzes\n{top}");
    }

    if !stats.recent_activity.is_empty() {
        let mut recent = Table::new();
        recent.set_header(vec!["Student", "Quiz", "Score", "Completed", "Attempt"]);
        for attempt in &stats.recent_activity {
            recent.add_row(vec![
                attempt.student_name.clone(),
                attempt.quiz_title.clone(),
                format!("{}/10", attempt.score),
                attempt.completed_at.to_string(),
                attempt.result_id.to_string(),
            ]);
        }
        println!("\nRecent activity\n{recent}");
    }

    if !stats.student_performance.is_empty() {
        let mut students = Table::new();
        students.set_header(vec!["Student", "Email", "Attempts", "Average"]);
        for student in &stats.student_performance {
            students.add_row(vec![
                student.name.clone(),
                student.email.clone(),
                student.total_attempts.to_string(),
                format!("{:.1}/10", student.average_score),
            ]);
        }
        println!("\nStudent performance\n{students}");
    }

    Ok(())
}
