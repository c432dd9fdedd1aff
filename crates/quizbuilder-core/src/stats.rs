//! Teacher dashboard aggregates over quizzes and stored results.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Quiz, QuizCategory, QuizResult, Role, User};

/// Rendered when a result references a quiz that no longer exists.
pub const UNKNOWN_QUIZ: &str = "Unknown Quiz";

/// Rendered when a result references an account that no longer exists.
pub const UNKNOWN_STUDENT: &str = "Unknown Student";

/// How many quizzes the top-performers list shows.
const TOP_QUIZZES: usize = 5;

/// How many attempts the recent-activity list shows.
const RECENT_ACTIVITY: usize = 5;

/// Everything the teacher dashboard displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_quizzes: usize,
    /// Unique students that submitted at least one attempt.
    pub total_students: usize,
    pub completed_attempts: usize,
    /// Mean normalized score across all attempts, rounded to 2 decimals.
    pub average_score: f64,
    pub quizzes_by_category: BTreeMap<QuizCategory, usize>,
    /// Up to five quizzes with the highest average score.
    pub top_quizzes: Vec<QuizPerformance>,
    /// Up to five most recent attempts.
    pub recent_activity: Vec<RecentAttempt>,
    /// Per-student breakdown, best average first; students with no attempts
    /// are omitted.
    pub student_performance: Vec<StudentPerformance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizPerformance {
    pub quiz_id: Uuid,
    pub title: String,
    pub average_score: f64,
    pub times_completed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentAttempt {
    pub result_id: Uuid,
    pub quiz_id: Uuid,
    pub quiz_title: String,
    pub student_name: String,
    pub score: u8,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentPerformance {
    pub student_id: Uuid,
    pub name: String,
    pub email: String,
    pub total_attempts: usize,
    /// Mean normalized score, rounded to 1 decimal.
    pub average_score: f64,
    /// Attempt summaries, most recent first.
    pub attempts: Vec<AttemptSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub result_id: Uuid,
    pub quiz_id: Uuid,
    pub quiz_title: String,
    pub score: u8,
    pub completed_at: DateTime<Utc>,
}

/// Compute the dashboard for one teacher's quizzes.
pub fn dashboard_stats(
    teacher_id: Uuid,
    quizzes: &[Quiz],
    results: &[QuizResult],
    users: &[User],
) -> DashboardStats {
    let teacher_quizzes: Vec<&Quiz> = quizzes
        .iter()
        .filter(|quiz| quiz.created_by == teacher_id)
        .collect();

    let relevant: Vec<&QuizResult> = results
        .iter()
        .filter(|result| teacher_quizzes.iter().any(|quiz| quiz.id == result.quiz_id))
        .collect();

    let mut quizzes_by_category: BTreeMap<QuizCategory, usize> =
        QuizCategory::ALL.iter().map(|c| (*c, 0)).collect();
    for quiz in &teacher_quizzes {
        *quizzes_by_category.entry(quiz.category).or_insert(0) += 1;
    }

    let average_score = if relevant.is_empty() {
        0.0
    } else {
        let total: f64 = relevant.iter().map(|r| f64::from(r.score)).sum();
        round2(total / relevant.len() as f64)
    };

    let unique_students: HashSet<Uuid> = relevant.iter().map(|r| r.user_id).collect();

    let quiz_title = |quiz_id: Uuid| -> String {
        teacher_quizzes
            .iter()
            .find(|quiz| quiz.id == quiz_id)
            .map(|quiz| quiz.title.clone())
            .unwrap_or_else(|| UNKNOWN_QUIZ.to_string())
    };
    let student_name = |user_id: Uuid| -> String {
        users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| user.name.clone())
            .unwrap_or_else(|| UNKNOWN_STUDENT.to_string())
    };

    // Per-quiz averages.
    let mut per_quiz: HashMap<Uuid, (f64, usize)> = HashMap::new();
    for result in &relevant {
        let entry = per_quiz.entry(result.quiz_id).or_insert((0.0, 0));
        entry.0 += f64::from(result.score);
        entry.1 += 1;
    }
    let mut top_quizzes: Vec<QuizPerformance> = per_quiz
        .into_iter()
        .map(|(quiz_id, (total, count))| QuizPerformance {
            quiz_id,
            title: quiz_title(quiz_id),
            average_score: if count > 0 {
                round2(total / count as f64)
            } else {
                0.0
            },
            times_completed: count,
        })
        .collect();
    top_quizzes.sort_by(|a, b| desc_f64(a.average_score, b.average_score));
    top_quizzes.truncate(TOP_QUIZZES);

    let mut recent: Vec<&QuizResult> = relevant.clone();
    recent.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    let recent_activity: Vec<RecentAttempt> = recent
        .iter()
        .take(RECENT_ACTIVITY)
        .map(|result| RecentAttempt {
            result_id: result.id,
            quiz_id: result.quiz_id,
            quiz_title: quiz_title(result.quiz_id),
            student_name: student_name(result.user_id),
            score: result.score,
            completed_at: result.completed_at,
        })
        .collect();

    let mut student_performance: Vec<StudentPerformance> = users
        .iter()
        .filter(|user| user.role == Role::Student)
        .filter_map(|student| {
            let attempts: Vec<&&QuizResult> = relevant
                .iter()
                .filter(|result| result.user_id == student.id)
                .collect();
            if attempts.is_empty() {
                return None;
            }
            let total: f64 = attempts.iter().map(|r| f64::from(r.score)).sum();
            let mut summaries: Vec<AttemptSummary> = attempts
                .iter()
                .map(|result| AttemptSummary {
                    result_id: result.id,
                    quiz_id: result.quiz_id,
                    quiz_title: quiz_title(result.quiz_id),
                    score: result.score,
                    completed_at: result.completed_at,
                })
                .collect();
            summaries.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
            Some(StudentPerformance {
                student_id: student.id,
                name: student.name.clone(),
                email: student.email.clone(),
                total_attempts: attempts.len(),
                average_score: round1(total / attempts.len() as f64),
                attempts: summaries,
            })
        })
        .collect();
    student_performance.sort_by(|a, b| desc_f64(a.average_score, b.average_score));

    DashboardStats {
        total_quizzes: teacher_quizzes.len(),
        total_students: unique_students.len(),
        completed_attempts: relevant.len(),
        average_score,
        quizzes_by_category,
        top_quizzes,
        recent_activity,
        student_performance,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn desc_f64(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
