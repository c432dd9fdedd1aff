//! Recent-attempt notifications for teachers.
//!
//! A notification is an attempt on one of the teacher's quizzes completed
//! within the last 24 hours that the teacher has not marked viewed yet.
//! Viewed ids are persisted per teacher so the unseen set survives restarts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Quiz, QuizResult, User};
use crate::stats::{UNKNOWN_QUIZ, UNKNOWN_STUDENT};

/// Attempts older than this never notify.
pub const NOTIFICATION_WINDOW_HOURS: i64 = 24;

/// One unseen attempt, joined with quiz and student display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptNotification {
    pub result_id: Uuid,
    pub quiz_id: Uuid,
    pub quiz_title: String,
    pub student_id: Uuid,
    pub student_name: String,
    pub score: u8,
    pub completed_at: DateTime<Utc>,
}

/// Unseen recent attempts for one teacher, most recent first.
pub fn unseen_attempts(
    teacher_id: Uuid,
    quizzes: &[Quiz],
    results: &[QuizResult],
    users: &[User],
    viewed: &[Uuid],
    now: DateTime<Utc>,
) -> Vec<AttemptNotification> {
    let teacher_quizzes: Vec<&Quiz> = quizzes
        .iter()
        .filter(|quiz| quiz.created_by == teacher_id)
        .collect();
    if teacher_quizzes.is_empty() {
        return Vec::new();
    }

    let cutoff = now - Duration::hours(NOTIFICATION_WINDOW_HOURS);
    let mut recent: Vec<&QuizResult> = results
        .iter()
        .filter(|result| {
            teacher_quizzes.iter().any(|quiz| quiz.id == result.quiz_id)
                && result.completed_at > cutoff
                && !viewed.contains(&result.id)
        })
        .collect();
    recent.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    recent
        .into_iter()
        .map(|result| AttemptNotification {
            result_id: result.id,
            quiz_id: result.quiz_id,
            quiz_title: teacher_quizzes
                .iter()
                .find(|quiz| quiz.id == result.quiz_id)
                .map(|quiz| quiz.title.clone())
                .unwrap_or_else(|| UNKNOWN_QUIZ.to_string()),
            student_id: result.user_id,
            student_name: users
                .iter()
                .find(|user| user.id == result.user_id)
                .map(|user| user.name.clone())
                .unwrap_or_else(|| UNKNOWN_STUDENT.to_string()),
            score: result.score,
            completed_at: result.completed_at,
        })
        .collect()
}

/// Record the given notifications as seen. Ids already present are not
/// duplicated, so marking twice is a no-op.
pub fn mark_viewed(viewed: &mut Vec<Uuid>, notifications: &[AttemptNotification]) {
    for notification in notifications {
        if !viewed.contains(&notification.result_id) {
            viewed.push(notification.result_id);
        }
    }
}
