//! Typed store facade over a `StorageBackend`.
//!
//! Knows the well-known keys, tolerates corrupted values (a malformed entry
//! is logged and read as empty rather than failing the caller), and runs
//! the quiz repair migration on load.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use quizbuilder_core::migrate::repair_quizzes;
use quizbuilder_core::model::{Quiz, QuizResult, Session, User};
use quizbuilder_core::traits::StorageBackend;

use crate::file::FileBackend;
use crate::memory::MemoryBackend;

/// Well-known storage keys.
pub mod keys {
    use uuid::Uuid;

    pub const SESSION: &str = "user";
    pub const USERS: &str = "users";
    pub const QUIZZES: &str = "quizzes";
    pub const RESULTS: &str = "quizResults";

    /// Per-teacher read marker for attempt notifications.
    pub fn viewed_notifications(teacher_id: Uuid) -> String {
        format!("viewed_notifications_{teacher_id}")
    }
}

/// Typed access to the quizbuilder state behind any storage backend.
pub struct Store {
    backend: Box<dyn StorageBackend>,
}

impl Store {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// A store that keeps everything in memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// A store persisted as JSON files under `dir`.
    pub fn open(dir: &Path) -> Self {
        Self::new(FileBackend::new(dir))
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Vec<T>> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(list) => Ok(list),
            Err(err) => {
                tracing::warn!(key, "stored value is not valid JSON, treating as empty: {err}");
                Ok(Vec::new())
            }
        }
    }

    fn write_list<T: Serialize>(&self, key: &str, list: &[T]) -> anyhow::Result<()> {
        let json = serde_json::to_string(list)?;
        self.backend.set(key, &json)
    }

    // -----------------------------------------------------------------------
    // Quizzes
    // -----------------------------------------------------------------------

    /// All stored quizzes, repaired. When the repair migration changes
    /// anything the fixed list is persisted right away, so the repair runs
    /// effectively once per drifted quiz.
    pub fn quizzes(&self) -> anyhow::Result<Vec<Quiz>> {
        let mut quizzes: Vec<Quiz> = self.read_list(keys::QUIZZES)?;
        let repaired = repair_quizzes(&mut quizzes);
        if repaired > 0 {
            tracing::info!(repaired, "repaired stored quizzes");
            self.write_list(keys::QUIZZES, &quizzes)?;
        }
        Ok(quizzes)
    }

    pub fn save_quizzes(&self, quizzes: &[Quiz]) -> anyhow::Result<()> {
        self.write_list(keys::QUIZZES, quizzes)
    }

    pub fn add_quiz(&self, quiz: Quiz) -> anyhow::Result<()> {
        let mut quizzes = self.quizzes()?;
        quizzes.push(quiz);
        self.save_quizzes(&quizzes)
    }

    pub fn find_quiz(&self, id: Uuid) -> anyhow::Result<Option<Quiz>> {
        Ok(self.quizzes()?.into_iter().find(|quiz| quiz.id == id))
    }

    /// Replace a stored quiz with the same id. Returns whether it existed.
    pub fn update_quiz(&self, updated: &Quiz) -> anyhow::Result<bool> {
        let mut quizzes = self.quizzes()?;
        let Some(slot) = quizzes.iter_mut().find(|quiz| quiz.id == updated.id) else {
            return Ok(false);
        };
        *slot = updated.clone();
        self.save_quizzes(&quizzes)?;
        Ok(true)
    }

    /// Toggle publication. Returns the quiz when found.
    pub fn set_published(&self, id: Uuid, is_published: bool) -> anyhow::Result<Option<Quiz>> {
        let mut quizzes = self.quizzes()?;
        let Some(quiz) = quizzes.iter_mut().find(|quiz| quiz.id == id) else {
            return Ok(None);
        };
        quiz.is_published = is_published;
        let snapshot = quiz.clone();
        self.save_quizzes(&quizzes)?;
        Ok(Some(snapshot))
    }

    /// Delete a quiz. Results referencing it are kept; dangling references
    /// are tolerated by every reader.
    pub fn delete_quiz(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut quizzes = self.quizzes()?;
        let before = quizzes.len();
        quizzes.retain(|quiz| quiz.id != id);
        if quizzes.len() == before {
            return Ok(false);
        }
        self.save_quizzes(&quizzes)?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Results
    // -----------------------------------------------------------------------

    pub fn results(&self) -> anyhow::Result<Vec<QuizResult>> {
        self.read_list(keys::RESULTS)
    }

    /// Append one attempt. Records are never merged or replaced; multiple
    /// attempts for the same quiz and user accumulate.
    pub fn append_result(&self, result: &QuizResult) -> anyhow::Result<()> {
        let mut results = self.results()?;
        results.push(result.clone());
        self.write_list(keys::RESULTS, &results)
    }

    pub fn find_result(&self, id: Uuid) -> anyhow::Result<Option<QuizResult>> {
        Ok(self.results()?.into_iter().find(|result| result.id == id))
    }

    /// The user's most recent attempt for a quiz.
    pub fn latest_result(
        &self,
        quiz_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<QuizResult>> {
        Ok(self
            .results()?
            .into_iter()
            .filter(|result| result.quiz_id == quiz_id && result.user_id == user_id)
            .max_by_key(|result| result.completed_at))
    }

    // -----------------------------------------------------------------------
    // Accounts and session
    // -----------------------------------------------------------------------

    pub fn users(&self) -> anyhow::Result<Vec<User>> {
        self.read_list(keys::USERS)
    }

    pub fn save_users(&self, users: &[User]) -> anyhow::Result<()> {
        self.write_list(keys::USERS, users)
    }

    pub fn session(&self) -> anyhow::Result<Option<Session>> {
        let Some(raw) = self.backend.get(keys::SESSION)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                tracing::warn!("stored session is not valid JSON, signing out: {err}");
                Ok(None)
            }
        }
    }

    pub fn set_session(&self, session: &Session) -> anyhow::Result<()> {
        let json = serde_json::to_string(session)?;
        self.backend.set(keys::SESSION, &json)
    }

    pub fn clear_session(&self) -> anyhow::Result<()> {
        self.backend.remove(keys::SESSION)
    }

    // -----------------------------------------------------------------------
    // Notification read markers
    // -----------------------------------------------------------------------

    pub fn viewed_notifications(&self, teacher_id: Uuid) -> anyhow::Result<Vec<Uuid>> {
        self.read_list(&keys::viewed_notifications(teacher_id))
    }

    pub fn save_viewed_notifications(
        &self,
        teacher_id: Uuid,
        viewed: &[Uuid],
    ) -> anyhow::Result<()> {
        self.write_list(&keys::viewed_notifications(teacher_id), viewed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use quizbuilder_core::model::{
        AnswerMap, Question, QuestionKind, QuizCategory, Role,
    };
    use quizbuilder_core::traits::StorageBackend;

    fn quiz(owner: Uuid, category: QuizCategory, questions: Vec<Question>) -> Quiz {
        Quiz {
            id: Uuid::new_v4(),
            title: "Stored".into(),
            description: String::new(),
            category,
            time_limit: 0,
            questions,
            created_by: owner,
            created_at: Some(Utc::now()),
            is_published: false,
        }
    }

    fn result(quiz_id: Uuid, user_id: Uuid, completed_at: chrono::DateTime<Utc>) -> QuizResult {
        QuizResult {
            id: Uuid::new_v4(),
            user_id,
            quiz_id,
            quiz_title: "Stored".into(),
            score: 5,
            total_score: 1.0,
            total_points: 2,
            completed_at,
            answers: AnswerMap::new(),
        }
    }

    #[test]
    fn quiz_crud_round_trip() {
        let store = Store::in_memory();
        assert!(store.quizzes().unwrap().is_empty());

        let q = quiz(
            Uuid::new_v4(),
            QuizCategory::TrueFalse,
            vec![Question::true_false("q", true)],
        );
        store.add_quiz(q.clone()).unwrap();
        assert_eq!(store.find_quiz(q.id).unwrap().unwrap().title, "Stored");

        let published = store.set_published(q.id, true).unwrap().unwrap();
        assert!(published.is_published);
        assert!(store.find_quiz(q.id).unwrap().unwrap().is_published);

        assert!(store.delete_quiz(q.id).unwrap());
        assert!(!store.delete_quiz(q.id).unwrap());
        assert!(store.quizzes().unwrap().is_empty());
    }

    #[test]
    fn corrupt_lists_read_as_empty() {
        let backend = MemoryBackend::new();
        backend.set(keys::QUIZZES, "{not json").unwrap();
        backend.set(keys::SESSION, "also broken").unwrap();
        let store = Store::new(backend);

        assert!(store.quizzes().unwrap().is_empty());
        assert!(store.session().unwrap().is_none());
    }

    #[test]
    fn load_repairs_drifted_quizzes_once() {
        let owner = Uuid::new_v4();
        // A true-false quiz carrying a short-answer question.
        let drifted = quiz(
            owner,
            QuizCategory::TrueFalse,
            vec![Question::short_answer("drifted", "key")],
        );
        let backend = MemoryBackend::new();
        backend
            .set(
                keys::QUIZZES,
                &serde_json::to_string(&vec![drifted]).unwrap(),
            )
            .unwrap();
        let store = Store::new(backend);

        let quizzes = store.quizzes().unwrap();
        assert_eq!(
            quizzes[0].questions[0].kind,
            QuestionKind::TrueFalse {
                correct_answer: true
            }
        );

        // The repaired form was written back, so a direct read agrees.
        let raw: Vec<Quiz> = store.read_list(keys::QUIZZES).unwrap();
        assert_eq!(raw, quizzes);
    }

    #[test]
    fn results_accumulate_and_latest_wins() {
        let store = Store::in_memory();
        let quiz_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let first = result(quiz_id, user_id, now - Duration::hours(2));
        let second = result(quiz_id, user_id, now - Duration::hours(1));
        let other_user = result(quiz_id, Uuid::new_v4(), now);

        store.append_result(&first).unwrap();
        store.append_result(&second).unwrap();
        store.append_result(&other_user).unwrap();

        assert_eq!(store.results().unwrap().len(), 3);
        assert_eq!(
            store.latest_result(quiz_id, user_id).unwrap().unwrap().id,
            second.id
        );
        assert_eq!(store.find_result(first.id).unwrap().unwrap().id, first.id);
    }

    #[test]
    fn session_and_users_round_trip() {
        let store = Store::in_memory();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "pw".into(),
            role: Role::Teacher,
        };
        store.save_users(&[user.clone()]).unwrap();
        assert_eq!(store.users().unwrap()[0].email, "ada@example.com");

        assert!(store.session().unwrap().is_none());
        let session = Session::for_user(&user);
        store.set_session(&session).unwrap();
        assert_eq!(store.session().unwrap().unwrap().id, user.id);
        store.clear_session().unwrap();
        assert!(store.session().unwrap().is_none());
    }

    #[test]
    fn viewed_markers_are_per_teacher() {
        let store = Store::in_memory();
        let teacher_a = Uuid::new_v4();
        let teacher_b = Uuid::new_v4();
        let marker = Uuid::new_v4();

        store
            .save_viewed_notifications(teacher_a, &[marker])
            .unwrap();
        assert_eq!(store.viewed_notifications(teacher_a).unwrap(), vec![marker]);
        assert!(store.viewed_notifications(teacher_b).unwrap().is_empty());
    }

    #[test]
    fn file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let q = quiz(
            Uuid::new_v4(),
            QuizCategory::ShortAnswer,
            vec![Question::short_answer("q", "key")],
        );
        {
            let store = Store::open(dir.path());
            store.add_quiz(q.clone()).unwrap();
        }
        let store = Store::open(dir.path());
        assert_eq!(store.find_quiz(q.id).unwrap().unwrap(), q);
    }
}
