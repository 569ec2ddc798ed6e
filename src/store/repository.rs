//! In-memory entity store
//!
//! One ordered table per entity type, each behind its own
//! `tokio::sync::RwLock`. ID assignment and insertion happen under the same
//! write guard, so identifiers are strictly increasing per type and never
//! reused, even after deletes.
//!
//! The store does not check cross-entity references; callers look up the
//! referenced record before creating a dependent one.

use super::types::*;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// A single entity table with its ID counter
struct Table<T> {
    rows: BTreeMap<EntityId, T>,
    next_id: EntityId,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(EntityId) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: EntityId) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.values().find(|row| pred(row)).cloned()
    }

    fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| pred(row)).cloned().collect()
    }

    fn update(&mut self, id: EntityId, apply: impl FnOnce(&mut T)) -> Option<T> {
        let row = self.rows.get_mut(&id)?;
        apply(row);
        Some(row.clone())
    }

    fn remove(&mut self, id: EntityId) -> bool {
        self.rows.remove(&id).is_some()
    }
}

/// Repository for all study records
pub struct EntityStore {
    users: RwLock<Table<User>>,
    documents: RwLock<Table<Document>>,
    summaries: RwLock<Table<Summary>>,
    flashcards: RwLock<Table<Flashcard>>,
    quizzes: RwLock<Table<Quiz>>,
    quiz_results: RwLock<Table<QuizResult>>,
    study_sessions: RwLock<Table<StudySession>>,
}

impl EntityStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Table::new()),
            documents: RwLock::new(Table::new()),
            summaries: RwLock::new(Table::new()),
            flashcards: RwLock::new(Table::new()),
            quizzes: RwLock::new(Table::new()),
            quiz_results: RwLock::new(Table::new()),
            study_sessions: RwLock::new(Table::new()),
        }
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn get_user(&self, id: EntityId) -> Option<User> {
        self.users.read().await.get(id)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users.read().await.find(|u| u.username == username)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.users.read().await.find(|u| u.email == email)
    }

    /// Find the user linked to an identity-provider subject
    pub async fn get_user_by_external_id(&self, external_id: &str) -> Option<User> {
        self.users
            .read()
            .await
            .find(|u| u.external_auth_id.as_deref() == Some(external_id))
    }

    pub async fn create_user(&self, new: NewUser) -> User {
        let now = Utc::now();
        self.users.write().await.insert_with(|id| User {
            id,
            username: new.username,
            email: new.email,
            name: new.name,
            external_auth_id: new.external_auth_id,
            study_streak: 0,
            created_at: now,
        })
    }

    /// Replace a user's study streak
    pub async fn update_user_streak(&self, id: EntityId, streak: u32) -> Option<User> {
        self.users
            .write()
            .await
            .update(id, |u| u.study_streak = streak)
    }

    /// Add one to a user's streak under a single write guard
    pub async fn increment_user_streak(&self, id: EntityId) -> Option<User> {
        self.users
            .write()
            .await
            .update(id, |u| u.study_streak = u.study_streak.saturating_add(1))
    }

    // =========================================================================
    // Documents
    // =========================================================================

    pub async fn list_documents(&self, user_id: EntityId) -> Vec<Document> {
        self.documents.read().await.filter(|d| d.user_id == user_id)
    }

    pub async fn get_document(&self, id: EntityId) -> Option<Document> {
        self.documents.read().await.get(id)
    }

    pub async fn create_document(&self, new: NewDocument) -> Document {
        let now = Utc::now();
        self.documents.write().await.insert_with(|id| Document {
            id,
            user_id: new.user_id,
            title: new.title,
            file_name: new.file_name,
            file_type: new.file_type,
            file_size: new.file_size,
            content: new.content,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn delete_document(&self, id: EntityId) -> bool {
        self.documents.write().await.remove(id)
    }

    // =========================================================================
    // Summaries
    // =========================================================================

    pub async fn list_summaries(&self, user_id: EntityId) -> Vec<Summary> {
        self.summaries.read().await.filter(|s| s.user_id == user_id)
    }

    pub async fn get_summary(&self, id: EntityId) -> Option<Summary> {
        self.summaries.read().await.get(id)
    }

    pub async fn create_summary(&self, new: NewSummary) -> Summary {
        let now = Utc::now();
        self.summaries.write().await.insert_with(|id| Summary {
            id,
            user_id: new.user_id,
            document_id: new.document_id,
            title: new.title,
            content: new.content,
            format: new.format,
            key_terms: new.key_terms,
            read_time: new.read_time,
            created_at: now,
        })
    }

    /// Remove a summary. Flashcards and quizzes derived from it are kept.
    pub async fn delete_summary(&self, id: EntityId) -> bool {
        self.summaries.write().await.remove(id)
    }

    // =========================================================================
    // Flashcards
    // =========================================================================

    /// List a user's flashcards, optionally only those from one summary
    pub async fn list_flashcards(
        &self,
        user_id: EntityId,
        summary_id: Option<EntityId>,
    ) -> Vec<Flashcard> {
        self.flashcards.read().await.filter(|f| {
            f.user_id == user_id && summary_id.map_or(true, |sid| f.summary_id == Some(sid))
        })
    }

    pub async fn get_flashcard(&self, id: EntityId) -> Option<Flashcard> {
        self.flashcards.read().await.get(id)
    }

    pub async fn create_flashcard(&self, new: NewFlashcard) -> Flashcard {
        let now = Utc::now();
        self.flashcards.write().await.insert_with(|id| Flashcard {
            id,
            user_id: new.user_id,
            summary_id: new.summary_id,
            front: new.front,
            back: new.back,
            last_studied: None,
            interval: 1,
            created_at: now,
        })
    }

    /// Replace the review interval and stamp `last_studied`.
    ///
    /// Callers guarantee `interval >= 1`; no monotonicity is enforced.
    pub async fn update_flashcard(&self, id: EntityId, interval: u32) -> Option<Flashcard> {
        let now = Utc::now();
        self.flashcards.write().await.update(id, |f| {
            f.interval = interval;
            f.last_studied = Some(now);
        })
    }

    pub async fn delete_flashcard(&self, id: EntityId) -> bool {
        self.flashcards.write().await.remove(id)
    }

    // =========================================================================
    // Quizzes
    // =========================================================================

    pub async fn list_quizzes(&self, user_id: EntityId) -> Vec<Quiz> {
        self.quizzes.read().await.filter(|q| q.user_id == user_id)
    }

    pub async fn get_quiz(&self, id: EntityId) -> Option<Quiz> {
        self.quizzes.read().await.get(id)
    }

    pub async fn create_quiz(&self, new: NewQuiz) -> Quiz {
        let now = Utc::now();
        self.quizzes.write().await.insert_with(|id| Quiz {
            id,
            user_id: new.user_id,
            summary_id: new.summary_id,
            title: new.title,
            difficulty: new.difficulty,
            questions: new.questions,
            created_at: now,
        })
    }

    pub async fn delete_quiz(&self, id: EntityId) -> bool {
        self.quizzes.write().await.remove(id)
    }

    // =========================================================================
    // Quiz results
    // =========================================================================

    pub async fn list_quiz_results(&self, user_id: EntityId) -> Vec<QuizResult> {
        self.quiz_results.read().await.filter(|r| r.user_id == user_id)
    }

    pub async fn create_quiz_result(&self, new: NewQuizResult) -> QuizResult {
        let now = Utc::now();
        self.quiz_results.write().await.insert_with(|id| QuizResult {
            id,
            user_id: new.user_id,
            quiz_id: new.quiz_id,
            score: new.score,
            total_questions: new.total_questions,
            completed_at: now,
        })
    }

    // =========================================================================
    // Study sessions
    // =========================================================================

    pub async fn list_study_sessions(&self, user_id: EntityId) -> Vec<StudySession> {
        self.study_sessions
            .read()
            .await
            .filter(|s| s.user_id == user_id)
    }

    pub async fn create_study_session(&self, new: NewStudySession) -> StudySession {
        let now = Utc::now();
        self.study_sessions.write().await.insert_with(|id| StudySession {
            id,
            user_id: new.user_id,
            duration: new.duration,
            activity_type: new.activity_type,
            activity_id: new.activity_id,
            completed_at: now,
        })
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}
