//! Study service
//!
//! Sequences the entity store, the file processor and the content generator
//! for each API operation. Operations look up every referenced entity before
//! creating anything, so a missing reference fails with `NotFound` and leaves
//! the store untouched. There is no rollback: a failure after the first
//! write keeps whatever was already created.

use super::types::*;
use crate::documents::{title_from_file_name, FileProcessor};
use crate::error::{Error, Result};
use crate::generation::{ContentGenerator, SummaryOptions};
use crate::store::*;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Window used by `stats`
pub const STATS_WINDOW_DAYS: i64 = 30;

/// Orchestrates store, processor and generator calls
pub struct StudyService {
    store: Arc<EntityStore>,
    generator: Arc<dyn ContentGenerator>,
    files: FileProcessor,
}

impl StudyService {
    pub fn new(
        store: Arc<EntityStore>,
        generator: Arc<dyn ContentGenerator>,
        files: FileProcessor,
    ) -> Self {
        Self {
            store,
            generator,
            files,
        }
    }

    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Persist an upload and record it as a document
    pub async fn upload_document(
        &self,
        user_id: EntityId,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<Document> {
        let file = self.files.save(bytes, file_name, mime_type).await?;

        let document = self
            .store
            .create_document(NewDocument {
                user_id,
                title: title_from_file_name(&file.original_name),
                file_name: file.original_name,
                file_type: file.mime_type,
                file_size: file.size,
                content: file.content,
            })
            .await;

        tracing::info!(
            document_id = document.id,
            user_id,
            size = document.file_size,
            "Document uploaded"
        );
        Ok(document)
    }

    pub async fn list_documents(&self, user_id: EntityId) -> Vec<Document> {
        self.store.list_documents(user_id).await
    }

    pub async fn get_document(&self, id: EntityId) -> Result<Document> {
        self.store
            .get_document(id)
            .await
            .ok_or_else(|| Error::not_found("Document"))
    }

    /// Delete a document record. The stored upload is kept since identical
    /// content from other documents may share it.
    pub async fn delete_document(&self, id: EntityId) -> Result<()> {
        if !self.store.delete_document(id).await {
            return Err(Error::not_found("Document"));
        }
        tracing::info!(document_id = id, "Document deleted");
        Ok(())
    }

    // =========================================================================
    // Summaries
    // =========================================================================

    pub async fn generate_summary(
        &self,
        user_id: EntityId,
        request: GenerateSummaryRequest,
    ) -> Result<Summary> {
        let document = self.get_document(request.document_id).await?;

        let options = SummaryOptions {
            format: request.format,
            readability: request.readability,
            extract_key_terms: request.extract_key_terms,
        };
        let generated = self
            .generator
            .summarize(&document.content, &document.title, options)
            .await?;

        let summary = self
            .store
            .create_summary(NewSummary {
                user_id,
                document_id: document.id,
                title: document.title,
                content: generated.content,
                format: request.format,
                key_terms: generated.key_terms,
                read_time: generated.read_time,
            })
            .await;

        tracing::info!(
            summary_id = summary.id,
            document_id = summary.document_id,
            format = %summary.format,
            generator = self.generator.name(),
            "Summary generated"
        );
        Ok(summary)
    }

    pub async fn list_summaries(&self, user_id: EntityId) -> Vec<Summary> {
        self.store.list_summaries(user_id).await
    }

    pub async fn get_summary(&self, id: EntityId) -> Result<Summary> {
        self.store
            .get_summary(id)
            .await
            .ok_or_else(|| Error::not_found("Summary"))
    }

    pub async fn delete_summary(&self, id: EntityId) -> Result<()> {
        if !self.store.delete_summary(id).await {
            return Err(Error::not_found("Summary"));
        }
        Ok(())
    }

    // =========================================================================
    // Quizzes
    // =========================================================================

    pub async fn generate_quiz(
        &self,
        user_id: EntityId,
        request: GenerateQuizRequest,
    ) -> Result<Quiz> {
        let summary = self.get_summary(request.summary_id).await?;

        let generated = self
            .generator
            .generate_quiz(&summary.content, &summary.title, request.difficulty)
            .await?;

        if let Some(bad) = generated.questions.iter().find(|q| !q.is_well_formed()) {
            return Err(Error::Generation(format!(
                "Question {} has no matching correct answer",
                bad.id
            )));
        }

        let quiz = self
            .store
            .create_quiz(NewQuiz {
                user_id,
                summary_id: summary.id,
                title: generated.title,
                difficulty: request.difficulty,
                questions: generated.questions,
            })
            .await;

        tracing::info!(
            quiz_id = quiz.id,
            summary_id = quiz.summary_id,
            difficulty = %quiz.difficulty,
            questions = quiz.questions.len(),
            "Quiz generated"
        );
        Ok(quiz)
    }

    pub async fn list_quizzes(&self, user_id: EntityId) -> Vec<Quiz> {
        self.store.list_quizzes(user_id).await
    }

    pub async fn get_quiz(&self, id: EntityId) -> Result<Quiz> {
        self.store
            .get_quiz(id)
            .await
            .ok_or_else(|| Error::not_found("Quiz"))
    }

    pub async fn delete_quiz(&self, id: EntityId) -> Result<()> {
        if !self.store.delete_quiz(id).await {
            return Err(Error::not_found("Quiz"));
        }
        Ok(())
    }

    // =========================================================================
    // Flashcards
    // =========================================================================

    pub async fn generate_flashcards(
        &self,
        user_id: EntityId,
        request: GenerateFlashcardsRequest,
    ) -> Result<Vec<Flashcard>> {
        let summary = self.get_summary(request.summary_id).await?;

        let generated = self
            .generator
            .generate_flashcards(&summary.content, &summary.title)
            .await?;

        let mut cards = Vec::with_capacity(generated.len());
        for card in generated {
            cards.push(
                self.store
                    .create_flashcard(NewFlashcard {
                        user_id,
                        summary_id: Some(summary.id),
                        front: card.front,
                        back: card.back,
                    })
                    .await,
            );
        }

        tracing::info!(
            summary_id = summary.id,
            count = cards.len(),
            "Flashcards generated"
        );
        Ok(cards)
    }

    pub async fn list_flashcards(
        &self,
        user_id: EntityId,
        summary_id: Option<EntityId>,
    ) -> Vec<Flashcard> {
        self.store.list_flashcards(user_id, summary_id).await
    }

    pub async fn get_flashcard(&self, id: EntityId) -> Result<Flashcard> {
        self.store
            .get_flashcard(id)
            .await
            .ok_or_else(|| Error::not_found("Flashcard"))
    }

    pub async fn delete_flashcard(&self, id: EntityId) -> Result<()> {
        if !self.store.delete_flashcard(id).await {
            return Err(Error::not_found("Flashcard"));
        }
        Ok(())
    }

    /// Set a flashcard's review interval and mark it studied now.
    /// Any positive interval is accepted, including one lower than the
    /// current value.
    pub async fn update_flashcard_interval(&self, id: EntityId, interval: i64) -> Result<Flashcard> {
        let interval = u32::try_from(interval)
            .ok()
            .filter(|i| *i >= 1)
            .ok_or_else(|| Error::Validation("Interval must be a positive integer".to_string()))?;

        let card = self
            .store
            .update_flashcard(id, interval)
            .await
            .ok_or_else(|| Error::not_found("Flashcard"))?;

        tracing::debug!(flashcard_id = id, interval, "Flashcard interval updated");
        Ok(card)
    }

    // =========================================================================
    // Quiz results and study sessions
    // =========================================================================

    pub async fn record_quiz_result(
        &self,
        user_id: EntityId,
        request: RecordQuizResultRequest,
    ) -> Result<QuizResult> {
        let score = u8::try_from(request.score)
            .ok()
            .filter(|s| *s <= 100)
            .ok_or_else(|| Error::Validation("Score must be between 0 and 100".to_string()))?;
        let total_questions = u32::try_from(request.total_questions)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                Error::Validation("Total questions must be a positive integer".to_string())
            })?;

        let quiz = self.get_quiz(request.quiz_id).await?;

        let result = self
            .store
            .create_quiz_result(NewQuizResult {
                user_id,
                quiz_id: quiz.id,
                score,
                total_questions,
            })
            .await;

        tracing::info!(quiz_id = quiz.id, user_id, score, "Quiz result recorded");
        Ok(result)
    }

    pub async fn list_quiz_results(&self, user_id: EntityId) -> Vec<QuizResult> {
        self.store.list_quiz_results(user_id).await
    }

    /// Record a session and bump the user's streak by one
    pub async fn record_study_session(
        &self,
        user_id: EntityId,
        request: RecordStudySessionRequest,
    ) -> Result<StudySession> {
        let duration = u32::try_from(request.duration)
            .ok()
            .filter(|d| *d >= 1)
            .ok_or_else(|| Error::Validation("Duration must be a positive integer".to_string()))?;
        if request.activity_id < 1 {
            return Err(Error::Validation(
                "Activity ID must be a positive integer".to_string(),
            ));
        }

        let session = self
            .store
            .create_study_session(NewStudySession {
                user_id,
                duration,
                activity_type: request.activity_type,
                activity_id: request.activity_id,
            })
            .await;

        if let Some(user) = self.store.increment_user_streak(user_id).await {
            tracing::debug!(user_id, streak = user.study_streak, "Study streak updated");
        }

        tracing::info!(
            session_id = session.id,
            user_id,
            activity = %session.activity_type,
            duration,
            "Study session recorded"
        );
        Ok(session)
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn stats(&self, user_id: EntityId) -> Result<StudyStats> {
        let user = self.profile(user_id).await?;
        let summaries = self.store.list_summaries(user_id).await;
        let sessions = self.store.list_study_sessions(user_id).await;
        Ok(compute_stats(&user, &summaries, &sessions, Utc::now()))
    }

    pub async fn profile(&self, user_id: EntityId) -> Result<User> {
        self.store
            .get_user(user_id)
            .await
            .ok_or_else(|| Error::not_found("User"))
    }
}

/// Aggregate statistics for records created within the window ending at `now`
pub fn compute_stats(
    user: &User,
    summaries: &[Summary],
    sessions: &[StudySession],
    now: DateTime<Utc>,
) -> StudyStats {
    let since = now - Duration::days(STATS_WINDOW_DAYS);
    let sessions_of = |kind: ActivityType| {
        sessions
            .iter()
            .filter(|s| s.activity_type == kind && s.completed_at >= since)
            .count()
    };

    StudyStats {
        summaries_this_month: summaries.iter().filter(|s| s.created_at >= since).count(),
        quizzes_completed: sessions_of(ActivityType::Quiz),
        flashcards_practiced: sessions_of(ActivityType::Flashcard),
        study_streak: user.study_streak,
    }
}
