//! Request and response bodies for the study API

use crate::error::Error;
use crate::generation::{Difficulty, Readability, SummaryFormat};
use crate::store::{ActivityType, Document, EntityId};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Requests
// =============================================================================

/// POST /api/summaries/generate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummaryRequest {
    pub document_id: EntityId,
    pub format: SummaryFormat,
    pub readability: Readability,
    pub extract_key_terms: bool,
}

/// POST /api/quizzes/generate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    pub summary_id: EntityId,
    pub difficulty: Difficulty,
}

/// POST /api/flashcards/generate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFlashcardsRequest {
    pub summary_id: EntityId,
}

/// PATCH /api/flashcards/:id/interval
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIntervalRequest {
    pub interval: i64,
}

/// POST /api/quiz-results
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuizResultRequest {
    pub quiz_id: EntityId,
    pub score: i64,
    pub total_questions: i64,
}

/// POST /api/study-sessions
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStudySessionRequest {
    /// Seconds
    pub duration: i64,
    pub activity_type: ActivityType,
    pub activity_id: EntityId,
}

/// Query string of GET /api/flashcards
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardQuery {
    pub summary_id: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

/// Document listing entry (extracted text omitted)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub id: EntityId,
    pub title: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub created_at: DateTime<Utc>,
}

impl From<&Document> for DocumentInfo {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            title: doc.title.clone(),
            file_name: doc.file_name.clone(),
            file_type: doc.file_type.clone(),
            file_size: doc.file_size,
            created_at: doc.created_at,
        }
    }
}

/// Result of a delete
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Aggregate study statistics over the trailing 30 days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub summaries_this_month: usize,
    pub quizzes_completed: usize,
    pub flashcards_practiced: usize,
    pub study_streak: u32,
}

// =============================================================================
// Extraction helpers
// =============================================================================

/// JSON body extractor whose rejections surface as 400 validation errors
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| Error::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Parse a path or query ID, naming the entity kind on failure
pub fn parse_id(raw: &str, kind: &str) -> crate::Result<EntityId> {
    raw.trim()
        .parse::<EntityId>()
        .map_err(|_| Error::Validation(format!("Invalid {} ID", kind)))
}
