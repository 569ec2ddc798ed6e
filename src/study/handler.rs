//! HTTP handlers for the study APIs
//!
//! Summaries, quizzes, flashcards, quiz results, study sessions, statistics
//! and the user profile. Handlers taking `CurrentUser` answer 401 for
//! anonymous requests; by-id reads, deletes and the interval update do not
//! require an identity.

use super::service::StudyService;
use super::types::*;
use crate::auth::CurrentUser;
use crate::error::Error;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use std::sync::Arc;

/// Shared state for study handlers
#[derive(Clone)]
pub struct StudyState {
    pub service: Arc<StudyService>,
}

/// Create the study router
pub fn study_router(state: StudyState) -> Router {
    Router::new()
        .route("/api/summaries/generate", post(generate_summary))
        .route("/api/summaries", get(list_summaries))
        .route(
            "/api/summaries/:id",
            get(get_summary).delete(delete_summary),
        )
        .route("/api/quizzes/generate", post(generate_quiz))
        .route("/api/quizzes", get(list_quizzes))
        .route("/api/quizzes/:id", get(get_quiz).delete(delete_quiz))
        .route("/api/flashcards/generate", post(generate_flashcards))
        .route("/api/flashcards", get(list_flashcards))
        .route(
            "/api/flashcards/:id",
            get(get_flashcard).delete(delete_flashcard),
        )
        .route("/api/flashcards/:id/interval", patch(update_interval))
        .route(
            "/api/quiz-results",
            post(record_quiz_result).get(list_quiz_results),
        )
        .route("/api/study-sessions", post(record_study_session))
        .route("/api/stats", get(get_stats))
        .route("/api/user/profile", get(get_user_profile))
        .with_state(state)
}

// =============================================================================
// Summary handlers
// =============================================================================

/// POST /api/summaries/generate
async fn generate_summary(
    State(state): State<StudyState>,
    CurrentUser(identity): CurrentUser,
    ValidJson(request): ValidJson<GenerateSummaryRequest>,
) -> Result<impl IntoResponse, Error> {
    let summary = state
        .service
        .generate_summary(identity.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/summaries
async fn list_summaries(
    State(state): State<StudyState>,
    CurrentUser(identity): CurrentUser,
) -> impl IntoResponse {
    Json(state.service.list_summaries(identity.user_id).await)
}

/// GET /api/summaries/:id
async fn get_summary(
    State(state): State<StudyState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let id = parse_id(&id, "summary")?;
    Ok(Json(state.service.get_summary(id).await?))
}

/// DELETE /api/summaries/:id
async fn delete_summary(
    State(state): State<StudyState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let id = parse_id(&id, "summary")?;
    state.service.delete_summary(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

// =============================================================================
// Quiz handlers
// =============================================================================

/// POST /api/quizzes/generate
async fn generate_quiz(
    State(state): State<StudyState>,
    CurrentUser(identity): CurrentUser,
    ValidJson(request): ValidJson<GenerateQuizRequest>,
) -> Result<impl IntoResponse, Error> {
    let quiz = state.service.generate_quiz(identity.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// GET /api/quizzes
async fn list_quizzes(
    State(state): State<StudyState>,
    CurrentUser(identity): CurrentUser,
) -> impl IntoResponse {
    Json(state.service.list_quizzes(identity.user_id).await)
}

/// GET /api/quizzes/:id
async fn get_quiz(
    State(state): State<StudyState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let id = parse_id(&id, "quiz")?;
    Ok(Json(state.service.get_quiz(id).await?))
}

/// DELETE /api/quizzes/:id
async fn delete_quiz(
    State(state): State<StudyState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let id = parse_id(&id, "quiz")?;
    state.service.delete_quiz(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

// =============================================================================
// Flashcard handlers
// =============================================================================

/// POST /api/flashcards/generate
async fn generate_flashcards(
    State(state): State<StudyState>,
    CurrentUser(identity): CurrentUser,
    ValidJson(request): ValidJson<GenerateFlashcardsRequest>,
) -> Result<impl IntoResponse, Error> {
    let cards = state
        .service
        .generate_flashcards(identity.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(cards)))
}

/// GET /api/flashcards?summaryId=
async fn list_flashcards(
    State(state): State<StudyState>,
    CurrentUser(identity): CurrentUser,
    Query(query): Query<FlashcardQuery>,
) -> Result<impl IntoResponse, Error> {
    let summary_id = query
        .summary_id
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_id(raw, "summary"))
        .transpose()?;
    Ok(Json(
        state
            .service
            .list_flashcards(identity.user_id, summary_id)
            .await,
    ))
}

/// GET /api/flashcards/:id
async fn get_flashcard(
    State(state): State<StudyState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let id = parse_id(&id, "flashcard")?;
    Ok(Json(state.service.get_flashcard(id).await?))
}

/// DELETE /api/flashcards/:id
async fn delete_flashcard(
    State(state): State<StudyState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let id = parse_id(&id, "flashcard")?;
    state.service.delete_flashcard(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// PATCH /api/flashcards/:id/interval
async fn update_interval(
    State(state): State<StudyState>,
    Path(id): Path<String>,
    ValidJson(request): ValidJson<UpdateIntervalRequest>,
) -> Result<impl IntoResponse, Error> {
    let id = parse_id(&id, "flashcard")?;
    Ok(Json(
        state
            .service
            .update_flashcard_interval(id, request.interval)
            .await?,
    ))
}

// =============================================================================
// Progress handlers
// =============================================================================

/// POST /api/quiz-results
async fn record_quiz_result(
    State(state): State<StudyState>,
    CurrentUser(identity): CurrentUser,
    ValidJson(request): ValidJson<RecordQuizResultRequest>,
) -> Result<impl IntoResponse, Error> {
    let result = state
        .service
        .record_quiz_result(identity.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /api/quiz-results
async fn list_quiz_results(
    State(state): State<StudyState>,
    CurrentUser(identity): CurrentUser,
) -> impl IntoResponse {
    Json(state.service.list_quiz_results(identity.user_id).await)
}

/// POST /api/study-sessions
async fn record_study_session(
    State(state): State<StudyState>,
    CurrentUser(identity): CurrentUser,
    ValidJson(request): ValidJson<RecordStudySessionRequest>,
) -> Result<impl IntoResponse, Error> {
    let session = state
        .service
        .record_study_session(identity.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/stats
async fn get_stats(
    State(state): State<StudyState>,
    CurrentUser(identity): CurrentUser,
) -> Result<impl IntoResponse, Error> {
    Ok(Json(state.service.stats(identity.user_id).await?))
}

// =============================================================================
// User profile handler
// =============================================================================

/// GET /api/user/profile
async fn get_user_profile(
    State(state): State<StudyState>,
    CurrentUser(identity): CurrentUser,
) -> Result<impl IntoResponse, Error> {
    Ok(Json(state.service.profile(identity.user_id).await?))
}
