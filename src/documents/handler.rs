//! HTTP handlers for the Documents API
//!
//! - POST   /api/documents/upload  (multipart field `file`)
//! - GET    /api/documents
//! - GET    /api/documents/:id
//! - DELETE /api/documents/:id

use crate::auth::CurrentUser;
use crate::error::Error;
use crate::study::types::{parse_id, DeleteResponse, DocumentInfo};
use crate::study::StudyService;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared state for document handlers
#[derive(Clone)]
pub struct DocumentsState {
    pub service: Arc<StudyService>,
    pub max_upload_bytes: usize,
}

/// Create the documents router
pub fn documents_router(state: DocumentsState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    Router::new()
        .route(
            "/api/documents/upload",
            post(upload_document).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/documents", get(list_documents))
        .route(
            "/api/documents/:id",
            get(get_document).delete(delete_document),
        )
        .with_state(state)
}

/// POST /api/documents/upload
async fn upload_document(
    State(state): State<DocumentsState>,
    CurrentUser(identity): CurrentUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(e.body_text()))?;

        let document = state
            .service
            .upload_document(identity.user_id, &file_name, &mime_type, &bytes)
            .await?;
        return Ok((StatusCode::CREATED, Json(DocumentInfo::from(&document))));
    }

    Err(Error::Validation("No file uploaded".to_string()))
}

/// GET /api/documents
async fn list_documents(
    State(state): State<DocumentsState>,
    CurrentUser(identity): CurrentUser,
) -> impl IntoResponse {
    let documents = state.service.list_documents(identity.user_id).await;
    Json(documents.iter().map(DocumentInfo::from).collect::<Vec<_>>())
}

/// GET /api/documents/:id
async fn get_document(
    State(state): State<DocumentsState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let id = parse_id(&id, "document")?;
    Ok(Json(state.service.get_document(id).await?))
}

/// DELETE /api/documents/:id
async fn delete_document(
    State(state): State<DocumentsState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let id = parse_id(&id, "document")?;
    state.service.delete_document(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
