//! Unified API router for the study assistant
//!
//! Merges the module routers into a single axum `Router` with identity
//! resolution, CORS and request tracing.
//!
//! ## Endpoint Map
//!
//! | Prefix                 | Module    | Description                        |
//! |------------------------|-----------|------------------------------------|
//! | `/health`              | api       | Health probe                       |
//! | `/api/documents/*`     | documents | Upload, list, read, delete         |
//! | `/api/summaries/*`     | study     | Generate, list, read, delete       |
//! | `/api/quizzes/*`       | study     | Generate, list, read, delete       |
//! | `/api/flashcards/*`    | study     | Generate, list, read, delete, interval |
//! | `/api/quiz-results`    | study     | Record and list quiz results       |
//! | `/api/study-sessions`  | study     | Record study sessions              |
//! | `/api/stats`           | study     | Aggregate statistics               |
//! | `/api/user/profile`    | study     | Current user                       |

use crate::auth::{attach_identity, AuthResolver, TokenVerifier};
use crate::config::AppConfig;
use crate::documents::{documents_router, DocumentsState, FileProcessor};
use crate::error::Result;
use crate::generation::{ContentGenerator, TemplateGenerator};
use crate::store::EntityStore;
use crate::study::{study_router, StudyService, StudyState};
use axum::{
    http::{header, Method},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Combined application state holding references to all subsystems
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EntityStore>,
    pub service: Arc<StudyService>,
    pub resolver: Arc<AuthResolver>,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Wire the store, generator, file processor and auth resolver from
    /// configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let verifier = TokenVerifier::from_config(&config.auth)?;
        let generator: Arc<dyn ContentGenerator> =
            Arc::new(TemplateGenerator::from_config(&config.generation));
        Ok(Self::new(
            verifier,
            generator,
            FileProcessor::new(
                config.storage.uploads_dir.clone(),
                config.server.max_upload_bytes,
            ),
            config.server.max_upload_bytes,
        ))
    }

    /// Assemble state around a fresh, empty store
    pub fn new(
        verifier: TokenVerifier,
        generator: Arc<dyn ContentGenerator>,
        files: FileProcessor,
        max_upload_bytes: usize,
    ) -> Self {
        let store = Arc::new(EntityStore::new());
        let service = Arc::new(StudyService::new(store.clone(), generator, files));
        let resolver = Arc::new(AuthResolver::new(verifier, store.clone()));
        Self {
            store,
            service,
            resolver,
            max_upload_bytes,
        }
    }
}

/// Build the complete HTTP application
///
/// Merges all module routers, resolves bearer identities on every request,
/// and adds CORS and tracing middleware.
pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    let cors = build_cors(cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .merge(documents_router(DocumentsState {
            service: state.service.clone(),
            max_upload_bytes: state.max_upload_bytes,
        }))
        .merge(study_router(StudyState {
            service: state.service.clone(),
        }))
        .layer(middleware::from_fn_with_state(
            state.resolver.clone(),
            attach_identity,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// =============================================================================
// Root handlers
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenInput;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "study-assistant-app-boundary";

    fn make_app() -> (Router, AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.storage.uploads_dir = dir.path().join("uploads");
        let state = AppState::from_config(&config).unwrap();
        (build_app(state.clone(), &[]), state, dir)
    }

    fn bearer(state: &AppState, subject: &str) -> String {
        let token = state
            .resolver
            .verifier()
            .generate_token(TokenInput {
                subject: subject.to_string(),
                email: Some(format!("{}@example.com", subject)),
                name: None,
            })
            .unwrap();
        format!("Bearer {}", token)
    }

    fn upload(auth: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"hello.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nHello world\r\n--{b}--\r\n",
            b = BOUNDARY
        );
        Request::builder()
            .method("POST")
            .uri("/api/documents/upload")
            .header("authorization", auth)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn authed_json(
        method: &str,
        uri: &str,
        auth: &str,
        body: serde_json::Value,
    ) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", auth)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn authed_get(uri: &str, auth: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("authorization", auth)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _state, _dir) = make_app();
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_upload_summarize_flashcards_end_to_end() {
        let (app, state, _dir) = make_app();
        let auth = bearer(&state, "uid-ada");

        let resp = app.clone().oneshot(upload(&auth)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let doc = body_json(resp).await;
        assert_eq!(doc["fileSize"], 11);
        assert_eq!(doc["title"], "hello");

        let resp = app
            .clone()
            .oneshot(authed_json(
                "POST",
                "/api/summaries/generate",
                &auth,
                json!({
                    "documentId": doc["id"],
                    "format": "concise",
                    "readability": "simple",
                    "extractKeyTerms": false
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let summary = body_json(resp).await;
        assert_eq!(summary["readTime"], 1);

        let resp = app
            .clone()
            .oneshot(authed_json(
                "POST",
                "/api/flashcards/generate",
                &auth,
                json!({ "summaryId": summary["id"] }),
            ))
            .await
            .unwrap();
        let cards = body_json(resp).await;
        let cards = cards.as_array().unwrap();
        assert_eq!(cards.len(), 5);
        assert!(cards
            .iter()
            .all(|c| c["interval"] == 1 && c["lastStudied"].is_null()));

        // Interval updates need no identity
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/flashcards/{}/interval", cards[0]["id"]))
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "interval": 2 }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let card = body_json(resp).await;
        assert_eq!(card["interval"], 2);
        assert!(!card["lastStudied"].is_null());

        let resp = app
            .oneshot(authed_get("/api/user/profile", &auth))
            .await
            .unwrap();
        let profile = body_json(resp).await;
        assert_eq!(profile["username"], "uid-ada");
        assert_eq!(profile["externalAuthId"], "uid-ada");
    }

    #[tokio::test]
    async fn test_missing_or_forged_token_is_unauthorized() {
        let (app, _state, _dir) = make_app();

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/documents")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let forged = TokenVerifier::new("an-unrelated-secret-of-32-or-more-chars".into(), None)
            .unwrap()
            .generate_token(TokenInput {
                subject: "uid-mallory".into(),
                email: None,
                name: None,
            })
            .unwrap();
        let resp = app
            .oneshot(authed_get("/api/stats", &format!("Bearer {}", forged)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let (app, state, _dir) = make_app();
        let ada = bearer(&state, "uid-ada");
        let bob = bearer(&state, "uid-bob");

        let resp = app.clone().oneshot(upload(&ada)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = app
            .clone()
            .oneshot(authed_get("/api/documents", &ada))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

        let resp = app
            .oneshot(authed_get("/api/documents", &bob))
            .await
            .unwrap();
        assert!(body_json(resp).await.as_array().unwrap().is_empty());
        assert!(state.store.get_user_by_external_id("uid-bob").await.is_some());
    }

    #[tokio::test]
    async fn test_unknown_document_is_not_found() {
        let (app, _state, _dir) = make_app();
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/documents/999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["message"], "Document not found");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_configured_origin() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.storage.uploads_dir = dir.path().join("uploads");
        let app = build_app(
            AppState::from_config(&config).unwrap(),
            &[
                "http://localhost:5173".to_string(),
                "https://study.example.com".to_string(),
            ],
        );

        let preflight = |origin: &str| {
            Request::builder()
                .method("OPTIONS")
                .uri("/api/documents")
                .header("origin", origin)
                .header("access-control-request-method", "GET")
                .body(Body::empty())
                .unwrap()
        };

        let resp = app
            .clone()
            .oneshot(preflight("https://study.example.com"))
            .await
            .unwrap();
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("https://study.example.com")
        );

        let resp = app.oneshot(preflight("https://evil.example.com")).await.unwrap();
        assert!(resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_configured_issuer_rejects_issuerless_token() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.storage.uploads_dir = dir.path().join("uploads");
        config.auth.issuer = Some("https://id.example.com".into());
        let state = AppState::from_config(&config).unwrap();
        let app = build_app(state.clone(), &[]);

        // Same development secret, but no `iss` claim
        let issuerless = TokenVerifier::new_dev()
            .generate_token(TokenInput {
                subject: "uid-eve".into(),
                email: None,
                name: None,
            })
            .unwrap();
        let resp = app
            .clone()
            .oneshot(authed_get("/api/stats", &format!("Bearer {}", issuerless)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(state.store.get_user_by_external_id("uid-eve").await.is_none());

        let resp = app
            .oneshot(authed_get("/api/user/profile", &bearer(&state, "uid-ada")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn test_from_config_rejects_short_secret() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("short".into());
        assert!(AppState::from_config(&config).is_err());
    }
}
