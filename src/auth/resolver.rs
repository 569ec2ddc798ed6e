//! Request identity resolution
//!
//! `attach_identity` runs on every request: it verifies the bearer token,
//! finds or creates the matching user and stores an `Identity` in the
//! request extensions. A missing or invalid credential leaves the request
//! anonymous; handlers that need a user take the `CurrentUser` extractor,
//! which rejects anonymous requests with 401.

use super::token::{extract_token_from_header, Claims, TokenValidation, TokenVerifier};
use crate::error::Error;
use crate::store::{EntityId, EntityStore, NewUser};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Identity-provider subject
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Internal user ID
    pub user_id: EntityId,
}

/// Maps verified credentials to store-backed users
pub struct AuthResolver {
    verifier: TokenVerifier,
    store: Arc<EntityStore>,
    /// Serializes find-or-create so one subject never yields two users
    provisioning: Mutex<()>,
}

impl AuthResolver {
    pub fn new(verifier: TokenVerifier, store: Arc<EntityStore>) -> Self {
        Self {
            verifier,
            store,
            provisioning: Mutex::new(()),
        }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Resolve an Authorization header value to an identity
    pub async fn resolve(&self, auth_header: Option<&str>) -> Option<Identity> {
        let token = extract_token_from_header(auth_header)?;
        match self.verifier.verify_token(token) {
            TokenValidation::Valid(claims) => Some(self.identity_for(&claims).await),
            TokenValidation::Invalid(reason) => {
                tracing::debug!(reason, "Ignoring bearer credential");
                None
            }
        }
    }

    /// Find the user for verified claims, creating one on first sight
    pub async fn identity_for(&self, claims: &Claims) -> Identity {
        let subject = claims.subject();

        let user = match self.store.get_user_by_external_id(subject).await {
            Some(user) => user,
            None => {
                let _guard = self.provisioning.lock().await;
                match self.store.get_user_by_external_id(subject).await {
                    Some(user) => user,
                    None => {
                        let user = self.store.create_user(new_user_from_claims(claims)).await;
                        tracing::info!(
                            user_id = user.id,
                            username = %user.username,
                            "Provisioned user for new subject"
                        );
                        user
                    }
                }
            }
        };

        Identity {
            subject: subject.to_string(),
            email: claims.email.clone(),
            display_name: claims.name.clone(),
            user_id: user.id,
        }
    }
}

fn email_local_part(email: Option<&str>) -> Option<&str> {
    email
        .and_then(|e| e.split('@').next())
        .filter(|local| !local.is_empty())
}

/// User record for a subject seen for the first time
fn new_user_from_claims(claims: &Claims) -> NewUser {
    let subject = claims.subject();
    let local = email_local_part(claims.email.as_deref());

    let username = match local {
        Some(local) => local.to_string(),
        None => format!("user-{}", subject.chars().take(8).collect::<String>()),
    };
    let name = claims
        .name
        .clone()
        .or_else(|| local.map(str::to_string))
        .unwrap_or_else(|| "User".to_string());

    NewUser {
        username,
        email: claims.email.clone().unwrap_or_default(),
        name: Some(name),
        external_auth_id: Some(subject.to_string()),
    }
}

/// Middleware attaching an `Identity` extension when the request carries a
/// valid bearer token
pub async fn attach_identity(
    State(resolver): State<Arc<AuthResolver>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let identity = resolver.resolve(header.as_deref()).await;
    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}

/// Extractor for handlers that require an authenticated user
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or(Error::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::TokenInput;

    fn make_resolver() -> (AuthResolver, Arc<EntityStore>) {
        let store = Arc::new(EntityStore::new());
        (
            AuthResolver::new(TokenVerifier::new_dev(), store.clone()),
            store,
        )
    }

    fn token(resolver: &AuthResolver, subject: &str, email: Option<&str>) -> String {
        resolver
            .verifier()
            .generate_token(TokenInput {
                subject: subject.to_string(),
                email: email.map(str::to_string),
                name: None,
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_creates_user_once() {
        let (resolver, store) = make_resolver();
        let header = format!("Bearer {}", token(&resolver, "uid-abc", Some("ada@example.com")));

        let first = resolver.resolve(Some(&header)).await.unwrap();
        let second = resolver.resolve(Some(&header)).await.unwrap();
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(first.subject, "uid-abc");
        assert_eq!(first.email.as_deref(), Some("ada@example.com"));

        let user = store.get_user(first.user_id).await.unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.name.as_deref(), Some("ada"));
        assert_eq!(user.external_auth_id.as_deref(), Some("uid-abc"));
        assert!(store.get_user(first.user_id + 1).await.is_none());
    }

    #[tokio::test]
    async fn test_username_fallback_without_email() {
        let (resolver, store) = make_resolver();
        let header = format!("Bearer {}", token(&resolver, "0123456789abcdef", None));

        let identity = resolver.resolve(Some(&header)).await.unwrap();
        let user = store.get_user(identity.user_id).await.unwrap();
        assert_eq!(user.username, "user-01234567");
        assert_eq!(user.email, "");
        assert_eq!(user.name.as_deref(), Some("User"));
    }

    #[tokio::test]
    async fn test_invalid_credentials_leave_identity_unset() {
        let (resolver, store) = make_resolver();
        assert!(resolver.resolve(None).await.is_none());
        assert!(resolver.resolve(Some("Bearer not-a-token")).await.is_none());
        assert!(resolver.resolve(Some("Basic dXNlcjpwYXNz")).await.is_none());

        let forged = TokenVerifier::new("some-other-secret-that-is-32-chars-long".into(), None)
            .unwrap()
            .generate_token(TokenInput {
                subject: "uid-evil".into(),
                email: None,
                name: None,
            })
            .unwrap();
        assert!(resolver
            .resolve(Some(&format!("Bearer {}", forged)))
            .await
            .is_none());
        assert!(store.get_user_by_external_id("uid-evil").await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_first_requests_share_user() {
        let store = Arc::new(EntityStore::new());
        let resolver = Arc::new(AuthResolver::new(TokenVerifier::new_dev(), store.clone()));
        let header = format!("Bearer {}", token(&resolver, "uid-race", None));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let resolver = resolver.clone();
            let header = header.clone();
            handles.push(tokio::spawn(async move {
                resolver.resolve(Some(&header)).await.unwrap().user_id
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 1);
        }
        assert!(store.get_user(2).await.is_none());
    }

    #[test]
    fn test_email_local_part() {
        assert_eq!(email_local_part(Some("ada@example.com")), Some("ada"));
        assert_eq!(email_local_part(Some("@example.com")), None);
        assert_eq!(email_local_part(None), None);
    }
}
