//! Bearer token verification
//!
//! Tokens are HS256-signed JWTs. Signature and expiry are always checked;
//! the issuer is checked when configured. Claims follow the identity
//! provider's layout: `sub` is required, `user_id` (when present) takes
//! precedence as the stable subject, `email` and `name` are optional.

use crate::config::AuthConfig;
use crate::error::{Error, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Minimum accepted shared-secret length
pub const MIN_SECRET_LEN: usize = 32;

const DEV_SECRET: &str = "study-assistant-dev-secret-not-for-production";

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default)]
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    /// Stable identity-provider subject for this token
    pub fn subject(&self) -> &str {
        self.user_id.as_deref().unwrap_or(&self.sub)
    }
}

/// Input for minting a token
#[derive(Debug, Clone)]
pub struct TokenInput {
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Outcome of token verification
#[derive(Debug)]
pub enum TokenValidation {
    Valid(Claims),
    Invalid(&'static str),
}

/// HS256 token verifier and issuer
#[derive(Clone)]
pub struct TokenVerifier {
    secret: String,
    issuer: Option<String>,
    expiry_seconds: u64,
}

impl TokenVerifier {
    /// Create a verifier. The secret must be at least 32 characters.
    pub fn new(secret: String, issuer: Option<String>) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::Config("JWT secret is required".into()));
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(Error::Config(format!(
                "JWT secret must be at least {} characters",
                MIN_SECRET_LEN
            )));
        }
        Ok(Self {
            secret,
            issuer,
            expiry_seconds: 3600,
        })
    }

    /// Verifier with a fixed development secret
    pub fn new_dev() -> Self {
        Self {
            secret: DEV_SECRET.into(),
            issuer: None,
            expiry_seconds: 3600,
        }
    }

    /// Verifier from configuration. Without a configured secret the
    /// development secret is used.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        match &config.jwt_secret {
            Some(secret) => Self::new(secret.clone(), config.issuer.clone()),
            None => {
                tracing::warn!(
                    "No JWT secret configured, using the development secret. \
                     Set STUDY_ASSISTANT_JWT_SECRET in production."
                );
                Ok(Self {
                    issuer: config.issuer.clone(),
                    ..Self::new_dev()
                })
            }
        }
    }

    /// Lifetime of tokens minted by `generate_token`
    pub fn with_expiry(mut self, expiry_seconds: u64) -> Self {
        self.expiry_seconds = expiry_seconds;
        self
    }

    /// Mint a signed token
    pub fn generate_token(&self, input: TokenInput) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::Internal(format!("System time error: {}", e)))?
            .as_secs();

        let claims = Claims {
            sub: input.subject,
            user_id: None,
            email: input.email,
            name: input.name,
            iss: self.issuer.clone(),
            iat: now,
            exp: now.saturating_add(self.expiry_seconds),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verify signature, expiry and (if configured) issuer
    pub fn verify_token(&self, token: &str) -> TokenValidation {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
            // Without this an `iss`-less token skips the issuer check
            validation.set_required_spec_claims(&["exp", "iss"]);
        }

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(data) if data.claims.subject().is_empty() => TokenValidation::Invalid("Empty subject"),
            Ok(data) => TokenValidation::Valid(data.claims),
            Err(err) => {
                use jsonwebtoken::errors::ErrorKind;
                let reason = match err.kind() {
                    ErrorKind::ExpiredSignature => "Token expired",
                    ErrorKind::InvalidToken => "Invalid token",
                    ErrorKind::InvalidSignature => "Invalid signature",
                    ErrorKind::InvalidIssuer => "Invalid issuer",
                    ErrorKind::MissingRequiredClaim(claim) if claim == "iss" => "Missing issuer",
                    _ => "Token validation failed",
                };
                TokenValidation::Invalid(reason)
            }
        }
    }
}

/// Extract the token from a `Bearer <token>` Authorization header
pub fn extract_token_from_header(auth_header: Option<&str>) -> Option<&str> {
    let token = auth_header?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
