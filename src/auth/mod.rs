//! Authentication for the study API
//!
//! Provides:
//! - HS256 bearer token verification (and minting for development)
//! - Resolution of verified subjects to store-backed users
//! - Middleware and extractor wiring for axum handlers

pub mod resolver;
pub mod token;

pub use resolver::{attach_identity, AuthResolver, CurrentUser, Identity};
pub use token::{extract_token_from_header, Claims, TokenInput, TokenValidation, TokenVerifier};
