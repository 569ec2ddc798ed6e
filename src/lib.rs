//! Study Assistant - document summaries, quizzes and flashcards over HTTP
//!
//! Users upload documents, generate summaries from them, derive quizzes and
//! flashcards from those summaries, and track their study activity.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        HTTP API (axum)                       │
//! │   attach_identity ─► documents / study handlers              │
//! └──────────────┬──────────────────────────────┬────────────────┘
//!                │                              │
//! ┌──────────────▼──────────────┐  ┌────────────▼───────────────┐
//! │        AuthResolver         │  │        StudyService        │
//! │  - verify bearer JWT        │  │  - sequence each operation │
//! │  - find or create user      │  │  - validate references     │
//! └──────────────┬──────────────┘  └──────┬─────────────┬───────┘
//!                │                        │             │
//!                │               ┌────────▼──────┐ ┌────▼─────────────┐
//!                │               │ FileProcessor │ │ ContentGenerator │
//!                │               └───────────────┘ └──────────────────┘
//! ┌──────────────▼────────────────────────▼──────────────────────┐
//! │                   EntityStore (in memory)                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`]: Router assembly, health probe, CORS
//! - [`auth`]: Token verification and identity resolution
//! - [`documents`]: Upload storage, text extraction, document routes
//! - [`generation`]: Content generator trait and template backend
//! - [`store`]: In-memory entity repository
//! - [`study`]: Study service and its routes
//! - [`config`]: Configuration management

pub mod api;
pub mod auth;
pub mod config;
pub mod documents;
pub mod error;
pub mod generation;
pub mod store;
pub mod study;

pub use config::AppConfig;
pub use error::{Error, Result};
