//! Study workflows
//!
//! `StudyService` sequences the store, the file processor and the content
//! generator; `handler` maps it onto the summary, quiz, flashcard and
//! progress routes.

pub mod handler;
pub mod service;
pub mod types;

pub use handler::{study_router, StudyState};
pub use service::{compute_stats, StudyService, STATS_WINDOW_DAYS};
pub use types::*;
