//! In-memory entity repository
//!
//! Holds users, documents, summaries, flashcards, quizzes, quiz results and
//! study sessions for the lifetime of the process. Constructed once at
//! startup and shared with the service layer through an `Arc`.

pub mod repository;
pub mod types;

pub use repository::EntityStore;
pub use types::*;
