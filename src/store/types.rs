//! Entity records and their insert payloads
//!
//! Every record carries a store-assigned `id` and creation timestamp. The
//! `New*` types hold exactly what callers supply; the store fills in the rest.

use crate::generation::{Difficulty, KeyTerm, QuizQuestion, SummaryFormat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entity identifier, unique within its entity type
pub type EntityId = i64;

/// Registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub external_auth_id: Option<String>,
    pub study_streak: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub external_auth_id: Option<String>,
}

/// Uploaded source document with its extracted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: EntityId,
    pub user_id: EntityId,
    pub title: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: EntityId,
    pub title: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub content: String,
}

/// Generated summary of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub id: EntityId,
    pub user_id: EntityId,
    pub document_id: EntityId,
    pub title: String,
    pub content: String,
    pub format: SummaryFormat,
    pub key_terms: Vec<KeyTerm>,
    /// Estimated reading time in minutes
    pub read_time: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSummary {
    pub user_id: EntityId,
    pub document_id: EntityId,
    pub title: String,
    pub content: String,
    pub format: SummaryFormat,
    pub key_terms: Vec<KeyTerm>,
    pub read_time: u32,
}

/// Flashcard with its spaced-repetition state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: EntityId,
    pub user_id: EntityId,
    pub summary_id: Option<EntityId>,
    pub front: String,
    pub back: String,
    pub last_studied: Option<DateTime<Utc>>,
    /// Review interval, always >= 1
    pub interval: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFlashcard {
    pub user_id: EntityId,
    pub summary_id: Option<EntityId>,
    pub front: String,
    pub back: String,
}

/// Multiple-choice quiz derived from a summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: EntityId,
    pub user_id: EntityId,
    pub summary_id: EntityId,
    pub title: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub user_id: EntityId,
    pub summary_id: EntityId,
    pub title: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,
}

/// Outcome of one quiz attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: EntityId,
    pub user_id: EntityId,
    pub quiz_id: EntityId,
    /// Percentage, 0..=100
    pub score: u8,
    pub total_questions: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewQuizResult {
    pub user_id: EntityId,
    pub quiz_id: EntityId,
    pub score: u8,
    pub total_questions: u32,
}

/// Kind of activity a study session covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Summary,
    Flashcard,
    Quiz,
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Flashcard => write!(f, "flashcard"),
            Self::Quiz => write!(f, "quiz"),
        }
    }
}

/// A completed stretch of study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: EntityId,
    pub user_id: EntityId,
    /// Duration in seconds
    pub duration: u32,
    pub activity_type: ActivityType,
    pub activity_id: EntityId,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStudySession {
    pub user_id: EntityId,
    pub duration: u32,
    pub activity_type: ActivityType,
    pub activity_id: EntityId,
}
