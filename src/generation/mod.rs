//! Content generation pipeline
//!
//! Stateless transformation of source text into study artifacts. The
//! `ContentGenerator` trait is the seam for swapping the template backend
//! for a model-backed one; generators never touch storage.
//!
//! ```text
//! document text ─► summarize ─► Summary.content ─┬─► generate_quiz ─► Quiz
//!                                                └─► generate_flashcards ─► Flashcard × N
//! ```

pub mod template;
pub mod types;

pub use template::TemplateGenerator;
pub use types::*;

use crate::error::Result;
use async_trait::async_trait;

/// Average adult reading speed used for read-time estimates
pub const WORDS_PER_MINUTE: usize = 200;

/// Pluggable generation backend.
///
/// Implementations report backend failures (timeouts, rate limits, policy
/// rejections) as `Error::Generation`.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Summarize `text` according to `options`.
    async fn summarize(
        &self,
        text: &str,
        title: &str,
        options: SummaryOptions,
    ) -> Result<GeneratedSummary>;

    /// Build a multiple-choice quiz from summary text.
    async fn generate_quiz(
        &self,
        summary_text: &str,
        title: &str,
        difficulty: Difficulty,
    ) -> Result<GeneratedQuiz>;

    /// Build a batch of front/back flashcards from summary text.
    async fn generate_flashcards(
        &self,
        summary_text: &str,
        title: &str,
    ) -> Result<Vec<GeneratedFlashcard>>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Count whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated reading time in whole minutes, never below one
pub fn read_time_minutes(text: &str) -> u32 {
    let words = word_count(text);
    let minutes = (words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE;
    minutes.max(1) as u32
}
