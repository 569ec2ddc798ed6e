//! Deterministic template generator
//!
//! Produces placeholder artifacts with the same shape a model-backed
//! generator must return. Useful for local development and tests.

use super::types::*;
use super::{read_time_minutes, ContentGenerator};
use crate::config::GenerationConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Characters of the opening paragraph quoted by concise summaries
const CONCISE_EXCERPT_CHARS: usize = 200;

const OPTION_LABELS: [&str; 4] = ["a", "b", "c", "d"];

/// Template-based `ContentGenerator`
pub struct TemplateGenerator {
    latency: Duration,
    flashcard_count: usize,
}

impl TemplateGenerator {
    /// Create a generator with no simulated latency and the default batch size
    pub fn new() -> Self {
        Self::from_config(&GenerationConfig::default())
    }

    /// Create a generator from configuration
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            latency: Duration::from_millis(config.latency_ms),
            flashcard_count: config.flashcard_count,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn concise(text: &str, readability: Readability) -> String {
        let first_paragraph = text
            .split("\n\n")
            .map(str::trim)
            .find(|p| !p.is_empty())
            .unwrap_or("");
        let excerpt: String = first_paragraph.chars().take(CONCISE_EXCERPT_CHARS).collect();

        let lead = match readability {
            Readability::Simple => "Here is the short version of this document.",
            Readability::Academic => {
                "This concise summary condenses the principal claims of the document."
            }
        };
        format!("{} {}...", lead, excerpt)
    }

    fn detailed(title: &str, readability: Readability) -> String {
        match readability {
            Readability::Simple => format!(
                "This is a detailed summary of \"{title}\". It walks through the main points, \
                 the reasons given for them and what the document concludes.\n\n\
                 The most important ideas are explained in plain words, in the same order \
                 the document presents them.\n\n\
                 Where something needs background, a short explanation is added so the \
                 summary can be read on its own."
            ),
            Readability::Academic => format!(
                "This detailed summary of \"{title}\" provides a comprehensive breakdown of \
                 the principal arguments, supporting evidence and conclusions of the text.\n\n\
                 Key concepts are examined in depth while preserving the logical structure \
                 of the original, condensing it to roughly a third of its length.\n\n\
                 Additional context is supplied where necessary to situate the material \
                 within its broader field of inquiry."
            ),
        }
    }

    fn bullet(readability: Readability) -> String {
        let points: &[&str] = match readability {
            Readability::Simple => &[
                "The first big idea in the document",
                "Another important idea",
                "What the author found or decided",
                "An important word and what it means",
                "An example the document uses",
                "How the work was done",
                "A limit or problem the author mentions",
                "What could happen next",
            ],
            Readability::Academic => &[
                "The primary thesis advanced by the document",
                "A secondary concept central to the argument",
                "A significant finding or conclusion",
                "A key term and its formal definition",
                "A notable case study or example",
                "The methodology or analytical approach",
                "An identified limitation or constraint",
                "A direction for future research",
            ],
        };
        points
            .iter()
            .map(|p| format!("• {}", p))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sectioned(readability: Readability) -> String {
        let (intro, args, evidence, conclusions) = match readability {
            Readability::Simple => (
                "What the document is about and why it matters.",
                "The main points the document makes, in order.",
                "The facts and examples used to back up those points.",
                "What the document decides in the end and what it suggests.",
            ),
            Readability::Academic => (
                "Context and background situating the topic of the document.",
                "The primary arguments, organized in logical sequence.",
                "The evidence, examples and data adduced in support of the arguments.",
                "The conclusions reached and their implications or recommendations.",
            ),
        };
        format!(
            "# Introduction\n{intro}\n\n# Main Arguments\n{args}\n\n\
             # Evidence and Support\n{evidence}\n\n# Conclusions\n{conclusions}"
        )
    }

    fn key_terms(title: &str) -> Vec<KeyTerm> {
        (1..=3)
            .map(|i| KeyTerm {
                term: format!("Key Term {}", i),
                definition: format!("Definition of key term {} from \"{}\".", i, title),
            })
            .collect()
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentGenerator for TemplateGenerator {
    async fn summarize(
        &self,
        text: &str,
        title: &str,
        options: SummaryOptions,
    ) -> Result<GeneratedSummary> {
        tracing::debug!(format = %options.format, title, "Generating summary");
        self.simulate_latency().await;

        let content = match options.format {
            SummaryFormat::Concise => Self::concise(text, options.readability),
            SummaryFormat::Detailed => Self::detailed(title, options.readability),
            SummaryFormat::Bullet => Self::bullet(options.readability),
            SummaryFormat::Sectioned => Self::sectioned(options.readability),
        };

        let key_terms = if options.extract_key_terms {
            Self::key_terms(title)
        } else {
            Vec::new()
        };

        Ok(GeneratedSummary {
            content,
            key_terms,
            read_time: read_time_minutes(text),
        })
    }

    async fn generate_quiz(
        &self,
        _summary_text: &str,
        title: &str,
        difficulty: Difficulty,
    ) -> Result<GeneratedQuiz> {
        tracing::debug!(%difficulty, title, "Generating quiz");
        self.simulate_latency().await;

        let questions = (0..difficulty.question_count() as u32)
            .map(|i| QuizQuestion {
                id: i,
                kind: QuestionKind::MultipleChoice,
                question: format!("Question {} about {}?", i + 1, title),
                options: OPTION_LABELS
                    .iter()
                    .map(|label| AnswerOption {
                        id: label.to_string(),
                        text: format!("Answer option {}", label.to_uppercase()),
                    })
                    .collect(),
                correct_answer: OPTION_LABELS[0].to_string(),
            })
            .collect();

        Ok(GeneratedQuiz {
            title: format!("Quiz on {}", title),
            difficulty,
            questions,
        })
    }

    async fn generate_flashcards(
        &self,
        _summary_text: &str,
        title: &str,
    ) -> Result<Vec<GeneratedFlashcard>> {
        tracing::debug!(count = self.flashcard_count, title, "Generating flashcards");
        self.simulate_latency().await;

        Ok((1..=self.flashcard_count)
            .map(|i| GeneratedFlashcard {
                front: format!("Term {} from {}", i, title),
                back: format!("Definition for term {}", i),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "template"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(format: SummaryFormat, extract_key_terms: bool) -> SummaryOptions {
        SummaryOptions {
            format,
            readability: Readability::Simple,
            extract_key_terms,
        }
    }

    #[tokio::test]
    async fn test_summarize_without_key_terms() {
        let generator = TemplateGenerator::new();
        for format in [
            SummaryFormat::Concise,
            SummaryFormat::Detailed,
            SummaryFormat::Bullet,
            SummaryFormat::Sectioned,
        ] {
            let summary = generator
                .summarize("Photosynthesis converts light.", "Biology", options(format, false))
                .await
                .unwrap();
            assert!(summary.key_terms.is_empty(), "format {} leaked key terms", format);
        }
    }

    #[tokio::test]
    async fn test_summarize_with_key_terms() {
        let generator = TemplateGenerator::new();
        let summary = generator
            .summarize("Some text", "Biology", options(SummaryFormat::Concise, true))
            .await
            .unwrap();
        assert_eq!(summary.key_terms.len(), 3);
        assert!(summary.key_terms.iter().all(|k| !k.term.is_empty()));
    }

    #[tokio::test]
    async fn test_concise_quotes_first_paragraph() {
        let generator = TemplateGenerator::new();
        let summary = generator
            .summarize(
                "\n\nFirst paragraph here.\n\nSecond paragraph.",
                "Doc",
                options(SummaryFormat::Concise, false),
            )
            .await
            .unwrap();
        assert!(summary.content.contains("First paragraph here."));
        assert!(!summary.content.contains("Second paragraph"));
        assert_eq!(summary.read_time, 1);
    }

    #[tokio::test]
    async fn test_concise_excerpt_is_bounded() {
        let generator = TemplateGenerator::new();
        let long = "é".repeat(500);
        let summary = generator
            .summarize(&long, "Doc", options(SummaryFormat::Concise, false))
            .await
            .unwrap();
        assert_eq!(summary.content.matches('é').count(), CONCISE_EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn test_format_shapes() {
        let generator = TemplateGenerator::new();

        let bullet = generator
            .summarize("x", "Doc", options(SummaryFormat::Bullet, false))
            .await
            .unwrap();
        assert!(bullet.content.lines().all(|l| l.starts_with("• ")));

        let sectioned = generator
            .summarize("x", "Doc", options(SummaryFormat::Sectioned, false))
            .await
            .unwrap();
        for heading in [
            "# Introduction",
            "# Main Arguments",
            "# Evidence and Support",
            "# Conclusions",
        ] {
            assert!(sectioned.content.contains(heading));
        }

        let detailed = generator
            .summarize("x", "Doc", options(SummaryFormat::Detailed, false))
            .await
            .unwrap();
        assert_eq!(detailed.content.split("\n\n").count(), 3);
    }

    #[tokio::test]
    async fn test_readability_changes_register_not_shape() {
        let generator = TemplateGenerator::new();
        let simple = generator
            .summarize("x", "Doc", options(SummaryFormat::Bullet, false))
            .await
            .unwrap();
        let academic = generator
            .summarize(
                "x",
                "Doc",
                SummaryOptions {
                    format: SummaryFormat::Bullet,
                    readability: Readability::Academic,
                    extract_key_terms: false,
                },
            )
            .await
            .unwrap();
        assert_ne!(simple.content, academic.content);
        assert_eq!(simple.content.lines().count(), academic.content.lines().count());
    }

    #[tokio::test]
    async fn test_quiz_question_counts() {
        let generator = TemplateGenerator::new();
        for (difficulty, expected) in [
            (Difficulty::Easy, 5),
            (Difficulty::Medium, 8),
            (Difficulty::Hard, 10),
        ] {
            let quiz = generator
                .generate_quiz("summary", "Cells", difficulty)
                .await
                .unwrap();
            assert_eq!(quiz.questions.len(), expected);
            assert_eq!(quiz.difficulty, difficulty);
            assert_eq!(quiz.title, "Quiz on Cells");
            assert!(quiz.questions.iter().all(QuizQuestion::is_well_formed));
        }
    }

    #[tokio::test]
    async fn test_quiz_question_ids_unique() {
        let generator = TemplateGenerator::new();
        let quiz = generator
            .generate_quiz("summary", "Cells", Difficulty::Hard)
            .await
            .unwrap();
        let mut ids: Vec<u32> = quiz.questions.iter().map(|q| q.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[tokio::test]
    async fn test_flashcard_batch_size() {
        let generator = TemplateGenerator::new();
        let cards = generator.generate_flashcards("summary", "Cells").await.unwrap();
        assert_eq!(cards.len(), 5);
        assert!(cards[0].front.contains("Cells"));

        let generator = TemplateGenerator::from_config(&GenerationConfig {
            latency_ms: 0,
            flashcard_count: 3,
        });
        let cards = generator.generate_flashcards("summary", "Cells").await.unwrap();
        assert_eq!(cards.len(), 3);
    }
}
