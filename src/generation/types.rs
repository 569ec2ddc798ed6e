//! Generation wire types
//!
//! Options accepted by the generators and the artifacts they produce. The
//! quiz question and key term shapes are stored verbatim on `Quiz` and
//! `Summary` records, so they double as persisted types.

use serde::{Deserialize, Serialize};

/// Summary layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFormat {
    Concise,
    Detailed,
    Bullet,
    Sectioned,
}

impl std::fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Concise => write!(f, "concise"),
            Self::Detailed => write!(f, "detailed"),
            Self::Bullet => write!(f, "bullet"),
            Self::Sectioned => write!(f, "sectioned"),
        }
    }
}

/// Summary register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readability {
    Simple,
    Academic,
}

/// Quiz difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Number of questions a quiz of this difficulty carries
    pub fn question_count(self) -> usize {
        match self {
            Self::Easy => 5,
            Self::Medium => 8,
            Self::Hard => 10,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// Options for `ContentGenerator::summarize`
#[derive(Debug, Clone, Copy)]
pub struct SummaryOptions {
    pub format: SummaryFormat,
    pub readability: Readability,
    pub extract_key_terms: bool,
}

/// A term and its definition pulled from source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTerm {
    pub term: String,
    pub definition: String,
}

/// Summarizer output
#[derive(Debug, Clone)]
pub struct GeneratedSummary {
    pub content: String,
    pub key_terms: Vec<KeyTerm>,
    /// Estimated reading time in minutes
    pub read_time: u32,
}

/// Question kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
}

/// A labeled answer option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
}

/// A single quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question: String,
    pub options: Vec<AnswerOption>,
    pub correct_answer: String,
}

impl QuizQuestion {
    /// Whether `correct_answer` names one of this question's own options
    pub fn is_well_formed(&self) -> bool {
        self.options.iter().any(|o| o.id == self.correct_answer)
    }
}

/// Quiz generator output
#[derive(Debug, Clone)]
pub struct GeneratedQuiz {
    pub title: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,
}

/// One generated front/back pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFlashcard {
    pub front: String,
    pub back: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&SummaryFormat::Sectioned).unwrap(),
            "\"sectioned\""
        );
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"hard\"");
        let r: Readability = serde_json::from_str("\"academic\"").unwrap();
        assert_eq!(r, Readability::Academic);
        assert!(serde_json::from_str::<SummaryFormat>("\"haiku\"").is_err());
    }

    #[test]
    fn test_question_count() {
        assert_eq!(Difficulty::Easy.question_count(), 5);
        assert_eq!(Difficulty::Medium.question_count(), 8);
        assert_eq!(Difficulty::Hard.question_count(), 10);
    }

    #[test]
    fn test_quiz_question_serialization() {
        let q = QuizQuestion {
            id: 0,
            kind: QuestionKind::MultipleChoice,
            question: "What is 2 + 2?".to_string(),
            options: vec![
                AnswerOption { id: "a".into(), text: "4".into() },
                AnswerOption { id: "b".into(), text: "5".into() },
            ],
            correct_answer: "a".to_string(),
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "multiple_choice");
        assert_eq!(json["correctAnswer"], "a");
        assert!(q.is_well_formed());

        let bad = QuizQuestion {
            correct_answer: "z".to_string(),
            ..q
        };
        assert!(!bad.is_well_formed());
    }
}
