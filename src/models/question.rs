//! Question and answer types, including the Open Trivia DB wire shapes.
//!
//! The wire structs (`RawQuestion`, `QuestionsResponse`, `CategoriesResponse`)
//! mirror an external API contract; everything else in the crate works on the
//! decoded [`Question`].

use serde::Deserialize;

use crate::text::decode_entities;

/// Question as delivered by the API, entities still encoded.
#[derive(Clone, Debug, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// Envelope of `https://opentdb.com/api.php`.
#[derive(Debug, Deserialize)]
pub struct QuestionsResponse {
    pub results: Vec<RawQuestion>,
}

/// Envelope of `https://opentdb.com/api_category.php`.
#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    pub trivia_categories: Vec<Category>,
}

/// A trivia category offered by the directory endpoint.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

/// Question difficulty filter accepted by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Query-parameter value expected by the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A fully decoded question. Immutable once fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl Question {
    /// Decode a wire question. Entities are resolved here, once, so that
    /// answer comparison and display always agree.
    pub fn from_raw(raw: RawQuestion) -> Self {
        Self {
            prompt: decode_entities(&raw.question),
            correct_answer: decode_entities(&raw.correct_answer),
            incorrect_answers: raw
                .incorrect_answers
                .iter()
                .map(|a| decode_entities(a))
                .collect(),
        }
    }
}

/// A display option for the current question: decoded text plus whether
/// it is the correct answer. Built once per question display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOption {
    pub text: String,
    pub is_correct: bool,
}

/// Outcome of a single question. Append-only, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerRecord {
    pub was_correct: bool,
    pub was_skipped_or_timed_out: bool,
}
