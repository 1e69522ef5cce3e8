//! # trivia-quiz
//!
//! A terminal trivia game backed by the Open Trivia Database.
//!
//! The player enters a name, picks a category and difficulty, and answers
//! ten multiple-choice questions under a 15-second countdown each. The final
//! score earns an achievement tier, and the best score (plus the last-used
//! name) is persisted across runs.
//!
//! The interesting part is the session core in [`session`]: a small state
//! machine over the question set, the answer log and the countdown, with a
//! resolve-once lock that makes clicks and timer expiry race-free. The
//! ratatui screens in `ui` render what the session exposes and nothing more.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trivia_quiz::{run, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     run(RunOptions {
//!         name: None,
//!         category: None,
//!         difficulty: None,
//!         store_path: "trivia_store.json".into(),
//!     })
//!     .await
//! }
//! ```

mod app;
mod models;
mod session;
mod source;
mod store;
mod summary;
pub mod terminal;
mod text;
mod ui;

pub use app::{run, App, RunOptions, Screen};
pub use models::{AnswerOption, AnswerRecord, Category, Difficulty, Question};
pub use session::{Phase, QuizSession, QUESTION_COUNT, QUESTION_SECONDS};
pub use source::{FetchError, OpenTdbClient, QuestionFilters, QuestionSource};
pub use store::{FileStore, KeyValueStore, MemoryStore, DEFAULT_STORE_PATH};
pub use summary::{Achievement, Summary};
pub use text::decode_entities;
