//! Question and category fetching from the Open Trivia Database.
//!
//! The session core consumes [`QuestionSource`]; [`OpenTdbClient`] is the
//! production implementation. Fetch failures are classified into the three
//! cases the welcome screen distinguishes: network trouble, a timed-out
//! request, and a well-formed but empty result.

use std::time::Duration;

use crate::models::{
    CategoriesResponse, Category, Difficulty, Question, QuestionsResponse, RawQuestion,
};
use crate::session::QUESTION_COUNT;

const API_URL: &str = "https://opentdb.com/api.php";
const CATEGORY_URL: &str = "https://opentdb.com/api_category.php";

/// How long a request may take before it counts as timed out.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Why a question fetch failed. All variants are fatal to the start
/// attempt and none to the process; the session returns to idle and the
/// player may retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Request could not be completed (DNS, connection, bad payload, ...).
    Network(String),
    /// Request exceeded [`FETCH_TIMEOUT`].
    Timeout,
    /// The API answered but had no questions for the chosen filters.
    EmptyResult,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(reason) => write!(f, "network error: {}", reason),
            FetchError::Timeout => write!(f, "request timed out"),
            FetchError::EmptyResult => {
                write!(f, "no questions available for the chosen filters")
            }
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Optional narrowing of the question request. Absent means "any".
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionFilters {
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
}

/// Source of ordered question sets, keyed by filters.
pub trait QuestionSource {
    fn fetch_questions(
        &self,
        filters: QuestionFilters,
    ) -> impl Future<Output = Result<Vec<Question>, FetchError>> + Send;
}

/// HTTP client for the two Open Trivia DB endpoints.
pub struct OpenTdbClient {
    http: reqwest::Client,
}

impl OpenTdbClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// List the categories offered by the directory endpoint. Consumed only
    /// by the welcome screen; callers treat failure as "no categories".
    pub async fn list_categories(&self) -> Result<Vec<Category>, FetchError> {
        let response: CategoriesResponse = self
            .http
            .get(CATEGORY_URL)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.trivia_categories)
    }
}

impl Default for OpenTdbClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionSource for OpenTdbClient {
    async fn fetch_questions(
        &self,
        filters: QuestionFilters,
    ) -> Result<Vec<Question>, FetchError> {
        let mut query: Vec<(&str, String)> = vec![
            ("amount", QUESTION_COUNT.to_string()),
            ("type", "multiple".to_string()),
        ];
        if let Some(category) = filters.category {
            query.push(("category", category.to_string()));
        }
        if let Some(difficulty) = filters.difficulty {
            query.push(("difficulty", difficulty.as_str().to_string()));
        }

        let response: QuestionsResponse = self
            .http
            .get(API_URL)
            .query(&query)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        questions_from_results(response.results)
    }
}

/// Turn wire results into decoded questions. Entries without exactly three
/// incorrect answers violate the `type=multiple` contract and are dropped;
/// an empty remainder is a [`FetchError::EmptyResult`].
pub fn questions_from_results(results: Vec<RawQuestion>) -> Result<Vec<Question>, FetchError> {
    let questions: Vec<Question> = results
        .into_iter()
        .filter(|raw| {
            let well_formed = raw.incorrect_answers.len() == 3;
            if !well_formed {
                log::warn!("dropping malformed question: {:?}", raw.question);
            }
            well_formed
        })
        .map(Question::from_raw)
        .collect();

    if questions.is_empty() {
        Err(FetchError::EmptyResult)
    } else {
        Ok(questions)
    }
}
