use crate::finder::{Instructions, LoadStatus};
use crate::matcher::{ScoredRecipe, SearchOutcome};
use serde::{Deserialize, Serialize};

/// Search request parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Ok,
    EmptyQuery,
    NoMatches,
}

/// Search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub status: SearchStatus,
    pub results: Vec<ResultCard>,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        let status = if outcome.is_empty_query() {
            SearchStatus::EmptyQuery
        } else if outcome.has_no_matches() {
            SearchStatus::NoMatches
        } else {
            SearchStatus::Ok
        };

        let results = outcome
            .into_results()
            .into_iter()
            .enumerate()
            .map(|(index, scored)| ResultCard::new(index, scored))
            .collect();

        Self { status, results }
    }
}

/// One ranked recipe
#[derive(Debug, Clone, Serialize)]
pub struct ResultCard {
    /// Position in the current results, used to ask for instructions
    pub index: usize,
    pub percent: u32,
    #[serde(flatten)]
    pub scored: ScoredRecipe,
}

impl ResultCard {
    pub fn new(index: usize, scored: ScoredRecipe) -> Self {
        Self {
            index,
            percent: scored.percent(),
            scored,
        }
    }
}

/// Autocomplete request parameters; the cursor defaults to the end of the text
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub text: String,
    pub cursor: Option<usize>,
}

impl SuggestParams {
    pub fn cursor(&self) -> usize {
        self.cursor.unwrap_or_else(|| self.text.chars().count())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitRequest {
    pub text: String,
    pub cursor: Option<usize>,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstructionsParams {
    #[serde(default)]
    pub speak: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstructionsResponse {
    #[serde(flatten)]
    pub instructions: Instructions,
    pub spoken: bool,
    /// Shown to the user when speech output is unavailable or failed
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListenResponse {
    pub transcript: String,
    #[serde(flatten)]
    pub search: SearchResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
    pub speech_cancelled: bool,
}

/// Load status and collection size
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub load: LoadStatus,
    pub recipes: usize,
    pub ingredients: usize,
    pub speech_output: bool,
    pub speech_recognition: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}
