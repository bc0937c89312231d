use crate::autocomplete::{self, Completion, Suggester, Suggestions};
use crate::config::Settings;
use crate::error::Result;
use crate::matcher::{self, ScoredRecipe, SearchOutcome};
use crate::recipe::{normalize, Loader, RawCollection, Recipe, RecipeSource, Vocabulary};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load recipes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadStatus {
    Loaded { recipes: usize },
    Failed { message: String },
}

impl LoadStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadStatus::Failed { .. })
    }
}

/// What "view instructions" shows for one result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum InstructionsView {
    Steps(Vec<String>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instructions {
    pub index: usize,
    pub title: String,
    pub view: InstructionsView,
    /// The text handed to speech output
    pub speech: String,
}

impl Instructions {
    fn for_recipe(index: usize, recipe: &Recipe) -> Self {
        let view = if recipe.steps.is_empty() {
            InstructionsView::Text(recipe.instructions.clone())
        } else {
            InstructionsView::Steps(recipe.steps.clone())
        };

        Self {
            index,
            title: recipe.title.clone(),
            view,
            speech: recipe.instructions.clone(),
        }
    }
}

/// The current results with one of them opened, read under a single lock
#[derive(Debug, Clone)]
pub struct OpenResult {
    pub query: String,
    pub results: Vec<ScoredRecipe>,
    pub instructions: Instructions,
}

/// The most recent search, replaced as a whole by the next one
#[derive(Debug, Default)]
struct Session {
    query: String,
    results: Vec<ScoredRecipe>,
}

/// Owns the recipe collection, its vocabulary and the current results
#[derive(Debug)]
pub struct Finder {
    recipes: Vec<Recipe>,
    vocabulary: Vocabulary,
    status: LoadStatus,
    suggester: Suggester,
    current: RwLock<Session>,
}

impl Finder {
    /// Normalize every record, in order
    pub fn from_collection(raw: &RawCollection, suggester: Suggester) -> Self {
        let mut vocabulary = Vocabulary::new();
        let recipes: Vec<Recipe> = raw
            .records
            .iter()
            .map(|record| normalize(record, &mut vocabulary))
            .collect();

        Self {
            status: LoadStatus::Loaded {
                recipes: recipes.len(),
            },
            recipes,
            vocabulary,
            suggester,
            current: RwLock::new(Session::default()),
        }
    }

    /// An empty finder that remembers why loading failed
    pub fn failed(message: impl Into<String>, suggester: Suggester) -> Self {
        Self {
            recipes: Vec::new(),
            vocabulary: Vocabulary::new(),
            status: LoadStatus::Failed {
                message: message.into(),
            },
            suggester,
            current: RwLock::new(Session::default()),
        }
    }

    /// Fetch the configured source once. Never fails: any error leaves an
    /// empty collection with a failed status.
    pub async fn load(settings: &Settings) -> Self {
        let suggester = Suggester::new(settings.suggest.limit);

        match fetch_collection(settings).await {
            Ok(raw) => {
                let finder = Self::from_collection(&raw, suggester);
                info!(
                    "Loaded {} recipes ({} known ingredients)",
                    finder.recipes.len(),
                    finder.vocabulary.len()
                );
                finder
            }
            Err(e) => {
                warn!(
                    "Failed to load recipes from {}: {}",
                    settings.source.location,
                    e.log_safe()
                );
                Self::failed(LOAD_FAILED_MESSAGE, suggester)
            }
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Rank the collection and make the ranking the current results
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let outcome = matcher::search(query, &self.recipes);
        *self.current.write().await = Session {
            query: query.to_string(),
            results: outcome.results().to_vec(),
        };
        outcome
    }

    pub fn suggest(&self, text: &str, cursor: usize) -> Suggestions {
        self.suggester.suggest(text, cursor, &self.vocabulary)
    }

    pub fn commit(&self, text: &str, cursor: usize, suggestion: &str) -> Completion {
        let token = autocomplete::in_progress_token(text, cursor, &self.vocabulary);
        autocomplete::commit(text, cursor, &token, suggestion)
    }

    /// A result of the most recent search, by position
    pub async fn result(&self, index: usize) -> Option<ScoredRecipe> {
        self.current.read().await.results.get(index).cloned()
    }

    pub async fn current_results(&self) -> Vec<ScoredRecipe> {
        self.current.read().await.results.clone()
    }

    /// The query text of the most recent search
    pub async fn current_query(&self) -> String {
        self.current.read().await.query.clone()
    }

    pub async fn instructions(&self, index: usize) -> Option<Instructions> {
        self.current
            .read()
            .await
            .results
            .get(index)
            .map(|scored| Instructions::for_recipe(index, &scored.recipe))
    }

    /// Query, results and the instructions of `index`, all from the same search
    pub async fn open(&self, index: usize) -> Option<OpenResult> {
        let session = self.current.read().await;
        let scored = session.results.get(index)?;

        Some(OpenResult {
            instructions: Instructions::for_recipe(index, &scored.recipe),
            query: session.query.clone(),
            results: session.results.clone(),
        })
    }

    pub async fn clear(&self) {
        *self.current.write().await = Session::default();
    }
}

async fn fetch_collection(settings: &Settings) -> Result<RawCollection> {
    let source = RecipeSource::parse(&settings.source.location)?;
    let loader = Loader::new(&settings.source)?;
    loader.load(&source).await
}
