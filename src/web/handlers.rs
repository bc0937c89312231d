use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use serde::Deserialize;

use crate::{
    api::handlers::AppState,
    error::Error,
    finder::InstructionsView,
    matcher::{ScoredRecipe, SearchOutcome},
    Result,
};

const EMPTY_QUERY_MESSAGE: &str = "Please enter ingredients";
const NO_RESULTS_MESSAGE: &str = "No recipes found";

/// Search page template
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    query: String,
    status: String,
    message: String,
    notice: String,
    cards: Vec<CardData>,
}

#[allow(dead_code)] // Fields are used by Askama templates
struct CardData {
    index: usize,
    title: String,
    image: String,
    percent: u32,
    ingredient_count: usize,
    ingredients: String,
    matched: String,
    expanded: bool,
    steps: Vec<String>,
    text: String,
}

impl CardData {
    fn new(index: usize, scored: &ScoredRecipe) -> Self {
        let matched = if scored.matched.is_empty() {
            "—".to_string()
        } else {
            scored.matched.join(", ")
        };

        Self {
            index,
            title: scored.recipe.title.clone(),
            image: scored.recipe.image.clone(),
            percent: scored.percent(),
            ingredient_count: scored.recipe.ingredients.len(),
            ingredients: scored.recipe.ingredients.join(", "),
            matched,
            expanded: false,
            steps: Vec::new(),
            text: String::new(),
        }
    }

    fn expand(&mut self, view: InstructionsView) {
        self.expanded = true;
        match view {
            InstructionsView::Steps(steps) => self.steps = steps,
            InstructionsView::Text(text) => self.text = text,
        }
    }
}

#[derive(Deserialize)]
pub struct IndexParams {
    /// Absent until the search form is submitted
    q: Option<String>,
    /// Set by the "Hide Instructions" link; stops speech in progress
    #[serde(default)]
    hide: bool,
}

/// GET / - Search page
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse> {
    if params.hide {
        state.speaker.cancel().await;
    }

    let (query, message, cards) = match params.q {
        None => (String::new(), String::new(), Vec::new()),
        Some(query) => {
            let outcome = state.finder.search(&query).await;
            let message = match &outcome {
                SearchOutcome::EmptyQuery => EMPTY_QUERY_MESSAGE,
                outcome if outcome.has_no_matches() => NO_RESULTS_MESSAGE,
                _ => "",
            };
            let cards = cards_for(outcome.results());
            (query, message.to_string(), cards)
        }
    };

    render(IndexTemplate {
        query,
        status: status_message(&state),
        message,
        notice: String::new(),
        cards,
    })
}

/// GET /results/:index - Search page with one result's instructions shown
pub async fn result_page(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<impl IntoResponse> {
    let open = state
        .finder
        .open(index)
        .await
        .ok_or_else(|| Error::NotFound(format!("No result at position {index}")))?;

    let mut cards = cards_for(&open.results);
    if let Some(card) = cards.get_mut(index) {
        card.expand(open.instructions.view);
    }

    // Speaking is best effort here; the page shows the notice if it fails
    let notice = if state.speaker.is_supported() {
        let (_, notice) = state.speak(&open.instructions.speech).await;
        notice.unwrap_or_default()
    } else {
        String::new()
    };

    render(IndexTemplate {
        query: open.query,
        status: status_message(&state),
        message: String::new(),
        notice,
        cards,
    })
}

/// GET /static/app.js - Autocomplete and voice wiring for the search page
pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        include_str!("static/app.js"),
    )
}

fn cards_for(results: &[ScoredRecipe]) -> Vec<CardData> {
    results
        .iter()
        .enumerate()
        .map(|(index, scored)| CardData::new(index, scored))
        .collect()
}

fn status_message(state: &AppState) -> String {
    match state.finder.status() {
        crate::finder::LoadStatus::Failed { message } => message.clone(),
        crate::finder::LoadStatus::Loaded { .. } => String::new(),
    }
}

fn render(template: IndexTemplate) -> Result<Html<String>> {
    Ok(Html(template.render().map_err(|e| {
        Error::Internal(format!("Template render failed: {e}"))
    })?))
}
