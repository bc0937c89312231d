use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    api::models::*,
    autocomplete::{Completion, Suggestions},
    config::Settings,
    finder::Finder,
    voice::{Recognizer, Speaker, Utterance},
    Error, Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<Finder>,
    pub speaker: Arc<Speaker>,
    pub recognizer: Arc<Recognizer>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(finder: Finder, settings: Settings) -> Result<Self> {
        Ok(Self {
            finder: Arc::new(finder),
            speaker: Arc::new(Speaker::from_config(&settings.voice)?),
            recognizer: Arc::new(Recognizer::from_config(&settings.voice)?),
            settings,
        })
    }

    /// Speak `text`, reporting failure as a notice instead of an error
    pub(crate) async fn speak(&self, text: &str) -> (bool, Option<String>) {
        let utterance = Utterance::new(text, &self.settings.voice);
        match self.speaker.speak(&utterance).await {
            Ok(()) => (true, None),
            Err(e) => {
                if !e.is_voice_unsupported() {
                    warn!("Speech output failed: {}", e.log_safe());
                }
                (false, Some(e.to_string()))
            }
        }
    }
}

/// GET /api/search - Rank recipes for a comma-separated ingredient list
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    debug!("Search request: {:?}", params);

    let outcome = state.finder.search(&params.q).await;
    Ok(Json(outcome.into()))
}

/// GET /api/suggest - Ingredient suggestions for the token being typed
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Suggestions>> {
    Ok(Json(state.finder.suggest(&params.text, params.cursor())))
}

/// POST /api/suggest/commit - Put a chosen suggestion into the query text
pub async fn commit_suggestion(
    State(state): State<AppState>,
    Json(request): Json<CommitRequest>,
) -> Result<Json<Completion>> {
    if request.suggestion.trim().is_empty() {
        return Err(Error::Validation("Suggestion must not be empty".to_string()));
    }

    let cursor = request
        .cursor
        .unwrap_or_else(|| request.text.chars().count());
    Ok(Json(state.finder.commit(
        &request.text,
        cursor,
        &request.suggestion,
    )))
}

/// GET /api/results/:index/instructions - Instructions of a current result
pub async fn get_instructions(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(params): Query<InstructionsParams>,
) -> Result<Json<InstructionsResponse>> {
    debug!("Instructions request: {}", index);

    let instructions = state
        .finder
        .instructions(index)
        .await
        .ok_or_else(|| Error::NotFound(format!("No result at position {index}")))?;

    let (spoken, notice) = if params.speak {
        state.speak(&instructions.speech).await
    } else {
        (false, None)
    };

    Ok(Json(InstructionsResponse {
        instructions,
        spoken,
        notice,
    }))
}

/// POST /api/voice/listen - Search with a spoken ingredient list
pub async fn listen(State(state): State<AppState>) -> Result<Json<ListenResponse>> {
    let transcript = state.recognizer.listen().await?;
    debug!("Transcript: {}", transcript);

    let outcome = state.finder.search(&transcript).await;
    Ok(Json(ListenResponse {
        transcript,
        search: outcome.into(),
    }))
}

/// POST /api/clear - Forget the current results and stop speaking
pub async fn clear(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    state.finder.clear().await;
    let speech_cancelled = state.speaker.cancel().await;

    Ok(Json(ClearResponse {
        cleared: true,
        speech_cancelled,
    }))
}

/// GET /api/status - Load status and collection size
pub async fn get_status(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    Ok(Json(StatusResponse {
        load: state.finder.status().clone(),
        recipes: state.finder.recipes().len(),
        ingredients: state.finder.vocabulary().len(),
        speech_output: state.speaker.is_supported(),
        speech_recognition: state.recognizer.is_supported(),
    }))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
