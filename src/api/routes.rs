use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::api::handlers::{self as api_handlers, AppState};
use crate::web::handlers as web_handlers;

/// Create the router with all endpoints (API + Web UI)
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/search", get(api_handlers::search_recipes))
        .route("/suggest", get(api_handlers::suggest))
        .route("/suggest/commit", post(api_handlers::commit_suggestion))
        .route(
            "/results/:index/instructions",
            get(api_handlers::get_instructions),
        )
        .route("/voice/listen", post(api_handlers::listen))
        .route("/clear", post(api_handlers::clear))
        .route("/status", get(api_handlers::get_status))
        .with_state(state.clone());

    let web_routes = Router::new()
        .route("/", get(web_handlers::index))
        .route("/results/:index", get(web_handlers::result_page))
        .route("/static/app.js", get(web_handlers::script))
        .with_state(state.clone());

    let health_routes = Router::new().route("/health", get(api_handlers::health_check));

    Router::new()
        .merge(web_routes)
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(RequestBodyLimitLayer::new(
            state.settings.server.max_request_body_size,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(
                "default-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; object-src 'none'; base-uri 'self'",
            ),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::Suggester;
    use crate::finder::Finder;
    use crate::recipe::RawCollection;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let raw = RawCollection::from_value(&json!({
            "drinks": [
                {"name": "Tea", "ingredients": "water, tea leaves, sugar",
                 "instructions": "Boil water.\nAdd tea.\nServe."}
            ],
            "mains": [
                {"title": "Tomato Rice", "ingredients": ["rice", "tomato", "turmeric"],
                 "steps": ["Cook rice.", "Fold in tomato."]}
            ]
        }));
        let finder = Finder::from_collection(&raw, Suggester::default());
        AppState::new(finder, crate::config::test_settings("./recipe.json")).unwrap()
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_search_then_instructions() {
        let state = create_test_state();

        let (status, body) = get_json(create_router(state.clone()), "/api/search?q=tea").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["results"][0]["title"], "Tea");
        assert_eq!(body["results"][0]["matched"], json!(["tea leaves"]));
        assert_eq!(body["results"][0]["percent"], 33);

        let (status, body) =
            get_json(create_router(state.clone()), "/api/results/0/instructions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["kind"], "steps");
        assert_eq!(body["speech"], "Boil water. Add tea. Serve.");

        let (status, _) = get_json(create_router(state), "/api/results/1/instructions").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_speak_without_speech_output_returns_notice() {
        let state = create_test_state();
        state.finder.search("rice").await;

        let (status, body) = get_json(
            create_router(state),
            "/api/results/0/instructions?speak=true",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["spoken"], false);
        assert_eq!(body["notice"], "Speech output not supported.");
    }

    #[tokio::test]
    async fn test_search_statuses() {
        let state = create_test_state();

        let (_, body) = get_json(create_router(state.clone()), "/api/search?q=+,+").await;
        assert_eq!(body["status"], "empty_query");

        let (_, body) = get_json(create_router(state), "/api/search?q=saffron").await;
        assert_eq!(body["status"], "no_matches");
        assert_eq!(body["results"], json!([]));
    }

    #[tokio::test]
    async fn test_suggest_and_commit() {
        let state = create_test_state();

        let (_, body) = get_json(create_router(state.clone()), "/api/suggest?text=rice,%20t").await;
        assert_eq!(body["token"], "t");
        assert_eq!(body["suggestions"], json!(["tea leaves", "tomato", "turmeric"]));

        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/suggest/commit")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"text": "rice, to", "suggestion": "tomato"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"text": "rice, tomato, ", "cursor": 14}));
    }

    #[tokio::test]
    async fn test_listen_unsupported() {
        let response = create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/voice/listen")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_status_and_health() {
        let state = create_test_state();

        let (status, body) = get_json(create_router(state.clone()), "/api/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["load"], json!({"state": "loaded", "recipes": 2}));
        assert_eq!(body["ingredients"], 6);
        assert_eq!(body["speech_output"], false);

        let (status, body) = get_json(create_router(state), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    async fn get_page(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    /// A speaker that "reads" a recipe whose instructions are a sleep duration
    #[cfg(unix)]
    fn sleeping_speaker_state() -> AppState {
        let raw = RawCollection::from_value(&json!([
            {"title": "Slow Dal", "ingredients": ["dal", "salt"], "instructions": "30"}
        ]));
        let finder = Finder::from_collection(&raw, Suggester::default());
        let mut settings = crate::config::test_settings("./recipe.json");
        settings.voice.speech_command = Some("sleep".to_string());
        AppState::new(finder, settings).unwrap()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hide_instructions_stops_speech() {
        let state = sleeping_speaker_state();

        let (status, _) = get_page(create_router(state.clone()), "/?q=dal").await;
        assert_eq!(status, StatusCode::OK);

        // a plain search leaves the utterance running
        let (status, html) = get_page(create_router(state.clone()), "/results/0").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("hide=true"));
        get_page(create_router(state.clone()), "/?q=dal").await;
        assert!(state.speaker.cancel().await);

        let (status, _) = get_page(create_router(state.clone()), "/results/0").await;
        assert_eq!(status, StatusCode::OK);
        let (status, html) = get_page(create_router(state.clone()), "/?q=dal&hide=true").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Slow Dal"));
        assert!(!state.speaker.cancel().await);
    }

    #[tokio::test]
    async fn test_script_converts_cursor_units() {
        let (status, script) = get_page(create_router(create_test_state()), "/static/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(script.contains("cursor: String(cursorChars())"));
        assert!(script.contains("charsToUnits(completion.text, completion.cursor)"));
    }

    #[tokio::test]
    async fn test_index_page_renders() {
        let state = create_test_state();
        let response = create_router(state)
            .oneshot(Request::builder().uri("/?q=rice").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Tomato Rice"));
        assert!(html.contains("33%"));
    }
}
