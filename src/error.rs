use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Recipe source error: {0}")]
    Source(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    VoiceUnsupported(String),

    #[error("Voice error: {0}")]
    Voice(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    pub fn log_safe(&self) -> String {
        match self {
            // HTTP errors might carry the full source URL with credentials
            Error::Http(_) => "Recipe source request failed".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),
            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),

            Error::Json(e) => format!("JSON error: {e}"),
            Error::Source(msg) => format!("Recipe source error: {msg}"),
            Error::Config(msg) => format!("Configuration error: {msg}"),
            Error::NotFound(msg) => format!("Not found: {msg}"),
            Error::Validation(msg) => format!("Validation error: {msg}"),
            Error::VoiceUnsupported(msg) => msg.clone(),
            Error::Voice(msg) => format!("Voice error: {msg}"),
            Error::Internal(msg) => format!("Internal error: {msg}"),
        }
    }

    /// Whether this error only means a voice capability is missing
    pub fn is_voice_unsupported(&self) -> bool {
        matches!(self, Error::VoiceUnsupported(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request error: {}", self.log_safe());

        let (status, error_message) = match &self {
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Json(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Error::VoiceUnsupported(msg) => (StatusCode::NOT_IMPLEMENTED, msg.clone()),
            Error::Voice(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Error::Http(_) | Error::Source(_) => (
                StatusCode::BAD_GATEWAY,
                "Recipe source unavailable".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = Error::NotFound("result 3".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            Error::VoiceUnsupported("Speech recognition not supported.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);

        let response = Error::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_voice_unsupported_displays_notice_verbatim() {
        let err = Error::VoiceUnsupported("Speech output not supported.".to_string());
        assert_eq!(err.to_string(), "Speech output not supported.");
        assert!(err.is_voice_unsupported());
        assert!(!Error::Voice("no speech".to_string()).is_voice_unsupported());
    }
}
