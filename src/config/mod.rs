use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Where the recipe collection is read from when nothing is configured
pub const DEFAULT_RECIPE_SOURCE: &str = "./recipe.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub suggest: SuggestConfig,
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL or file path of the recipe collection
    pub location: String,
    pub max_size: usize,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub speech_command: Option<String>,
    pub recognizer_command: Option<String>,
    /// Upper bound on one recognizer run
    pub recognizer_timeout_seconds: u64,
    pub lang: String,
    pub rate: f32,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PORT value".to_string()))?;

        let max_request_body_size = std::env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| "65536".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_REQUEST_BODY_SIZE value".to_string()))?;

        let location = std::env::var("RECIPE_SOURCE")
            .unwrap_or_else(|_| DEFAULT_RECIPE_SOURCE.to_string());

        let max_size = std::env::var("MAX_SOURCE_SIZE")
            .unwrap_or_else(|_| "10485760".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_SOURCE_SIZE value".to_string()))?;

        let timeout_seconds = std::env::var("FETCH_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid FETCH_TIMEOUT value".to_string()))?;

        let limit = std::env::var("SUGGESTION_LIMIT")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid SUGGESTION_LIMIT value".to_string()))?;

        let speech_command = non_empty_var("SPEECH_COMMAND");
        let recognizer_command = non_empty_var("RECOGNIZER_COMMAND");
        let recognizer_timeout_seconds = std::env::var("RECOGNIZER_TIMEOUT")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid RECOGNIZER_TIMEOUT value".to_string()))?;
        let lang = std::env::var("SPEECH_LANG").unwrap_or_else(|_| "en-IN".to_string());
        let rate = std::env::var("SPEECH_RATE")
            .unwrap_or_else(|_| "1.0".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid SPEECH_RATE value".to_string()))?;

        Ok(Settings {
            server: ServerConfig {
                host,
                port,
                max_request_body_size,
            },
            source: SourceConfig {
                location,
                max_size,
                timeout_seconds,
                user_agent: format!("Pantry/{}", env!("CARGO_PKG_VERSION")),
            },
            suggest: SuggestConfig { limit },
            voice: VoiceConfig {
                speech_command,
                recognizer_command,
                recognizer_timeout_seconds,
                lang,
                rate,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.suggest.limit == 0 {
            return Err(Error::Config(
                "Suggestion limit must be non-zero".to_string(),
            ));
        }

        if self.source.max_size == 0 {
            return Err(Error::Config(
                "Maximum source size must be non-zero".to_string(),
            ));
        }

        if self.voice.recognizer_timeout_seconds == 0 {
            return Err(Error::Config(
                "Recognizer timeout must be non-zero".to_string(),
            ));
        }

        if !(self.voice.rate > 0.0) {
            return Err(Error::Config("Speech rate must be positive".to_string()));
        }

        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) fn test_settings(location: &str) -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_request_body_size: 65536,
        },
        source: SourceConfig {
            location: location.to_string(),
            max_size: 1_048_576,
            timeout_seconds: 5,
            user_agent: "test".to_string(),
        },
        suggest: SuggestConfig { limit: 5 },
        voice: VoiceConfig {
            speech_command: None,
            recognizer_command: None,
            recognizer_timeout_seconds: 15,
            lang: "en-IN".to_string(),
            rate: 1.0,
        },
    }
}
