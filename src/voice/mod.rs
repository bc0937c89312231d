// Optional speech output and speech input.
//
// Both sides only exchange finished text with the rest of the crate.

pub mod command;

use crate::config::VoiceConfig;
use crate::error::{Error, Result};
use serde::Serialize;
use std::time::Duration;

pub use command::{CommandRecognizer, CommandSpeaker};

pub const SPEECH_OUTPUT_UNSUPPORTED: &str = "Speech output not supported.";
pub const SPEECH_RECOGNITION_UNSUPPORTED: &str = "Speech recognition not supported.";

/// Text to speak and how to speak it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, config: &VoiceConfig) -> Self {
        Self {
            text: text.into(),
            lang: config.lang.clone(),
            rate: config.rate,
        }
    }
}

#[derive(Debug, Default)]
pub enum Speaker {
    #[default]
    Unsupported,
    Command(CommandSpeaker),
}

impl Speaker {
    pub fn from_config(config: &VoiceConfig) -> Result<Self> {
        match &config.speech_command {
            Some(command) => Ok(Speaker::Command(CommandSpeaker::parse(command)?)),
            None => Ok(Speaker::Unsupported),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Speaker::Unsupported)
    }

    pub async fn speak(&self, utterance: &Utterance) -> Result<()> {
        match self {
            Speaker::Unsupported => Err(Error::VoiceUnsupported(
                SPEECH_OUTPUT_UNSUPPORTED.to_string(),
            )),
            Speaker::Command(speaker) => speaker.speak(utterance).await,
        }
    }

    /// Block until the current utterance is done
    pub async fn wait(&self) {
        if let Speaker::Command(speaker) = self {
            speaker.wait().await;
        }
    }

    /// Stop speaking; a no-op without speech output
    pub async fn cancel(&self) -> bool {
        match self {
            Speaker::Unsupported => false,
            Speaker::Command(speaker) => speaker.cancel().await,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum Recognizer {
    #[default]
    Unsupported,
    Command(CommandRecognizer),
}

impl Recognizer {
    pub fn from_config(config: &VoiceConfig) -> Result<Self> {
        match &config.recognizer_command {
            Some(command) => Ok(Recognizer::Command(CommandRecognizer::parse(
                command,
                Duration::from_secs(config.recognizer_timeout_seconds),
            )?)),
            None => Ok(Recognizer::Unsupported),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Recognizer::Unsupported)
    }

    /// Capture one transcript
    pub async fn listen(&self) -> Result<String> {
        match self {
            Recognizer::Unsupported => Err(Error::VoiceUnsupported(
                SPEECH_RECOGNITION_UNSUPPORTED.to_string(),
            )),
            Recognizer::Command(recognizer) => recognizer.listen().await,
        }
    }
}
