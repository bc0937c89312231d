use super::Utterance;
use crate::error::{Error, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// A program plus its arguments, split on whitespace (no shell quoting)
#[derive(Debug, Clone, PartialEq, Eq)]
struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    fn parse(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts
            .next()
            .ok_or_else(|| Error::Config("Voice command must not be empty".to_string()))?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// Speaks by running an external program such as `espeak-ng`.
///
/// Arguments may use `{text}`, `{lang}` and `{rate}`; without `{text}` the
/// text is passed as the last argument.
#[derive(Debug)]
pub struct CommandSpeaker {
    command: CommandLine,
    current: Mutex<Option<Child>>,
}

impl CommandSpeaker {
    pub fn parse(command: &str) -> Result<Self> {
        Ok(Self {
            command: CommandLine::parse(command)?,
            current: Mutex::new(None),
        })
    }

    fn render_args(&self, utterance: &Utterance) -> Vec<String> {
        let rate = utterance.rate.to_string();
        let mut has_text = false;

        let mut args: Vec<String> = self
            .command
            .args
            .iter()
            .map(|arg| {
                has_text |= arg.contains("{text}");
                arg.replace("{text}", &utterance.text)
                    .replace("{lang}", &utterance.lang)
                    .replace("{rate}", &rate)
            })
            .collect();

        if !has_text {
            args.push(utterance.text.clone());
        }
        args
    }

    /// Start speaking, stopping whatever was being spoken before.
    /// Returns once the program has started.
    pub async fn speak(&self, utterance: &Utterance) -> Result<()> {
        let mut current = self.current.lock().await;
        if let Some(mut previous) = current.take() {
            // already exited is fine
            let _ = previous.start_kill();
        }

        let child = Command::new(&self.command.program)
            .args(self.render_args(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::Voice(format!(
                    "Failed to start speech command {}: {e}",
                    self.command.program
                ))
            })?;

        debug!("Speaking {} chars with {}", utterance.text.len(), self.command.program);
        *current = Some(child);
        Ok(())
    }

    /// Wait for the utterance in progress to finish
    pub async fn wait(&self) {
        let Some(mut child) = self.current.lock().await.take() else {
            return;
        };

        if let Err(e) = child.wait().await {
            warn!("Failed to wait for speech command: {}", e);
        }
    }

    /// Stop the utterance in progress. Returns whether one was running.
    pub async fn cancel(&self) -> bool {
        let Some(mut child) = self.current.lock().await.take() else {
            return false;
        };

        match child.try_wait() {
            Ok(Some(_)) => false,
            Ok(None) => {
                if let Err(e) = child.start_kill() {
                    warn!("Failed to stop speech command: {}", e);
                }
                true
            }
            Err(e) => {
                warn!("Failed to poll speech command: {}", e);
                false
            }
        }
    }
}

/// Listens by running an external program and reading the transcript it
/// prints on stdout. A run that outlives `timeout` is killed.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    command: CommandLine,
    timeout: Duration,
}

impl CommandRecognizer {
    pub fn parse(command: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            command: CommandLine::parse(command)?,
            timeout,
        })
    }

    pub async fn listen(&self) -> Result<String> {
        debug!("Listening with {}", self.command.program);

        let mut command = Command::new(&self.command.program);
        command
            .args(&self.command.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                Error::Voice(format!(
                    "Recognizer {} timed out after {}s",
                    self.command.program,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                Error::Voice(format!(
                    "Failed to start recognizer {}: {e}",
                    self.command.program
                ))
            })?;

        if !output.status.success() {
            return Err(Error::Voice(format!(
                "Recognizer exited with {}",
                output.status
            )));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            return Err(Error::Voice("No speech recognized".to_string()));
        }

        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTEN_TIMEOUT: Duration = Duration::from_secs(5);

    fn utterance(text: &str) -> Utterance {
        Utterance {
            text: text.to_string(),
            lang: "en-IN".to_string(),
            rate: 1.5,
        }
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(CommandSpeaker::parse("   ").is_err());
        assert!(CommandRecognizer::parse("", LISTEN_TIMEOUT).is_err());
    }

    #[test]
    fn test_render_args_placeholders() {
        let speaker = CommandSpeaker::parse("say -v {lang} -r {rate} {text}").unwrap();
        assert_eq!(
            speaker.render_args(&utterance("Boil water.")),
            vec!["-v", "en-IN", "-r", "1.5", "Boil water."]
        );

        let speaker = CommandSpeaker::parse("espeak-ng -v {lang}").unwrap();
        assert_eq!(
            speaker.render_args(&utterance("Serve.")),
            vec!["-v", "en-IN", "Serve."]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognizer_reads_stdout() {
        let recognizer = CommandRecognizer::parse("echo  tomato, rice ", LISTEN_TIMEOUT).unwrap();
        assert_eq!(recognizer.listen().await.unwrap(), "tomato, rice");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognizer_empty_transcript_is_error() {
        let recognizer = CommandRecognizer::parse("true", LISTEN_TIMEOUT).unwrap();
        assert!(matches!(recognizer.listen().await, Err(Error::Voice(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognizer_times_out() {
        let recognizer = CommandRecognizer::parse("sleep 30", Duration::from_secs(1)).unwrap();

        let started = std::time::Instant::now();
        let result = recognizer.listen().await;

        assert!(started.elapsed() < Duration::from_secs(10));
        match result {
            Err(Error::Voice(message)) => assert!(message.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_speaker_cancel_stops_running_command() {
        let speaker = CommandSpeaker::parse("sleep").unwrap();
        speaker.speak(&utterance("5")).await.unwrap();
        assert!(speaker.cancel().await);
        assert!(!speaker.cancel().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_speaker_wait_reaps_finished_command() {
        let speaker = CommandSpeaker::parse("true").unwrap();
        speaker.speak(&utterance("done")).await.unwrap();
        speaker.wait().await;
        assert!(!speaker.cancel().await);
    }

    #[tokio::test]
    async fn test_missing_program_is_voice_error() {
        let speaker = CommandSpeaker::parse("definitely-not-a-speech-program-xyz").unwrap();
        assert!(matches!(
            speaker.speak(&utterance("hello")).await,
            Err(Error::Voice(_))
        ));
    }
}
