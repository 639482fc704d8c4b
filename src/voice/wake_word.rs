//! Wake phrase gating
//!
//! Wraps another capture and only lets through utterances that contain the
//! wake phrase, with the phrase removed.

use async_trait::async_trait;

use super::capture::{Capture, CaptureOutcome};

/// Capture that requires a wake phrase
pub struct WakeWordCapture<C> {
    inner: C,
    wake_word: String,
}

impl<C: Capture> WakeWordCapture<C> {
    #[must_use]
    pub fn new(inner: C, wake_word: &str) -> Self {
        let wake_word = wake_word.trim().to_lowercase();
        tracing::debug!(wake_word, "wake word gating enabled");
        Self { inner, wake_word }
    }

    #[must_use]
    pub fn wake_word(&self) -> &str {
        &self.wake_word
    }
}

#[async_trait]
impl<C: Capture> Capture for WakeWordCapture<C> {
    async fn capture(&mut self) -> CaptureOutcome {
        loop {
            match self.inner.capture().await {
                CaptureOutcome::Utterance(text) => {
                    match extract_command(&text, &self.wake_word) {
                        None => tracing::trace!(transcript = %text, "no wake word, ignoring"),
                        Some(command) if command.is_empty() => {
                            tracing::info!("wake word detected");
                            return CaptureOutcome::Activated;
                        }
                        Some(command) => {
                            tracing::info!(command, "wake word detected");
                            return CaptureOutcome::Utterance(command);
                        }
                    }
                }
                other => return other,
            }
        }
    }
}

/// Text following the wake phrase, or `None` if the phrase is absent
fn extract_command(transcript: &str, wake_word: &str) -> Option<String> {
    let lower = transcript.to_lowercase();
    let pos = lower.find(wake_word)?;

    Some(
        lower[pos + wake_word.len()..]
            .trim_start_matches(|c: char| c.is_whitespace() || c == ',' || c == '.')
            .trim_end()
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command() {
        assert_eq!(
            extract_command("Hey Assistant, what's the weather?", "hey assistant").as_deref(),
            Some("what's the weather?")
        );
        assert_eq!(
            extract_command("Hey Assistant", "hey assistant").as_deref(),
            Some("")
        );
        assert_eq!(extract_command("what's the weather", "hey assistant"), None);
    }
}
