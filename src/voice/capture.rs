//! Utterance capture
//!
//! Speech-to-text lives outside the assistant. A front end transcribes audio
//! and hands over one utterance at a time; the bundled [`TextCapture`] reads
//! those transcripts line by line, so anything that can write to a pipe can
//! drive the session.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Result of one capture attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A transcribed utterance
    Utterance(String),
    /// Nothing was heard before the listen timeout
    Timeout,
    /// Something was heard but could not be transcribed
    Unintelligible,
    /// The wake phrase was heard on its own
    Activated,
    /// The input source is gone
    Closed,
}

/// Source of utterances
#[async_trait]
pub trait Capture: Send {
    /// Wait for the next utterance
    async fn capture(&mut self) -> CaptureOutcome;
}

/// Reads one transcript per line
pub struct TextCapture<R> {
    lines: Lines<R>,
    timeout: Option<Duration>,
}

impl TextCapture<BufReader<Stdin>> {
    /// Read transcripts from standard input
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> TextCapture<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            timeout: None,
        }
    }

    /// Report [`CaptureOutcome::Timeout`] when no line arrives in time
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl<R> Capture for TextCapture<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn capture(&mut self) -> CaptureOutcome {
        // next_line is cancel safe, so a timed out read loses nothing
        let line = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.lines.next_line()).await {
                Ok(line) => line,
                Err(_) => return CaptureOutcome::Timeout,
            },
            None => self.lines.next_line().await,
        };

        match line {
            Ok(Some(text)) if text.trim().is_empty() => CaptureOutcome::Unintelligible,
            Ok(Some(text)) => CaptureOutcome::Utterance(text.trim().to_string()),
            Ok(None) => CaptureOutcome::Closed,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read transcript");
                CaptureOutcome::Closed
            }
        }
    }
}
