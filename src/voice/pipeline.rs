//! Layered response rendering
//!
//! Every response is echoed to the screen, then spoken by the first backend
//! that succeeds. A backend that errors, panics or overruns its timeout is
//! skipped; when none succeeds the user still has the text.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tempfile::TempPath;
use tokio::sync::Mutex;

use super::backends::SpeechBackend;
use super::screen::Screen;
use crate::SessionState;
use crate::background::Background;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CLEANUP_GRACE: Duration = Duration::from_secs(10);

/// How insistently a response should be presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Urgency {
    #[default]
    Normal,
    /// Out-of-band notifications such as expired timers
    Alert,
}

/// A response to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRequest {
    pub text: String,
    pub urgency: Urgency,
}

impl OutputRequest {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            urgency: Urgency::Normal,
        }
    }

    #[must_use]
    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            urgency: Urgency::Alert,
        }
    }
}

impl From<String> for OutputRequest {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for OutputRequest {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Result of one backend attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutcome {
    Ok,
    Timeout,
    Error(String),
}

impl fmt::Display for BackendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Timeout => f.write_str("timeout"),
            Self::Error(e) => write!(f, "error: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendAttempt {
    pub backend: &'static str,
    pub outcome: BackendOutcome,
}

/// How the response finally reached the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Privacy mode, no backend attempted
    TextOnly,
    /// Spoken by the named backend
    Spoken(&'static str),
    /// Every backend failed
    TextFallback,
}

/// What `render` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub attempts: Vec<BackendAttempt>,
    pub delivery: Delivery,
}

impl RenderReport {
    #[must_use]
    pub const fn spoken(&self) -> bool {
        matches!(self.delivery, Delivery::Spoken(_))
    }
}

/// Renders responses through the ordered backend chain
pub struct OutputPipeline {
    state: Arc<SessionState>,
    screen: Arc<dyn Screen>,
    backends: Vec<Arc<dyn SpeechBackend>>,
    timeout: Duration,
    cleanup_grace: Duration,
    background: Background,
    speak_lock: Mutex<()>,
}

impl OutputPipeline {
    /// Create a pipeline with no speech backends
    #[must_use]
    pub fn new(state: Arc<SessionState>, screen: Arc<dyn Screen>, background: Background) -> Self {
        Self {
            state,
            screen,
            backends: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            cleanup_grace: DEFAULT_CLEANUP_GRACE,
            background,
            speak_lock: Mutex::new(()),
        }
    }

    /// Append a backend; backends are tried in the order added
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn SpeechBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// Bound each backend attempt
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// How long audio artifacts live after playback starts
    #[must_use]
    pub const fn with_cleanup_grace(mut self, grace: Duration) -> Self {
        self.cleanup_grace = grace;
        self
    }

    #[must_use]
    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    #[must_use]
    pub fn screen(&self) -> &Arc<dyn Screen> {
        &self.screen
    }

    #[must_use]
    pub const fn background(&self) -> &Background {
        &self.background
    }

    /// Render a response
    ///
    /// Never fails: the text is always shown, and backend faults are
    /// recorded in the report.
    pub async fn render(&self, request: impl Into<OutputRequest>) -> RenderReport {
        let request = request.into();

        match request.urgency {
            Urgency::Normal => self.screen.show(&format!("Assistant: {}", request.text)),
            Urgency::Alert => self.screen.show(&format!("Assistant (alert): {}", request.text)),
        }

        if self.state.privacy_mode() {
            self.screen.show("[PRIVACY MODE] Text-only mode");
            return RenderReport {
                attempts: Vec::new(),
                delivery: Delivery::TextOnly,
            };
        }

        let _guard = self.speak_lock.lock().await;
        let mut attempts = Vec::new();

        for backend in &self.backends {
            if !backend.is_ready(&self.state) {
                tracing::trace!(backend = backend.name(), "backend not ready");
                continue;
            }

            let outcome = self.attempt(backend.as_ref(), &request.text).await;
            let spoken = outcome == BackendOutcome::Ok;
            if !spoken {
                tracing::warn!(backend = backend.name(), outcome = %outcome, "speech backend failed");
            }
            attempts.push(BackendAttempt {
                backend: backend.name(),
                outcome,
            });

            if spoken {
                return RenderReport {
                    attempts,
                    delivery: Delivery::Spoken(backend.name()),
                };
            }
        }

        self.screen.show("[TTS not available - text only]");
        RenderReport {
            attempts,
            delivery: Delivery::TextFallback,
        }
    }

    async fn attempt(&self, backend: &dyn SpeechBackend, text: &str) -> BackendOutcome {
        let speak = std::panic::AssertUnwindSafe(backend.speak(text, &self.state)).catch_unwind();

        match tokio::time::timeout(self.timeout, speak).await {
            Err(_) => BackendOutcome::Timeout,
            Ok(Err(_)) => BackendOutcome::Error("backend panicked".to_string()),
            Ok(Ok(Err(e))) => BackendOutcome::Error(e.to_string()),
            Ok(Ok(Ok(artifact))) => {
                if let Some(path) = artifact {
                    self.schedule_cleanup(path);
                }
                BackendOutcome::Ok
            }
        }
    }

    fn schedule_cleanup(&self, artifact: TempPath) {
        let grace = self.cleanup_grace;
        self.background
            .spawn_with_token("artifact-cleanup", move |token| async move {
                tokio::select! {
                    () = token.cancelled() => {}
                    () = tokio::time::sleep(grace) => {}
                }
                let shown = artifact.display().to_string();
                if let Err(e) = artifact.close() {
                    tracing::debug!(path = %shown, error = %e, "failed to remove audio artifact");
                }
            });
    }
}
