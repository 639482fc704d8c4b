//! Error types for herald

use thiserror::Error;

/// Result type alias for herald operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in herald
///
/// Nothing below the session controller lets one of these escape as a crash:
/// actions fold them into [`crate::actions::ActionResult::Failure`] and the
/// output pipeline folds them into a failed [`crate::voice::BackendAttempt`].
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// External collaborator is not configured or not reachable
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// External collaborator was reached but the call failed
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// Lookup produced no result
    #[error("not found: {0}")]
    NotFound(String),

    /// Input could not be interpreted
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Audio playback error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether this error means the capability is missing rather than broken
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
