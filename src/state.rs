//! Shared session state
//!
//! One [`SessionState`] exists per session and is handed around as an
//! `Arc`. Only the session loop writes it; the output pipeline and background
//! tasks read it from anywhere.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::Config;

/// Mutable state of a running session
#[derive(Debug)]
pub struct SessionState {
    privacy_mode: AtomicBool,
    listening_enabled: AtomicBool,
    active_voice_id: RwLock<Option<String>>,
}

impl SessionState {
    /// Create state with the given privacy mode and listening enabled
    #[must_use]
    pub const fn new(privacy_mode: bool) -> Self {
        Self {
            privacy_mode: AtomicBool::new(privacy_mode),
            listening_enabled: AtomicBool::new(true),
            active_voice_id: RwLock::new(None),
        }
    }

    /// Create state from configuration
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self::new(config.assistant.privacy_mode)
    }

    /// Whether audible output is suppressed
    #[must_use]
    pub fn privacy_mode(&self) -> bool {
        self.privacy_mode.load(Ordering::SeqCst)
    }

    /// Set privacy mode
    pub fn set_privacy_mode(&self, enabled: bool) {
        self.privacy_mode.store(enabled, Ordering::SeqCst);
        tracing::info!(enabled, "privacy mode changed");
    }

    /// Flip privacy mode and return the new value
    pub fn toggle_privacy_mode(&self) -> bool {
        let enabled = !self.privacy_mode.fetch_xor(true, Ordering::SeqCst);
        tracing::info!(enabled, "privacy mode toggled");
        enabled
    }

    /// Whether the session loop should keep going
    #[must_use]
    pub fn listening_enabled(&self) -> bool {
        self.listening_enabled.load(Ordering::SeqCst)
    }

    /// Ask the session loop to terminate after the current cycle
    pub fn stop_listening(&self) {
        self.listening_enabled.store(false, Ordering::SeqCst);
    }

    /// Voice bound for the primary speech tier, if any
    #[must_use]
    pub fn active_voice_id(&self) -> Option<String> {
        self.active_voice_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Bind or clear the primary tier voice
    pub fn set_active_voice_id(&self, voice_id: Option<String>) {
        *self
            .active_voice_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = voice_id;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(false)
    }
}
