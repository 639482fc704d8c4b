//! Configuration management for herald
//!
//! Every option has a default so the assistant runs with no configuration at
//! all, degraded to the OS voice, the local engine or plain text. Values come
//! from an optional TOML file and are then overridden by environment variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::Result;

/// Values shipped in sample config files that mean "not configured"
const PLACEHOLDER_PREFIX: &str = "YOUR_";

/// herald configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Assistant behaviour
    pub assistant: AssistantConfig,

    /// Speech output configuration
    pub voice: VoiceConfig,

    /// API keys for external services
    pub api_keys: ApiKeys,

    /// Weather lookups
    pub weather: WeatherConfig,

    /// Encyclopedia lookups
    pub encyclopedia: EncyclopediaConfig,

    /// Notes, to-do list and workspace locations
    pub storage: StorageConfig,

    /// Bounds handed to the capture collaborator
    pub capture: CaptureConfig,

    /// Extra spoken application names mapped to launch commands
    pub apps: HashMap<String, String>,
}

/// Assistant behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Start with audible output disabled
    pub privacy_mode: bool,

    /// Ignore utterances that do not contain the wake phrase
    pub wake_word_mode: bool,

    /// Wake phrase used when `wake_word_mode` is set
    pub wake_word: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            privacy_mode: false,
            wake_word_mode: false,
            wake_word: "hey assistant".to_string(),
        }
    }
}

/// Speech output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Use ElevenLabs as the primary tier when a key is present
    pub elevenlabs_enabled: bool,

    /// Name of the ElevenLabs voice to bind at startup
    pub voice_name: String,

    /// ElevenLabs model identifier
    pub model: String,

    /// Words per minute for the local engine
    pub tts_rate: u32,

    /// Volume for the local engine (0.0 to 1.0)
    pub tts_volume: f32,

    /// Upper bound for a single backend attempt
    pub backend_timeout_secs: u64,

    /// How long a synthesized audio file is kept for playback
    pub cleanup_grace_secs: u64,

    /// Audio player command for synthesized files (autodetected if unset)
    pub player: Option<String>,

    /// ElevenLabs API base URL
    pub elevenlabs_url: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            elevenlabs_enabled: true,
            voice_name: "default_voice".to_string(),
            model: "eleven_multilingual_v2".to_string(),
            tts_rate: 180,
            tts_volume: 0.9,
            backend_timeout_secs: 30,
            cleanup_grace_secs: 10,
            player: None,
            elevenlabs_url: "https://api.elevenlabs.io".to_string(),
        }
    }
}

impl VoiceConfig {
    /// Upper bound for a single backend attempt
    #[must_use]
    pub const fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    /// Delay before a synthesized audio file is deleted
    #[must_use]
    pub const fn cleanup_grace(&self) -> Duration {
        Duration::from_secs(self.cleanup_grace_secs)
    }
}

/// API keys for external services
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    /// `ElevenLabs` API key (primary voice tier)
    pub elevenlabs: Option<String>,

    /// `OpenWeatherMap` API key
    pub openweather: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("ApiKeys")
            .field("elevenlabs", &redact(&self.elevenlabs))
            .field("openweather", &redact(&self.openweather))
            .finish()
    }
}

/// Weather lookups
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Enable the weather action
    pub enabled: bool,

    /// `OpenWeatherMap` API base URL
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openweathermap.org".to_string(),
        }
    }
}

/// Encyclopedia lookups
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncyclopediaConfig {
    /// Wikipedia base URL
    pub base_url: String,

    /// Number of summary sentences to speak
    pub sentences: usize,
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org".to_string(),
            sentences: 2,
        }
    }
}

/// Notes, to-do list and workspace locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Append-only notes file
    pub notes_file: PathBuf,

    /// Line-per-task to-do file
    pub todo_file: PathBuf,

    /// Root for folder/file commands and screenshots
    pub workspace: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = data_dir();
        Self {
            notes_file: data_dir.join("quick_notes.txt"),
            todo_file: data_dir.join("todo.txt"),
            workspace: PathBuf::from("."),
        }
    }
}

/// Bounds handed to the capture collaborator
///
/// The bundled text capture applies only `listen_timeout_secs`. The
/// microphone settings are passed through for an external speech front end
/// that reads the same file and pipes transcripts in.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Microphone energy level treated as speech (speech front end only)
    pub energy_threshold: u32,

    /// Let the speech front end adapt the threshold to ambient noise
    pub dynamic_energy_threshold: bool,

    /// Seconds to wait for an utterance before reporting a timeout
    pub listen_timeout_secs: u64,

    /// Longest utterance in seconds (speech front end only)
    pub phrase_time_limit_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            energy_threshold: 4000,
            dynamic_energy_threshold: true,
            listen_timeout_secs: 5,
            phrase_time_limit_secs: 10,
        }
    }
}

impl CaptureConfig {
    /// Time to wait for an utterance
    #[must_use]
    pub const fn listen_timeout(&self) -> Duration {
        Duration::from_secs(self.listen_timeout_secs)
    }
}

/// Return the data directory for notes and to-do files
///
/// Uses `~/.local/share/herald` on Linux
#[must_use]
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "omni", "herald")
        .map_or_else(|| PathBuf::from("."), |d| d.data_dir().to_path_buf())
}

impl Config {
    /// Load configuration from a file and the environment
    ///
    /// An explicit `path` must exist and parse. Without one, `./herald.toml`
    /// and the user config directory are searched; a broken discovered file
    /// is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the explicit config file cannot be read or parsed
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::discover(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Search standard locations for a config file
    fn discover() -> Self {
        let candidates = [
            Some(PathBuf::from("herald.toml")),
            directories::ProjectDirs::from("dev", "omni", "herald")
                .map(|d| d.config_dir().join("config.toml")),
        ];

        for path in candidates.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to load config, using defaults"
                    );
                }
            }
        }

        tracing::info!("no config file found, using defaults");
        Self::default()
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("ELEVENLABS_API_KEY") {
            self.api_keys.elevenlabs = Some(key);
        }
        if let Some(key) = lookup("OPENWEATHER_API_KEY") {
            self.api_keys.openweather = Some(key);
        }
        if let Some(name) = lookup("CUSTOM_VOICE_NAME") {
            self.voice.voice_name = name;
        }
        if let Some(value) = lookup("HERALD_PRIVACY_MODE") {
            self.assistant.privacy_mode = parse_flag(&value);
        }
        if let Some(phrase) = lookup("HERALD_WAKE_WORD") {
            let phrase = phrase.trim().to_lowercase();
            if !phrase.is_empty() {
                self.assistant.wake_word_mode = true;
                self.assistant.wake_word = phrase;
            }
        }
        if let Some(path) = lookup("HERALD_NOTES_FILE") {
            self.storage.notes_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("HERALD_TODO_FILE") {
            self.storage.todo_file = PathBuf::from(path);
        }
    }

    /// `ElevenLabs` key, if one is really configured
    #[must_use]
    pub fn elevenlabs_key(&self) -> Option<&str> {
        usable_key(self.api_keys.elevenlabs.as_deref())
    }

    /// `OpenWeatherMap` key, if one is really configured
    #[must_use]
    pub fn openweather_key(&self) -> Option<&str> {
        usable_key(self.api_keys.openweather.as_deref())
    }
}

fn usable_key(key: Option<&str>) -> Option<&str> {
    key.map(str::trim)
        .filter(|k| !k.is_empty() && !k.starts_with(PLACEHOLDER_PREFIX))
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("on")
}
