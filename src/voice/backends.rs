//! Speech backends, tried in order by the output pipeline
//!
//! 1. [`ElevenLabsBackend`]: cloud voice, played by a detached audio player
//! 2. [`SystemVoiceBackend`]: the OS speech service (`say`, `spd-say`, SAPI)
//! 3. [`LocalEngineBackend`]: `espeak-ng` / `espeak`

use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempPath;
use tokio::process::Command;

use super::tts::ElevenLabs;
use crate::config::VoiceConfig;
use crate::{Error, Result, SessionState};

/// A speech output tier
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Whether this tier can be attempted right now
    fn is_ready(&self, _state: &SessionState) -> bool {
        true
    }

    /// Speak `text`
    ///
    /// Returns a temporary audio file the pipeline must delete once playback
    /// is done, if the backend produced one.
    async fn speak(&self, text: &str, state: &SessionState) -> Result<Option<TempPath>>;
}

/// Guard against text being read as a command line option
fn as_text_arg(text: &str) -> String {
    if text.starts_with('-') {
        format!(" {text}")
    } else {
        text.to_string()
    }
}

async fn run_engine(mut command: Command, backend: &str) -> Result<()> {
    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::Tts(format!("{backend} exited with {status}")))
    }
}

/// Audio player for synthesized files
#[derive(Debug, Clone)]
pub struct Player {
    program: PathBuf,
    args: Vec<String>,
}

/// Players tried in order, with arguments placed before the file path
const PLAYERS: &[(&str, &[&str])] = &[
    ("mpv", &["--no-video", "--really-quiet"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("mpg123", &["-q"]),
    ("afplay", &[]),
];

impl Player {
    /// Find a player, preferring `configured`
    #[must_use]
    pub fn detect(configured: Option<&str>) -> Option<Self> {
        if let Some(command) = configured {
            let mut parts = command.split_whitespace();
            let program = which::which(parts.next()?).ok()?;
            return Some(Self {
                program,
                args: parts.map(ToString::to_string).collect(),
            });
        }

        PLAYERS.iter().find_map(|(name, args)| {
            which::which(name).ok().map(|program| Self {
                program,
                args: args.iter().map(ToString::to_string).collect(),
            })
        })
    }

    /// Start playback without waiting for it to finish
    fn play(&self, path: &std::path::Path) -> Result<()> {
        Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Audio(format!("failed to start player: {e}")))?;
        Ok(())
    }
}

/// Primary tier: `ElevenLabs` synthesis
pub struct ElevenLabsBackend {
    client: ElevenLabs,
    player: Option<Player>,
}

impl ElevenLabsBackend {
    /// Create the backend
    #[must_use]
    pub const fn new(client: ElevenLabs, player: Option<Player>) -> Self {
        Self { client, player }
    }
}

#[async_trait]
impl SpeechBackend for ElevenLabsBackend {
    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    fn is_ready(&self, state: &SessionState) -> bool {
        self.player.is_some() && state.active_voice_id().is_some()
    }

    async fn speak(&self, text: &str, state: &SessionState) -> Result<Option<TempPath>> {
        let voice_id = state
            .active_voice_id()
            .ok_or_else(|| Error::Unavailable("no ElevenLabs voice bound".to_string()))?;
        let player = self
            .player
            .as_ref()
            .ok_or_else(|| Error::Unavailable("no audio player found".to_string()))?;

        let audio = self.client.synthesize(&voice_id, text).await?;

        let mut file = tempfile::Builder::new()
            .prefix("herald-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(&audio)?;
        file.flush()?;
        let path = file.into_temp_path();

        player.play(&path)?;
        tracing::debug!(bytes = audio.len(), path = %path.display(), "playing synthesized audio");
        Ok(Some(path))
    }
}

#[derive(Debug, Clone)]
enum SystemVoice {
    Say(PathBuf),
    SpeechDispatcher(PathBuf),
    Sapi(PathBuf),
}

/// Second tier: the operating system speech service
#[derive(Debug, Clone)]
pub struct SystemVoiceBackend {
    voice: Option<SystemVoice>,
    rate: u32,
}

impl SystemVoiceBackend {
    /// Detect the platform speech service
    #[must_use]
    pub fn detect(config: &VoiceConfig) -> Self {
        let voice = if cfg!(target_os = "macos") {
            which::which("say").ok().map(SystemVoice::Say)
        } else if cfg!(windows) {
            which::which("powershell").ok().map(SystemVoice::Sapi)
        } else {
            which::which("spd-say").ok().map(SystemVoice::SpeechDispatcher)
        };

        if voice.is_none() {
            tracing::debug!("no system speech service found");
        }

        Self {
            voice,
            rate: config.tts_rate,
        }
    }
}

#[async_trait]
impl SpeechBackend for SystemVoiceBackend {
    fn name(&self) -> &'static str {
        "system"
    }

    fn is_ready(&self, _state: &SessionState) -> bool {
        self.voice.is_some()
    }

    async fn speak(&self, text: &str, _state: &SessionState) -> Result<Option<TempPath>> {
        let command = match &self.voice {
            Some(SystemVoice::Say(path)) => {
                let mut cmd = Command::new(path);
                cmd.arg("-r").arg(self.rate.to_string()).arg(as_text_arg(text));
                cmd
            }
            Some(SystemVoice::SpeechDispatcher(path)) => {
                let mut cmd = Command::new(path);
                cmd.arg("--wait").arg(as_text_arg(text));
                cmd
            }
            Some(SystemVoice::Sapi(path)) => {
                let mut cmd = Command::new(path);
                cmd.args([
                    "-NoProfile",
                    "-Command",
                    "Add-Type -AssemblyName System.Speech; \
                     (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak($env:HERALD_SPEAK_TEXT)",
                ])
                .env("HERALD_SPEAK_TEXT", text);
                cmd
            }
            None => return Err(Error::Unavailable("no system speech service".to_string())),
        };

        run_engine(command, self.name()).await?;
        Ok(None)
    }
}

/// Third tier: local `espeak-ng` / `espeak`
#[derive(Debug, Clone)]
pub struct LocalEngineBackend {
    program: Option<PathBuf>,
    rate: u32,
    amplitude: u32,
}

impl LocalEngineBackend {
    /// Detect a local synthesis engine
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn detect(config: &VoiceConfig) -> Self {
        let program = ["espeak-ng", "espeak"]
            .into_iter()
            .find_map(|name| which::which(name).ok());

        // espeak amplitude runs 0..=200 with 100 as normal
        let amplitude = (config.tts_volume.clamp(0.0, 1.0) * 200.0).round() as u32;

        Self {
            program,
            rate: config.tts_rate,
            amplitude,
        }
    }
}

#[async_trait]
impl SpeechBackend for LocalEngineBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    fn is_ready(&self, _state: &SessionState) -> bool {
        self.program.is_some()
    }

    async fn speak(&self, text: &str, _state: &SessionState) -> Result<Option<TempPath>> {
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| Error::Unavailable("no local speech engine".to_string()))?;

        let mut command = Command::new(program);
        command
            .arg("-s")
            .arg(self.rate.to_string())
            .arg("-a")
            .arg(self.amplitude.to_string())
            .arg(as_text_arg(text));

        run_engine(command, self.name()).await?;
        Ok(None)
    }
}
