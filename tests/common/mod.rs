//! Shared test fakes

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempPath;

use herald::actions::ActionContext;
use herald::background::Background;
use herald::scheduler::TaskRegistry;
use herald::tools::{
    Desktop, Encyclopedia, FileManager, NotesFile, TodoList, WeatherProvider, WeatherReport,
};
use herald::voice::{Capture, CaptureOutcome, OutputPipeline, Screen, SpeechBackend};
use herald::{Error, Result, SessionState};

/// Screen that records every line
#[derive(Default)]
pub struct CollectingScreen {
    lines: Mutex<Vec<String>>,
}

impl CollectingScreen {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap().clear();
    }
}

impl Screen for CollectingScreen {
    fn show(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// Backend that records what it was asked to say
pub struct RecordingBackend {
    name: &'static str,
    spoken: Mutex<Vec<String>>,
}

impl RecordingBackend {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            spoken: Mutex::new(Vec::new()),
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.spoken.lock().unwrap().len()
    }
}

#[async_trait]
impl SpeechBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn speak(&self, text: &str, _state: &SessionState) -> Result<Option<TempPath>> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(None)
    }
}

/// Backend that always errors
pub struct FailingBackend {
    name: &'static str,
    calls: AtomicUsize,
}

impl FailingBackend {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechBackend for FailingBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn speak(&self, _text: &str, _state: &SessionState) -> Result<Option<TempPath>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Tts("engine crashed".to_string()))
    }
}

/// Backend that panics mid-speech
pub struct PanickingBackend;

#[async_trait]
impl SpeechBackend for PanickingBackend {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn speak(&self, _text: &str, _state: &SessionState) -> Result<Option<TempPath>> {
        panic!("speech engine exploded");
    }
}

/// Backend that never finishes in time
pub struct HangingBackend;

#[async_trait]
impl SpeechBackend for HangingBackend {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn speak(&self, _text: &str, _state: &SessionState) -> Result<Option<TempPath>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(None)
    }
}

/// Backend that never reports ready
pub struct UnreadyBackend {
    pub calls: AtomicUsize,
}

#[async_trait]
impl SpeechBackend for UnreadyBackend {
    fn name(&self) -> &'static str {
        "unready"
    }

    fn is_ready(&self, _state: &SessionState) -> bool {
        false
    }

    async fn speak(&self, _text: &str, _state: &SessionState) -> Result<Option<TempPath>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

/// Backend that leaves an audio file behind, like the cloud voice
pub struct ArtifactBackend {
    dir: PathBuf,
    produced: Mutex<Vec<PathBuf>>,
}

impl ArtifactBackend {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            produced: Mutex::new(Vec::new()),
        }
    }

    pub fn produced(&self) -> Vec<PathBuf> {
        self.produced.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechBackend for ArtifactBackend {
    fn name(&self) -> &'static str {
        "artifact"
    }

    async fn speak(&self, _text: &str, _state: &SessionState) -> Result<Option<TempPath>> {
        let file = tempfile::Builder::new()
            .suffix(".mp3")
            .tempfile_in(&self.dir)?;
        let path = file.into_temp_path();
        self.produced.lock().unwrap().push(path.to_path_buf());
        Ok(Some(path))
    }
}

/// Desktop that records calls instead of touching the system
#[derive(Default)]
pub struct FakeDesktop {
    pub volume: Mutex<u8>,
    pub muted: Mutex<bool>,
    pub opened: Mutex<Vec<String>>,
    pub launched: Mutex<Vec<String>>,
    pub busy: Vec<String>,
}

impl FakeDesktop {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Desktop for FakeDesktop {
    async fn volume(&self) -> Result<u8> {
        Ok(*self.volume.lock().unwrap())
    }

    async fn set_volume(&self, level: u8) -> Result<()> {
        *self.volume.lock().unwrap() = level;
        Ok(())
    }

    async fn set_mute(&self, muted: Option<bool>) -> Result<bool> {
        let mut current = self.muted.lock().unwrap();
        *current = muted.unwrap_or(!*current);
        Ok(*current)
    }

    async fn minimize_windows(&self) -> Result<()> {
        Ok(())
    }

    async fn switch_window(&self, name: &str) -> Result<bool> {
        Ok(name == "firefox")
    }

    async fn close_app(&self, name: &str) -> Result<bool> {
        Ok(name == "gedit")
    }

    async fn open_url(&self, url: &str) -> Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn launch(&self, command: &str) -> Result<()> {
        if command.starts_with("missing") {
            return Err(Error::NotFound(command.to_string()));
        }
        self.launched.lock().unwrap().push(command.to_string());
        Ok(())
    }

    async fn busy_processes(&self, _threshold: f32) -> Result<Vec<String>> {
        Ok(self.busy.clone())
    }
}

/// Weather provider with a fixed report for one city
pub struct FakeWeather;

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self, city: &str) -> Result<WeatherReport> {
        if city == "london" {
            Ok(WeatherReport {
                city: "London".to_string(),
                temperature_c: 14.6,
                description: "light rain".to_string(),
                humidity: 81,
            })
        } else {
            Err(Error::NotFound(city.to_string()))
        }
    }
}

/// Encyclopedia that knows one topic
pub struct FakeEncyclopedia;

#[async_trait]
impl Encyclopedia for FakeEncyclopedia {
    async fn summary(&self, topic: &str) -> Result<String> {
        if topic == "rust" {
            Ok("Rust is a programming language.".to_string())
        } else {
            Err(Error::NotFound(topic.to_string()))
        }
    }
}

/// Capture that replays a fixed script, then reports the input closed
pub struct ScriptedCapture {
    outcomes: VecDeque<CaptureOutcome>,
}

impl ScriptedCapture {
    pub fn new(outcomes: impl IntoIterator<Item = CaptureOutcome>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }

    pub fn utterances(lines: &[&str]) -> Self {
        Self::new(
            lines
                .iter()
                .map(|line| CaptureOutcome::Utterance((*line).to_string())),
        )
    }
}

#[async_trait]
impl Capture for ScriptedCapture {
    async fn capture(&mut self) -> CaptureOutcome {
        self.outcomes.pop_front().unwrap_or(CaptureOutcome::Closed)
    }
}

/// Capture that never produces anything
pub struct SilentCapture;

#[async_trait]
impl Capture for SilentCapture {
    async fn capture(&mut self) -> CaptureOutcome {
        std::future::pending().await
    }
}

/// Everything an action or session test needs, wired to fakes
pub struct Harness {
    pub state: Arc<SessionState>,
    pub screen: Arc<CollectingScreen>,
    pub voice: Arc<RecordingBackend>,
    pub desktop: Arc<FakeDesktop>,
    pub background: Background,
    pub pipeline: Arc<OutputPipeline>,
    pub ctx: ActionContext,
    pub dir: tempfile::TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_desktop(FakeDesktop::default())
    }

    pub fn with_desktop(desktop: FakeDesktop) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(SessionState::new(false));
        let screen = Arc::new(CollectingScreen::default());
        let voice = Arc::new(RecordingBackend::new("recording"));
        let desktop = Arc::new(desktop);
        let background = Background::new();

        let pipeline = Arc::new(
            OutputPipeline::new(Arc::clone(&state), screen.clone(), background.clone())
                .with_backend(voice.clone()),
        );

        let ctx = ActionContext {
            state: Arc::clone(&state),
            desktop: desktop.clone(),
            weather: Some(Arc::new(FakeWeather)),
            encyclopedia: Arc::new(FakeEncyclopedia),
            notes: NotesFile::new(dir.path().join("notes.txt")),
            todo: TodoList::new(dir.path().join("todo.txt")),
            files: FileManager::new(dir.path()),
            scheduler: TaskRegistry::new(Arc::clone(&pipeline), background.clone()),
            screen: screen.clone(),
            apps: HashMap::from([("editor".to_string(), "gedit".to_string())]),
        };

        Self {
            state,
            screen,
            voice,
            desktop,
            background,
            pipeline,
            ctx,
            dir,
        }
    }
}
