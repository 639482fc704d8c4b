//! Assembly of a running assistant from configuration

use std::sync::Arc;
use std::time::Duration;

use crate::actions::ActionContext;
use crate::background::Background;
use crate::intent::RuleTable;
use crate::scheduler::TaskRegistry;
use crate::session::Session;
use crate::tools::{
    CommandDesktop, Encyclopedia, FileManager, NotesFile, OpenWeatherMap, TodoList,
    WeatherProvider, Wikipedia,
};
use crate::voice::{
    Capture, ElevenLabs, ElevenLabsBackend, LocalEngineBackend, OutputPipeline, Player, Screen,
    StdoutScreen, SystemVoiceBackend,
};
use crate::{Config, Result, SessionState};

/// A configured assistant, ready to run sessions
pub struct Assistant {
    config: Config,
    state: Arc<SessionState>,
    background: Background,
    pipeline: Arc<OutputPipeline>,
    context: ActionContext,
    elevenlabs: Option<ElevenLabs>,
}

impl Assistant {
    /// Build every collaborator from `config`
    ///
    /// With `text_only` no speech backend is attempted.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be created
    pub fn new(config: Config, text_only: bool) -> Result<Self> {
        let state = Arc::new(SessionState::from_config(&config));
        let background = Background::new();
        let screen: Arc<dyn Screen> = Arc::new(StdoutScreen);

        let elevenlabs = match config.elevenlabs_key() {
            Some(key) if config.voice.elevenlabs_enabled && !text_only => Some(ElevenLabs::new(
                key,
                config.voice.model.clone(),
                config.voice.elevenlabs_url.clone(),
            )?),
            _ => None,
        };

        let mut pipeline = OutputPipeline::new(Arc::clone(&state), Arc::clone(&screen), background.clone())
            .with_timeout(config.voice.backend_timeout())
            .with_cleanup_grace(config.voice.cleanup_grace());

        if !text_only {
            if let Some(client) = &elevenlabs {
                let player = Player::detect(config.voice.player.as_deref());
                if player.is_none() {
                    tracing::warn!("no audio player found for ElevenLabs output");
                }
                pipeline =
                    pipeline.with_backend(Arc::new(ElevenLabsBackend::new(client.clone(), player)));
            }
            pipeline = pipeline
                .with_backend(Arc::new(SystemVoiceBackend::detect(&config.voice)))
                .with_backend(Arc::new(LocalEngineBackend::detect(&config.voice)));
        }
        let pipeline = Arc::new(pipeline);
        tracing::debug!(backends = ?pipeline.backend_names(), "output pipeline ready");

        let weather: Option<Arc<dyn WeatherProvider>> = match config.openweather_key() {
            Some(key) if config.weather.enabled => Some(Arc::new(OpenWeatherMap::new(
                key,
                config.weather.base_url.clone(),
            )?)),
            _ => {
                tracing::info!("weather lookups disabled");
                None
            }
        };

        let encyclopedia: Arc<dyn Encyclopedia> = Arc::new(Wikipedia::new(
            config.encyclopedia.base_url.clone(),
            config.encyclopedia.sentences,
        )?);

        let context = ActionContext {
            state: Arc::clone(&state),
            desktop: Arc::new(CommandDesktop),
            weather,
            encyclopedia,
            notes: NotesFile::new(config.storage.notes_file.clone()),
            todo: TodoList::new(config.storage.todo_file.clone()),
            files: FileManager::new(config.storage.workspace.clone()),
            scheduler: TaskRegistry::new(Arc::clone(&pipeline), background.clone()),
            screen,
            apps: config.apps.clone(),
        };

        Ok(Self {
            config,
            state,
            background,
            pipeline,
            context,
            elevenlabs,
        })
    }

    /// Look up the configured `ElevenLabs` voice and bind it to the session
    ///
    /// Returns false when no voice could be bound; speech then falls back to
    /// the local backends.
    pub async fn bind_voice(&self) -> bool {
        let Some(client) = &self.elevenlabs else {
            return false;
        };

        let name = &self.config.voice.voice_name;
        match client.find_voice_id(name).await {
            Ok(Some(voice_id)) => {
                tracing::info!(voice = %name, "ElevenLabs voice bound");
                self.state.set_active_voice_id(Some(voice_id));
                true
            }
            Ok(None) => {
                tracing::warn!(voice = %name, "ElevenLabs voice not found, using fallback speech");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not list ElevenLabs voices, using fallback speech");
                false
            }
        }
    }

    /// Start a session reading from `capture`
    #[must_use]
    pub fn session<C: Capture>(&self, capture: C) -> Session<C> {
        Session::new(
            RuleTable::standard(),
            self.context.clone(),
            Arc::clone(&self.pipeline),
            capture,
        )
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    #[must_use]
    pub const fn pipeline(&self) -> &Arc<OutputPipeline> {
        &self.pipeline
    }

    #[must_use]
    pub const fn elevenlabs(&self) -> Option<&ElevenLabs> {
        self.elevenlabs.as_ref()
    }

    /// Cancel timers, give audio cleanup its grace period, then stop
    ///
    /// Synthesized audio still playing when the session ends is removed only
    /// after the same grace period a normal reply gets.
    pub async fn shutdown(&self) -> bool {
        let discarded = self.context.scheduler.cancel_all();
        if discarded > 0 {
            tracing::info!(discarded, "discarding pending timers");
        }
        let grace = self
            .config
            .voice
            .cleanup_grace()
            .saturating_add(Duration::from_secs(1));
        self.background.finish(grace).await
    }
}
