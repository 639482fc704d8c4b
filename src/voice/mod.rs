//! Voice input and output
//!
//! Input arrives as transcripts through a [`Capture`]. Output goes through the
//! [`OutputPipeline`], which echoes text to a [`Screen`] and speaks it with
//! the first working [`SpeechBackend`].

mod backends;
mod capture;
mod pipeline;
mod screen;
mod tts;
mod wake_word;

pub use backends::{ElevenLabsBackend, LocalEngineBackend, Player, SpeechBackend, SystemVoiceBackend};
pub use capture::{Capture, CaptureOutcome, TextCapture};
pub use pipeline::{
    BackendAttempt, BackendOutcome, Delivery, OutputPipeline, OutputRequest, RenderReport, Urgency,
};
pub use screen::{Screen, StdoutScreen};
pub use tts::{ElevenLabs, Voice};
pub use wake_word::WakeWordCapture;
