//! herald - a keyword-driven voice assistant
//!
//! Transcribed utterances are matched against an ordered rule table, the
//! winning action runs against its collaborators, and the reply is rendered
//! through a layered speech pipeline that always falls back to text.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────┐   ┌──────────────┐   ┌─────────────────┐
//! │   Capture    │──▶│ Rule Table │──▶│   Actions    │──▶│ Output Pipeline │
//! │ (transcript) │   │ first wins │   │ collaborators│   │ voice ▸ text    │
//! └──────────────┘   └────────────┘   └──────┬───────┘   └────────▲────────┘
//!                                            │                    │
//!                                     ┌──────▼───────┐            │
//!                                     │ Task Registry│────────────┘
//!                                     │ timers       │
//!                                     └──────────────┘
//! ```

pub mod actions;
pub mod assistant;
pub mod background;
pub mod config;
pub mod error;
pub mod intent;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod tools;
pub mod voice;

pub use assistant::Assistant;
pub use config::Config;
pub use error::{Error, Result};
pub use session::{Phase, Session};
pub use state::SessionState;
