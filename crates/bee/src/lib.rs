//! # Bee
//!
//! Start-up launcher for a desktop voice assistant.
//!
//! Bee serves a small web frontend on a local port, waits for the
//! frontend to call `init`, and then runs the start-up sequence: prepare
//! devices, authenticate the user's face, and walk the UI and the voice
//! through a fixed set of transitions before handing over to the
//! assistant.
//!
//! ```text
//! bee-transport (HTTP + WebSocket) → bee-protocol (UiMessage)
//!        → UiServer (callables, signals) → AuthSequencer
//!                                            ├─ bee-auth  (device, face)
//!                                            └─ bee-voice (speech, cue)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), bee::BeeError> {
//! let config = bee::SessionConfig::from_env()?;
//! bee::run(config).await
//! # }
//! ```

pub mod browser;
pub mod logging;

mod bootstrap;
mod config;
mod error;
mod handler;
mod registry;
mod sequencer;
mod server;
mod signal;
mod tracker;

pub use bootstrap::{Bootstrapper, ENTRY_POINT, EntrySequencer, run};
pub use config::{
    CollaboratorConfig, CommandLine, ConfigError, DEVICE_SCRIPT_VAR, FACE_AUTH_CMD_VAR,
    SOUND_PLAYER_VAR, SessionConfig, TTS_CMD_VAR, USER_NAME_VAR,
};
pub use error::BeeError;
pub use registry::{Callable, CallableRegistry};
pub use sequencer::{AuthSequencer, SequenceError, SequenceReport, SequenceState, prompts};
pub use server::{RunningUi, UiServer};
pub use signal::{SignalEmitter, UiSignals};

/// Everything needed to wire a launcher together.
pub mod prelude {
    pub use crate::{
        AuthSequencer, BeeError, Bootstrapper, SequenceReport, SessionConfig, SignalEmitter,
        UiServer, UiSignals,
    };
    pub use bee_auth::{AuthOutcome, DeviceBootstrap, DeviceStatus, FaceAuthenticator};
    pub use bee_protocol::UiSignal;
    pub use bee_voice::Speaker;
}
