//! The initialization and authentication sequence.
//!
//! Runs once per frontend `init` call:
//!
//! ```text
//! Idle → DeviceInit → AwaitingAuth → AuthSucceeded ─┐
//!                                  └→ AuthFailed ────┴→ Done
//! ```
//!
//! Every side effect (UI signal, spoken prompt, start-up sound) is user
//! perceptible, so each branch performs them in a fixed order. Nothing
//! escapes [`AuthSequencer::run`]: any failure, including a panicking
//! collaborator, is logged once at error level and answered with one
//! generic spoken notice.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use bee_auth::{AuthError, AuthOutcome, DeviceBootstrap, DeviceError, FaceAuthenticator};
use bee_protocol::UiSignal;
use bee_transport::TransportError;
use bee_voice::{Speaker, VoiceError};
use tracing::Span;

use crate::SignalEmitter;
use crate::logging::sequencer_span;

/// What the launcher says, and when.
pub mod prompts {
    /// After the loader is hidden, before the camera starts.
    pub const READY: &str = "Ready for Face Authentication";
    /// First thing said after a match.
    pub const SUCCESS: &str = "Face Authentication Successful";
    /// Said when the face did not match. The user may retry.
    pub const RETRY: &str = "Face Authentication Failed. Please try again.";
    /// Said after any failure inside the sequence.
    pub const ERROR: &str = "An error occurred during initialization.";

    /// Personalized greeting spoken just before the hand-off.
    pub fn welcome(user_name: &str) -> String {
        format!("Hello {user_name}, How can I help you?")
    }
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    Idle,
    DeviceInit,
    AwaitingAuth,
    AuthSucceeded,
    AuthFailed,
    Done,
}

impl fmt::Display for SequenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::DeviceInit => "DeviceInit",
            Self::AwaitingAuth => "AwaitingAuth",
            Self::AuthSucceeded => "AuthSucceeded",
            Self::AuthFailed => "AuthFailed",
            Self::Done => "Done",
        };
        f.write_str(name)
    }
}

/// A step of the sequence that failed.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    #[error("device bootstrap failed: {0}")]
    Device(#[from] DeviceError),

    #[error("face authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("UI signal {signal} failed: {source}")]
    Signal {
        signal: UiSignal,
        #[source]
        source: TransportError,
    },

    #[error("speech failed: {0}")]
    Voice(#[from] VoiceError),

    /// A collaborator panicked instead of returning an error.
    #[error("panicked: {0}")]
    Panicked(String),
}

/// How one call to [`AuthSequencer::run`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceReport {
    /// A full branch ran. `Rejected` is a normal ending, not a failure.
    Completed(AuthOutcome),
    /// A step failed; the generic notice was spoken.
    Failed(String),
    /// Another run was still in flight; nothing was done.
    Busy,
}

/// Runs the start-up sequence against its four collaborators.
///
/// Holds no state between runs apart from a single-flight flag: a call
/// arriving while another run is in progress returns
/// [`SequenceReport::Busy`] without side effects.
pub struct AuthSequencer<D, A, S, E> {
    device: D,
    auth: A,
    speaker: S,
    signals: E,
    user_name: String,
    in_flight: AtomicBool,
    span: Span,
}

impl<D, A, S, E> AuthSequencer<D, A, S, E>
where
    D: DeviceBootstrap,
    A: FaceAuthenticator,
    S: Speaker,
    E: SignalEmitter,
{
    /// Creates a sequencer greeting `user_name` on success.
    pub fn new(device: D, auth: A, speaker: S, signals: E, user_name: impl Into<String>) -> Self {
        Self {
            device,
            auth,
            speaker,
            signals,
            user_name: user_name.into(),
            in_flight: AtomicBool::new(false),
            span: sequencer_span(),
        }
    }

    /// The name used in the welcome prompt.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Runs the whole sequence once. Blocks until it ends. Never panics.
    pub fn run(&self) -> SequenceReport {
        let _entered = self.span.enter();

        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::warn!("initialization already in progress, ignoring call");
            return SequenceReport::Busy;
        }
        let _flight = InFlight(&self.in_flight);

        transition(SequenceState::Idle);
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.sequence()))
            .unwrap_or_else(|payload| Err(SequenceError::Panicked(panic_message(payload))));

        match result {
            Ok(outcome) => {
                transition(SequenceState::Done);
                SequenceReport::Completed(outcome)
            }
            Err(e) => {
                tracing::error!(error = %e, "error during initialization");
                self.speak_error_notice();
                SequenceReport::Failed(e.to_string())
            }
        }
    }

    fn sequence(&self) -> Result<AuthOutcome, SequenceError> {
        transition(SequenceState::DeviceInit);
        tracing::info!("starting device initialization");
        // The status is only observed; authentication goes ahead either way.
        match self.device.prepare()? {
            status if status.is_ready() => tracing::info!(%status, "devices ready"),
            status => tracing::warn!(%status, "device bootstrap did not succeed, continuing"),
        }

        transition(SequenceState::AwaitingAuth);
        self.emit(UiSignal::HideLoader)?;
        self.speaker.speak(prompts::READY)?;

        tracing::info!("starting face authentication");
        let outcome = self.auth.authenticate_face()?;

        match outcome {
            AuthOutcome::Authenticated => {
                transition(SequenceState::AuthSucceeded);
                tracing::info!("face authentication successful");
                self.emit(UiSignal::HideFaceAuth)?;
                self.speaker.speak(prompts::SUCCESS)?;
                self.emit(UiSignal::HideFaceAuthSuccess)?;
                self.speaker.speak(&prompts::welcome(&self.user_name))?;
                self.emit(UiSignal::HideStart)?;
                self.speaker.play_startup_sound()?;
            }
            AuthOutcome::Rejected => {
                transition(SequenceState::AuthFailed);
                tracing::warn!("face authentication failed");
                self.speaker.speak(prompts::RETRY)?;
            }
        }

        Ok(outcome)
    }

    /// Speaks the generic notice. Its own failures only warn.
    fn speak_error_notice(&self) {
        match panic::catch_unwind(AssertUnwindSafe(|| self.speaker.speak(prompts::ERROR))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "could not speak the error notice"),
            Err(payload) => {
                tracing::warn!(panic = %panic_message(payload), "error notice panicked");
            }
        }
    }

    fn emit(&self, signal: UiSignal) -> Result<(), SequenceError> {
        self.signals
            .emit(signal)
            .map_err(|source| SequenceError::Signal { signal, source })
    }
}

fn transition(state: SequenceState) {
    tracing::debug!(%state, "sequencer state");
}

/// Clears the single-flight flag however the run ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_contains_user_name() {
        assert_eq!(prompts::welcome("Dana"), "Hello Dana, How can I help you?");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SequenceState::AwaitingAuth.to_string(), "AwaitingAuth");
    }

    #[test]
    fn test_panic_message_extracts_str_and_string() {
        assert_eq!(panic_message(Box::new("camera on fire")), "camera on fire");
        assert_eq!(panic_message(Box::new(String::from("boom"))), "boom");
        assert_eq!(panic_message(Box::new(42_u8)), "unknown panic");
    }

    #[test]
    fn test_signal_error_names_the_signal() {
        let err = SequenceError::Signal {
            signal: UiSignal::HideStart,
            source: TransportError::Shutdown,
        };
        assert_eq!(err.to_string(), "UI signal hide-start failed: transport shut down");
    }
}
