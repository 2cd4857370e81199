//! The [`Speaker`] trait and its subprocess implementation.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::VoiceError;

/// Speech and audio-cue output.
///
/// Both calls block until playback has finished, so consecutive prompts
/// never overlap.
pub trait Speaker: Send + Sync + 'static {
    /// Speaks `text` aloud.
    fn speak(&self, text: &str) -> Result<(), VoiceError>;

    /// Plays the fixed start-up cue that hands control to the assistant.
    fn play_startup_sound(&self) -> Result<(), VoiceError>;
}

impl<T: Speaker + ?Sized> Speaker for Arc<T> {
    fn speak(&self, text: &str) -> Result<(), VoiceError> {
        (**self).speak(text)
    }

    fn play_startup_sound(&self) -> Result<(), VoiceError> {
        (**self).play_startup_sound()
    }
}

impl<T: Speaker + ?Sized> Speaker for Box<T> {
    fn speak(&self, text: &str) -> Result<(), VoiceError> {
        (**self).speak(text)
    }

    fn play_startup_sound(&self) -> Result<(), VoiceError> {
        (**self).play_startup_sound()
    }
}

/// A program plus its fixed leading arguments.
#[derive(Debug, Clone)]
struct Program {
    name: String,
    args: Vec<String>,
}

impl Program {
    /// Runs the program with `extra` appended and waits for it.
    fn run(&self, extra: &std::ffi::OsStr) -> Result<(), VoiceError> {
        let status = Command::new(&self.name)
            .args(&self.args)
            .arg(extra)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|source| VoiceError::Spawn {
                program: self.name.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(VoiceError::Failed {
                program: self.name.clone(),
                status: status.to_string(),
            })
        }
    }
}

/// Speaks through an external text-to-speech program and plays the
/// start-up cue through an external audio player.
///
/// The spoken text is passed as the last argument of the TTS program;
/// the sound file is passed as the last argument of the player.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    tts: Program,
    player: Program,
    startup_sound: PathBuf,
}

impl CommandSpeaker {
    /// Creates a speaker.
    pub fn new(
        tts_program: impl Into<String>,
        tts_args: Vec<String>,
        player_program: impl Into<String>,
        player_args: Vec<String>,
        startup_sound: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tts: Program {
                name: tts_program.into(),
                args: tts_args,
            },
            player: Program {
                name: player_program.into(),
                args: player_args,
            },
            startup_sound: startup_sound.into(),
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) -> Result<(), VoiceError> {
        tracing::debug!(text, "speaking");
        self.tts.run(text.as_ref())
    }

    fn play_startup_sound(&self) -> Result<(), VoiceError> {
        tracing::debug!(sound = %self.startup_sound.display(), "playing start-up sound");
        self.player.run(self.startup_sound.as_os_str())
    }
}
