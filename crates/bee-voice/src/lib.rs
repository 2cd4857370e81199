//! Voice output for Bee.
//!
//! The launcher talks to the user through [`Speaker`]: spoken prompts and
//! one fixed start-up cue. [`CommandSpeaker`] shells out to whatever
//! text-to-speech and audio-player programs the machine has.

mod error;
mod speaker;

pub use error::VoiceError;
pub use speaker::{CommandSpeaker, Speaker};
