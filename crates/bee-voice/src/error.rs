//! Error types for the voice layer.

/// Errors raised while speaking or playing an audio cue.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// The speech or playback program could not be started.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully.
    #[error("`{program}` failed: {status}")]
    Failed { program: String, status: String },
}
