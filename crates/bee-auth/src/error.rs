//! Error types for the authentication and device layers.
//!
//! A rejected face is NOT an error: it is
//! [`AuthOutcome::Rejected`](crate::AuthOutcome::Rejected). These variants
//! cover the oracle or the bootstrap failing to produce an answer at all.

/// Errors raised while asking the face-recognition oracle.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The recognizer process could not be started.
    #[error("failed to start face recognizer `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The recognizer ran but exited unsuccessfully (camera missing,
    /// model not found, crash).
    #[error("face recognizer `{program}` failed: {status}")]
    Crashed { program: String, status: String },

    /// The recognizer's answer was not an integer flag.
    #[error("face recognizer returned an unreadable flag: {0:?}")]
    InvalidResponse(String),
}

/// Errors raised while running the device bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The bootstrap script could not be started at all.
    #[error("failed to start device bootstrap `{script}`: {source}")]
    Spawn {
        script: String,
        #[source]
        source: std::io::Error,
    },
}
