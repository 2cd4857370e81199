//! Unified error type for the launcher.

use bee_protocol::ProtocolError;
use bee_transport::TransportError;

use crate::config::ConfigError;

/// Top-level error for everything the session bootstrapper can hit.
///
/// Every variant is fatal: the launcher logs it and exits non-zero.
/// Failures inside the authentication sequence never reach this type;
/// they are contained by the sequencer.
#[derive(Debug, thiserror::Error)]
pub enum BeeError {
    /// Configuration or asset layout is malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The UI transport could not bind or serve.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A message could not be encoded for the frontend.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_error() {
        let err: BeeError = ConfigError::EmptyCommand("BEE_TTS_CMD").into();
        assert!(matches!(err, BeeError::Config(_)));
        assert!(err.to_string().contains("BEE_TTS_CMD"));
    }

    #[test]
    fn test_from_transport_error() {
        let err: BeeError = TransportError::Shutdown.into();
        assert!(matches!(err, BeeError::Transport(_)));
    }

    #[test]
    fn test_from_protocol_error() {
        let err: BeeError = ProtocolError::InvalidMessage("bad".into()).into();
        assert!(matches!(err, BeeError::Protocol(_)));
        assert!(err.to_string().contains("bad"));
    }
}
