//! Error types for the protocol layer.
//!
//! Each crate in Bee defines its own error enum. When you see a
//! `ProtocolError`, the problem is in serialization or in the shape of a
//! message, not in networking or in one of the external collaborators.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, or an
    /// unknown `"type"` tag sent by an outdated frontend.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but violates protocol rules, e.g. a call with
    /// an empty callable name.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
