//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The transport only moves bytes; the protocol layer decides how a
//! [`UiMessage`](crate::UiMessage) becomes bytes. Anything implementing
//! [`Codec`] can be plugged into the UI server. [`JsonCodec`] is the only
//! implementation because the browser frontend speaks JSON natively.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec is stored in the shared
/// server state and used from every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ```rust
/// use bee_protocol::{Codec, JsonCodec, UiMessage, UiSignal};
///
/// let codec = JsonCodec;
/// let msg = UiMessage::signal(UiSignal::HideLoader);
///
/// let bytes = codec.encode(&msg).unwrap();
/// let decoded: UiMessage = codec.decode(&bytes).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{UiMessage, UiSignal};

    #[test]
    fn test_json_codec_decodes_frontend_call() {
        let codec = JsonCodec;
        let msg: UiMessage = codec
            .decode(br#"{"type":"Call","name":"init","call_id":3}"#)
            .unwrap();
        assert_eq!(
            msg,
            UiMessage::Call {
                name: "init".into(),
                call_id: 3
            }
        );
    }

    #[test]
    fn test_json_codec_encodes_signal_with_function_name() {
        let codec = JsonCodec;
        let bytes = codec.encode(&UiMessage::signal(UiSignal::HideStart)).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["type"], "Signal");
        assert_eq!(json["name"], "hide-start");
        assert_eq!(json["function"], "hideStart");
    }

    #[test]
    fn test_json_codec_decode_garbage_is_decode_error() {
        let codec = JsonCodec;
        let result: Result<UiMessage, _> = codec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
