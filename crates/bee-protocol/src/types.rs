//! Message types exchanged between the browser frontend and the backend.
//!
//! Everything here travels over the UI WebSocket as JSON. The frontend
//! calls exposed backend functions with [`UiMessage::Call`]; the backend
//! answers with [`UiMessage::Return`] and pushes visual state changes with
//! [`UiMessage::Signal`].

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// UiSignal: visual state transitions requested from the frontend
// ---------------------------------------------------------------------------

/// A one-way request for the frontend to change its visual state.
///
/// The set is closed: these are the only transitions the launcher ever
/// requests. Signals are fire-and-forget. The backend never learns whether
/// the frontend actually applied one.
///
/// `#[serde(rename_all = "kebab-case")]` gives the wire names
/// `"hide-loader"`, `"hide-face-auth"` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UiSignal {
    /// Hide the loading overlay shown while devices initialize.
    HideLoader,
    /// Hide the face-authentication panel.
    HideFaceAuth,
    /// Hide the "authentication succeeded" panel.
    HideFaceAuthSuccess,
    /// Hide the start screen, revealing the assistant.
    HideStart,
}

impl UiSignal {
    /// Every signal, in the order a successful run emits them.
    pub const ALL: [UiSignal; 4] = [
        UiSignal::HideLoader,
        UiSignal::HideFaceAuth,
        UiSignal::HideFaceAuthSuccess,
        UiSignal::HideStart,
    ];

    /// The wire name of this signal.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HideLoader => "hide-loader",
            Self::HideFaceAuth => "hide-face-auth",
            Self::HideFaceAuthSuccess => "hide-face-auth-success",
            Self::HideStart => "hide-start",
        }
    }

    /// The JavaScript function the frontend exposes for this signal.
    pub fn function_name(self) -> &'static str {
        match self {
            Self::HideLoader => "hideLoader",
            Self::HideFaceAuth => "hideFaceAuth",
            Self::HideFaceAuthSuccess => "hideFaceAuthSuccess",
            Self::HideStart => "hideStart",
        }
    }
}

impl fmt::Display for UiSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UiMessage: the top-level wire format
// ---------------------------------------------------------------------------

/// Every message on the UI channel.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON, e.g.
/// `{ "type": "Call", "name": "init", "call_id": 1 }`, which is the
/// easiest shape to switch on from JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiMessage {
    /// Frontend → Backend: "run the exposed function `name`."
    /// `call_id` is chosen by the frontend and echoed in the `Return`.
    Call { name: String, call_id: u64 },

    /// Backend → Frontend: "the call with this id has finished."
    /// Exposed functions return nothing, so there is no value.
    Return { call_id: u64 },

    /// Backend → Frontend: "apply this visual state change."
    /// `function` duplicates the signal as the frontend function name so
    /// a thin client can dispatch with `window[msg.function]()`.
    Signal { name: UiSignal, function: String },

    /// Backend → Frontend: "your message could not be handled."
    /// `code` follows HTTP conventions (400 bad request, 404 unknown
    /// callable).
    Error { code: u16, message: String },
}

impl UiMessage {
    /// Builds the `Signal` message for `signal`.
    pub fn signal(signal: UiSignal) -> Self {
        Self::Signal {
            name: signal,
            function: signal.function_name().to_string(),
        }
    }

    /// Builds an `Error` message.
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_wire_names_match_as_str() {
        for signal in UiSignal::ALL {
            let json = serde_json::to_string(&signal).unwrap();
            assert_eq!(json, format!("\"{}\"", signal.as_str()));
        }
    }

    #[test]
    fn test_signal_display_is_wire_name() {
        assert_eq!(UiSignal::HideFaceAuthSuccess.to_string(), "hide-face-auth-success");
    }

    #[test]
    fn test_signal_function_names() {
        assert_eq!(UiSignal::HideLoader.function_name(), "hideLoader");
        assert_eq!(UiSignal::HideFaceAuth.function_name(), "hideFaceAuth");
        assert_eq!(
            UiSignal::HideFaceAuthSuccess.function_name(),
            "hideFaceAuthSuccess"
        );
        assert_eq!(UiSignal::HideStart.function_name(), "hideStart");
    }

    #[test]
    fn test_call_json_format() {
        let msg = UiMessage::Call {
            name: "init".into(),
            call_id: 9,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "Call");
        assert_eq!(json["name"], "init");
        assert_eq!(json["call_id"], 9);
    }

    #[test]
    fn test_signal_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(UiMessage::signal(UiSignal::HideLoader)).unwrap();

        assert_eq!(json["type"], "Signal");
        assert_eq!(json["name"], "hide-loader");
        assert_eq!(json["function"], "hideLoader");
    }

    #[test]
    fn test_error_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(UiMessage::error(404, "no such callable")).unwrap();

        assert_eq!(json["type"], "Error");
        assert_eq!(json["code"], 404);
        assert_eq!(json["message"], "no such callable");
    }

    #[test]
    fn test_unknown_signal_name_is_rejected() {
        let raw = r#"{"type":"Signal","name":"show-everything","function":"x"}"#;
        let result: Result<UiMessage, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_message_type_is_rejected() {
        let raw = r#"{"type":"Teleport","where":"moon"}"#;
        let result: Result<UiMessage, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }

    #[test]
    fn test_call_missing_call_id_is_rejected() {
        let raw = r#"{"type":"Call","name":"init"}"#;
        let result: Result<UiMessage, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }
}
