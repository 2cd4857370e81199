//! Wire protocol for Bee.
//!
//! This crate defines what the browser frontend and the launcher backend
//! say to each other:
//!
//! - **Types** ([`UiMessage`], [`UiSignal`]): the messages on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how messages become bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! ```text
//! Transport (bytes) → Protocol (UiMessage) → Server (callables, signals)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{UiMessage, UiSignal};
