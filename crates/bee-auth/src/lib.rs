//! Authentication hooks for Bee.
//!
//! Two blocking seams the launcher calls during start-up:
//!
//! 1. **Device bootstrap**: prepare hardware ([`DeviceBootstrap`])
//! 2. **Face authentication**: ask the oracle who is in front of the
//!    camera ([`FaceAuthenticator`])
//!
//! Both come with subprocess-backed implementations
//! ([`ScriptBootstrap`], [`CommandAuthenticator`]).

mod auth;
mod device;
mod error;

pub use auth::{AuthOutcome, CommandAuthenticator, FaceAuthenticator};
pub use device::{DeviceBootstrap, DeviceStatus, ScriptBootstrap};
pub use error::{AuthError, DeviceError};
