//! Face authentication hook.
//!
//! Bee doesn't recognize faces itself. It defines the
//! [`FaceAuthenticator`] trait (one blocking method that captures a face
//! and reports whether it belongs to the owner) and ships
//! [`CommandAuthenticator`], which delegates to an external recognizer
//! program. Tests substitute scripted fakes.
//!
//! # Blocking
//!
//! Recognition does live camera capture and may take many seconds. The
//! caller runs it on a blocking thread and never times it out. A timeout
//! policy wraps an implementation of this trait; the code that branches
//! on the outcome stays as is.

use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::AuthError;

/// Result of one face authentication attempt.
///
/// Two-valued on purpose: the recognizer reports success or not, and
/// does not distinguish "no face" from "wrong face".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The captured face matched the enrolled owner.
    Authenticated,
    /// Anything else. A normal outcome, not an error.
    Rejected,
}

impl AuthOutcome {
    /// The recognizer flag that means success.
    pub const SUCCESS_FLAG: i64 = 1;

    /// Maps a recognizer flag to an outcome. Only
    /// [`SUCCESS_FLAG`](Self::SUCCESS_FLAG) authenticates.
    pub fn from_flag(flag: i64) -> Self {
        if flag == Self::SUCCESS_FLAG {
            Self::Authenticated
        } else {
            Self::Rejected
        }
    }

    /// Returns `true` for [`AuthOutcome::Authenticated`].
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// The authentication oracle.
///
/// # Example
///
/// ```rust
/// use bee_auth::{AuthError, AuthOutcome, FaceAuthenticator};
///
/// /// Lets everyone in. Only for UI development.
/// struct AlwaysYes;
///
/// impl FaceAuthenticator for AlwaysYes {
///     fn authenticate_face(&self) -> Result<AuthOutcome, AuthError> {
///         Ok(AuthOutcome::Authenticated)
///     }
/// }
///
/// assert!(AlwaysYes.authenticate_face().unwrap().is_authenticated());
/// ```
pub trait FaceAuthenticator: Send + Sync + 'static {
    /// Captures a face and decides. Blocks until the recognizer is done.
    ///
    /// # Returns
    /// - `Ok(Authenticated)` / `Ok(Rejected)`: the recognizer answered
    /// - `Err(AuthError)`: it could not answer at all
    fn authenticate_face(&self) -> Result<AuthOutcome, AuthError>;
}

impl<T: FaceAuthenticator + ?Sized> FaceAuthenticator for Arc<T> {
    fn authenticate_face(&self) -> Result<AuthOutcome, AuthError> {
        (**self).authenticate_face()
    }
}

impl<T: FaceAuthenticator + ?Sized> FaceAuthenticator for Box<T> {
    fn authenticate_face(&self) -> Result<AuthOutcome, AuthError> {
        (**self).authenticate_face()
    }
}

/// Runs an external recognizer and reads its flag from stdout.
///
/// The recognizer may log freely; the last non-empty line of its stdout
/// must be the integer flag. Its stderr is passed through to ours.
#[derive(Debug, Clone)]
pub struct CommandAuthenticator {
    program: String,
    args: Vec<String>,
}

impl CommandAuthenticator {
    /// Creates an authenticator running `program` with `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl FaceAuthenticator for CommandAuthenticator {
    fn authenticate_face(&self) -> Result<AuthOutcome, AuthError> {
        tracing::debug!(program = %self.program, "running face recognizer");
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| AuthError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AuthError::Crashed {
                program: self.program.clone(),
                status: output.status.to_string(),
            });
        }

        parse_flag(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Reads the flag from the last non-empty line of recognizer output.
fn parse_flag(stdout: &str) -> Result<AuthOutcome, AuthError> {
    let line = stdout
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .unwrap_or("");
    line.parse::<i64>()
        .map(AuthOutcome::from_flag)
        .map_err(|_| AuthError::InvalidResponse(line.to_string()))
}
