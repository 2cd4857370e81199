//! Device bootstrap hook.
//!
//! Before authenticating, the launcher runs a device-preparation script
//! (camera drivers, audio routing, and so on). The script is opaque; the
//! launcher only records how it exited.

use std::fmt;
use std::process::{Command, ExitStatus};
use std::sync::Arc;

use crate::DeviceError;

/// How the device bootstrap finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    /// Exited with status 0.
    Ready,
    /// Exited with a non-zero status code.
    ExitedWith(i32),
    /// Killed by a signal, no exit code.
    Terminated,
}

impl DeviceStatus {
    /// Classifies a process exit status.
    pub fn from_exit_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => Self::Ready,
            Some(code) => Self::ExitedWith(code),
            None => Self::Terminated,
        }
    }

    /// Returns `true` for [`DeviceStatus::Ready`].
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::ExitedWith(code) => write!(f, "exited with status {code}"),
            Self::Terminated => write!(f, "terminated by signal"),
        }
    }
}

/// Prepares devices before authentication. Blocking.
pub trait DeviceBootstrap: Send + Sync + 'static {
    /// Runs the preparation and reports how it ended.
    ///
    /// # Errors
    /// Only when the preparation could not be started. A script that ran
    /// and failed is reported as a [`DeviceStatus`], not an error.
    fn prepare(&self) -> Result<DeviceStatus, DeviceError>;
}

impl<T: DeviceBootstrap + ?Sized> DeviceBootstrap for Arc<T> {
    fn prepare(&self) -> Result<DeviceStatus, DeviceError> {
        (**self).prepare()
    }
}

impl<T: DeviceBootstrap + ?Sized> DeviceBootstrap for Box<T> {
    fn prepare(&self) -> Result<DeviceStatus, DeviceError> {
        (**self).prepare()
    }
}

/// Runs a bootstrap script through the platform shell.
#[derive(Debug, Clone)]
pub struct ScriptBootstrap {
    script: String,
}

impl ScriptBootstrap {
    /// Script used when none is configured.
    #[cfg(windows)]
    pub const DEFAULT_SCRIPT: &'static str = "device.bat";
    /// Script used when none is configured.
    #[cfg(not(windows))]
    pub const DEFAULT_SCRIPT: &'static str = "./device.sh";

    /// Creates a bootstrap that runs `script`.
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// The script this bootstrap runs.
    pub fn script(&self) -> &str {
        &self.script
    }

    fn shell_command(&self) -> Command {
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.script);
            cmd
        }
        #[cfg(not(windows))]
        {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.script);
            cmd
        }
    }
}

impl Default for ScriptBootstrap {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SCRIPT)
    }
}

impl DeviceBootstrap for ScriptBootstrap {
    fn prepare(&self) -> Result<DeviceStatus, DeviceError> {
        tracing::debug!(script = %self.script, "running device bootstrap");
        let status = self
            .shell_command()
            .status()
            .map_err(|source| DeviceError::Spawn {
                script: self.script.clone(),
                source,
            })?;
        Ok(DeviceStatus::from_exit_status(status))
    }
}
