//! Best-effort companion window.
//!
//! On Windows the UI is opened in Edge's app mode (a chromeless window).
//! Elsewhere nothing is spawned; the URL is logged for the user to open.
//! A failed launch never stops the launcher.

use std::io;

/// What happened when opening the companion window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The browser process was spawned.
    Launched,
    /// Not attempted on this platform.
    Skipped,
    /// Spawning failed; logged at error level.
    Failed,
}

/// Opens `url` in an app-mode browser window where supported.
pub fn launch_companion_window(url: &str) -> LaunchOutcome {
    #[cfg(windows)]
    {
        launch_with(url, spawn_edge)
    }
    #[cfg(not(windows))]
    {
        tracing::info!(%url, "no companion window on this platform, open the UI in a browser");
        LaunchOutcome::Skipped
    }
}

/// Opens `url` with `spawn`, logging and swallowing any failure.
pub fn launch_with<F>(url: &str, spawn: F) -> LaunchOutcome
where
    F: FnOnce(&str) -> io::Result<()>,
{
    match spawn(url) {
        Ok(()) => {
            tracing::info!(%url, "companion window launched");
            LaunchOutcome::Launched
        }
        Err(e) => {
            tracing::error!(%url, error = %e, "could not launch companion window");
            LaunchOutcome::Failed
        }
    }
}

#[cfg(windows)]
fn spawn_edge(url: &str) -> io::Result<()> {
    use std::process::{Command, Stdio};

    // `start` detaches; the empty string is the window title.
    Command::new("cmd")
        .args(["/C", "start", "", "msedge.exe"])
        .arg(format!("--app={url}"))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawner_sees_exact_url() {
        let mut seen = None;
        let outcome = launch_with("http://localhost:8000/index.html", |url| {
            seen = Some(url.to_string());
            Ok(())
        });
        assert_eq!(outcome, LaunchOutcome::Launched);
        assert_eq!(seen.as_deref(), Some("http://localhost:8000/index.html"));
    }

    #[test]
    fn test_spawn_failure_is_swallowed() {
        let outcome = launch_with("http://localhost:8000/index.html", |_| {
            Err(io::Error::new(io::ErrorKind::NotFound, "msedge.exe"))
        });
        assert_eq!(outcome, LaunchOutcome::Failed);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_skipped_off_windows() {
        assert_eq!(
            launch_companion_window("http://localhost:8000/index.html"),
            LaunchOutcome::Skipped
        );
    }
}
