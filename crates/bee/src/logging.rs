//! Process-wide log output.
//!
//! The subscriber is installed once, at process start, by the binary.
//! Components log inside their own span (see [`bootstrap_span`] and
//! [`sequencer_span`]) so every line names which part of the launcher
//! produced it.

use tracing::Span;
use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"info"`)
/// applies. Lines carry a timestamp, the level and the message.
///
/// # Panics
/// If a global subscriber is already installed.
pub fn init(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Span owned by the session bootstrapper.
pub fn bootstrap_span() -> Span {
    tracing::info_span!("bootstrap")
}

/// Span owned by one authentication sequencer.
pub fn sequencer_span() -> Span {
    tracing::info_span!("sequencer")
}
