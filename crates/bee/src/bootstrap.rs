//! Session bootstrapper.
//!
//! Brings the process up to the point where the frontend can call `init`,
//! then keeps it alive until the UI session ends:
//!
//! ```text
//! configure → register entry point → bind → companion window → serve
//! ```

use std::sync::Arc;

use bee_auth::{CommandAuthenticator, DeviceBootstrap, FaceAuthenticator, ScriptBootstrap};
use bee_voice::{CommandSpeaker, Speaker};
use tracing::{Instrument, Span};

use crate::BeeError;
use crate::browser;
use crate::config::SessionConfig;
use crate::logging::bootstrap_span;
use crate::sequencer::AuthSequencer;
use crate::server::{RunningUi, UiServer};
use crate::signal::UiSignals;

/// Name under which the frontend triggers the start-up sequence.
pub const ENTRY_POINT: &str = "init";

/// The sequencer type the bootstrapper exposes.
pub type EntrySequencer<D, A, S> = AuthSequencer<D, A, S, UiSignals>;

/// Configured launcher, ready to serve.
pub struct Bootstrapper {
    config: SessionConfig,
    ui: UiServer,
    span: Span,
}

impl Bootstrapper {
    /// Validates `config` against the asset directory.
    ///
    /// # Errors
    /// [`crate::ConfigError::MissingAssetRoot`] if the asset root is absent.
    pub fn configure(config: SessionConfig) -> Result<Self, BeeError> {
        let span = bootstrap_span();
        let ui = UiServer::init(config.asset_root.clone())?
            .with_shutdown_delay(config.shutdown_delay);
        span.in_scope(|| {
            tracing::info!(
                app = %config.app_name,
                user = %config.user_name,
                addr = %config.bind_addr(),
                "configured"
            );
        });
        Ok(Self { config, ui, span })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Exposes the start-up sequence as [`ENTRY_POINT`].
    ///
    /// Each frontend call runs the sequence once on the blocking pool.
    /// Returns the sequencer so callers can drive it directly.
    pub fn register_entry_point<D, A, S>(
        &mut self,
        device: D,
        auth: A,
        speaker: S,
    ) -> Arc<EntrySequencer<D, A, S>>
    where
        D: DeviceBootstrap,
        A: FaceAuthenticator,
        S: Speaker,
    {
        let sequencer = Arc::new(AuthSequencer::new(
            device,
            auth,
            speaker,
            self.ui.signals(),
            self.config.user_name.clone(),
        ));

        let entry = Arc::clone(&sequencer);
        self.ui.expose(ENTRY_POINT, move || {
            let report = entry.run();
            tracing::debug!(?report, "entry point finished");
        });
        sequencer
    }

    /// Binds the configured address and starts serving the start page.
    ///
    /// # Errors
    /// Missing start page or bind failure; both are fatal.
    pub async fn start(self) -> Result<RunningUi, BeeError> {
        let Self { config, ui, span } = self;
        ui.start(&config.start_page, &config.host, config.port)
            .instrument(span)
            .await
    }
}

/// Runs a whole launcher session with the command-backed collaborators.
///
/// Returns once the UI session ends.
///
/// # Errors
/// Any fatal bootstrap failure: bad asset layout or an unbindable address.
pub async fn run(config: SessionConfig) -> Result<(), BeeError> {
    let collaborators = config.collaborators.clone();
    let mut bootstrapper = Bootstrapper::configure(config)?;

    bootstrapper.register_entry_point(
        ScriptBootstrap::new(collaborators.device_script),
        CommandAuthenticator::new(collaborators.face_auth.program, collaborators.face_auth.args),
        CommandSpeaker::new(
            collaborators.tts.program,
            collaborators.tts.args,
            collaborators.sound_player.program,
            collaborators.sound_player.args,
            collaborators.startup_sound,
        ),
    );

    // Open the window only once something is listening on its URL.
    let url = bootstrapper.config().companion_url();
    let span = bootstrapper.span.clone();
    let running = bootstrapper.start().await?;
    span.in_scope(|| browser::launch_companion_window(&url));

    running.run().await
}
