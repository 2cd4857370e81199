//! `UiServer` setup and the serving loop.
//!
//! Ties the layers together: transport → protocol → callables/signals.
//! [`UiServer`] is configured before serving starts; [`RunningUi`] owns
//! the bound listener and runs until the UI session ends.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bee_protocol::{Codec, JsonCodec};
use bee_transport::{AssetConfig, HttpTransport, Transport, TransportError};
use tracing::{Instrument, Span};

use crate::BeeError;
use crate::config::{ConfigError, SessionConfig};
use crate::handler::handle_connection;
use crate::logging::bootstrap_span;
use crate::registry::CallableRegistry;
use crate::signal::UiSignals;
use crate::tracker::ConnectionTracker;

/// Shared state handed to each connection task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: CallableRegistry,
    pub(crate) signals: UiSignals,
    pub(crate) tracker: ConnectionTracker,
    pub(crate) codec: C,
}

/// The UI server before it starts serving.
///
/// # Example
///
/// ```rust,no_run
/// use bee::UiServer;
///
/// # async fn demo() -> Result<(), bee::BeeError> {
/// let mut ui = UiServer::init("www")?;
/// ui.expose("init", || println!("frontend ready"));
/// ui.start("index.html", "localhost", 8000).await?.run().await
/// # }
/// ```
pub struct UiServer {
    asset_root: PathBuf,
    registry: CallableRegistry,
    signals: UiSignals,
    shutdown_delay: Duration,
    span: Span,
}

impl UiServer {
    /// Prepares to serve the frontend found in `asset_root`.
    ///
    /// # Errors
    /// [`ConfigError::MissingAssetRoot`] if `asset_root` is not a directory.
    pub fn init(asset_root: impl Into<PathBuf>) -> Result<Self, BeeError> {
        let asset_root = asset_root.into();
        if !asset_root.is_dir() {
            return Err(ConfigError::MissingAssetRoot(asset_root).into());
        }
        let span = bootstrap_span();
        span.in_scope(|| tracing::debug!(root = %asset_root.display(), "UI assets found"));
        Ok(Self {
            asset_root,
            registry: CallableRegistry::new(),
            signals: UiSignals::new(),
            shutdown_delay: SessionConfig::SHUTDOWN_DELAY,
            span,
        })
    }

    /// How long the UI may stay disconnected before the session ends.
    pub fn with_shutdown_delay(mut self, delay: Duration) -> Self {
        self.shutdown_delay = delay;
        self
    }

    /// Makes `handler` callable from the frontend as `name`.
    ///
    /// Registering the same name again replaces the handler; returns
    /// `true` when that happened.
    pub fn expose<F>(&mut self, name: impl Into<String>, handler: F) -> bool
    where
        F: Fn() + Send + Sync + 'static,
    {
        let _entered = self.span.enter();
        self.registry.expose(name, handler)
    }

    /// Emitter for UI signals. Clones share one channel.
    pub fn signals(&self) -> UiSignals {
        self.signals.clone()
    }

    /// Names currently exposed to the frontend.
    pub fn registry(&self) -> &CallableRegistry {
        &self.registry
    }

    /// Binds `host:port` and starts serving `start_page`.
    ///
    /// # Errors
    /// [`ConfigError::MissingStartPage`] if the page is not under the asset
    /// root; [`TransportError::BindFailed`] if the address cannot be bound.
    pub async fn start(
        self,
        start_page: &str,
        host: &str,
        port: u16,
    ) -> Result<RunningUi, BeeError> {
        let page = self.asset_root.join(start_page);
        if !page.is_file() {
            return Err(ConfigError::MissingStartPage(page).into());
        }

        let addr = format!("{host}:{port}");
        let assets = AssetConfig::new(self.asset_root, start_page);
        let transport = HttpTransport::bind(&addr, assets)
            .instrument(self.span.clone())
            .await?;
        self.span.in_scope(|| {
            tracing::info!(
                %addr,
                local_addr = %transport.local_addr(),
                start_page,
                callables = self.registry.len(),
                "UI serving"
            );
        });

        let state = Arc::new(ServerState {
            registry: self.registry,
            signals: self.signals,
            tracker: ConnectionTracker::new(),
            codec: JsonCodec,
        });

        Ok(RunningUi {
            transport,
            state,
            shutdown_delay: self.shutdown_delay,
            span: self.span,
        })
    }
}

/// A bound UI server.
///
/// Call [`run()`](Self::run) to serve until the session ends.
pub struct RunningUi<C: Codec = JsonCodec> {
    transport: HttpTransport,
    state: Arc<ServerState<C>>,
    shutdown_delay: Duration,
    span: Span,
}

impl<C: Codec> RunningUi<C> {
    /// Returns the address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.transport.local_addr()
    }

    /// Emitter for UI signals of this session.
    pub fn signals(&self) -> UiSignals {
        self.state.signals.clone()
    }

    /// Serves pages until the UI session ends.
    ///
    /// The session ends when the last page has been gone for the shutdown
    /// delay, or on Ctrl-C. Signals emitted afterwards fail.
    pub async fn run(self) -> Result<(), BeeError> {
        let span = self.span.clone();
        self.serve().instrument(span).await
    }

    async fn serve(mut self) -> Result<(), BeeError> {
        let ended = self.state.tracker.session_ended(self.shutdown_delay);
        tokio::pin!(ended);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut ctrl_c_armed = true;

        loop {
            tokio::select! {
                () = &mut ended => {
                    tracing::info!("UI closed, ending session");
                    break;
                }
                interrupted = &mut ctrl_c, if ctrl_c_armed => match interrupted {
                    Ok(()) => {
                        tracing::info!("interrupted, ending session");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                        ctrl_c_armed = false;
                    }
                },
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(
                            async move {
                                if let Err(e) = handle_connection(conn, state).await {
                                    tracing::debug!(error = %e, "UI connection ended with error");
                                }
                            }
                            .in_current_span(),
                        );
                    }
                    Err(TransportError::Shutdown) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
            }
        }

        self.state.signals.close();
        self.transport.shutdown().await?;
        tracing::info!(live_pages = self.state.tracker.live(), "UI server stopped");
        Ok(())
    }
}
