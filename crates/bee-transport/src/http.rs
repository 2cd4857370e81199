//! HTTP transport: serves the frontend and hands out its WebSocket.
//!
//! One local listener does both jobs, the way the frontend expects: plain
//! `GET` requests are answered from the asset directory, and a `GET` on the
//! socket route is upgraded and queued for [`Transport::accept`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};

use crate::assets::content_type;
use crate::{AssetConfig, Connection, Transport, TransportError, WebSocketConnection};

/// Upgraded sockets waiting for `accept`.
const ACCEPT_BACKLOG: usize = 16;

#[derive(Clone)]
struct HttpState {
    assets: Arc<AssetConfig>,
    incoming: mpsc::Sender<WebSocketConnection>,
}

/// A [`Transport`] serving the UI over local HTTP.
pub struct HttpTransport {
    local_addr: SocketAddr,
    incoming: mpsc::Receiver<WebSocketConnection>,
    shutdown_tx: watch::Sender<bool>,
}

impl HttpTransport {
    /// Binds the listener and starts serving `assets`.
    ///
    /// # Errors
    /// Returns [`TransportError::BindFailed`] if the address is invalid or
    /// already in use.
    pub async fn bind(addr: &str, assets: AssetConfig) -> Result<Self, TransportError> {
        let bind_failed = |source| TransportError::BindFailed {
            addr: addr.to_string(),
            source,
        };
        let listener = TcpListener::bind(addr).await.map_err(bind_failed)?;
        let local_addr = listener.local_addr().map_err(bind_failed)?;

        let (conn_tx, conn_rx) = mpsc::channel(ACCEPT_BACKLOG);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let socket_route = assets.socket_route.clone();
        let state = HttpState {
            assets: Arc::new(assets),
            incoming: conn_tx,
        };
        let app = Router::new()
            .route(&socket_route, get(upgrade))
            .fallback(serve_asset)
            .with_state(state);

        tokio::spawn(async move {
            let result = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.wait_for(|stop| *stop).await;
            })
            .await;
            if let Err(e) = result {
                tracing::error!(error = %TransportError::ServerFailed(e), "UI server stopped");
            }
        });

        tracing::info!(%local_addr, "UI transport listening");
        Ok(Self {
            local_addr,
            incoming: conn_rx,
            shutdown_tx,
        })
    }

    /// Returns the address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Transport for HttpTransport {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        self.incoming.recv().await.ok_or(TransportError::Shutdown)
    }

    async fn shutdown(&self) -> Result<(), Self::Error> {
        self.shutdown_tx.send_replace(true);
        Ok(())
    }
}

async fn upgrade(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<HttpState>,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        let conn = WebSocketConnection::new(socket, peer);
        tracing::debug!(id = %conn.id(), %peer, "accepted UI WebSocket");
        if state.incoming.send(conn).await.is_err() {
            tracing::debug!(%peer, "transport closed, dropping UI socket");
        }
    })
}

async fn serve_asset(State(state): State<HttpState>, uri: Uri) -> Response {
    let Some(path) = state.assets.resolve(uri.path()) else {
        tracing::debug!(path = uri.path(), "rejected asset path");
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(body) => ([(header::CONTENT_TYPE, content_type(&path))], body).into_response(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "asset not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
