//! Per-connection handler: frontend calls in, UI signals out.
//!
//! Each accepted page gets its own Tokio task running this handler.
//! The loop:
//!   1. Forward broadcast UI signals to the page, in emit order
//!   2. Decode frontend messages → dispatch `Call`s to the registry
//!   3. Report each finished call with a `Return`
//!
//! Exposed callables block (the sequencer waits on a camera), so each one
//! runs on the blocking pool and the loop stays responsive.

use std::sync::Arc;

use bee_protocol::{Codec, ProtocolError, UiMessage};
use bee_transport::{Connection, WebSocketConnection};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use crate::BeeError;
use crate::server::ServerState;

/// Outcome of a dispatched call, reported back to the loop.
enum Finished {
    Returned(u64),
    Panicked(u64),
}

/// Handles a single page from upgrade to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), BeeError> {
    let conn_id = conn.id();
    let _live = state.tracker.connect();
    tracing::info!(%conn_id, peer = %conn.peer_addr(), "UI page connected");

    let mut signals = state.signals.subscribe();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();

    loop {
        tokio::select! {
            // Signals first: everything a call emitted goes out before
            // that call's Return.
            biased;

            signal = signals.recv() => match signal {
                Ok(signal) => send(&conn, &state.codec, &UiMessage::signal(signal)).await?,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(%conn_id, skipped, "page fell behind, UI signals dropped");
                }
                Err(RecvError::Closed) => break,
            },

            Some(finished) = done_rx.recv() => match finished {
                Finished::Returned(call_id) => {
                    send(&conn, &state.codec, &UiMessage::Return { call_id }).await?;
                }
                Finished::Panicked(call_id) => {
                    send(
                        &conn,
                        &state.codec,
                        &UiMessage::error(500, format!("call {call_id} failed")),
                    )
                    .await?;
                }
            },

            incoming = conn.recv() => match incoming {
                Ok(Some(data)) => handle_frame(&conn, &state, &data, &done_tx).await?,
                Ok(None) => {
                    tracing::info!(%conn_id, "UI page closed cleanly");
                    break;
                }
                Err(e) => {
                    tracing::debug!(%conn_id, error = %e, "recv error");
                    break;
                }
            },
        }
    }

    // _live drops here → the tracker may end the session.
    Ok(())
}

/// Decodes one frame and dispatches it.
async fn handle_frame<C: Codec>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<C>>,
    data: &[u8],
    done_tx: &mpsc::UnboundedSender<Finished>,
) -> Result<(), BeeError> {
    let msg: UiMessage = match state.codec.decode(data) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::debug!(conn_id = %conn.id(), error = %e, "failed to decode UI message");
            return send(conn, &state.codec, &UiMessage::error(400, e.to_string())).await;
        }
    };

    match msg {
        UiMessage::Call { name, call_id } => {
            if name.trim().is_empty() {
                let invalid = ProtocolError::InvalidMessage("empty callable name".into());
                let reply = UiMessage::error(400, invalid.to_string());
                return send(conn, &state.codec, &reply).await;
            }
            let Some(handler) = state.registry.get(&name) else {
                tracing::debug!(%name, "call to unknown callable");
                return send(
                    conn,
                    &state.codec,
                    &UiMessage::error(404, format!("no exposed callable named {name:?}")),
                )
                .await;
            };

            tracing::debug!(%name, call_id, "dispatching call");
            let done_tx = done_tx.clone();
            tokio::spawn(async move {
                let finished = match tokio::task::spawn_blocking(move || handler()).await {
                    Ok(()) => Finished::Returned(call_id),
                    Err(e) => {
                        tracing::error!(%name, call_id, error = %e, "exposed callable panicked");
                        Finished::Panicked(call_id)
                    }
                };
                // The page may already be gone; the call still ran.
                let _ = done_tx.send(finished);
            });
        }
        other => {
            tracing::debug!(conn_id = %conn.id(), message = ?other, "ignoring unexpected UI message");
        }
    }

    Ok(())
}

async fn send(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    msg: &UiMessage,
) -> Result<(), BeeError> {
    let bytes = codec.encode(msg)?;
    conn.send(&bytes).await.map_err(BeeError::Transport)
}
