//! Tracks connected UI pages to decide when the session is over.
//!
//! The session ends when the last page disconnects and none comes back
//! within the shutdown delay. A page reload closes and reopens its socket
//! quickly, so it does not end the session.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Counts live UI connections.
#[derive(Clone)]
pub(crate) struct ConnectionTracker {
    live: Arc<watch::Sender<usize>>,
}

impl ConnectionTracker {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { live: Arc::new(tx) }
    }

    /// Registers a connection until the returned guard drops.
    pub(crate) fn connect(&self) -> LiveConnection {
        self.live.send_modify(|n| *n += 1);
        LiveConnection {
            live: Arc::clone(&self.live),
        }
    }

    /// Number of pages currently connected.
    pub(crate) fn live(&self) -> usize {
        *self.live.borrow()
    }

    /// Resolves once a page has connected and then every page has been
    /// gone for `delay`.
    pub(crate) fn session_ended(&self, delay: Duration) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.live.subscribe();
        async move {
            if rx.wait_for(|n| *n > 0).await.is_err() {
                return;
            }
            loop {
                if rx.wait_for(|n| *n == 0).await.is_err() {
                    return;
                }
                match tokio::time::timeout(delay, rx.wait_for(|n| *n > 0)).await {
                    Ok(Ok(_)) => {
                        tracing::debug!("UI page reconnected");
                    }
                    Ok(Err(_)) | Err(_) => return,
                }
            }
        }
    }
}

/// Guard for one live connection.
pub(crate) struct LiveConnection {
    live: Arc<watch::Sender<usize>>,
}

impl Drop for LiveConnection {
    fn drop(&mut self) {
        self.live.send_modify(|n| *n = n.saturating_sub(1));
    }
}
