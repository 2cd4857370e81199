//! Backend → frontend UI signals.
//!
//! Signals are fire-and-forget: [`UiSignals::emit`] fans a signal out to
//! every connected page and returns immediately. Whether a page applied it
//! is never reported back.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bee_protocol::UiSignal;
use bee_transport::TransportError;
use tokio::sync::broadcast;

/// Signals buffered per connection before a slow page starts losing them.
const SIGNAL_BUFFER: usize = 32;

/// Sends UI signals to the frontend.
pub trait SignalEmitter: Send + Sync + 'static {
    /// Requests a visual state change.
    ///
    /// # Errors
    /// Only when the UI session is over and nothing can be delivered.
    fn emit(&self, signal: UiSignal) -> Result<(), TransportError>;
}

impl<T: SignalEmitter + ?Sized> SignalEmitter for Arc<T> {
    fn emit(&self, signal: UiSignal) -> Result<(), TransportError> {
        (**self).emit(signal)
    }
}

/// Broadcast-backed emitter handed out by the UI server.
///
/// Cheap to clone. Usable from blocking threads.
#[derive(Clone)]
pub struct UiSignals {
    tx: broadcast::Sender<UiSignal>,
    closed: Arc<AtomicBool>,
}

impl UiSignals {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_BUFFER);
        Self {
            tx,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// New receiver for one connection.
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<UiSignal> {
        self.tx.subscribe()
    }

    /// Marks the session over; later emits fail.
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Returns `true` once the UI session has ended.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl SignalEmitter for UiSignals {
    fn emit(&self, signal: UiSignal) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Shutdown);
        }
        match self.tx.send(signal) {
            Ok(pages) => tracing::debug!(%signal, pages, "UI signal emitted"),
            Err(_) => tracing::debug!(%signal, "UI signal emitted with no page connected"),
        }
        Ok(())
    }
}
