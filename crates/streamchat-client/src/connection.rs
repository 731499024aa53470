//! Channel handle shared by every connection flavor.

use tokio::{
    sync::mpsc::{self, error::TryRecvError},
    task::AbortHandle,
};

use crate::{TransportError, TransportEvent};

/// Handle to a running connection task.
///
/// Frames are sent and received over channels while an internal task owns the
/// actual I/O. Dropping the handle stops the task.
pub struct ConnectedClient {
    to_server: mpsc::Sender<String>,
    from_server: mpsc::Receiver<TransportEvent>,
    abort_handle: AbortHandle,
    terminated: bool,
}

impl ConnectedClient {
    pub(crate) fn new(
        to_server: mpsc::Sender<String>,
        from_server: mpsc::Receiver<TransportEvent>,
        abort_handle: AbortHandle,
    ) -> Self {
        Self { to_server, from_server, abort_handle, terminated: false }
    }

    /// Queue a text frame for the server.
    pub async fn send(&self, frame: String) -> Result<(), TransportError> {
        self.to_server.send(frame).await.map_err(|_| TransportError::Closed)
    }

    /// Wait for the next lifecycle event. `None` once the task has finished.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        let event = self.from_server.recv().await;
        if matches!(event, Some(TransportEvent::Closed | TransportEvent::Error(_))) {
            self.terminated = true;
        }
        event
    }

    /// Next lifecycle event if one is ready, without waiting.
    ///
    /// A task that ended without reporting why is surfaced as
    /// [`TransportEvent::Closed`] exactly once.
    pub fn try_recv(&mut self) -> Option<TransportEvent> {
        match self.from_server.try_recv() {
            Ok(event) => {
                if matches!(event, TransportEvent::Closed | TransportEvent::Error(_)) {
                    self.terminated = true;
                }
                Some(event)
            },
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if self.terminated {
                    None
                } else {
                    self.terminated = true;
                    Some(TransportEvent::Closed)
                }
            },
        }
    }

    /// Stop the connection task.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for ConnectedClient {
    fn drop(&mut self) {
        self.stop();
    }
}
