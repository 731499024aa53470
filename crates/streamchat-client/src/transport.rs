//! WebSocket transport for the client.
//!
//! Provides [`connect`], which spawns a task that owns the WebSocket and
//! bridges it to the channels of a [`ConnectedClient`]. Connecting is
//! fire-and-forget: the call returns immediately and the outcome arrives as
//! [`TransportEvent::Opened`] or [`TransportEvent::Error`].

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::{ConnectedClient, TransportEvent};

const OUTGOING_CAPACITY: usize = 32;
const INCOMING_CAPACITY: usize = 64;

/// Connect to a StreamChat server at `server_url` (`ws://` or `wss://`).
///
/// Must be called from within a tokio runtime.
pub fn connect(server_url: &str) -> ConnectedClient {
    // `wss://` needs a process-wide crypto provider; a second install is a no-op error.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(OUTGOING_CAPACITY);
    let (from_server_tx, from_server_rx) = mpsc::channel::<TransportEvent>(INCOMING_CAPACITY);

    let handle = tokio::spawn(run_connection(server_url.to_owned(), to_server_rx, from_server_tx));

    ConnectedClient::new(to_server_tx, from_server_rx, handle.abort_handle())
}

/// Run the connection, bridging between channels and the WebSocket.
async fn run_connection(
    server_url: String,
    mut to_server: mpsc::Receiver<String>,
    from_server: mpsc::Sender<TransportEvent>,
) {
    let stream = match tokio_tungstenite::connect_async(server_url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            tracing::warn!(url = %server_url, error = %e, "websocket connect failed");
            let _ = from_server.send(TransportEvent::Error(e.to_string())).await;
            return;
        },
    };

    tracing::info!(url = %server_url, "websocket connected");
    if from_server.send(TransportEvent::Opened).await.is_err() {
        return;
    }

    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            outgoing = to_server.recv() => {
                let Some(frame) = outgoing else {
                    // Handle dropped: close politely.
                    let _ = write.send(Message::Close(None)).await;
                    break;
                };

                if let Err(e) = write.send(Message::Text(frame.into())).await {
                    tracing::warn!(error = %e, "websocket write failed");
                    let _ = from_server.send(TransportEvent::Error(e.to_string())).await;
                    break;
                }
            }

            incoming = read.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let event = TransportEvent::Frame(text.as_str().to_owned());
                        if from_server.send(event).await.is_err() {
                            break;
                        }
                    },
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "server closed websocket");
                        let _ = from_server.send(TransportEvent::Closed).await;
                        break;
                    },
                    None => {
                        let _ = from_server.send(TransportEvent::Closed).await;
                        break;
                    },
                    // Binary and control frames carry nothing for us.
                    Some(Ok(_)) => {},
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "websocket read failed");
                        let _ = from_server.send(TransportEvent::Error(e.to_string())).await;
                        break;
                    },
                }
            }
        }
    }
}
