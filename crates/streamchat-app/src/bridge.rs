//! Wire-to-Application translation layer.
//!
//! The [`Bridge`] sits between the [`crate::App`] and the transport.
//!
//! # Responsibilities
//!
//! - Encodes [`crate::AppAction::Send`] intents into text frames and
//!   accumulates them for the driver to send in the next I/O cycle.
//! - Decodes server frames and transport lifecycle notifications into
//!   [`crate::AppEvent`]s. Malformed frames are logged and dropped.

use streamchat_client::TransportEvent;
use streamchat_proto::Inbound;

use crate::{AppAction, AppEvent};

/// Bridge between App intents and the wire.
#[derive(Debug, Default)]
pub struct Bridge {
    outgoing: Vec<String>,
}

impl Bridge {
    /// Create a bridge with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an App action. Only `Send` produces wire output.
    pub fn process_app_action(&mut self, action: &AppAction) {
        let AppAction::Send(outbound) = action else {
            return;
        };

        match outbound.encode() {
            Ok(frame) => self.outgoing.push(frame),
            Err(e) => tracing::warn!(tag = outbound.tag(), error = %e, "failed to encode intent"),
        }
    }

    /// Translate a transport notification into App events.
    pub fn handle_transport(&mut self, event: TransportEvent) -> Vec<AppEvent> {
        match event {
            TransportEvent::Opened => vec![AppEvent::Connected],
            TransportEvent::Frame(frame) => self.handle_frame(&frame),
            TransportEvent::Closed => vec![AppEvent::Disconnected],
            TransportEvent::Error(reason) => vec![AppEvent::TransportFailed { reason }],
        }
    }

    /// Decode one server frame.
    pub fn handle_frame(&mut self, frame: &str) -> Vec<AppEvent> {
        match Inbound::decode(frame) {
            Ok(inbound) => vec![AppEvent::Server(inbound)],
            Err(e) => {
                tracing::warn!(error = %e, len = frame.len(), "dropping malformed frame");
                vec![]
            },
        }
    }

    /// Take pending outgoing frames.
    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outgoing)
    }
}
