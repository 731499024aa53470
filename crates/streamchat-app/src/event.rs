//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - System ticks and terminal resizes.
//! - Transport notifications translated by the [`crate::Bridge`].

use std::time::Instant;

use streamchat_proto::Inbound;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick. Fires the typing debounce deadline.
    Tick {
        /// Current time.
        now: Instant,
    },

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Transport reported open.
    Connected,

    /// Transport closed without being asked to.
    Disconnected,

    /// Transport failed to open or broke.
    TransportFailed {
        /// Error description.
        reason: String,
    },

    /// Decoded server event.
    Server(Inbound),
}
