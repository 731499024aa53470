//! Observable session state types.
//!
//! These are the "View Model" pieces the presentation layer reads: where the
//! connection is, which screen is shown, and which conversation is active.

use std::fmt;

/// Display name of the shared channel.
pub const SHARED_CHANNEL_NAME: &str = "general";

/// Connection lifecycle.
///
/// `Idle -> Connecting -> Open -> Closed`, with `Closed` reachable from any
/// non-idle state and `Closed -> Connecting` only through [`crate::App::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection attempted yet.
    #[default]
    Idle,
    /// Transport open requested, waiting for the server.
    Connecting,
    /// Joined and receiving events.
    Open,
    /// Connection ended by the user or the transport.
    Closed,
}

impl ConnectionState {
    /// A connection attempt or session is in flight.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Open)
    }
}

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Identity entry.
    #[default]
    Join,
    /// Conversation view.
    Chat,
}

/// Conversational context: the shared channel or a direct thread.
///
/// Direct threads are keyed by the peer, never by the local identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Context {
    /// The broadcast channel everyone sees.
    #[default]
    Shared,
    /// Direct thread with the named peer.
    Direct(String),
}

impl Context {
    /// Direct thread with `peer`.
    pub fn direct(peer: impl Into<String>) -> Self {
        Self::Direct(peer.into())
    }

    /// Peer of a direct thread. `None` for the shared channel.
    pub fn peer(&self) -> Option<&str> {
        match self {
            Self::Shared => None,
            Self::Direct(peer) => Some(peer),
        }
    }

    /// Whether this is the shared channel.
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared => f.write_str(SHARED_CHANNEL_NAME),
            Self::Direct(peer) => f.write_str(peer),
        }
    }
}
