//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a session at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use streamchat_app::{App, ConnectionState, Context, Screen};
use streamchat_proto::Message;

/// Snapshot of one client's session.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Local identity.
    pub identity: String,
    /// Connection lifecycle state.
    pub state: ConnectionState,
    /// Current screen.
    pub screen: Screen,
    /// Active conversation.
    pub active: Context,
    /// Every message, in arrival order.
    pub messages: Vec<Message>,
    /// Latest roster.
    pub roster: Vec<String>,
    /// Unread entries as `(peer, count)`.
    pub unread: Vec<(String, u32)>,
    /// Peers shown as typing.
    pub typers: Vec<String>,
    /// Outbound typing burst in progress.
    pub typing_pending: bool,
}

impl SessionSnapshot {
    /// Capture the observable state of `app`.
    pub fn from_app(app: &App) -> Self {
        Self {
            identity: app.identity().to_owned(),
            state: app.connection_state(),
            screen: app.screen(),
            active: app.active_context().clone(),
            messages: app.messages().to_vec(),
            roster: app.roster().to_vec(),
            unread: app.unread().iter().map(|(peer, count)| (peer.to_owned(), count)).collect(),
            typers: app.active_typers().into_iter().map(str::to_owned).collect(),
            typing_pending: app.debouncer().is_pending(),
        }
    }

    /// Unread count for `peer`. Zero when absent.
    pub fn unread_for(&self, peer: &str) -> u32 {
        self.unread.iter().find(|(p, _)| p == peer).map_or(0, |(_, count)| *count)
    }
}
