//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::BTreeSet;

use streamchat_app::{ConnectionState, Context, Screen, router};
use streamchat_proto::MessageKind;

use super::{Invariant, InvariantResult, SessionSnapshot};

/// The active direct thread never carries an unread entry.
pub struct ActiveContextHasNoUnread;

impl Invariant for ActiveContextHasNoUnread {
    fn name(&self) -> &'static str {
        "ActiveContextHasNoUnread"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if let Some(peer) = state.active.peer()
            && state.unread.iter().any(|(p, _)| p == peer)
        {
            return Err(self.violation(format!(
                "active thread {peer} has unread count {}",
                state.unread_for(peer)
            )));
        }
        Ok(())
    }
}

/// The local identity is never a thread key, unread key, or typer.
pub struct IdentityNeverTracked;

impl Invariant for IdentityNeverTracked {
    fn name(&self) -> &'static str {
        "IdentityNeverTracked"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let me = state.identity.as_str();
        if me.is_empty() {
            return Ok(());
        }

        if state.active.peer() == Some(me) {
            return Err(self.violation(format!("active thread is self ({me})")));
        }
        if state.unread_for(me) > 0 {
            return Err(self.violation(format!("self ({me}) has unread entry")));
        }
        if state.typers.iter().any(|t| t == me) {
            return Err(self.violation(format!("self ({me}) shown as typing")));
        }
        Ok(())
    }
}

/// Every message that concerns the local identity appears in exactly one
/// conversation view.
///
/// Chat and system messages are all in the shared view; direct messages are
/// in exactly one thread view; the views together hold every routable
/// message once.
pub struct ContextPartition;

impl Invariant for ContextPartition {
    fn name(&self) -> &'static str {
        "ContextPartition"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let me = state.identity.as_str();

        let mut views = vec![Context::Shared];
        let peers: BTreeSet<&str> = state
            .messages
            .iter()
            .filter(|m| m.kind == MessageKind::Direct)
            .flat_map(|m| [Some(m.author.as_str()), m.recipient.as_deref()])
            .flatten()
            .filter(|p| *p != me)
            .collect();
        views.extend(peers.into_iter().map(Context::direct));

        let routable = state.messages.iter().filter(|m| router::context_of(m, me).is_some()).count();
        let shown: usize =
            views.iter().map(|v| router::visible_messages(&state.messages, v, me).len()).sum();

        if shown != routable {
            return Err(self.violation(format!(
                "{routable} routable messages but {shown} shown across {} views",
                views.len()
            )));
        }

        let broadcast = state.messages.iter().filter(|m| m.kind != MessageKind::Direct).count();
        let shared = router::visible_messages(&state.messages, &Context::Shared, me).len();
        if shared != broadcast {
            return Err(self.violation(format!(
                "{broadcast} chat/system messages but {shared} in shared view"
            )));
        }
        Ok(())
    }
}

/// Outside an open session there is no residual session data.
pub struct StateClearedOutsideSession;

impl Invariant for StateClearedOutsideSession {
    fn name(&self) -> &'static str {
        "StateClearedOutsideSession"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.state == ConnectionState::Open {
            return Ok(());
        }

        let residue = [
            (!state.messages.is_empty(), "messages"),
            (!state.roster.is_empty(), "roster"),
            (!state.unread.is_empty(), "unread"),
            (!state.typers.is_empty(), "typers"),
            (state.typing_pending, "typing burst"),
        ];
        if let Some((_, what)) = residue.iter().find(|(present, _)| *present) {
            return Err(self.violation(format!("{what} survives in {:?}", state.state)));
        }
        Ok(())
    }
}

/// The chat screen is shown exactly while the session is open.
pub struct ScreenFollowsConnection;

impl Invariant for ScreenFollowsConnection {
    fn name(&self) -> &'static str {
        "ScreenFollowsConnection"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let open = state.state == ConnectionState::Open;
        let chat = state.screen == Screen::Chat;
        if open != chat {
            return Err(self.violation(format!(
                "screen {:?} while connection {:?}",
                state.screen, state.state
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use streamchat_proto::Message;

    use super::*;

    fn open_snapshot() -> SessionSnapshot {
        SessionSnapshot {
            identity: "You".into(),
            state: ConnectionState::Open,
            screen: Screen::Chat,
            ..SessionSnapshot::default()
        }
    }

    #[test]
    fn unread_on_active_thread_is_flagged() {
        let mut snapshot = open_snapshot();
        snapshot.active = Context::direct("Alex");
        snapshot.unread.push(("Alex".into(), 1));

        assert!(ActiveContextHasNoUnread.check(&snapshot).is_err());
    }

    #[test]
    fn self_typing_is_flagged() {
        let mut snapshot = open_snapshot();
        snapshot.typers.push("You".into());

        assert!(IdentityNeverTracked.check(&snapshot).is_err());
    }

    #[test]
    fn partition_holds_for_mixed_messages() {
        let mut snapshot = open_snapshot();
        snapshot.messages = vec![
            Message::chat(1u64, "Alex", "hi", 0),
            Message::direct(2u64, "Alex", "You", "psst", 1),
            Message::direct(3u64, "You", "Sarah", "yo", 2),
            Message::direct(4u64, "Alex", "Sarah", "not for us", 3),
        ];

        assert!(ContextPartition.check(&snapshot).is_ok());
    }

    #[test]
    fn residue_after_close_is_flagged() {
        let snapshot = SessionSnapshot {
            identity: "You".into(),
            state: ConnectionState::Closed,
            roster: vec!["Alex".into()],
            ..SessionSnapshot::default()
        };

        assert!(StateClearedOutsideSession.check(&snapshot).is_err());
    }

    #[test]
    fn chat_screen_while_closed_is_flagged() {
        let snapshot = SessionSnapshot {
            state: ConnectionState::Closed,
            screen: Screen::Chat,
            ..SessionSnapshot::default()
        };

        assert!(ScreenFollowsConnection.check(&snapshot).is_err());
    }
}
