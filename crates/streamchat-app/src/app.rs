//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns the chat session
//! completely decoupled from I/O and wire mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! user intents, and produces [`crate::AppAction`] instructions for the
//! runtime to execute.
//!
//! # Responsibilities
//!
//! - Drives the connection lifecycle and the join/chat screen switch.
//! - Applies server events: history, messages, roster, typing signals.
//! - Tracks the active conversation and unread direct messages.
//! - Debounces outbound typing signals.

use std::time::Instant;

use streamchat_proto::{Inbound, MAX_MESSAGE_CHARS, Message, Outbound};

use crate::{
    AppAction, AppEvent, ConnectionState, Context, Screen, SessionConfig, TypingDebouncer,
    TypingSet, TypingTransition, UnreadIndex, router,
};

const CONNECTION_FAILED: &str = "Connection failed. Is the server running?";
const CONNECTION_LOST: &str = "Disconnected from server";

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    config: SessionConfig,
    state: ConnectionState,
    screen: Screen,
    /// Local identity. Empty until the first [`App::open`].
    identity: String,
    /// Every message received this session, in arrival order.
    messages: Vec<Message>,
    roster: Vec<String>,
    unread: UnreadIndex,
    typing: TypingSet,
    debouncer: TypingDebouncer,
    active: Context,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    status_message: Option<String>,
}

impl App {
    /// Create an idle App.
    pub fn new(config: SessionConfig) -> Self {
        let debouncer = TypingDebouncer::new(config.typing_quiet_interval);
        Self {
            config,
            state: ConnectionState::Idle,
            screen: Screen::Join,
            identity: String::new(),
            messages: Vec::new(),
            roster: Vec::new(),
            unread: UnreadIndex::new(),
            typing: TypingSet::new(),
            debouncer,
            active: Context::Shared,
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick { now } => self.tick(now),
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Connected => {
                if self.state != ConnectionState::Connecting {
                    tracing::debug!(state = ?self.state, "ignoring stale open notification");
                    return vec![];
                }
                tracing::debug!(identity = %self.identity, "session open");
                self.state = ConnectionState::Open;
                self.screen = Screen::Chat;
                self.status_message = None;
                vec![AppAction::Send(Outbound::join(self.identity.clone())), AppAction::Render]
            },
            AppEvent::Disconnected => self.fail(CONNECTION_LOST),
            AppEvent::TransportFailed { reason } => {
                if self.state.is_active() {
                    tracing::warn!(%reason, "transport failed");
                }
                self.fail(CONNECTION_FAILED)
            },
            AppEvent::Server(inbound) => self.dispatch(inbound),
        }
    }

    /// Start a session as `identity`.
    ///
    /// Allowed from idle or closed; ignored while a session is in flight.
    /// Clears all session state and asks the runtime to open the transport.
    pub fn open(&mut self, identity: impl Into<String>) -> Vec<AppAction> {
        if self.state.is_active() {
            tracing::debug!(state = ?self.state, "open ignored: session in flight");
            return vec![];
        }

        let identity = identity.into().trim().to_owned();
        if identity.is_empty() {
            self.status_message = Some("Enter a name to join".to_owned());
            return vec![AppAction::Render];
        }

        self.reset_session();
        self.identity = identity;
        self.state = ConnectionState::Connecting;
        self.status_message = None;
        tracing::debug!(identity = %self.identity, "connecting");

        vec![AppAction::Connect { server_url: self.config.server_url.clone() }, AppAction::Render]
    }

    /// Apply one server event.
    ///
    /// Only applied while the session is open. Unknown event kinds are
    /// ignored.
    pub fn dispatch(&mut self, inbound: Inbound) -> Vec<AppAction> {
        if self.state != ConnectionState::Open {
            tracing::debug!(tag = inbound.tag(), state = ?self.state, "dropping event outside session");
            return vec![];
        }

        match inbound {
            Inbound::History(messages) => {
                self.messages = messages;
            },
            Inbound::Message(message) => {
                self.unread.observe(&message, &self.identity, &self.active);
                self.messages.push(message);
            },
            Inbound::Users(roster) => {
                let roster = router::dedup_roster(roster);
                self.typing.retain_roster(&roster);
                self.roster = roster;
            },
            Inbound::Typing(signal) => self.typing.apply(signal),
            Inbound::Unknown { kind } => {
                tracing::debug!(%kind, "ignoring unknown event");
                return vec![];
            },
        }

        vec![AppAction::Render]
    }

    /// End the session and return to the join screen.
    ///
    /// A pending typing burst is dropped without signalling.
    pub fn close(&mut self) -> Vec<AppAction> {
        if !self.state.is_active() {
            return vec![];
        }

        tracing::debug!(identity = %self.identity, "closing session");
        self.reset_session();
        self.state = ConnectionState::Closed;
        self.screen = Screen::Join;
        self.status_message = None;
        vec![AppAction::Disconnect, AppAction::Render]
    }

    /// Switch the active conversation.
    ///
    /// Clears the unread count of the thread being opened. Leaving the shared
    /// channel mid-burst sends "typing stopped". A direct thread with the
    /// local identity is ignored.
    pub fn set_active_context(&mut self, context: Context) -> Vec<AppAction> {
        if context.peer() == Some(self.identity.as_str()) {
            return vec![];
        }

        let mut actions = Vec::new();
        if self.active.is_shared()
            && !context.is_shared()
            && let Some(transition) = self.debouncer.flush()
        {
            actions.push(self.typing_action(transition));
        }

        if let Some(peer) = context.peer() {
            self.unread.clear(peer);
        }
        self.active = context;

        actions.push(AppAction::Render);
        actions
    }

    /// Send `text` to the active conversation.
    pub fn send_message(&mut self, text: &str) -> Vec<AppAction> {
        if self.state != ConnectionState::Open {
            self.status_message = Some("Not connected".to_owned());
            return vec![AppAction::Render];
        }
        if text.trim().is_empty() {
            return vec![];
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            self.status_message = Some(format!("Messages are limited to {MAX_MESSAGE_CHARS} characters"));
            return vec![AppAction::Render];
        }

        match &self.active {
            Context::Shared => {
                let color = self.config.message_color.clone();
                let message = Outbound::chat(text, self.identity.clone(), color);
                let stopped = self.debouncer.on_send();
                vec![
                    AppAction::Send(message),
                    self.typing_action(stopped),
                    AppAction::Render,
                ]
            },
            Context::Direct(peer) => {
                vec![AppAction::Send(Outbound::direct(text, peer.clone())), AppAction::Render]
            },
        }
    }

    /// A keystroke changed the input at `now`.
    ///
    /// Typing signals are only sent in the shared channel.
    pub fn keystroke(&mut self, now: Instant) -> Vec<AppAction> {
        if self.state != ConnectionState::Open || !self.active.is_shared() {
            return vec![];
        }

        self.debouncer
            .on_keystroke(now)
            .map(|transition| vec![self.typing_action(transition)])
            .unwrap_or_default()
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    fn tick(&mut self, now: Instant) -> Vec<AppAction> {
        match self.debouncer.on_tick(now) {
            Some(transition) if self.state == ConnectionState::Open => {
                vec![self.typing_action(transition)]
            },
            _ => vec![],
        }
    }

    fn fail(&mut self, message: &str) -> Vec<AppAction> {
        if !self.state.is_active() {
            tracing::debug!(state = ?self.state, "ignoring stale transport notification");
            return vec![];
        }

        self.reset_session();
        self.state = ConnectionState::Closed;
        self.screen = Screen::Join;
        self.status_message = Some(message.to_owned());
        vec![AppAction::Disconnect, AppAction::Render]
    }

    fn reset_session(&mut self) {
        self.messages.clear();
        self.roster.clear();
        self.unread.clear_all();
        self.typing.clear();
        self.debouncer.cancel();
        self.active = Context::Shared;
    }

    fn typing_action(&self, transition: TypingTransition) -> AppAction {
        AppAction::Send(Outbound::typing(self.identity.clone(), transition.is_typing()))
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Local identity. Empty before the first session.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// All messages received this session, in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages in the active conversation, in arrival order.
    pub fn visible_messages(&self) -> Vec<&Message> {
        router::visible_messages(&self.messages, &self.active, &self.identity)
    }

    /// Latest roster, as sent by the server.
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    /// Roster without the local identity.
    pub fn peers(&self) -> Vec<&str> {
        router::peers(&self.roster, &self.identity)
    }

    /// Navigable conversations: shared channel first, then one per peer.
    pub fn contexts(&self) -> Vec<Context> {
        router::contexts(&self.roster, &self.identity)
    }

    /// Currently active conversation.
    pub fn active_context(&self) -> &Context {
        &self.active
    }

    /// Unread direct message counts.
    pub fn unread(&self) -> &UnreadIndex {
        &self.unread
    }

    /// Peers typing in the shared channel, excluding the local identity.
    pub fn active_typers(&self) -> Vec<&str> {
        self.typing.active_typers(&self.identity)
    }

    /// Outbound typing state.
    pub fn debouncer(&self) -> &TypingDebouncer {
        &self.debouncer
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use streamchat_proto::TypingSignal;

    use super::*;

    fn open_app(identity: &str) -> App {
        let mut app = App::new(SessionConfig::default());
        let _ = app.open(identity);
        let _ = app.handle(AppEvent::Connected);
        app
    }

    fn sent(actions: &[AppAction]) -> Vec<&Outbound> {
        actions
            .iter()
            .filter_map(|action| match action {
                AppAction::Send(outbound) => Some(outbound),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn open_requests_connection() {
        let mut app = App::new(SessionConfig::new(Some("ws://localhost:8080".into())));
        let actions = app.open("  You ");

        assert_eq!(actions, [
            AppAction::Connect { server_url: Some("ws://localhost:8080".into()) },
            AppAction::Render
        ]);
        assert_eq!(app.connection_state(), ConnectionState::Connecting);
        assert_eq!(app.identity(), "You");
        assert_eq!(app.screen(), Screen::Join);
    }

    #[test]
    fn open_is_ignored_while_connecting() {
        let mut app = App::new(SessionConfig::default());
        let _ = app.open("You");
        assert!(app.open("Other").is_empty());
        assert_eq!(app.identity(), "You");
    }

    #[test]
    fn transport_open_sends_join_and_shows_chat() {
        let mut app = App::new(SessionConfig::default());
        let _ = app.open("You");
        let actions = app.handle(AppEvent::Connected);

        assert_eq!(sent(&actions), [&Outbound::join("You")]);
        assert_eq!(app.connection_state(), ConnectionState::Open);
        assert_eq!(app.screen(), Screen::Chat);
    }

    #[test]
    fn events_before_open_are_dropped() {
        let mut app = App::new(SessionConfig::default());
        let _ = app.open("You");

        let actions = app.handle(AppEvent::Server(Inbound::Users(vec!["Alex".into()])));
        assert!(actions.is_empty());
        assert!(app.roster().is_empty());
    }

    #[test]
    fn history_replaces_and_message_appends() {
        let mut app = open_app("You");
        let _ = app.dispatch(Inbound::Message(Message::chat(9u64, "Alex", "old", 0)));

        let history = vec![
            Message::system("m1", "Welcome", 1),
            Message::chat("m2", "Alex", "hi", 2),
        ];
        let _ = app.dispatch(Inbound::History(history.clone()));
        assert_eq!(app.messages(), history.as_slice());

        let _ = app.dispatch(Inbound::Message(Message::chat(3u64, "Sarah", "yo", 3)));
        assert_eq!(app.messages().len(), 3);
    }

    #[test]
    fn roster_keeps_first_occurrence_of_each_name() {
        let mut app = open_app("You");
        let _ = app.dispatch(Inbound::Users(["You", "Sarah", "Sarah", "Mike"].map(String::from).to_vec()));

        assert_eq!(app.roster(), ["You", "Sarah", "Mike"]);
        assert_eq!(app.peers(), ["Sarah", "Mike"]);
    }

    #[test]
    fn unknown_event_is_ignored() {
        let mut app = open_app("You");
        let actions = app.dispatch(Inbound::Unknown { kind: "reaction".into() });
        assert!(actions.is_empty());
    }

    #[test]
    fn transport_error_returns_to_join_with_message() {
        let mut app = open_app("You");
        let _ = app.dispatch(Inbound::Users(vec!["You".into(), "Alex".into()]));

        let actions = app.handle(AppEvent::TransportFailed { reason: "refused".into() });

        assert_eq!(actions, [AppAction::Disconnect, AppAction::Render]);
        assert_eq!(app.connection_state(), ConnectionState::Closed);
        assert_eq!(app.screen(), Screen::Join);
        assert_eq!(app.status_message(), Some(CONNECTION_FAILED));
        assert!(app.roster().is_empty());
    }

    #[test]
    fn stale_close_after_user_close_is_ignored() {
        let mut app = open_app("You");
        let _ = app.close();

        assert!(app.handle(AppEvent::Disconnected).is_empty());
        assert_eq!(app.status_message(), None);
    }

    #[test]
    fn close_drops_pending_typing_silently() {
        let mut app = open_app("You");
        let _ = app.keystroke(Instant::now());

        let actions = app.close();
        assert!(sent(&actions).is_empty());
        assert!(!app.debouncer().is_pending());
    }

    #[test]
    fn shared_send_builds_chat_and_stops_typing() {
        let mut app = open_app("You");
        let _ = app.keystroke(Instant::now());

        let actions = app.send_message("hello");
        assert_eq!(sent(&actions), [
            &Outbound::chat("hello", "You", Some("magenta".into())),
            &Outbound::typing("You", false)
        ]);
        assert!(!app.debouncer().is_pending());
    }

    #[test]
    fn direct_send_targets_peer() {
        let mut app = open_app("You");
        let _ = app.set_active_context(Context::direct("Sarah"));

        let actions = app.send_message("psst");
        assert_eq!(sent(&actions), [&Outbound::direct("psst", "Sarah")]);
    }

    #[test]
    fn keystrokes_outside_shared_channel_are_silent() {
        let mut app = open_app("You");
        let _ = app.set_active_context(Context::direct("Sarah"));
        assert!(app.keystroke(Instant::now()).is_empty());
    }

    #[test]
    fn leaving_shared_mid_burst_stops_typing() {
        let mut app = open_app("You");
        let _ = app.keystroke(Instant::now());

        let actions = app.set_active_context(Context::direct("Alex"));
        assert_eq!(sent(&actions), [&Outbound::typing("You", false)]);
    }

    #[test]
    fn tick_fires_debounce_deadline() {
        let mut app = open_app("You");
        let start = Instant::now();
        let _ = app.keystroke(start);

        assert!(app.handle(AppEvent::Tick { now: start + Duration::from_millis(100) }).is_empty());
        let actions = app.handle(AppEvent::Tick { now: start + Duration::from_millis(1500) });
        assert_eq!(sent(&actions), [&Outbound::typing("You", false)]);
    }

    #[test]
    fn self_thread_cannot_be_activated() {
        let mut app = open_app("You");
        assert!(app.set_active_context(Context::direct("You")).is_empty());
        assert_eq!(app.active_context(), &Context::Shared);
    }

    #[test]
    fn active_typers_exclude_self() {
        let mut app = open_app("You");
        let _ = app.dispatch(Inbound::Typing(TypingSignal { user: "You".into(), is_typing: true }));
        let _ = app.dispatch(Inbound::Typing(TypingSignal { user: "Alex".into(), is_typing: true }));

        assert_eq!(app.active_typers(), ["Alex"]);
    }

    #[test]
    fn reopen_after_close_starts_fresh() {
        let mut app = open_app("You");
        let _ = app.dispatch(Inbound::Message(Message::direct(1u64, "Alex", "You", "hi", 0)));
        let _ = app.close();

        let actions = app.open("Again");
        assert!(matches!(actions.as_slice(), [AppAction::Connect { .. }, AppAction::Render]));
        assert!(app.messages().is_empty());
        assert!(app.unread().is_empty());
    }
}
