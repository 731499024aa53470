//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`streamchat_app::Runtime`] orchestration code runs in both production and
//! simulation. Time is virtual: it only moves when a test advances it.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use streamchat_app::{App, AppAction, AppEvent, Driver, InputState, KeyInput, Screen};
use streamchat_client::TransportEvent;

use crate::invariants::{InvariantRegistry, SessionSnapshot};

/// Error type for simulation driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimDriverError {
    /// Frame sent with no connection.
    #[error("not connected")]
    NotConnected,

    /// Connection attempt refused by the test.
    #[error("connection refused: {0}")]
    Refused(String),
}

/// One scripted input.
#[derive(Debug, Clone)]
enum SimInput {
    Key(KeyInput),
    Event(AppEvent),
    Advance(Duration),
}

/// Shared state for event injection.
///
/// This allows injection while the runtime owns the driver.
struct SharedState {
    inputs: VecDeque<SimInput>,
    incoming: VecDeque<TransportEvent>,
    outgoing: Vec<String>,
    connected: bool,
    auto_open: bool,
    refuse_connect: bool,
    connect_log: Vec<Option<String>>,
    renders: usize,
    now: Instant,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`streamchat_app::Runtime`]
/// orchestration code runs in both production TUI and simulation tests.
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    input: InputState,
    invariants: Option<InvariantRegistry>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver.
    ///
    /// Connections open immediately: every `connect` queues
    /// [`TransportEvent::Opened`].
    pub fn new() -> Self {
        let state = SharedState {
            inputs: VecDeque::new(),
            incoming: VecDeque::new(),
            outgoing: Vec::new(),
            connected: false,
            auto_open: true,
            refuse_connect: false,
            connect_log: Vec::new(),
            renders: 0,
            now: Instant::now(),
        };
        Self { state: Arc::new(Mutex::new(state)), input: InputState::new(), invariants: None }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Leave opening to the test: `connect` queues nothing.
    #[must_use]
    pub fn with_manual_open(self) -> Self {
        self.lock().auto_open = false;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inject a key press.
    pub fn inject_key(&self, key: KeyInput) {
        self.lock().inputs.push_back(SimInput::Key(key));
    }

    /// Inject one key press per character of `text`.
    pub fn inject_text(&self, text: &str) {
        let mut state = self.lock();
        state.inputs.extend(text.chars().map(|c| SimInput::Key(KeyInput::Char(c))));
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.lock().inputs.push_back(SimInput::Event(event));
    }

    /// Advance virtual time by `by`, delivering a tick.
    pub fn advance(&self, by: Duration) {
        self.lock().inputs.push_back(SimInput::Advance(by));
    }

    /// Inject a transport notification.
    pub fn inject_transport(&self, event: TransportEvent) {
        self.lock().incoming.push_back(event);
    }

    /// Inject a text frame from the server.
    pub fn inject_frame(&self, frame: impl Into<String>) {
        self.inject_transport(TransportEvent::Frame(frame.into()));
    }

    /// Make the next `connect` calls fail.
    pub fn refuse_connections(&self, refuse: bool) {
        self.lock().refuse_connect = refuse;
    }

    /// Take all captured outgoing frames.
    pub fn take_outgoing(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().outgoing)
    }

    /// Server URLs of every connect call so far.
    pub fn connect_log(&self) -> Vec<Option<String>> {
        self.lock().connect_log.clone()
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.lock().renders
    }

    /// Check if there are pending inputs or transport events.
    pub fn has_pending(&self) -> bool {
        let state = self.lock();
        !state.inputs.is_empty() || !state.incoming.is_empty()
    }

    /// Contents of the join screen's name field.
    pub fn name_buffer(&self) -> &str {
        self.input.field(Screen::Join).text()
    }

    /// Contents of the chat screen's message draft.
    pub fn message_buffer(&self) -> &str {
        self.input.field(Screen::Chat).text()
    }

    /// Check invariants against App state.
    pub fn check_invariants(&self, app: &App, context: &str) {
        if let Some(ref registry) = self.invariants {
            registry.assert_all(&SessionSnapshot::from_app(app), context);
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        let (input, now) = {
            let mut state = self.lock();
            let input = state.inputs.pop_front();
            if let Some(SimInput::Advance(by)) = input {
                state.now += by;
            }
            (input, state.now)
        };

        let actions = match input {
            Some(SimInput::Key(key)) => self.input.handle_key(key, app, now),
            Some(SimInput::Event(event)) => app.handle(event),
            Some(SimInput::Advance(_)) | None => app.handle(AppEvent::Tick { now }),
        };
        Ok(actions)
    }

    async fn send_frame(&mut self, frame: String) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if !state.connected {
            return Err(SimDriverError::NotConnected);
        }
        state.outgoing.push(frame);
        Ok(())
    }

    fn recv_event(&mut self) -> Option<TransportEvent> {
        let mut state = self.lock();
        if state.connected { state.incoming.pop_front() } else { None }
    }

    async fn connect(&mut self, server_url: Option<&str>) -> Result<(), Self::Error> {
        let mut state = self.lock();
        state.connect_log.push(server_url.map(str::to_owned));

        if state.refuse_connect {
            return Err(SimDriverError::Refused(server_url.unwrap_or("simulation").to_owned()));
        }

        state.connected = true;
        if state.auto_open {
            state.incoming.push_back(TransportEvent::Opened);
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut state = self.lock();
        if state.connected {
            tracing::debug!(dropped = state.incoming.len(), "sim connection dropped");
        }
        state.connected = false;
        state.incoming.clear();
    }

    fn is_connected(&self) -> bool {
        self.lock().connected
    }

    fn now(&self) -> Instant {
        self.lock().now
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.lock().renders += 1;
        self.check_invariants(app, "after render");
        Ok(())
    }

    fn stop(&mut self) {
        self.disconnect();
    }
}
