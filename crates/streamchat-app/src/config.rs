//! Session configuration.

use std::time::Duration;

/// Longest accepted identity, in characters.
pub const MAX_IDENTITY_CHARS: usize = 15;

/// Quiet period after the last keystroke before "typing stopped" is sent.
pub const TYPING_QUIET_INTERVAL: Duration = Duration::from_millis(1500);

const DEFAULT_MESSAGE_COLOR: &str = "magenta";

/// Settings fixed for the lifetime of an [`crate::App`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// WebSocket URL. `None` selects the in-process simulated server.
    pub server_url: Option<String>,
    /// Debounce window for outbound typing signals.
    pub typing_quiet_interval: Duration,
    /// Color hint attached to own shared-channel messages.
    pub message_color: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            typing_quiet_interval: TYPING_QUIET_INTERVAL,
            message_color: Some(DEFAULT_MESSAGE_COLOR.to_owned()),
        }
    }
}

impl SessionConfig {
    /// Config for `server_url`, or simulation mode when `None`.
    pub fn new(server_url: Option<String>) -> Self {
        Self { server_url, ..Self::default() }
    }

    /// Override the color hint on own messages.
    #[must_use]
    pub fn with_message_color(mut self, color: Option<String>) -> Self {
        self.message_color = color;
        self
    }
}
