//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use streamchat_proto::Outbound;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Open the transport.
    Connect {
        /// WebSocket URL. `None` selects the simulated server.
        server_url: Option<String>,
    },

    /// Close the transport.
    Disconnect,

    /// Send an intent to the server.
    Send(Outbound),
}
