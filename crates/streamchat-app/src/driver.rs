//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, time::Instant};

use streamchat_client::TransportEvent;

use crate::{App, AppAction};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the production TUI and in simulation.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, tokio-tungstenite or the
///   in-process simulated server for transport
/// - **Simulation**: scripted input and frames with virtual time
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input and apply it to `app`.
    ///
    /// Keyboard input goes through the driver's line editor; ticks and
    /// resizes go to [`App::handle`]. Returns the resulting actions, which
    /// may be empty.
    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Send a text frame to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or send fails.
    fn send_frame(&mut self, frame: String) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Next transport notification, if one is ready. Never waits.
    fn recv_event(&mut self) -> Option<TransportEvent>;

    /// Start opening a connection. `None` selects the simulated server.
    ///
    /// Returns once the attempt is underway; the outcome arrives through
    /// [`Driver::recv_event`].
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt cannot be started.
    fn connect(
        &mut self,
        server_url: Option<&str>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Drop the current connection, if any. Nothing from it is delivered
    /// afterwards.
    fn disconnect(&mut self);

    /// Check if a connection handle is held.
    fn is_connected(&self) -> bool;

    /// Current time instant. Virtual in simulation.
    fn now(&self) -> Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Stop the connection and clean up resources.
    fn stop(&mut self);
}
