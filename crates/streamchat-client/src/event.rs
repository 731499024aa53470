//! Connection lifecycle notifications.

/// Notifications from a connection task, delivered in arrival order.
///
/// A connection produces at most one `Opened`, then any number of `Frame`s,
/// and ends with at most one `Closed` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Connection established; the server is ready for a join.
    Opened,
    /// One text frame from the server.
    Frame(String),
    /// Server closed the connection.
    Closed,
    /// Connection failed or broke.
    Error(String),
}
