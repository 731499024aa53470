//! Transport error types.

use thiserror::Error;

/// Transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection task is gone; nothing more can be sent.
    #[error("connection closed")]
    Closed,

    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Reading or writing the stream failed.
    #[error("stream error: {0}")]
    Stream(String),
}
