//! Protocol error types.

use thiserror::Error;

/// Errors produced while encoding or decoding frames.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Frame is not valid JSON or does not match the expected shape.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// Envelope decoded but its payload has the wrong shape for the tag.
    #[error("invalid {kind} payload: {reason}")]
    InvalidPayload {
        /// Envelope tag whose payload was rejected.
        kind: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Message fields violate the message model (e.g. direct without
    /// recipient).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

/// Convenience alias for protocol results.
pub type Result<T> = std::result::Result<T, ProtocolError>;
