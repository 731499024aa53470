//! StreamChat wire protocol
//!
//! Every frame on the wire is a single JSON text object of the shape
//! `{"type": <tag>, "payload": <value>}`. This crate owns the two directions of
//! that envelope and the message model they carry:
//!
//! - [`Outbound`]: intents the client sends (join, chat, direct message,
//!   typing).
//! - [`Inbound`]: events the server pushes (history snapshot, single message,
//!   roster, typing). Unrecognized tags decode to [`Inbound::Unknown`] so that
//!   newer servers never break older clients.
//! - [`Message`]: an immutable chat, direct, or system message.
//!
//! Decoding is all-or-nothing per frame: a frame either yields a complete
//! value or a [`ProtocolError`], never a partially populated one.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod message;
pub mod payloads;

pub use errors::{ProtocolError, Result};
pub use message::{Message, MessageId, MessageKind};
pub use payloads::{ChatPayload, DirectPayload, Inbound, Outbound, TypingSignal};

/// Maximum message text length in characters.
///
/// Enforced at the input boundary; the core never truncates.
pub const MAX_MESSAGE_CHARS: usize = 500;
