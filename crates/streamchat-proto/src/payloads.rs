//! Envelope payloads for both directions.
//!
//! Outbound intents are a closed set the client controls, so they derive the
//! adjacently tagged serde representation directly. Inbound events are decoded
//! in two steps (tag first, then payload) so that unknown tags can be
//! preserved as [`Inbound::Unknown`] instead of failing the frame, and so that
//! a single malformed entry in a history snapshot does not discard the rest.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Message, MessageKind, ProtocolError, Result};

/// Typing state change for one identity in the shared channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingSignal {
    /// Identity whose typing state changed.
    pub user: String,
    /// `true` when typing started, `false` when it stopped.
    #[serde(rename = "isTyping")]
    pub is_typing: bool,
}

/// Payload of an outbound shared channel message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    /// Message body.
    pub text: String,
    /// Sending identity.
    pub user: String,
    /// Always [`MessageKind::Chat`].
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Optional presentation hint echoed back by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Payload of an outbound direct message.
///
/// The sender is implied by the connection; the server fills in `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectPayload {
    /// Message body.
    pub text: String,
    /// Addressed peer.
    pub to: String,
    /// Always [`MessageKind::Direct`].
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

/// Intents sent from the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Outbound {
    /// Announce the local identity after the connection opens.
    Join(String),
    /// Post to the shared channel.
    Message(ChatPayload),
    /// Post to a direct thread.
    DirectMessage(DirectPayload),
    /// Local typing state changed.
    Typing(TypingSignal),
}

impl Outbound {
    /// Join intent for `identity`.
    pub fn join(identity: impl Into<String>) -> Self {
        Self::Join(identity.into())
    }

    /// Shared channel message from `user`.
    pub fn chat(text: impl Into<String>, user: impl Into<String>, color: Option<String>) -> Self {
        Self::Message(ChatPayload {
            text: text.into(),
            user: user.into(),
            kind: MessageKind::Chat,
            color,
        })
    }

    /// Direct message addressed to `to`.
    pub fn direct(text: impl Into<String>, to: impl Into<String>) -> Self {
        Self::DirectMessage(DirectPayload {
            text: text.into(),
            to: to.into(),
            kind: MessageKind::Direct,
        })
    }

    /// Typing state change for `user`.
    pub fn typing(user: impl Into<String>, is_typing: bool) -> Self {
        Self::Typing(TypingSignal { user: user.into(), is_typing })
    }

    /// Envelope tag of this intent.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::Message(_) => "message",
            Self::DirectMessage(_) => "direct_message",
            Self::Typing(_) => "typing",
        }
    }

    /// Encode as a JSON text frame.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON text frame.
    pub fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Events pushed from the server to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Authoritative snapshot of all messages, sent once after join.
    History(Vec<Message>),
    /// One new message.
    Message(Message),
    /// Full replacement of the connected identities.
    Users(Vec<String>),
    /// A peer started or stopped typing.
    Typing(TypingSignal),
    /// Tag this client does not understand.
    Unknown {
        /// The unrecognized tag.
        kind: String,
    },
}

/// Untyped envelope used for two-step inbound decoding.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T: Serialize> {
    #[serde(rename = "type")]
    kind: &'a str,
    payload: &'a T,
}

impl Inbound {
    /// Tag of [`Inbound::History`].
    pub const HISTORY: &'static str = "history";
    /// Tag of [`Inbound::Message`].
    pub const MESSAGE: &'static str = "message";
    /// Tag of [`Inbound::Users`].
    pub const USERS: &'static str = "users";
    /// Tag of [`Inbound::Typing`].
    pub const TYPING: &'static str = "typing";

    /// Envelope tag of this event.
    pub fn tag(&self) -> &str {
        match self {
            Self::History(_) => Self::HISTORY,
            Self::Message(_) => Self::MESSAGE,
            Self::Users(_) => Self::USERS,
            Self::Typing(_) => Self::TYPING,
            Self::Unknown { kind } => kind.as_str(),
        }
    }

    /// Decode a JSON text frame.
    ///
    /// Unknown tags succeed with [`Inbound::Unknown`]. Malformed entries of a
    /// history snapshot are skipped; any other malformed payload fails the
    /// whole frame.
    pub fn decode(text: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(text)?;

        match envelope.kind.as_str() {
            Self::HISTORY => Ok(Self::History(decode_history(envelope.payload)?)),
            Self::MESSAGE => Ok(Self::Message(serde_json::from_value(envelope.payload)?)),
            Self::USERS => Ok(Self::Users(serde_json::from_value(envelope.payload)?)),
            Self::TYPING => Ok(Self::Typing(serde_json::from_value(envelope.payload)?)),
            _ => Ok(Self::Unknown { kind: envelope.kind }),
        }
    }

    /// Encode as a JSON text frame.
    pub fn encode(&self) -> Result<String> {
        let json = match self {
            Self::History(messages) => encode_envelope(Self::HISTORY, messages),
            Self::Message(message) => encode_envelope(Self::MESSAGE, message),
            Self::Users(users) => encode_envelope(Self::USERS, users),
            Self::Typing(signal) => encode_envelope(Self::TYPING, signal),
            Self::Unknown { kind } => encode_envelope(kind, &Value::Null),
        }?;
        Ok(json)
    }
}

fn encode_envelope<T: Serialize>(kind: &str, payload: &T) -> Result<String> {
    Ok(serde_json::to_string(&EnvelopeRef { kind, payload })?)
}

fn decode_history(payload: Value) -> Result<Vec<Message>> {
    let Value::Array(entries) = payload else {
        return Err(ProtocolError::InvalidPayload {
            kind: Inbound::HISTORY,
            reason: "expected an array of messages".into(),
        });
    };

    let messages = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Message>(entry) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed history entry");
                None
            },
        })
        .collect();

    Ok(messages)
}
