//! Message model.
//!
//! The wire format names participants differently per kind: chat and system
//! messages carry the author in `user`, direct messages carry `from` and `to`.
//! [`Message`] normalizes both into `author` and `recipient` and is only ever
//! constructed through validation, so a direct message without both
//! participants cannot exist.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Author used for system messages that arrive without one.
pub const SYSTEM_AUTHOR: &str = "System";

/// Server-assigned message identifier.
///
/// Servers use either opaque strings or millisecond counters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    /// Numeric identifier.
    Number(u64),
    /// Opaque string identifier.
    Text(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for MessageId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Kind of message, which decides the conversational context it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Shared channel message.
    Chat,
    /// Direct message between two identities.
    #[serde(rename = "direct_message")]
    Direct,
    /// Server notice shown in the shared channel.
    System,
}

/// An immutable message as received from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireMessage", into = "WireMessage")]
pub struct Message {
    /// Server-assigned identifier.
    pub id: MessageId,
    /// Message body.
    pub text: String,
    /// Sender identity.
    pub author: String,
    /// Message kind.
    pub kind: MessageKind,
    /// Server timestamp in Unix milliseconds.
    pub timestamp: i64,
    /// Addressed peer. `Some` exactly when `kind` is [`MessageKind::Direct`].
    pub recipient: Option<String>,
    /// Optional presentation hint for the author's bubble.
    pub color: Option<String>,
}

impl Message {
    /// Create a shared channel message.
    pub fn chat(
        id: impl Into<MessageId>,
        author: impl Into<String>,
        text: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            author: author.into(),
            kind: MessageKind::Chat,
            timestamp,
            recipient: None,
            color: None,
        }
    }

    /// Create a direct message from `author` to `recipient`.
    pub fn direct(
        id: impl Into<MessageId>,
        author: impl Into<String>,
        recipient: impl Into<String>,
        text: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            author: author.into(),
            kind: MessageKind::Direct,
            timestamp,
            recipient: Some(recipient.into()),
            color: None,
        }
    }

    /// Create a system notice.
    pub fn system(id: impl Into<MessageId>, text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            author: SYSTEM_AUTHOR.to_owned(),
            kind: MessageKind::System,
            timestamp,
            recipient: None,
            color: None,
        }
    }

    /// Attach a presentation color hint.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Whether this is a direct message.
    pub fn is_direct(&self) -> bool {
        self.kind == MessageKind::Direct
    }
}

/// Message exactly as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    id: MessageId,
    text: String,
    #[serde(rename = "type")]
    kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<String>,
    timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

impl TryFrom<WireMessage> for Message {
    type Error = ProtocolError;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        let (author, recipient) = match wire.kind {
            MessageKind::Direct => {
                let author = wire.from.ok_or_else(|| {
                    ProtocolError::InvalidMessage(format!("direct message {} has no sender", wire.id))
                })?;
                let recipient = wire.to.ok_or_else(|| {
                    ProtocolError::InvalidMessage(format!(
                        "direct message {} has no recipient",
                        wire.id
                    ))
                })?;
                (author, Some(recipient))
            },
            MessageKind::Chat => {
                let author = wire.user.or(wire.from).ok_or_else(|| {
                    ProtocolError::InvalidMessage(format!("chat message {} has no author", wire.id))
                })?;
                (author, None)
            },
            MessageKind::System => {
                (wire.user.or(wire.from).unwrap_or_else(|| SYSTEM_AUTHOR.to_owned()), None)
            },
        };

        Ok(Self {
            id: wire.id,
            text: wire.text,
            author,
            kind: wire.kind,
            timestamp: wire.timestamp,
            recipient,
            color: wire.color,
        })
    }
}

impl From<Message> for WireMessage {
    fn from(message: Message) -> Self {
        let (user, from, to) = match message.kind {
            MessageKind::Direct => (None, Some(message.author), message.recipient),
            MessageKind::Chat | MessageKind::System => (Some(message.author), None, None),
        };

        Self {
            id: message.id,
            text: message.text,
            kind: message.kind,
            user,
            from,
            to,
            timestamp: message.timestamp,
            color: message.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_author_comes_from_user() {
        let json = r#"{"id":"m2","text":"hi","user":"Alex","type":"chat","color":"bg-blue-500","timestamp":1700000000000}"#;
        let msg: Message = serde_json::from_str(json).unwrap();

        assert_eq!(msg.author, "Alex");
        assert_eq!(msg.kind, MessageKind::Chat);
        assert_eq!(msg.recipient, None);
        assert_eq!(msg.color.as_deref(), Some("bg-blue-500"));
        assert_eq!(msg.id, MessageId::Text("m2".into()));
    }

    #[test]
    fn direct_uses_from_and_to() {
        let json = r#"{"id":1700000000001,"text":"psst","type":"direct_message","from":"Sarah","to":"Alex","timestamp":1700000000001}"#;
        let msg: Message = serde_json::from_str(json).unwrap();

        assert_eq!(msg.author, "Sarah");
        assert_eq!(msg.recipient.as_deref(), Some("Alex"));
        assert_eq!(msg.id, MessageId::Number(1_700_000_000_001));
        assert!(msg.is_direct());
    }

    #[test]
    fn direct_without_recipient_is_rejected() {
        let json = r#"{"id":1,"text":"psst","type":"direct_message","from":"Sarah","timestamp":1}"#;
        assert!(serde_json::from_str::<Message>(json).is_err());
    }

    #[test]
    fn direct_without_sender_is_rejected() {
        let json = r#"{"id":1,"text":"psst","type":"direct_message","to":"Alex","timestamp":1}"#;
        assert!(serde_json::from_str::<Message>(json).is_err());
    }

    #[test]
    fn system_without_author_defaults() {
        let json = r#"{"id":"m1","text":"Welcome","type":"system","timestamp":5}"#;
        let msg: Message = serde_json::from_str(json).unwrap();

        assert_eq!(msg.author, SYSTEM_AUTHOR);
        assert_eq!(msg.kind, MessageKind::System);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = r#"{"id":"x","text":"?","type":"image","user":"Alex","timestamp":5}"#;
        assert!(serde_json::from_str::<Message>(json).is_err());
    }

    #[test]
    fn direct_serializes_with_from_and_to() {
        let msg = Message::direct(7, "Alex", "Sarah", "yo", 10);
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "direct_message");
        assert_eq!(value["from"], "Alex");
        assert_eq!(value["to"], "Sarah");
        assert!(value.get("user").is_none());
    }
}
