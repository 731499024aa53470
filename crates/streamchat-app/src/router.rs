//! Conversation routing.
//!
//! Every message belongs to the shared channel or to exactly one direct
//! thread, keyed by the participant who is not the local identity. Routing is
//! a pure function of the message and the local identity, so visible
//! subsequences can be recomputed on every render.

use std::collections::BTreeSet;

use streamchat_proto::{Message, MessageKind};

use crate::Context;

/// Context a message belongs to from `identity`'s point of view.
///
/// Chat and system messages go to the shared channel. A direct message goes
/// to the thread keyed by its other participant; one between two other
/// identities, or from `identity` to itself, has no context here and returns
/// `None`.
pub fn context_of(message: &Message, identity: &str) -> Option<Context> {
    match message.kind {
        MessageKind::Chat | MessageKind::System => Some(Context::Shared),
        MessageKind::Direct => {
            let recipient = message.recipient.as_deref()?;
            let peer = if message.author == identity {
                recipient
            } else if recipient == identity {
                message.author.as_str()
            } else {
                return None;
            };
            // Self is never a thread key.
            (peer != identity).then(|| Context::direct(peer))
        },
    }
}

/// Messages in `active`, in arrival order.
pub fn visible_messages<'a>(
    messages: &'a [Message],
    active: &Context,
    identity: &str,
) -> Vec<&'a Message> {
    messages
        .iter()
        .filter(|message| context_of(message, identity).as_ref() == Some(active))
        .collect()
}

/// Roster entries other than `identity`, in first-seen order without repeats.
pub fn peers<'a>(roster: &'a [String], identity: &str) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    roster
        .iter()
        .map(String::as_str)
        .filter(|peer| *peer != identity && seen.insert(*peer))
        .collect()
}

/// Collapse repeated names, keeping the first occurrence of each.
///
/// Identities are not unique on the server, so two clients may join under
/// the same name.
pub fn dedup_roster(roster: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    roster.into_iter().filter(|name| seen.insert(name.clone())).collect()
}

/// Navigable contexts: the shared channel, then one direct thread per peer.
pub fn contexts(roster: &[String], identity: &str) -> Vec<Context> {
    std::iter::once(Context::Shared)
        .chain(peers(roster, identity).into_iter().map(Context::direct))
        .collect()
}
