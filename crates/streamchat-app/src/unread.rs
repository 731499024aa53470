//! Unread direct message bookkeeping.

use std::collections::BTreeMap;

use streamchat_proto::{Message, MessageKind};

use crate::Context;

/// Per-peer count of unread direct messages.
///
/// A peer with nothing unread has no entry, so the active thread never shows
/// a zero badge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnreadIndex {
    counts: BTreeMap<String, u32>,
}

impl UnreadIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a newly arrived message.
    ///
    /// Counts only direct messages addressed to `identity` by someone else,
    /// and only when their thread is not `active`. Returns whether the
    /// message was counted.
    pub fn observe(&mut self, message: &Message, identity: &str, active: &Context) -> bool {
        if message.kind != MessageKind::Direct || message.author == identity {
            return false;
        }
        if message.recipient.as_deref() != Some(identity) {
            return false;
        }
        if active.peer() == Some(message.author.as_str()) {
            return false;
        }

        self.record(&message.author);
        true
    }

    /// Increment the count for `peer`.
    pub fn record(&mut self, peer: &str) {
        let count = self.counts.entry(peer.to_owned()).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Drop the entry for `peer`.
    pub fn clear(&mut self, peer: &str) {
        self.counts.remove(peer);
    }

    /// Drop every entry.
    pub fn clear_all(&mut self) {
        self.counts.clear();
    }

    /// Unread count for `peer`. Zero when absent.
    pub fn get(&self, peer: &str) -> u32 {
        self.counts.get(peer).copied().unwrap_or(0)
    }

    /// Whether `peer` has an entry.
    pub fn contains(&self, peer: &str) -> bool {
        self.counts.contains_key(peer)
    }

    /// Whether nothing is unread.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Peers with unread messages, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(peer, count)| (peer.as_str(), *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_incoming_direct_outside_active_thread() {
        let mut unread = UnreadIndex::new();
        let dm = Message::direct(1u64, "Alex", "You", "hi", 0);

        assert!(unread.observe(&dm, "You", &Context::Shared));
        assert!(unread.observe(&dm, "You", &Context::direct("Sarah")));
        assert_eq!(unread.get("Alex"), 2);
    }

    #[test]
    fn ignores_active_thread_self_and_shared() {
        let mut unread = UnreadIndex::new();

        let from_active = Message::direct(1u64, "Alex", "You", "hi", 0);
        let own = Message::direct(2u64, "You", "Alex", "yo", 0);
        let shared = Message::chat(3u64, "Alex", "all", 0);
        let overheard = Message::direct(4u64, "Alex", "Sarah", "x", 0);

        assert!(!unread.observe(&from_active, "You", &Context::direct("Alex")));
        assert!(!unread.observe(&own, "You", &Context::Shared));
        assert!(!unread.observe(&shared, "You", &Context::Shared));
        assert!(!unread.observe(&overheard, "You", &Context::Shared));
        assert!(unread.is_empty());
    }

    #[test]
    fn clear_removes_entry() {
        let mut unread = UnreadIndex::new();
        unread.record("Alex");
        unread.clear("Alex");

        assert!(!unread.contains("Alex"));
        assert_eq!(unread.get("Alex"), 0);
    }

    #[test]
    fn record_saturates() {
        let mut unread = UnreadIndex::new();
        unread.counts.insert("Alex".into(), u32::MAX);
        unread.record("Alex");
        assert_eq!(unread.get("Alex"), u32::MAX);
    }
}
