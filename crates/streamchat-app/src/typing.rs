//! Typing indicators.
//!
//! Outbound: [`TypingDebouncer`] turns a stream of keystrokes into one
//! "started" signal per burst and one "stopped" signal after a quiet period.
//! The deadline is explicit state advanced by ticks, so tests can drive it
//! with synthetic instants.
//!
//! Inbound: [`TypingSet`] holds peers currently signalling in the shared
//! channel. Entries have no local expiry; they leave on an explicit stop
//! signal or when the peer drops off the roster.

use std::{
    collections::BTreeSet,
    time::{Duration, Instant},
};

use streamchat_proto::TypingSignal;

/// Typing signal to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingTransition {
    /// First keystroke of a burst.
    Started,
    /// Burst ended.
    Stopped,
}

impl TypingTransition {
    /// Wire flag for this transition.
    pub fn is_typing(self) -> bool {
        matches!(self, Self::Started)
    }
}

/// Debounces local keystrokes into typing transitions.
#[derive(Debug, Clone)]
pub struct TypingDebouncer {
    quiet_interval: Duration,
    deadline: Option<Instant>,
}

impl TypingDebouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(quiet_interval: Duration) -> Self {
        Self { quiet_interval, deadline: None }
    }

    /// Register a keystroke at `now`.
    ///
    /// Returns [`TypingTransition::Started`] on the first keystroke of a
    /// burst. Every keystroke pushes the stop deadline to
    /// `now + quiet_interval`.
    pub fn on_keystroke(&mut self, now: Instant) -> Option<TypingTransition> {
        let started = self.deadline.is_none();
        self.deadline = Some(now + self.quiet_interval);
        started.then_some(TypingTransition::Started)
    }

    /// Advance to `now`. Returns [`TypingTransition::Stopped`] once when the
    /// deadline has passed.
    pub fn on_tick(&mut self, now: Instant) -> Option<TypingTransition> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(TypingTransition::Stopped)
            },
            _ => None,
        }
    }

    /// A message was sent: stop immediately and drop the pending deadline.
    pub fn on_send(&mut self) -> TypingTransition {
        self.deadline = None;
        TypingTransition::Stopped
    }

    /// End a pending burst early. `None` when no burst is pending.
    pub fn flush(&mut self) -> Option<TypingTransition> {
        self.deadline.take().map(|_| TypingTransition::Stopped)
    }

    /// Drop the pending deadline without signalling.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a burst is in progress.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending burst will stop.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Peers currently typing in the shared channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingSet {
    peers: BTreeSet<String>,
}

impl TypingSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a received typing signal.
    pub fn apply(&mut self, signal: TypingSignal) {
        if signal.is_typing {
            self.peers.insert(signal.user);
        } else {
            self.peers.remove(&signal.user);
        }
    }

    /// Drop peers that are not in `roster`.
    pub fn retain_roster(&mut self, roster: &[String]) {
        self.peers.retain(|peer| roster.contains(peer));
    }

    /// Remove everyone.
    pub fn clear(&mut self) {
        self.peers.clear();
    }

    /// Whether `peer` is typing.
    pub fn contains(&self, peer: &str) -> bool {
        self.peers.contains(peer)
    }

    /// Typing peers other than `identity`, sorted by name.
    pub fn active_typers(&self, identity: &str) -> Vec<&str> {
        self.peers.iter().map(String::as_str).filter(|peer| *peer != identity).collect()
    }
}
