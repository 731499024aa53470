//! Deterministic simulation harness for StreamChat.
//!
//! [`SimDriver`] implements [`streamchat_app::Driver`] with scripted input,
//! injected transport events and virtual time, so the production
//! [`streamchat_app::Runtime`] can be exercised without a terminal or network.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the session
//! invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;

pub use invariants::{
    ActiveContextHasNoUnread, ContextPartition, IdentityNeverTracked, Invariant,
    InvariantRegistry, InvariantResult, ScreenFollowsConnection, SessionSnapshot,
    StateClearedOutsideSession, Violation,
};
pub use sim_driver::{SimDriver, SimDriverError};
