//! Terminal UI for StreamChat
//!
//! A thin shell over [`streamchat_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`streamchat_app::Runtime`]
//!
//! This crate only handles terminal rendering and picks the transport: a
//! WebSocket when a server URL is given, the in-process simulated server
//! otherwise.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod terminal;
pub mod ui;

pub use streamchat_app::{App, AppAction, AppEvent, Bridge, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
