//! Application layer for StreamChat
//!
//! Pure state machines and generic runtime for the chat session, enabling
//! deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`App`]: session controller (connection lifecycle, inbound dispatch,
//!   active context, typing signals)
//! - [`router`]: classifies messages into the shared channel or direct threads
//! - [`UnreadIndex`]: per-peer unread direct message counts
//! - [`TypingDebouncer`] and [`TypingSet`]: outbound and inbound typing state
//! - [`grouping`]: date separators and sender headers for rendering
//! - [`Bridge`]: wire bridge (encodes intents, decodes server frames)
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod config;
mod driver;
mod event;
pub mod grouping;
mod input;
pub mod router;
mod runtime;
mod state;
mod typing;
mod unread;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use config::{MAX_IDENTITY_CHARS, SessionConfig, TYPING_QUIET_INTERVAL};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{InputState, KeyInput, LineField};
pub use runtime::Runtime;
pub use state::{ConnectionState, Context, SHARED_CHANNEL_NAME, Screen};
pub use streamchat_proto::MAX_MESSAGE_CHARS;
pub use typing::{TypingDebouncer, TypingSet, TypingTransition};
pub use unread::UnreadIndex;
