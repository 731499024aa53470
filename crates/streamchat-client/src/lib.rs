//! Client transport
//!
//! Moves text frames between the application and a StreamChat server. Protocol
//! logic stays in the Sans-IO application layer; this crate only owns the I/O
//! task and reports connection lifecycle as [`TransportEvent`]s.
//!
//! # Components
//!
//! - [`ConnectedClient`]: channel handle to a running connection task
//! - [`simulation`]: in-process server used when no server URL is configured
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::connect`]: open a WebSocket connection

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod connection;
mod error;
mod event;
pub mod simulation;

#[cfg(feature = "transport")]
pub mod transport;

pub use connection::ConnectedClient;
pub use error::TransportError;
pub use event::TransportEvent;
