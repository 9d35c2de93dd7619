//! Client session management for Ping sonar devices.
//!
//! This is the "just works" layer. Connect over serial or UDP, let the
//! session verify the peer's protocol version, then stream decoded messages
//! through a handler while sending commands from anywhere.

pub mod client;
pub mod error;
pub mod handshake;
mod writer;

pub use client::PingClient;
pub use error::{ClientError, Result};
pub use handshake::HandshakeConfig;
