//! Blue Robotics Ping sonar protocol stack.
//!
//! pingproto speaks the binary `BR` frame protocol of the Ping1D echosounder
//! and Ping360 scanning sonar over serial lines and UDP bridges.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial/UDP byte-stream transports
//! - [`frame`] — Wire framing: header, checksum, reader/writer
//! - [`messages`] — Message catalog for both device families
//! - [`client`] — Client session with handshake (behind `client` feature)

/// Re-export transport types.
pub mod transport {
    pub use pingproto_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use pingproto_frame::*;
}

/// Re-export message catalog types.
pub mod messages {
    pub use pingproto_messages::*;
}

/// Re-export client session types (requires `client` feature).
#[cfg(feature = "client")]
pub mod client {
    pub use pingproto_client::*;
}
