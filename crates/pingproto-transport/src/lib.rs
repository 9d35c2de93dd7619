//! Byte-stream transports for Ping sonar devices.
//!
//! Provides a unified interface over the two links a device can be reached
//! through:
//! - Serial line (RS485/USB adapter)
//! - UDP (companion computer bridge)
//!
//! This is the lowest layer of pingproto. Everything else builds on top of
//! the [`DeviceStream`] type provided here.

pub mod error;
pub mod serial;
pub mod stream;
pub mod udp;

pub use error::{Result, TransportError};
pub use stream::DeviceStream;
