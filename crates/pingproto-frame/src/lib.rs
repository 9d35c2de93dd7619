//! Ping sonar wire framing.
//!
//! This is the core value-add layer of pingproto. Every message on the wire
//! is framed with:
//! - Two magic bytes (`B`, `R`) for stream synchronization
//! - A 2-byte little-endian payload length
//! - A 2-byte little-endian message-type ID
//! - Source and destination device ID bytes
//! - A trailing 2-byte wrapping byte-sum checksum over header and payload
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    checksum, encode_frame, is_complete_and_valid, Frame, FrameConfig, FrameHeader, CHECKSUM_SIZE,
    DEFAULT_MAX_PAYLOAD, HEADER_SIZE, MAGIC,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
