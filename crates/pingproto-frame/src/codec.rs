use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: magic (2) + payload length (2) + message ID (2) +
/// source device ID (1) + destination device ID (1) = 8 bytes.
pub const HEADER_SIZE: usize = 8;

/// Trailing checksum width.
pub const CHECKSUM_SIZE: usize = 2;

/// Magic bytes: "BR" (0x42 0x52).
pub const MAGIC: [u8; 2] = *b"BR";

/// Default maximum payload size: the full 16-bit length range.
///
/// The wire format cannot declare more; tighter caps are a [`FrameConfig`]
/// concern.
pub const DEFAULT_MAX_PAYLOAD: usize = u16::MAX as usize;

/// Parsed frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Number of payload bytes following the header.
    pub payload_length: u16,
    /// Catalog ID selecting the payload layout.
    pub message_id: u16,
    /// Device that produced the frame (0 when unset).
    pub src_device_id: u8,
    /// Device the frame is addressed to (0 when unset).
    pub dst_device_id: u8,
}

impl FrameHeader {
    /// Parse the first 8 bytes of a frame.
    ///
    /// Fails with [`FrameError::InvalidMagic`] unless the buffer starts with
    /// the `B`,`R` pair.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(FrameError::TruncatedHeader { got: bytes.len() });
        }
        if bytes[0..2] != MAGIC {
            return Err(FrameError::InvalidMagic);
        }

        Ok(Self {
            payload_length: u16::from_le_bytes([bytes[2], bytes[3]]),
            message_id: u16::from_le_bytes([bytes[4], bytes[5]]),
            src_device_id: bytes[6],
            dst_device_id: bytes[7],
        })
    }

    /// Total wire size of the frame this header describes.
    pub fn frame_size(&self) -> usize {
        HEADER_SIZE + self.payload_length as usize + CHECKSUM_SIZE
    }

    /// Append the 8 header bytes to `dst`.
    pub fn write_to(&self, dst: &mut BytesMut) {
        dst.reserve(HEADER_SIZE);
        dst.put_slice(&MAGIC);
        dst.put_u16_le(self.payload_length);
        dst.put_u16_le(self.message_id);
        dst.put_u8(self.src_device_id);
        dst.put_u8(self.dst_device_id);
    }
}

/// 16-bit wrapping byte sum over `bytes`.
///
/// Integrity check against accidental corruption only — not cryptographic.
pub fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

/// Encode a complete frame into `dst`.
///
/// Wire format:
/// ```text
/// ┌────────────┬──────────┬──────────┬───────┬───────┬──────────┬────────────┐
/// │ Magic (2B) │ Length   │ Msg ID   │ Src   │ Dst   │ Payload  │ Checksum   │
/// │ 0x42 0x52  │ (2B LE)  │ (2B LE)  │ (1B)  │ (1B)  │ (Length) │ (2B LE)    │
/// │ "BR"       │          │          │       │       │          │            │
/// └────────────┴──────────┴──────────┴───────┴───────┴──────────┴────────────┘
/// ```
/// The checksum covers every header and payload byte.
pub fn encode_frame(
    message_id: u16,
    src_device_id: u8,
    dst_device_id: u8,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    if payload.len() > u16::MAX as usize {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: u16::MAX as usize,
        });
    }

    let start = dst.len();
    dst.reserve(HEADER_SIZE + payload.len() + CHECKSUM_SIZE);
    let header = FrameHeader {
        payload_length: payload.len() as u16,
        message_id,
        src_device_id,
        dst_device_id,
    };
    header.write_to(dst);
    dst.put_slice(payload);
    let sum = checksum(&dst[start..]);
    dst.put_u16_le(sum);
    Ok(())
}

/// True iff `buffer` holds the complete frame `header` describes and its
/// trailing checksum matches the recomputed one.
pub fn is_complete_and_valid(header: &FrameHeader, buffer: &[u8]) -> bool {
    let body = HEADER_SIZE + header.payload_length as usize;
    if buffer.len() < body + CHECKSUM_SIZE {
        return false;
    }
    let stored = u16::from_le_bytes([buffer[body], buffer[body + 1]]);
    checksum(&buffer[..body]) == stored
}

/// A validated frame: parsed header plus payload bytes.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The parsed header.
    pub header: FrameHeader,
    /// Payload bytes (layout per message ID).
    pub payload: Bytes,
}

impl Frame {
    /// Validate a complete frame buffer (header + payload + checksum) and
    /// split out the payload.
    pub fn from_buffer(mut buf: BytesMut) -> Result<Self> {
        let header = FrameHeader::parse(&buf)?;
        if buf.len() < header.frame_size() {
            return Err(FrameError::TruncatedFrame {
                need: header.frame_size(),
                got: buf.len(),
            });
        }

        let body = HEADER_SIZE + header.payload_length as usize;
        let stored = u16::from_le_bytes([buf[body], buf[body + 1]]);
        let computed = checksum(&buf[..body]);
        if stored != computed {
            return Err(FrameError::ChecksumMismatch { stored, computed });
        }

        buf.advance(HEADER_SIZE);
        buf.truncate(header.payload_length as usize);
        Ok(Self {
            header,
            payload: buf.freeze(),
        })
    }

    /// Catalog ID selecting the payload layout.
    pub fn message_id(&self) -> u16 {
        self.header.message_id
    }

    /// Payload bytes.
    pub fn payload(&self) -> &[u8] {
        self.payload.as_ref()
    }
}

/// Configuration for frame readers and writers.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum accepted payload size in bytes. Default: 65535 (wire limit).
    pub max_payload_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
