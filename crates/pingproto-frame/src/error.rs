/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame header does not start with the magic bytes.
    #[error("invalid frame magic (expected 0x42 0x52 \"BR\")")]
    InvalidMagic,

    /// Fewer bytes than a full header were provided.
    #[error("truncated frame header ({got} bytes, need 8)")]
    TruncatedHeader { got: usize },

    /// The buffer is shorter than the header's declared frame size.
    #[error("truncated frame ({got} bytes, need {need})")]
    TruncatedFrame { need: usize, got: usize },

    /// The stored checksum disagrees with the recomputed one.
    #[error("frame checksum mismatch (stored {stored:#06x}, computed {computed:#06x})")]
    ChecksumMismatch { stored: u16, computed: u16 },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
