use std::path::PathBuf;

/// Errors that can occur on device transports.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the serial device.
    #[error("failed to open serial device {path}: {source}")]
    OpenSerial {
        path: PathBuf,
        source: serialport::Error,
    },

    /// Failed to set up the UDP socket towards the device.
    #[error("failed to reach device at {addr}: {source}")]
    Connect { addr: String, source: std::io::Error },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
