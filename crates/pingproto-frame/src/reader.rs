use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use pingproto_transport::DeviceStream;
use tracing::{debug, trace, warn};

use crate::codec::{Frame, FrameConfig, FrameHeader, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Reads complete, checksum-verified frames from any `Read` stream.
///
/// Runs the receive cycle as a loop over two exact-count reads: 8 header
/// bytes, then `payload_length + 2` payload and checksum bytes. A header
/// that fails magic validation, declares an oversized payload, or fronts a
/// frame whose checksum does not match is a resynchronization event: the
/// frame is dropped, the event logged, and the header read reissued. Only
/// transport errors and EOF terminate the cycle.
#[derive(Debug)]
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
    resyncs: u64,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            config,
            resyncs: 0,
        }
    }

    /// Read the next valid frame (blocking).
    ///
    /// Never returns a frame whose checksum has not been verified. Returns
    /// `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            let mut header_bytes = [0u8; HEADER_SIZE];
            self.read_exact(&mut header_bytes)?;

            let header = match FrameHeader::parse(&header_bytes) {
                Ok(header) => header,
                Err(err) => {
                    self.resyncs += 1;
                    debug!(%err, "invalid frame header, resynchronizing");
                    continue;
                }
            };

            if header.payload_length as usize > self.config.max_payload_size {
                self.resyncs += 1;
                debug!(
                    declared = header.payload_length,
                    max = self.config.max_payload_size,
                    "declared payload length over limit, resynchronizing"
                );
                continue;
            }

            let mut buf = BytesMut::zeroed(header.frame_size());
            buf[..HEADER_SIZE].copy_from_slice(&header_bytes);
            self.read_exact(&mut buf[HEADER_SIZE..])?;

            match Frame::from_buffer(buf) {
                Ok(frame) => {
                    trace!(
                        message_id = frame.header.message_id,
                        payload_length = frame.header.payload_length,
                        "frame received"
                    );
                    return Ok(frame);
                }
                Err(FrameError::ChecksumMismatch { stored, computed }) => {
                    self.resyncs += 1;
                    warn!(
                        message_id = header.message_id,
                        stored, computed, "frame checksum mismatch, dropping frame"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(())
    }

    /// Number of resynchronization events since creation.
    pub fn resyncs(&self) -> u64 {
        self.resyncs
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameReader<DeviceStream> {
    /// Create a frame reader for `DeviceStream` and apply the read timeout
    /// from config.
    pub fn with_config_device(mut inner: DeviceStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

fn transport_to_frame_error(err: pingproto_transport::TransportError) -> FrameError {
    match err {
        pingproto_transport::TransportError::Io(io) => FrameError::Io(io),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
