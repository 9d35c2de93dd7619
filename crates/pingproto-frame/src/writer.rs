use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use pingproto_transport::DeviceStream;
use tracing::warn;

use crate::codec::{encode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Encodes and writes frames to any `Write` stream.
///
/// Writes are best-effort: one write call per frame, a short write logged as
/// a warning with the actual count returned to the caller. Serial devices
/// tolerate a truncated command frame (it fails checksum on their side and
/// is dropped), so truncation is not an error here.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
    src_device_id: u8,
    dst_device_id: u8,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            src_device_id: 0,
            dst_device_id: 0,
        }
    }

    /// Set the device IDs stamped into outgoing frame headers.
    pub fn set_device_ids(&mut self, src_device_id: u8, dst_device_id: u8) {
        self.src_device_id = src_device_id;
        self.dst_device_id = dst_device_id;
    }

    /// Encode and send a payload under the given message ID.
    ///
    /// Returns the number of bytes actually written.
    pub fn send(&mut self, message_id: u16, payload: &[u8]) -> Result<usize> {
        if payload.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        self.buf.clear();
        encode_frame(
            message_id,
            self.src_device_id,
            self.dst_device_id,
            payload,
            &mut self.buf,
        )?;

        let sent = loop {
            match self.inner.write(&self.buf) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        };

        if sent < self.buf.len() {
            warn!(
                sent,
                total = self.buf.len(),
                message_id,
                "short write, frame truncated on the wire"
            );
        }

        self.flush()?;
        Ok(sent)
    }

    /// Re-encode and send a decoded frame, preserving its device IDs.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<usize> {
        let (src, dst) = (self.src_device_id, self.dst_device_id);
        self.src_device_id = frame.header.src_device_id;
        self.dst_device_id = frame.header.dst_device_id;
        let result = self.send(frame.message_id(), &frame.payload);
        self.src_device_id = src;
        self.dst_device_id = dst;
        result
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameWriter<DeviceStream> {
    /// Create a frame writer for `DeviceStream` and apply the write timeout
    /// from config.
    pub fn with_config_device(mut inner: DeviceStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_write_timeout(config.write_timeout)
            .map_err(|err| match err {
                pingproto_transport::TransportError::Io(io) => FrameError::Io(io),
                other => FrameError::Io(std::io::Error::other(other.to_string())),
            })?;
        Ok(Self::with_config(inner, config))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;

    use super::*;
    use crate::codec::{Frame, FrameHeader, HEADER_SIZE};
    use crate::reader::FrameReader;

    #[test]
    fn written_bytes_decode_back() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let sent = writer.send(6, &5u16.to_le_bytes()).unwrap();
        assert_eq!(sent, 12);

        let wire = writer.into_inner().into_inner();
        let frame = Frame::from_buffer(BytesMut::from(wire.as_slice())).unwrap();
        assert_eq!(frame.message_id(), 6);
        assert_eq!(frame.payload(), 5u16.to_le_bytes());
    }

    #[test]
    fn device_ids_stamped_into_header() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.set_device_ids(3, 9);
        writer.send(1, b"\x01\x00").unwrap();

        let wire = writer.into_inner().into_inner();
        let header = FrameHeader::parse(&wire).unwrap();
        assert_eq!(header.src_device_id, 3);
        assert_eq!(header.dst_device_id, 9);
    }

    #[test]
    fn payload_too_large_rejected() {
        let cfg = FrameConfig {
            max_payload_size: 4,
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), cfg);

        let err = writer.send(3, b"oversized").unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }

    #[test]
    fn short_write_reports_count_without_failing() {
        struct ShortWriter(Vec<u8>);
        impl Write for ShortWriter {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                let n = buf.len().min(5);
                self.0.extend_from_slice(&buf[..n]);
                Ok(n)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = FrameWriter::new(ShortWriter(Vec::new()));
        let sent = writer.send(1, b"\x01\x00").unwrap();
        assert_eq!(sent, 5);
        assert_eq!(writer.get_ref().0.len(), 5);
    }

    #[test]
    fn zero_write_is_connection_closed() {
        struct ZeroWriter;
        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.send(1, b"\x01\x00").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn interrupted_write_retries() {
        struct InterruptedThenOk {
            interrupted: bool,
            data: Vec<u8>,
        }
        impl Write for InterruptedThenOk {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = FrameWriter::new(InterruptedThenOk {
            interrupted: false,
            data: Vec::new(),
        });
        let sent = writer.send(5, &[1, 2, 3, 4]).unwrap();
        assert_eq!(sent, HEADER_SIZE + 4 + 2);
        assert!(!writer.get_ref().data.is_empty());
    }

    #[test]
    fn write_frame_preserves_device_ids() {
        let mut origin = BytesMut::new();
        crate::codec::encode_frame(1, 7, 8, b"\x02\x00", &mut origin).unwrap();
        let frame = Frame::from_buffer(origin).unwrap();

        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_frame(&frame).unwrap();

        let wire = writer.into_inner().into_inner();
        let header = FrameHeader::parse(&wire).unwrap();
        assert_eq!(header.src_device_id, 7);
        assert_eq!(header.dst_device_id, 8);
    }

    #[test]
    fn roundtrip_through_reader() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(1400, &1300u16.to_le_bytes()).unwrap();
        writer.send(1401, &1300u16.to_le_bytes()).unwrap();

        let wire = writer.into_inner().into_inner();
        let mut reader = FrameReader::new(Cursor::new(wire));

        let f1 = reader.read_frame().unwrap();
        let f2 = reader.read_frame().unwrap();
        assert_eq!(f1.message_id(), 1400);
        assert_eq!(f2.message_id(), 1401);
    }
}
