use std::fmt;
use std::io::{Read, Write};
use std::net::ToSocketAddrs;
use std::ops::ControlFlow;
use std::path::Path;

use pingproto_frame::{FrameError, FrameReader, FrameWriter};
use pingproto_messages::{Message, Version};
use pingproto_transport::DeviceStream;
use tracing::{trace, warn};

use crate::error::Result;
use crate::handshake::{await_protocol_version, HandshakeConfig};
use crate::writer::WriterHandle;

/// Client session to one sonar device.
///
/// Construction performs the version handshake; afterwards the session
/// alternates between exactly one outstanding read (header, then payload)
/// and dispatch. Writes run on a background thread and never interleave
/// with the read cycle. Handlers borrow each message only for the duration
/// of their invocation — copy out anything that must outlive it.
#[derive(Debug)]
pub struct PingClient<R> {
    reader: FrameReader<R>,
    writer: WriterHandle,
    protocol_version: Version,
}

impl PingClient<DeviceStream> {
    /// Connect to a device over UDP and perform the handshake.
    pub fn connect_udp<A: ToSocketAddrs + fmt::Display>(
        addr: A,
        config: &HandshakeConfig,
    ) -> Result<Self> {
        let stream = DeviceStream::connect_udp(addr)?;
        let write_half = stream.try_clone()?;
        Self::from_parts(stream, write_half, config)
    }

    /// Open a serial device and perform the handshake.
    pub fn open_serial(
        path: impl AsRef<Path>,
        baud_rate: u32,
        config: &HandshakeConfig,
    ) -> Result<Self> {
        let stream = DeviceStream::open_serial(path, baud_rate)?;
        let write_half = stream.try_clone()?;
        Self::from_parts(stream, write_half, config)
    }
}

impl<R: Read> PingClient<R> {
    /// Build a session from separate read and write halves and perform the
    /// handshake.
    pub fn from_parts<W: Write + Send + 'static>(
        read_half: R,
        write_half: W,
        config: &HandshakeConfig,
    ) -> Result<Self> {
        let writer = WriterHandle::spawn(FrameWriter::new(write_half)).map_err(FrameError::Io)?;
        let mut reader = FrameReader::new(read_half);
        let protocol_version = await_protocol_version(reader.get_mut(), &writer, config)?;

        Ok(Self {
            reader,
            writer,
            protocol_version,
        })
    }

    /// Protocol version the peer reported during the handshake.
    pub fn protocol_version(&self) -> Version {
        self.protocol_version
    }

    /// Synchronous write; returns the number of bytes actually written.
    ///
    /// A short write is logged as a warning and reported only through the
    /// returned count — command traffic is best-effort by design.
    pub fn send(&self, message: &Message) -> Result<usize> {
        self.writer
            .send_blocking(message.message_id(), message.payload_bytes())
    }

    /// Fire-and-forget write.
    ///
    /// Completion is not reported; failure to even submit the write is
    /// fatal to the session.
    pub fn send_async(&self, message: &Message) -> Result<()> {
        self.writer
            .send_detached(message.message_id(), message.payload_bytes())
    }

    /// Set the device IDs stamped into subsequently written frame headers.
    pub fn set_device_ids(&self, src_device_id: u8, dst_device_id: u8) -> Result<()> {
        self.writer.set_device_ids(src_device_id, dst_device_id)
    }

    /// Read one checksum-verified frame and decode it.
    ///
    /// Frames that pass the checksum but are too short for their declared
    /// layout are logged and skipped; only transport errors surface.
    pub fn read_message(&mut self) -> Result<Message> {
        loop {
            let frame = self.reader.read_frame()?;
            match Message::from_frame(&frame) {
                Ok(message) => {
                    trace!(
                        message_id = frame.header.message_id,
                        name = message.name(),
                        "message received"
                    );
                    return Ok(message);
                }
                Err(err) => warn!(
                    %err,
                    message_id = frame.header.message_id,
                    "dropping undecodable frame"
                ),
            }
        }
    }

    /// Steady-state read loop: dispatch every decoded message to `handler`
    /// until it breaks or a transport error surfaces.
    pub fn run<F>(&mut self, mut handler: F) -> Result<()>
    where
        F: FnMut(&Message) -> ControlFlow<()>,
    {
        loop {
            let message = self.read_message()?;
            if handler(&message).is_break() {
                return Ok(());
            }
        }
    }

    /// Number of framing-error recoveries since the session started.
    pub fn resyncs(&self) -> u64 {
        self.reader.resyncs()
    }
}
