use std::io::Write;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::JoinHandle;

use bytes::BytesMut;
use pingproto_frame::{FrameError, FrameWriter};
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

enum WriteCommand {
    /// Write and report the byte count back through `reply`.
    Blocking {
        message_id: u16,
        payload: BytesMut,
        reply: SyncSender<std::result::Result<usize, FrameError>>,
    },
    /// Fire-and-forget write; failures are logged, not reported.
    Detached { message_id: u16, payload: BytesMut },
    /// Change the device IDs stamped into outgoing headers.
    SetDeviceIds { src: u8, dst: u8 },
    Shutdown,
}

/// Owns the background thread that performs all writes for a session.
///
/// Keeps writes independent of the read cycle: the reader never blocks on a
/// slow write and vice versa.
#[derive(Debug)]
pub(crate) struct WriterHandle {
    tx: Sender<WriteCommand>,
    thread: Option<JoinHandle<()>>,
}

impl WriterHandle {
    pub(crate) fn spawn<W: Write + Send + 'static>(
        writer: FrameWriter<W>,
    ) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let thread = std::thread::Builder::new()
            .name("pingproto-writer".into())
            .spawn(move || writer_loop(writer, rx))?;
        Ok(Self {
            tx,
            thread: Some(thread),
        })
    }

    /// Write a frame and wait for the byte count.
    pub(crate) fn send_blocking(&self, message_id: u16, payload: BytesMut) -> Result<usize> {
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        self.tx
            .send(WriteCommand::Blocking {
                message_id,
                payload,
                reply: reply_tx,
            })
            .map_err(|_| ClientError::WriterClosed)?;

        match reply_rx.recv() {
            Ok(result) => result.map_err(ClientError::from),
            Err(_) => Err(ClientError::WriterClosed),
        }
    }

    /// Enqueue a frame without waiting for completion.
    ///
    /// Failing to even enqueue means the writer thread is gone, which is
    /// fatal for the session.
    pub(crate) fn send_detached(&self, message_id: u16, payload: BytesMut) -> Result<()> {
        self.tx
            .send(WriteCommand::Detached {
                message_id,
                payload,
            })
            .map_err(|_| ClientError::WriterClosed)
    }

    pub(crate) fn set_device_ids(&self, src: u8, dst: u8) -> Result<()> {
        self.tx
            .send(WriteCommand::SetDeviceIds { src, dst })
            .map_err(|_| ClientError::WriterClosed)
    }
}

impl Drop for WriterHandle {
    fn drop(&mut self) {
        let _ = self.tx.send(WriteCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn writer_loop<W: Write>(mut writer: FrameWriter<W>, rx: Receiver<WriteCommand>) {
    for command in rx {
        match command {
            WriteCommand::Blocking {
                message_id,
                payload,
                reply,
            } => {
                let result = writer.send(message_id, &payload);
                let _ = reply.send(result);
            }
            WriteCommand::Detached {
                message_id,
                payload,
            } => {
                if let Err(err) = writer.send(message_id, &payload) {
                    warn!(%err, message_id, "detached write failed");
                }
            }
            WriteCommand::SetDeviceIds { src, dst } => writer.set_device_ids(src, dst),
            WriteCommand::Shutdown => break,
        }
    }
    debug!("writer thread exiting");
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::os::unix::net::UnixStream;
    use std::io::Read;

    use pingproto_frame::FrameReader;

    use super::*;

    #[test]
    fn blocking_send_reports_byte_count() {
        let (left, right) = UnixStream::pair().unwrap();
        let handle = WriterHandle::spawn(FrameWriter::new(left)).unwrap();

        let mut payload = BytesMut::new();
        payload.extend_from_slice(&5u16.to_le_bytes());
        let sent = handle.send_blocking(6, payload).unwrap();
        assert_eq!(sent, 12);

        let mut reader = FrameReader::new(right);
        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.message_id(), 6);
    }

    #[test]
    fn detached_send_reaches_the_wire() {
        let (left, mut right) = UnixStream::pair().unwrap();
        let handle = WriterHandle::spawn(FrameWriter::new(left)).unwrap();

        handle.send_detached(2903, BytesMut::new()).unwrap();
        drop(handle); // joins the thread, flushing the queue

        let mut wire = [0u8; 10];
        right.read_exact(&mut wire).unwrap();
        assert_eq!(&wire[0..2], b"BR");
        assert_eq!(u16::from_le_bytes([wire[4], wire[5]]), 2903);
    }

    #[test]
    fn device_ids_apply_to_later_writes() {
        let (left, right) = UnixStream::pair().unwrap();
        let handle = WriterHandle::spawn(FrameWriter::new(left)).unwrap();

        handle.set_device_ids(1, 2).unwrap();
        let mut payload = BytesMut::new();
        payload.extend_from_slice(&5u16.to_le_bytes());
        handle.send_blocking(6, payload).unwrap();

        let mut reader = FrameReader::new(right);
        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.header.src_device_id, 1);
        assert_eq!(frame.header.dst_device_id, 2);
    }

    #[test]
    fn send_after_shutdown_is_writer_closed() {
        let handle = WriterHandle::spawn(FrameWriter::new(Cursor::new(Vec::<u8>::new()))).unwrap();
        let orphan = WriterHandle {
            tx: handle.tx.clone(),
            thread: None,
        };
        // Stops the thread; the orphan handle's channel loses its receiver.
        drop(handle);

        let err = orphan.send_detached(1, BytesMut::new()).unwrap_err();
        assert!(matches!(err, ClientError::WriterClosed));
    }
}
