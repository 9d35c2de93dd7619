use std::fmt;
use std::io::{Read, Write};
use std::net::{ToSocketAddrs, UdpSocket};

use bytes::{Buf, BytesMut};
use tracing::info;

use crate::error::{Result, TransportError};
use crate::stream::DeviceStream;

/// Largest UDP payload we ever expect from a device bridge.
const MAX_DATAGRAM: usize = 65_507;

/// Connected UDP socket presented as a byte stream.
///
/// Received datagram payloads are buffered internally so exact-count reads
/// that span datagram boundaries behave like reads from a serial line.
pub(crate) struct UdpStream {
    socket: UdpSocket,
    rx: BytesMut,
    scratch: Vec<u8>,
}

impl UdpStream {
    fn new(socket: UdpSocket) -> Self {
        Self {
            socket,
            rx: BytesMut::new(),
            scratch: vec![0u8; MAX_DATAGRAM],
        }
    }

    pub(crate) fn socket(&self) -> &UdpSocket {
        &self.socket
    }

    pub(crate) fn try_clone(&self) -> Result<Self> {
        let socket = self.socket.try_clone().map_err(TransportError::Io)?;
        Ok(Self::new(socket))
    }
}

impl Read for UdpStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        while self.rx.is_empty() {
            let received = self.socket.recv(&mut self.scratch)?;
            self.rx.extend_from_slice(&self.scratch[..received]);
        }
        let n = buf.len().min(self.rx.len());
        buf[..n].copy_from_slice(&self.rx[..n]);
        self.rx.advance(n);
        Ok(n)
    }
}

impl Write for UdpStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.socket.send(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl DeviceStream {
    /// Connect to a device reachable over UDP (blocking socket).
    ///
    /// Binds an ephemeral local port and locks the socket onto `addr`; the
    /// device address (IP, port) is entirely this layer's concern.
    pub fn connect_udp<A: ToSocketAddrs + fmt::Display>(addr: A) -> Result<Self> {
        let connect_err = |source| TransportError::Connect {
            addr: addr.to_string(),
            source,
        };

        let socket = UdpSocket::bind(("0.0.0.0", 0)).map_err(connect_err)?;
        socket.connect(&addr).map_err(connect_err)?;
        info!(%addr, "connected udp device transport");

        Ok(Self::from_udp(UdpStream::new(socket)))
    }
}
