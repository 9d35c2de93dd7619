use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use crate::error::Result;
use crate::udp::UdpStream;

/// A connected device stream — implements Read + Write.
///
/// This is the fundamental I/O type returned by transport constructors.
/// Wraps either an open serial port or a connected UDP socket; the protocol
/// layers above never see which one.
pub struct DeviceStream {
    inner: DeviceStreamInner,
}

enum DeviceStreamInner {
    Serial(Box<dyn SerialPort>),
    Udp(UdpStream),
}

impl Read for DeviceStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            DeviceStreamInner::Serial(port) => port.read(buf),
            DeviceStreamInner::Udp(stream) => stream.read(buf),
        }
    }
}

impl Write for DeviceStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            DeviceStreamInner::Serial(port) => port.write(buf),
            DeviceStreamInner::Udp(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            DeviceStreamInner::Serial(port) => port.flush(),
            DeviceStreamInner::Udp(stream) => stream.flush(),
        }
    }
}

impl DeviceStream {
    /// Serial ports always carry a finite timeout; `None` maps to this.
    const SERIAL_BLOCKING_TIMEOUT: Duration = Duration::from_secs(3600);

    pub(crate) fn from_serial(port: Box<dyn SerialPort>) -> Self {
        Self {
            inner: DeviceStreamInner::Serial(port),
        }
    }

    pub(crate) fn from_udp(stream: UdpStream) -> Self {
        Self {
            inner: DeviceStreamInner::Udp(stream),
        }
    }

    /// Set read timeout on the underlying stream.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        match &mut self.inner {
            DeviceStreamInner::Serial(port) => port
                .set_timeout(timeout.unwrap_or(Self::SERIAL_BLOCKING_TIMEOUT))
                .map_err(|err| std::io::Error::from(err).into()),
            DeviceStreamInner::Udp(stream) => {
                stream.socket().set_read_timeout(timeout).map_err(Into::into)
            }
        }
    }

    /// Set write timeout on the underlying stream.
    ///
    /// Serial ports expose a single timeout knob covering both directions.
    pub fn set_write_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        match &mut self.inner {
            DeviceStreamInner::Serial(port) => port
                .set_timeout(timeout.unwrap_or(Self::SERIAL_BLOCKING_TIMEOUT))
                .map_err(|err| std::io::Error::from(err).into()),
            DeviceStreamInner::Udp(stream) => stream
                .socket()
                .set_write_timeout(timeout)
                .map_err(Into::into),
        }
    }

    /// Try to clone this stream (creates a new handle on the same device).
    ///
    /// The clone is intended as an independent write half; bytes already
    /// buffered for reading stay with the original stream.
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            DeviceStreamInner::Serial(port) => {
                let cloned = port.try_clone().map_err(std::io::Error::from)?;
                Ok(Self::from_serial(cloned))
            }
            DeviceStreamInner::Udp(stream) => Ok(Self::from_udp(stream.try_clone()?)),
        }
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        match &self.inner {
            DeviceStreamInner::Serial(_) => "serial",
            DeviceStreamInner::Udp(_) => "udp",
        }
    }
}

impl std::fmt::Debug for DeviceStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStream")
            .field("type", &self.transport_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_names_transport() {
        let listener = std::net::UdpSocket::bind(("127.0.0.1", 0)).unwrap();
        let addr = listener.local_addr().unwrap();

        let stream = DeviceStream::connect_udp(addr).unwrap();
        assert_eq!(stream.transport_name(), "udp");
        assert!(format!("{stream:?}").contains("udp"));
    }

    #[test]
    fn udp_clone_shares_socket() {
        let listener = std::net::UdpSocket::bind(("127.0.0.1", 0)).unwrap();
        let addr = listener.local_addr().unwrap();

        let mut stream = DeviceStream::connect_udp(addr).unwrap();
        let mut clone = stream.try_clone().unwrap();

        stream.write_all(b"one").unwrap();
        clone.write_all(b"two").unwrap();

        let mut buf = [0u8; 16];
        let (n, from1) = listener.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"one");
        let (n, from2) = listener.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"two");
        assert_eq!(from1, from2);
    }
}
