use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::error::{Result, TransportError};
use crate::stream::DeviceStream;

/// Default read/write timeout applied at open time.
///
/// Sonar devices answer within tens of milliseconds on a healthy link; one
/// second absorbs slow USB adapters without hanging an interactive session.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

impl DeviceStream {
    /// Open a serial device (8N1, no flow control) at the given baud rate.
    ///
    /// Baud rate and device path are entirely this layer's concern; the
    /// protocol layers above only ever see a byte stream.
    pub fn open_serial(path: impl AsRef<Path>, baud_rate: u32) -> Result<Self> {
        let path = path.as_ref();
        let port = serialport::new(path.to_string_lossy(), baud_rate)
            .timeout(DEFAULT_TIMEOUT)
            .open()
            .map_err(|source| TransportError::OpenSerial {
                path: path.to_path_buf(),
                source,
            })?;

        info!(?path, baud_rate, "opened serial device transport");
        Ok(Self::from_serial(port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_device_fails() {
        let err = DeviceStream::open_serial("/dev/does-not-exist-pingproto", 115_200).unwrap_err();
        assert!(matches!(err, TransportError::OpenSerial { .. }));
    }
}
