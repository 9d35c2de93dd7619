//! Generic protocol messages shared by every Ping device family.

use std::fmt;

use bytes::{BufMut, BytesMut};
use serde::Serialize;

use crate::error::Result;
use crate::{read_u16, read_u8};

/// Device family carried in a [`DeviceInformation`] reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Unknown,
    Ping1d,
    Ping360,
}

impl DeviceType {
    pub fn as_u8(self) -> u8 {
        match self {
            DeviceType::Unknown => 0,
            DeviceType::Ping1d => 1,
            DeviceType::Ping360 => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceType::Unknown => "UNKNOWN_DEVICE",
            DeviceType::Ping1d => "PING_1D",
            DeviceType::Ping360 => "PING_360",
        }
    }
}

impl From<u8> for DeviceType {
    fn from(value: u8) -> Self {
        match value {
            1 => DeviceType::Ping1d,
            2 => DeviceType::Ping360,
            _ => DeviceType::Unknown,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Four-byte version record (major.minor.patch + reserved byte).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub reserved: u8,
}

impl Version {
    pub const SIZE: usize = 4;

    pub(crate) fn decode_at(message_id: u16, payload: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            major: read_u8(message_id, payload, offset)?,
            minor: read_u8(message_id, payload, offset + 1)?,
            patch: read_u8(message_id, payload, offset + 2)?,
            reserved: read_u8(message_id, payload, offset + 3)?,
        })
    }

    pub(crate) fn encode_into(&self, dst: &mut BytesMut) {
        dst.put_u8(self.major);
        dst.put_u8(self.minor);
        dst.put_u8(self.patch);
        dst.put_u8(self.reserved);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Positive acknowledgement of a received command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Acknowledged {
    /// ID of the message being acknowledged.
    pub acked_id: u16,
}

impl Acknowledged {
    pub const ID: u16 = 1;
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn new(acked_id: u16) -> Self {
        Self { acked_id }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.acked_id);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            acked_id: read_u16(Self::ID, payload, 0)?,
        })
    }
}

/// Negative acknowledgement with a diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotAcknowledged {
    /// ID of the rejected message.
    pub nacked_id: u16,
    /// Device-supplied reason.
    pub message: String,
}

impl NotAcknowledged {
    pub const ID: u16 = 2;

    pub fn new(nacked_id: u16, message: impl Into<String>) -> Self {
        Self {
            nacked_id,
            message: message.into(),
        }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.nacked_id);
        dst.put_slice(self.message.as_bytes());
        dst.put_u8(0);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        let nacked_id = read_u16(Self::ID, payload, 0)?;
        Ok(Self {
            nacked_id,
            message: decode_text(&payload[2..]),
        })
    }
}

/// Free-form diagnostic text emitted by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsciiMessage {
    pub message: String,
}

impl AsciiMessage {
    pub const ID: u16 = 3;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_slice(self.message.as_bytes());
        dst.put_u8(0);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            message: decode_text(payload),
        })
    }
}

/// Device identity and firmware version reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceInformation {
    pub device_type: DeviceType,
    pub device_revision: u8,
    pub firmware_version: Version,
}

impl DeviceInformation {
    pub const ID: u16 = 4;
    pub const PAYLOAD_SIZE: usize = 2 + Version::SIZE;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.device_type.as_u8());
        dst.put_u8(self.device_revision);
        self.firmware_version.encode_into(dst);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            device_type: DeviceType::from(read_u8(Self::ID, payload, 0)?),
            device_revision: read_u8(Self::ID, payload, 1)?,
            firmware_version: Version::decode_at(Self::ID, payload, 2)?,
        })
    }
}

/// Protocol version reply, returned during the session handshake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProtocolVersion {
    pub version: Version,
}

impl ProtocolVersion {
    pub const ID: u16 = 5;
    pub const PAYLOAD_SIZE: usize = Version::SIZE;

    pub fn new(version: Version) -> Self {
        Self { version }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        self.version.encode_into(dst);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            version: Version::decode_at(Self::ID, payload, 0)?,
        })
    }
}

/// Ask the device to emit one message of the requested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeneralRequest {
    /// ID of the message type being requested.
    pub requested_id: u16,
}

impl GeneralRequest {
    pub const ID: u16 = 6;
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn new(requested_id: u16) -> Self {
        Self { requested_id }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.requested_id);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            requested_id: read_u16(Self::ID, payload, 0)?,
        })
    }
}

/// Assign a new bus identity to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetDeviceId {
    pub device_id: u8,
}

impl SetDeviceId {
    pub const ID: u16 = 100;
    pub const PAYLOAD_SIZE: usize = 1;

    pub fn new(device_id: u8) -> Self {
        Self { device_id }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.device_id);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            device_id: read_u8(Self::ID, payload, 0)?,
        })
    }
}

/// Text payloads are NUL-terminated on the wire; strip one trailing
/// terminator, keep everything else verbatim.
fn decode_text(raw: &[u8]) -> String {
    let trimmed = raw.strip_suffix(&[0]).unwrap_or(raw);
    String::from_utf8_lossy(trimmed).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MessageError;

    #[test]
    fn acknowledged_roundtrip() {
        let msg = Acknowledged::new(1001);
        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        assert_eq!(payload.len(), Acknowledged::PAYLOAD_SIZE);
        assert_eq!(Acknowledged::decode(&payload).unwrap(), msg);
    }

    #[test]
    fn acknowledged_short_payload_rejected() {
        let err = Acknowledged::decode(&[0x01]).unwrap_err();
        assert!(matches!(
            err,
            MessageError::ShortPayload {
                message_id: 1,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn nack_roundtrip_keeps_text() {
        let msg = NotAcknowledged::new(1005, "gain out of range");
        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        // nacked_id + text + NUL terminator.
        assert_eq!(payload.len(), 2 + msg.message.len() + 1);
        assert_eq!(NotAcknowledged::decode(&payload).unwrap(), msg);
    }

    #[test]
    fn ascii_message_roundtrip_with_terminator() {
        let msg = AsciiMessage::new("hello wrld");
        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        assert_eq!(payload.len(), 11);
        assert_eq!(AsciiMessage::decode(&payload).unwrap().message, "hello wrld");
    }

    #[test]
    fn ascii_message_without_terminator_decodes() {
        let decoded = AsciiMessage::decode(b"raw text").unwrap();
        assert_eq!(decoded.message, "raw text");
    }

    #[test]
    fn device_information_roundtrip() {
        let msg = DeviceInformation {
            device_type: DeviceType::Ping360,
            device_revision: 3,
            firmware_version: Version {
                major: 3,
                minor: 2,
                patch: 1,
                reserved: 0,
            },
        };
        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        assert_eq!(payload.len(), DeviceInformation::PAYLOAD_SIZE);
        assert_eq!(DeviceInformation::decode(&payload).unwrap(), msg);
    }

    #[test]
    fn unknown_device_type_is_lenient() {
        let info = DeviceInformation::decode(&[0x7F, 0, 1, 0, 0, 0]).unwrap();
        assert_eq!(info.device_type, DeviceType::Unknown);
    }

    #[test]
    fn general_request_payload_is_little_endian() {
        let msg = GeneralRequest::new(ProtocolVersion::ID);
        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        assert_eq!(payload.as_ref(), &[5, 0]);
    }

    #[test]
    fn version_displays_three_parts() {
        let version = Version {
            major: 1,
            minor: 4,
            patch: 9,
            reserved: 0,
        };
        assert_eq!(version.to_string(), "1.4.9");
    }
}
