//! Ping sonar message catalog.
//!
//! Every frame payload is classified by its 16-bit message ID into one case
//! of the [`Message`] sum type: the generic protocol set (ack/nack, version
//! exchange, device info), the Ping1D echosounder family, and the Ping360
//! scanning sonar family. Payload fields are read and written at explicit
//! offsets with bounds checks — no reinterpretation of raw device bytes.

pub mod catalog;
pub mod common;
pub mod error;
pub mod ping1d;
pub mod ping360;

use bytes::{Bytes, BytesMut};
use pingproto_frame::{encode_frame, Frame, FrameError};
use serde::Serialize;

pub use catalog::{lookup, message_name, CatalogEntry, PayloadLayout, CATALOG};
pub use common::{DeviceType, Version};
pub use error::{MessageError, Result};
pub use ping1d::Ping1dMessage;
pub use ping360::Ping360Message;

/// Any message the protocol defines, classified by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Message {
    Acknowledged(common::Acknowledged),
    NotAcknowledged(common::NotAcknowledged),
    AsciiMessage(common::AsciiMessage),
    DeviceInformation(common::DeviceInformation),
    ProtocolVersion(common::ProtocolVersion),
    GeneralRequest(common::GeneralRequest),
    SetDeviceId(common::SetDeviceId),
    Ping1d(Ping1dMessage),
    Ping360(Ping360Message),
    /// Checksum-valid frame whose ID is not in the catalog; payload kept
    /// verbatim for logging.
    Unknown { message_id: u16, payload: Bytes },
}

impl Message {
    /// The catalog ID of this message.
    pub fn message_id(&self) -> u16 {
        match self {
            Message::Acknowledged(_) => common::Acknowledged::ID,
            Message::NotAcknowledged(_) => common::NotAcknowledged::ID,
            Message::AsciiMessage(_) => common::AsciiMessage::ID,
            Message::DeviceInformation(_) => common::DeviceInformation::ID,
            Message::ProtocolVersion(_) => common::ProtocolVersion::ID,
            Message::GeneralRequest(_) => common::GeneralRequest::ID,
            Message::SetDeviceId(_) => common::SetDeviceId::ID,
            Message::Ping1d(msg) => msg.message_id(),
            Message::Ping360(msg) => msg.message_id(),
            Message::Unknown { message_id, .. } => *message_id,
        }
    }

    /// Human name from the catalog table.
    pub fn name(&self) -> &'static str {
        message_name(self.message_id())
    }

    /// Append this message's payload bytes to `dst`.
    pub fn encode_payload(&self, dst: &mut BytesMut) {
        match self {
            Message::Acknowledged(m) => m.encode_payload(dst),
            Message::NotAcknowledged(m) => m.encode_payload(dst),
            Message::AsciiMessage(m) => m.encode_payload(dst),
            Message::DeviceInformation(m) => m.encode_payload(dst),
            Message::ProtocolVersion(m) => m.encode_payload(dst),
            Message::GeneralRequest(m) => m.encode_payload(dst),
            Message::SetDeviceId(m) => m.encode_payload(dst),
            Message::Ping1d(m) => m.encode_payload(dst),
            Message::Ping360(m) => m.encode_payload(dst),
            Message::Unknown { payload, .. } => dst.extend_from_slice(payload),
        }
    }

    /// Payload bytes as a fresh buffer.
    pub fn payload_bytes(&self) -> BytesMut {
        let mut payload = BytesMut::new();
        self.encode_payload(&mut payload);
        payload
    }

    /// Encode a complete frame (header, payload, checksum) with device IDs
    /// zeroed.
    pub fn to_frame_bytes(&self) -> std::result::Result<BytesMut, FrameError> {
        let payload = self.payload_bytes();
        let mut frame = BytesMut::new();
        encode_frame(self.message_id(), 0, 0, &payload, &mut frame)?;
        Ok(frame)
    }

    /// Classify and decode a frame payload by message ID.
    ///
    /// IDs absent from the catalog decode to [`Message::Unknown`]; payloads
    /// too short for their declared layout fail.
    pub fn decode(message_id: u16, payload: &[u8]) -> Result<Self> {
        let msg = match message_id {
            common::Acknowledged::ID => {
                Message::Acknowledged(common::Acknowledged::decode(payload)?)
            }
            common::NotAcknowledged::ID => {
                Message::NotAcknowledged(common::NotAcknowledged::decode(payload)?)
            }
            common::AsciiMessage::ID => {
                Message::AsciiMessage(common::AsciiMessage::decode(payload)?)
            }
            common::DeviceInformation::ID => {
                Message::DeviceInformation(common::DeviceInformation::decode(payload)?)
            }
            common::ProtocolVersion::ID => {
                Message::ProtocolVersion(common::ProtocolVersion::decode(payload)?)
            }
            common::GeneralRequest::ID => {
                Message::GeneralRequest(common::GeneralRequest::decode(payload)?)
            }
            common::SetDeviceId::ID => Message::SetDeviceId(common::SetDeviceId::decode(payload)?),
            _ => {
                if let Some(msg) = Ping1dMessage::decode(message_id, payload)? {
                    Message::Ping1d(msg)
                } else if let Some(msg) = Ping360Message::decode(message_id, payload)? {
                    Message::Ping360(msg)
                } else {
                    Message::Unknown {
                        message_id,
                        payload: Bytes::copy_from_slice(payload),
                    }
                }
            }
        };
        Ok(msg)
    }

    /// Decode the payload of a validated frame.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        Self::decode(frame.message_id(), frame.payload())
    }
}

pub(crate) fn read_u8(message_id: u16, payload: &[u8], offset: usize) -> Result<u8> {
    payload
        .get(offset)
        .copied()
        .ok_or(MessageError::ShortPayload {
            message_id,
            expected: offset + 1,
            got: payload.len(),
        })
}

pub(crate) fn read_u16(message_id: u16, payload: &[u8], offset: usize) -> Result<u16> {
    payload
        .get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(MessageError::ShortPayload {
            message_id,
            expected: offset + 2,
            got: payload.len(),
        })
}

pub(crate) fn read_u32(message_id: u16, payload: &[u8], offset: usize) -> Result<u32> {
    payload
        .get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(MessageError::ShortPayload {
            message_id,
            expected: offset + 4,
            got: payload.len(),
        })
}
