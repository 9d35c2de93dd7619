//! Ping360 scanning sonar messages (IDs 2000–2903).
//!
//! The transducer head is stepped one angle at a time: a [`Transducer`]
//! command positions and fires it, the device answers with [`DeviceData`]
//! carrying the echo strength samples for that angle. Angles are gradians
//! (400 per revolution), durations microseconds, sample periods 25 ns ticks,
//! frequencies kHz.

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::{MessageError, Result};
use crate::{read_u16, read_u8};

/// Acquisition parameter block shared by [`DeviceData`] and [`Transducer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PingParameters {
    pub mode: u8,
    pub gain_setting: u8,
    pub angle: u16,
    pub transmit_duration: u16,
    pub sample_period: u16,
    pub transmit_frequency: u16,
    pub number_of_samples: u16,
}

impl PingParameters {
    pub const SIZE: usize = 12;

    pub(crate) fn decode_at(message_id: u16, payload: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            mode: read_u8(message_id, payload, offset)?,
            gain_setting: read_u8(message_id, payload, offset + 1)?,
            angle: read_u16(message_id, payload, offset + 2)?,
            transmit_duration: read_u16(message_id, payload, offset + 4)?,
            sample_period: read_u16(message_id, payload, offset + 6)?,
            transmit_frequency: read_u16(message_id, payload, offset + 8)?,
            number_of_samples: read_u16(message_id, payload, offset + 10)?,
        })
    }

    pub(crate) fn encode_into(&self, dst: &mut BytesMut) {
        dst.put_u8(self.mode);
        dst.put_u8(self.gain_setting);
        dst.put_u16_le(self.angle);
        dst.put_u16_le(self.transmit_duration);
        dst.put_u16_le(self.sample_period);
        dst.put_u16_le(self.transmit_frequency);
        dst.put_u16_le(self.number_of_samples);
    }
}

/// Assign a new bus identity to a Ping360.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetDeviceId {
    pub device_id: u8,
}

impl SetDeviceId {
    pub const ID: u16 = 2000;
    /// device_id plus a reserved byte.
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn new(device_id: u8) -> Self {
        Self { device_id }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.device_id);
        dst.put_u8(0);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            device_id: read_u8(Self::ID, payload, 0)?,
        })
    }
}

/// Echo strength samples for one transducer angle.
///
/// The sample blob length is declared by the embedded `data_length` field;
/// the frame payload is always at least metadata + declared length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceData {
    pub parameters: PingParameters,
    pub data: Bytes,
}

impl DeviceData {
    pub const ID: u16 = 2300;
    pub const METADATA_SIZE: usize = PingParameters::SIZE + 2;

    pub fn new(parameters: PingParameters, data: impl Into<Bytes>) -> Self {
        Self {
            parameters,
            data: data.into(),
        }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        self.parameters.encode_into(dst);
        dst.put_u16_le(self.data.len() as u16);
        dst.put_slice(&self.data);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        let parameters = PingParameters::decode_at(Self::ID, payload, 0)?;
        let declared = read_u16(Self::ID, payload, PingParameters::SIZE)? as usize;
        let trailing = &payload[Self::METADATA_SIZE..];
        if trailing.len() < declared {
            return Err(MessageError::TruncatedData {
                message_id: Self::ID,
                declared,
                available: trailing.len(),
            });
        }
        Ok(Self {
            parameters,
            data: Bytes::copy_from_slice(&trailing[..declared]),
        })
    }
}

/// Reboot the device, optionally into the bootloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reset {
    pub run_bootloader: u8,
}

impl Reset {
    pub const ID: u16 = 2600;
    /// run_bootloader plus a reserved byte.
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn new(run_bootloader: u8) -> Self {
        Self { run_bootloader }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.run_bootloader);
        dst.put_u8(0);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            run_bootloader: read_u8(Self::ID, payload, 0)?,
        })
    }
}

/// Position the transducer and optionally fire a ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transducer {
    pub parameters: PingParameters,
    /// 1 to transmit when the head reaches the angle, 0 to only move it.
    pub transmit: u8,
}

impl Transducer {
    pub const ID: u16 = 2601;
    /// Parameter block + transmit flag + reserved byte.
    pub const PAYLOAD_SIZE: usize = PingParameters::SIZE + 2;

    pub fn new(parameters: PingParameters, transmit: u8) -> Self {
        Self {
            parameters,
            transmit,
        }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        self.parameters.encode_into(dst);
        dst.put_u8(self.transmit);
        dst.put_u8(0);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            parameters: PingParameters::decode_at(Self::ID, payload, 0)?,
            transmit: read_u8(Self::ID, payload, PingParameters::SIZE)?,
        })
    }
}

impl Default for Transducer {
    /// Factory acquisition settings used by the vendor tooling.
    fn default() -> Self {
        Self {
            parameters: PingParameters {
                mode: 1,
                gain_setting: 0,
                angle: 0,
                transmit_duration: 100,
                sample_period: (100_000 / 25) as u16,
                transmit_frequency: 800,
                number_of_samples: 512,
            },
            transmit: 1,
        }
    }
}

/// Release the stepper motor (stops holding torque and heat).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MotorOff;

impl MotorOff {
    pub const ID: u16 = 2903;
    pub const PAYLOAD_SIZE: usize = 0;

    pub fn encode_payload(&self, _dst: &mut BytesMut) {}

    pub fn decode(_payload: &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

/// All Ping360 messages as one sum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Ping360Message {
    SetDeviceId(SetDeviceId),
    DeviceData(DeviceData),
    Reset(Reset),
    Transducer(Transducer),
    MotorOff(MotorOff),
}

impl Ping360Message {
    pub fn message_id(&self) -> u16 {
        match self {
            Ping360Message::SetDeviceId(_) => SetDeviceId::ID,
            Ping360Message::DeviceData(_) => DeviceData::ID,
            Ping360Message::Reset(_) => Reset::ID,
            Ping360Message::Transducer(_) => Transducer::ID,
            Ping360Message::MotorOff(_) => MotorOff::ID,
        }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        match self {
            Ping360Message::SetDeviceId(m) => m.encode_payload(dst),
            Ping360Message::DeviceData(m) => m.encode_payload(dst),
            Ping360Message::Reset(m) => m.encode_payload(dst),
            Ping360Message::Transducer(m) => m.encode_payload(dst),
            Ping360Message::MotorOff(m) => m.encode_payload(dst),
        }
    }

    /// Decode a frame payload whose ID falls in the Ping360 range.
    ///
    /// Returns `Ok(None)` for IDs this family does not define.
    pub(crate) fn decode(message_id: u16, payload: &[u8]) -> Result<Option<Self>> {
        let msg = match message_id {
            SetDeviceId::ID => Ping360Message::SetDeviceId(SetDeviceId::decode(payload)?),
            DeviceData::ID => Ping360Message::DeviceData(DeviceData::decode(payload)?),
            Reset::ID => Ping360Message::Reset(Reset::decode(payload)?),
            Transducer::ID => Ping360Message::Transducer(Transducer::decode(payload)?),
            MotorOff::ID => Ping360Message::MotorOff(MotorOff::decode(payload)?),
            _ => return Ok(None),
        };
        Ok(Some(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transducer_default_matches_factory_settings() {
        let msg = Transducer::default();
        assert_eq!(msg.parameters.mode, 1);
        assert_eq!(msg.parameters.transmit_duration, 100);
        assert_eq!(msg.parameters.sample_period, 4000);
        assert_eq!(msg.parameters.transmit_frequency, 800);
        assert_eq!(msg.parameters.number_of_samples, 512);
        assert_eq!(msg.transmit, 1);
    }

    #[test]
    fn transducer_roundtrip() {
        let msg = Transducer::new(
            PingParameters {
                mode: 1,
                gain_setting: 2,
                angle: 199,
                transmit_duration: 44,
                sample_period: 1333,
                transmit_frequency: 750,
                number_of_samples: 1024,
            },
            0,
        );
        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        assert_eq!(payload.len(), Transducer::PAYLOAD_SIZE);
        assert_eq!(Transducer::decode(&payload).unwrap(), msg);
    }

    #[test]
    fn device_data_roundtrip_with_samples() {
        let samples: Vec<u8> = (0..512).map(|i| (i % 256) as u8).collect();
        let msg = DeviceData::new(
            Transducer::default().parameters,
            samples.clone(),
        );

        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        assert_eq!(payload.len(), DeviceData::METADATA_SIZE + samples.len());

        let decoded = DeviceData::decode(&payload).unwrap();
        assert_eq!(decoded.parameters, msg.parameters);
        assert_eq!(decoded.data.as_ref(), samples.as_slice());
    }

    #[test]
    fn device_data_declared_length_overrun_rejected() {
        let msg = DeviceData::new(PingParameters::default(), vec![9u8; 16]);
        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        payload.truncate(DeviceData::METADATA_SIZE + 3);

        let err = DeviceData::decode(&payload).unwrap_err();
        assert!(matches!(
            err,
            MessageError::TruncatedData {
                message_id: 2300,
                declared: 16,
                available: 3
            }
        ));
    }

    #[test]
    fn set_device_id_carries_reserved_byte() {
        let msg = SetDeviceId::new(7);
        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        assert_eq!(payload.as_ref(), &[7, 0]);
        assert_eq!(SetDeviceId::decode(&payload).unwrap(), msg);
    }

    #[test]
    fn motor_off_has_empty_payload() {
        let mut payload = BytesMut::new();
        MotorOff.encode_payload(&mut payload);
        assert!(payload.is_empty());
        assert_eq!(
            Ping360Message::decode(MotorOff::ID, &payload)
                .unwrap()
                .unwrap()
                .message_id(),
            2903
        );
    }

    #[test]
    fn family_decode_rejects_foreign_ids() {
        assert!(Ping360Message::decode(1300, &[]).unwrap().is_none());
        assert!(Ping360Message::decode(2601 + 1, &[]).unwrap().is_none());
    }
}
