//! Ping1D single-beam echosounder messages (IDs 1000–1401).
//!
//! Set-commands occupy 1000–1006, telemetry replies 1200–1214, the profile
//! report 1300, and continuous-reporting control 1400/1401. Distances are
//! millimetres, durations microseconds, intervals milliseconds, voltages
//! millivolts, temperatures centi-degrees — raw device units throughout.

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::{MessageError, Result};
use crate::{read_u16, read_u32, read_u8};

/// Assign a new bus identity to a Ping1D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetDeviceId {
    pub device_id: u8,
}

impl SetDeviceId {
    pub const ID: u16 = 1000;
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

/// Set the scan window bounds (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetRange {
    pub min_range: u32,
    pub max_range: u32,
}

impl SetRange {
    pub const ID: u16 = 1001;
    pub const PAYLOAD_SIZE: usize = 8;

    pub fn new(min_range: u32, max_range: u32) -> Self {
        Self {
            min_range,
            max_range,
        }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.min_range);
        dst.put_u32_le(self.max_range);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            min_range: read_u32(Self::ID, payload, 0)?,
            max_range: read_u32(Self::ID, payload, 4)?,
        })
    }
}

/// Set the assumed speed of sound (mm/s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetSpeedOfSound {
    pub speed_of_sound: u32,
}

impl SetSpeedOfSound {
    pub const ID: u16 = 1002;
    pub const PAYLOAD_SIZE: usize = 4;

    pub fn new(speed_of_sound: u32) -> Self {
        Self { speed_of_sound }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.speed_of_sound);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            speed_of_sound: read_u32(Self::ID, payload, 0)?,
        })
    }
}

/// Switch between manual (0) and automatic (1) ranging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetModeAuto {
    mode_auto: u8,
}

impl SetModeAuto {
    pub const ID: u16 = 1003;
    pub const PAYLOAD_SIZE: usize = 1;

    /// Fails unless `mode_auto` is 0 (manual) or 1 (auto).
    pub fn new(mode_auto: u8) -> Result<Self> {
        if mode_auto > 1 {
            return Err(MessageError::ValueOutOfRange {
                field: "mode_auto",
                value: u32::from(mode_auto),
                min: 0,
                max: 1,
            });
        }
        Ok(Self { mode_auto })
    }

    pub fn mode_auto(&self) -> u8 {
        self.mode_auto
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.mode_auto);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            mode_auto: read_u8(Self::ID, payload, 0)?,
        })
    }
}

/// Set the interval between automatic pings (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetPingInterval {
    pub ping_interval: u16,
}

impl SetPingInterval {
    pub const ID: u16 = 1004;
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn new(ping_interval: u16) -> Self {
        Self { ping_interval }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.ping_interval);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            ping_interval: read_u16(Self::ID, payload, 0)?,
        })
    }
}

/// Select a receiver gain step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetGainSetting {
    gain_setting: u8,
}

impl SetGainSetting {
    pub const ID: u16 = 1005;
    pub const PAYLOAD_SIZE: usize = 1;
    /// Highest gain step the device accepts.
    pub const MAX_GAIN: u8 = 6;

    /// Fails unless `gain_setting` is within `0..=6`.
    pub fn new(gain_setting: u8) -> Result<Self> {
        if gain_setting > Self::MAX_GAIN {
            return Err(MessageError::ValueOutOfRange {
                field: "gain_setting",
                value: u32::from(gain_setting),
                min: 0,
                max: u32::from(Self::MAX_GAIN),
            });
        }
        Ok(Self { gain_setting })
    }

    pub fn gain_setting(&self) -> u8 {
        self.gain_setting
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.gain_setting);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            gain_setting: read_u8(Self::ID, payload, 0)?,
        })
    }
}

/// Enable (1) or disable (0) pinging. Values above 1 are clamped to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetPingEnable {
    pub ping_enable: u8,
}

impl SetPingEnable {
    pub const ID: u16 = 1006;
    pub const PAYLOAD_SIZE: usize = 1;

    pub fn new(ping_enable: u8) -> Self {
        Self {
            ping_enable: ping_enable.min(1),
        }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.ping_enable);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            ping_enable: read_u8(Self::ID, payload, 0)?,
        })
    }
}

/// Reboot into the bootloader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GotoBootloader;

impl GotoBootloader {
    pub const ID: u16 = 1100;
    pub const PAYLOAD_SIZE: usize = 0;

    pub fn encode_payload(&self, _dst: &mut BytesMut) {}

    pub fn decode(_payload: &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

/// Firmware identity report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FirmwareVersion {
    pub device_type: u8,
    pub device_model: u8,
    pub firmware_version_major: u16,
    pub firmware_version_minor: u16,
}

impl FirmwareVersion {
    pub const ID: u16 = 1200;
    pub const PAYLOAD_SIZE: usize = 6;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.device_type);
        dst.put_u8(self.device_model);
        dst.put_u16_le(self.firmware_version_major);
        dst.put_u16_le(self.firmware_version_minor);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            device_type: read_u8(Self::ID, payload, 0)?,
            device_model: read_u8(Self::ID, payload, 1)?,
            firmware_version_major: read_u16(Self::ID, payload, 2)?,
            firmware_version_minor: read_u16(Self::ID, payload, 4)?,
        })
    }
}

/// Current bus identity report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceId {
    pub device_id: u8,
}

impl DeviceId {
    pub const ID: u16 = 1201;
    pub const PAYLOAD_SIZE: usize = 1;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.device_id);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            device_id: read_u8(Self::ID, payload, 0)?,
        })
    }
}

/// 5V rail voltage report (millivolts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Voltage5 {
    pub voltage: u16,
}

impl Voltage5 {
    pub const ID: u16 = 1202;
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.voltage);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            voltage: read_u16(Self::ID, payload, 0)?,
        })
    }
}

/// Configured speed of sound report (mm/s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeedOfSound {
    pub speed_of_sound: u32,
}

impl SpeedOfSound {
    pub const ID: u16 = 1203;
    pub const PAYLOAD_SIZE: usize = 4;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.speed_of_sound);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            speed_of_sound: read_u32(Self::ID, payload, 0)?,
        })
    }
}

/// Active scan window report (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub min_range: u32,
    pub range_length: u32,
}

impl Range {
    pub const ID: u16 = 1204;
    pub const PAYLOAD_SIZE: usize = 8;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.min_range);
        dst.put_u32_le(self.range_length);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            min_range: read_u32(Self::ID, payload, 0)?,
            range_length: read_u32(Self::ID, payload, 4)?,
        })
    }
}

/// Ranging mode report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeAuto {
    pub mode_auto: u8,
}

impl ModeAuto {
    pub const ID: u16 = 1205;
    pub const PAYLOAD_SIZE: usize = 1;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.mode_auto);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            mode_auto: read_u8(Self::ID, payload, 0)?,
        })
    }
}

/// Ping interval report (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PingInterval {
    pub ping_interval: u16,
}

impl PingInterval {
    pub const ID: u16 = 1206;
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.ping_interval);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            ping_interval: read_u16(Self::ID, payload, 0)?,
        })
    }
}

/// Gain step report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GainSetting {
    pub gain_setting: u8,
}

impl GainSetting {
    pub const ID: u16 = 1207;
    pub const PAYLOAD_SIZE: usize = 1;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.gain_setting);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            gain_setting: read_u8(Self::ID, payload, 0)?,
        })
    }
}

/// Acoustic pulse duration report (microseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransmitDuration {
    pub transmit_duration: u16,
}

impl TransmitDuration {
    pub const ID: u16 = 1208;
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.transmit_duration);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            transmit_duration: read_u16(Self::ID, payload, 0)?,
        })
    }
}

/// Combined status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeneralInfo {
    pub firmware_version_major: u16,
    pub firmware_version_minor: u16,
    pub voltage_5: u16,
    pub ping_interval: u16,
    pub gain_setting: u8,
    pub mode_auto: u8,
}

impl GeneralInfo {
    pub const ID: u16 = 1210;
    pub const PAYLOAD_SIZE: usize = 10;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.firmware_version_major);
        dst.put_u16_le(self.firmware_version_minor);
        dst.put_u16_le(self.voltage_5);
        dst.put_u16_le(self.ping_interval);
        dst.put_u8(self.gain_setting);
        dst.put_u8(self.mode_auto);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            firmware_version_major: read_u16(Self::ID, payload, 0)?,
            firmware_version_minor: read_u16(Self::ID, payload, 2)?,
            voltage_5: read_u16(Self::ID, payload, 4)?,
            ping_interval: read_u16(Self::ID, payload, 6)?,
            gain_setting: read_u8(Self::ID, payload, 8)?,
            mode_auto: read_u8(Self::ID, payload, 9)?,
        })
    }
}

/// Distance with a one-byte confidence, for bandwidth-starved links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistanceSimple {
    pub distance: u32,
    pub confidence: u8,
}

impl DistanceSimple {
    pub const ID: u16 = 1211;
    pub const PAYLOAD_SIZE: usize = 5;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.distance);
        dst.put_u8(self.confidence);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            distance: read_u32(Self::ID, payload, 0)?,
            confidence: read_u8(Self::ID, payload, 4)?,
        })
    }
}

/// Fixed block shared by [`Distance`] and [`Profile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PingInfo {
    pub distance: u32,
    pub confidence: u16,
    pub transmit_duration: u16,
    pub ping_number: u32,
    pub min_range: u32,
    pub range_length: u32,
    pub gain_setting: u32,
}

impl PingInfo {
    pub const SIZE: usize = 22;

    pub(crate) fn decode_at(message_id: u16, payload: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            distance: read_u32(message_id, payload, offset)?,
            confidence: read_u16(message_id, payload, offset + 4)?,
            transmit_duration: read_u16(message_id, payload, offset + 6)?,
            ping_number: read_u32(message_id, payload, offset + 8)?,
            min_range: read_u32(message_id, payload, offset + 12)?,
            range_length: read_u32(message_id, payload, offset + 16)?,
            gain_setting: read_u32(message_id, payload, offset + 20)?,
        })
    }

    pub(crate) fn encode_into(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.distance);
        dst.put_u16_le(self.confidence);
        dst.put_u16_le(self.transmit_duration);
        dst.put_u32_le(self.ping_number);
        dst.put_u32_le(self.min_range);
        dst.put_u32_le(self.range_length);
        dst.put_u32_le(self.gain_setting);
    }
}

/// Full distance measurement report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Distance {
    pub info: PingInfo,
}

impl Distance {
    pub const ID: u16 = 1212;
    pub const PAYLOAD_SIZE: usize = PingInfo::SIZE;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        self.info.encode_into(dst);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            info: PingInfo::decode_at(Self::ID, payload, 0)?,
        })
    }
}

/// Processor die temperature report (centi-degrees Celsius).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessorTemperature {
    pub processor_temperature: u16,
}

impl ProcessorTemperature {
    pub const ID: u16 = 1213;
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.processor_temperature);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            processor_temperature: read_u16(Self::ID, payload, 0)?,
        })
    }
}

/// Board temperature report (centi-degrees Celsius).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PcbTemperature {
    pub pcb_temperature: u16,
}

impl PcbTemperature {
    pub const ID: u16 = 1214;
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.pcb_temperature);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            pcb_temperature: read_u16(Self::ID, payload, 0)?,
        })
    }
}

/// Full echo profile: measurement block plus amplitude samples.
///
/// The sample blob length is declared by an embedded field, not by the frame
/// header; the frame payload is always at least metadata + declared length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub info: PingInfo,
    pub data: Bytes,
}

impl Profile {
    pub const ID: u16 = 1300;
    pub const METADATA_SIZE: usize = PingInfo::SIZE + 2;

    pub fn new(info: PingInfo, data: impl Into<Bytes>) -> Self {
        Self {
            info,
            data: data.into(),
        }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        self.info.encode_into(dst);
        dst.put_u16_le(self.data.len() as u16);
        dst.put_slice(&self.data);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        let info = PingInfo::decode_at(Self::ID, payload, 0)?;
        let declared = read_u16(Self::ID, payload, PingInfo::SIZE)? as usize;
        let trailing = &payload[Self::METADATA_SIZE..];
        if trailing.len() < declared {
            return Err(MessageError::TruncatedData {
                message_id: Self::ID,
                declared,
                available: trailing.len(),
            });
        }
        Ok(Self {
            info,
            data: Bytes::copy_from_slice(&trailing[..declared]),
        })
    }
}

/// Start continuous reporting of the given message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContinuousStart {
    /// ID of the message type to stream.
    pub message_id: u16,
}

impl ContinuousStart {
    pub const ID: u16 = 1400;
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn new(message_id: u16) -> Self {
        Self { message_id }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.message_id);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            message_id: read_u16(Self::ID, payload, 0)?,
        })
    }
}

/// Stop continuous reporting of the given message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContinuousStop {
    /// ID of the message type to stop streaming.
    pub message_id: u16,
}

impl ContinuousStop {
    pub const ID: u16 = 1401;
    pub const PAYLOAD_SIZE: usize = 2;

    pub fn new(message_id: u16) -> Self {
        Self { message_id }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        dst.put_u16_le(self.message_id);
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            message_id: read_u16(Self::ID, payload, 0)?,
        })
    }
}

/// All Ping1D messages as one sum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Ping1dMessage {
    SetDeviceId(SetDeviceId),
    SetRange(SetRange),
    SetSpeedOfSound(SetSpeedOfSound),
    SetModeAuto(SetModeAuto),
    SetPingInterval(SetPingInterval),
    SetGainSetting(SetGainSetting),
    SetPingEnable(SetPingEnable),
    GotoBootloader(GotoBootloader),
    FirmwareVersion(FirmwareVersion),
    DeviceId(DeviceId),
    Voltage5(Voltage5),
    SpeedOfSound(SpeedOfSound),
    Range(Range),
    ModeAuto(ModeAuto),
    PingInterval(PingInterval),
    GainSetting(GainSetting),
    TransmitDuration(TransmitDuration),
    GeneralInfo(GeneralInfo),
    DistanceSimple(DistanceSimple),
    Distance(Distance),
    ProcessorTemperature(ProcessorTemperature),
    PcbTemperature(PcbTemperature),
    Profile(Profile),
    ContinuousStart(ContinuousStart),
    ContinuousStop(ContinuousStop),
}

impl Ping1dMessage {
    pub fn message_id(&self) -> u16 {
        match self {
            Ping1dMessage::SetDeviceId(_) => SetDeviceId::ID,
            Ping1dMessage::SetRange(_) => SetRange::ID,
            Ping1dMessage::SetSpeedOfSound(_) => SetSpeedOfSound::ID,
            Ping1dMessage::SetModeAuto(_) => SetModeAuto::ID,
            Ping1dMessage::SetPingInterval(_) => SetPingInterval::ID,
            Ping1dMessage::SetGainSetting(_) => SetGainSetting::ID,
            Ping1dMessage::SetPingEnable(_) => SetPingEnable::ID,
            Ping1dMessage::GotoBootloader(_) => GotoBootloader::ID,
            Ping1dMessage::FirmwareVersion(_) => FirmwareVersion::ID,
            Ping1dMessage::DeviceId(_) => DeviceId::ID,
            Ping1dMessage::Voltage5(_) => Voltage5::ID,
            Ping1dMessage::SpeedOfSound(_) => SpeedOfSound::ID,
            Ping1dMessage::Range(_) => Range::ID,
            Ping1dMessage::ModeAuto(_) => ModeAuto::ID,
            Ping1dMessage::PingInterval(_) => PingInterval::ID,
            Ping1dMessage::GainSetting(_) => GainSetting::ID,
            Ping1dMessage::TransmitDuration(_) => TransmitDuration::ID,
            Ping1dMessage::GeneralInfo(_) => GeneralInfo::ID,
            Ping1dMessage::DistanceSimple(_) => DistanceSimple::ID,
            Ping1dMessage::Distance(_) => Distance::ID,
            Ping1dMessage::ProcessorTemperature(_) => ProcessorTemperature::ID,
            Ping1dMessage::PcbTemperature(_) => PcbTemperature::ID,
            Ping1dMessage::Profile(_) => Profile::ID,
            Ping1dMessage::ContinuousStart(_) => ContinuousStart::ID,
            Ping1dMessage::ContinuousStop(_) => ContinuousStop::ID,
        }
    }

    pub fn encode_payload(&self, dst: &mut BytesMut) {
        match self {
            Ping1dMessage::SetDeviceId(m) => m.encode_payload(dst),
            Ping1dMessage::SetRange(m) => m.encode_payload(dst),
            Ping1dMessage::SetSpeedOfSound(m) => m.encode_payload(dst),
            Ping1dMessage::SetModeAuto(m) => m.encode_payload(dst),
            Ping1dMessage::SetPingInterval(m) => m.encode_payload(dst),
            Ping1dMessage::SetGainSetting(m) => m.encode_payload(dst),
            Ping1dMessage::SetPingEnable(m) => m.encode_payload(dst),
            Ping1dMessage::GotoBootloader(m) => m.encode_payload(dst),
            Ping1dMessage::FirmwareVersion(m) => m.encode_payload(dst),
            Ping1dMessage::DeviceId(m) => m.encode_payload(dst),
            Ping1dMessage::Voltage5(m) => m.encode_payload(dst),
            Ping1dMessage::SpeedOfSound(m) => m.encode_payload(dst),
            Ping1dMessage::Range(m) => m.encode_payload(dst),
            Ping1dMessage::ModeAuto(m) => m.encode_payload(dst),
            Ping1dMessage::PingInterval(m) => m.encode_payload(dst),
            Ping1dMessage::GainSetting(m) => m.encode_payload(dst),
            Ping1dMessage::TransmitDuration(m) => m.encode_payload(dst),
            Ping1dMessage::GeneralInfo(m) => m.encode_payload(dst),
            Ping1dMessage::DistanceSimple(m) => m.encode_payload(dst),
            Ping1dMessage::Distance(m) => m.encode_payload(dst),
            Ping1dMessage::ProcessorTemperature(m) => m.encode_payload(dst),
            Ping1dMessage::PcbTemperature(m) => m.encode_payload(dst),
            Ping1dMessage::Profile(m) => m.encode_payload(dst),
            Ping1dMessage::ContinuousStart(m) => m.encode_payload(dst),
            Ping1dMessage::ContinuousStop(m) => m.encode_payload(dst),
        }
    }

    /// Decode a frame payload whose ID falls in the Ping1D range.
    ///
    /// Returns `Ok(None)` for IDs this family does not define.
    pub(crate) fn decode(message_id: u16, payload: &[u8]) -> Result<Option<Self>> {
        let msg = match message_id {
            SetDeviceId::ID => Ping1dMessage::SetDeviceId(SetDeviceId::decode(payload)?),
            SetRange::ID => Ping1dMessage::SetRange(SetRange::decode(payload)?),
            SetSpeedOfSound::ID => {
                Ping1dMessage::SetSpeedOfSound(SetSpeedOfSound::decode(payload)?)
            }
            SetModeAuto::ID => Ping1dMessage::SetModeAuto(SetModeAuto::decode(payload)?),
            SetPingInterval::ID => {
                Ping1dMessage::SetPingInterval(SetPingInterval::decode(payload)?)
            }
            SetGainSetting::ID => Ping1dMessage::SetGainSetting(SetGainSetting::decode(payload)?),
            SetPingEnable::ID => Ping1dMessage::SetPingEnable(SetPingEnable::decode(payload)?),
            GotoBootloader::ID => Ping1dMessage::GotoBootloader(GotoBootloader::decode(payload)?),
            FirmwareVersion::ID => {
                Ping1dMessage::FirmwareVersion(FirmwareVersion::decode(payload)?)
            }
            DeviceId::ID => Ping1dMessage::DeviceId(DeviceId::decode(payload)?),
            Voltage5::ID => Ping1dMessage::Voltage5(Voltage5::decode(payload)?),
            SpeedOfSound::ID => Ping1dMessage::SpeedOfSound(SpeedOfSound::decode(payload)?),
            Range::ID => Ping1dMessage::Range(Range::decode(payload)?),
            ModeAuto::ID => Ping1dMessage::ModeAuto(ModeAuto::decode(payload)?),
            PingInterval::ID => Ping1dMessage::PingInterval(PingInterval::decode(payload)?),
            GainSetting::ID => Ping1dMessage::GainSetting(GainSetting::decode(payload)?),
            TransmitDuration::ID => {
                Ping1dMessage::TransmitDuration(TransmitDuration::decode(payload)?)
            }
            GeneralInfo::ID => Ping1dMessage::GeneralInfo(GeneralInfo::decode(payload)?),
            DistanceSimple::ID => Ping1dMessage::DistanceSimple(DistanceSimple::decode(payload)?),
            Distance::ID => Ping1dMessage::Distance(Distance::decode(payload)?),
            ProcessorTemperature::ID => {
                Ping1dMessage::ProcessorTemperature(ProcessorTemperature::decode(payload)?)
            }
            PcbTemperature::ID => Ping1dMessage::PcbTemperature(PcbTemperature::decode(payload)?),
            Profile::ID => Ping1dMessage::Profile(Profile::decode(payload)?),
            ContinuousStart::ID => {
                Ping1dMessage::ContinuousStart(ContinuousStart::decode(payload)?)
            }
            ContinuousStop::ID => Ping1dMessage::ContinuousStop(ContinuousStop::decode(payload)?),
            _ => return Ok(None),
        };
        Ok(Some(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_range_roundtrip() {
        let msg = SetRange::new(500, 30_000);
        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        assert_eq!(payload.len(), SetRange::PAYLOAD_SIZE);
        assert_eq!(SetRange::decode(&payload).unwrap(), msg);
    }

    #[test]
    fn set_mode_auto_accepts_only_binary_states() {
        assert!(SetModeAuto::new(0).is_ok());
        assert!(SetModeAuto::new(1).is_ok());

        let err = SetModeAuto::new(2).unwrap_err();
        assert!(matches!(
            err,
            MessageError::ValueOutOfRange {
                field: "mode_auto",
                value: 2,
                ..
            }
        ));
    }

    #[test]
    fn set_gain_setting_boundary() {
        let max = SetGainSetting::new(SetGainSetting::MAX_GAIN).unwrap();
        assert_eq!(max.gain_setting(), 6);

        let err = SetGainSetting::new(SetGainSetting::MAX_GAIN + 1).unwrap_err();
        assert!(matches!(
            err,
            MessageError::ValueOutOfRange {
                field: "gain_setting",
                value: 7,
                max: 6,
                ..
            }
        ));
    }

    #[test]
    fn set_ping_enable_clamps_instead_of_failing() {
        assert_eq!(SetPingEnable::new(0).ping_enable, 0);
        assert_eq!(SetPingEnable::new(1).ping_enable, 1);
        assert_eq!(SetPingEnable::new(200).ping_enable, 1);
    }

    #[test]
    fn general_info_roundtrip() {
        let msg = GeneralInfo {
            firmware_version_major: 3,
            firmware_version_minor: 28,
            voltage_5: 5010,
            ping_interval: 100,
            gain_setting: 4,
            mode_auto: 1,
        };
        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        assert_eq!(payload.len(), GeneralInfo::PAYLOAD_SIZE);
        assert_eq!(GeneralInfo::decode(&payload).unwrap(), msg);
    }

    #[test]
    fn distance_short_payload_rejected() {
        let err = Distance::decode(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, MessageError::ShortPayload { .. }));
    }

    #[test]
    fn profile_roundtrip_with_samples() {
        let info = PingInfo {
            distance: 3500,
            confidence: 97,
            transmit_duration: 120,
            ping_number: 42,
            min_range: 0,
            range_length: 30_000,
            gain_setting: 2,
        };
        let samples: Vec<u8> = (0..200).map(|i| (i % 251) as u8).collect();
        let msg = Profile::new(info, samples.clone());

        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        assert_eq!(payload.len(), Profile::METADATA_SIZE + samples.len());

        let decoded = Profile::decode(&payload).unwrap();
        assert_eq!(decoded.info, info);
        assert_eq!(decoded.data.as_ref(), samples.as_slice());
    }

    #[test]
    fn profile_declared_length_overrun_rejected() {
        let msg = Profile::new(PingInfo::default(), vec![1, 2, 3, 4]);
        let mut payload = BytesMut::new();
        msg.encode_payload(&mut payload);
        payload.truncate(payload.len() - 2);

        let err = Profile::decode(&payload).unwrap_err();
        assert!(matches!(
            err,
            MessageError::TruncatedData {
                message_id: 1300,
                declared: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn family_decode_rejects_foreign_ids() {
        assert!(Ping1dMessage::decode(1, &[0, 0]).unwrap().is_none());
        assert!(Ping1dMessage::decode(2300, &[]).unwrap().is_none());
        assert!(Ping1dMessage::decode(1999, &[]).unwrap().is_none());
    }

    #[test]
    fn family_decode_maps_id_to_variant() {
        let mut payload = BytesMut::new();
        Voltage5 { voltage: 4998 }.encode_payload(&mut payload);

        let msg = Ping1dMessage::decode(Voltage5::ID, &payload)
            .unwrap()
            .unwrap();
        assert_eq!(msg.message_id(), 1202);
        assert!(matches!(msg, Ping1dMessage::Voltage5(v) if v.voltage == 4998));
    }
}
