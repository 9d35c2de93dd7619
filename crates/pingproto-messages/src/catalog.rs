//! Static registry of every message the catalog defines.
//!
//! One row per numeric ID: human name plus payload layout descriptor. Used
//! for logging, diagnostics and CLI output; the layouts themselves live in
//! the typed encode/decode functions of the sibling modules.

use serde::Serialize;

use crate::{common, ping1d, ping360};

/// Payload shape of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadLayout {
    /// Packed record of typed fields at fixed offsets.
    Fixed(usize),
    /// Fixed metadata prefix declaring the length of a trailing blob.
    Variable,
}

/// One catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub message_id: u16,
    pub name: &'static str,
    pub layout: PayloadLayout,
}

const fn fixed(message_id: u16, name: &'static str, size: usize) -> CatalogEntry {
    CatalogEntry {
        message_id,
        name,
        layout: PayloadLayout::Fixed(size),
    }
}

const fn variable(message_id: u16, name: &'static str) -> CatalogEntry {
    CatalogEntry {
        message_id,
        name,
        layout: PayloadLayout::Variable,
    }
}

/// Every known message, ordered by ID.
pub const CATALOG: &[CatalogEntry] = &[
    fixed(common::Acknowledged::ID, "acknowledged", common::Acknowledged::PAYLOAD_SIZE),
    variable(common::NotAcknowledged::ID, "not_acknowledged"),
    variable(common::AsciiMessage::ID, "ascii_message"),
    fixed(common::DeviceInformation::ID, "device_information", common::DeviceInformation::PAYLOAD_SIZE),
    fixed(common::ProtocolVersion::ID, "protocol_version", common::ProtocolVersion::PAYLOAD_SIZE),
    fixed(common::GeneralRequest::ID, "general_request", common::GeneralRequest::PAYLOAD_SIZE),
    fixed(common::SetDeviceId::ID, "set_device_id", common::SetDeviceId::PAYLOAD_SIZE),
    fixed(ping1d::SetDeviceId::ID, "ping1d.set_device_id", ping1d::SetDeviceId::PAYLOAD_SIZE),
    fixed(ping1d::SetRange::ID, "ping1d.set_range", ping1d::SetRange::PAYLOAD_SIZE),
    fixed(ping1d::SetSpeedOfSound::ID, "ping1d.set_speed_of_sound", ping1d::SetSpeedOfSound::PAYLOAD_SIZE),
    fixed(ping1d::SetModeAuto::ID, "ping1d.set_mode_auto", ping1d::SetModeAuto::PAYLOAD_SIZE),
    fixed(ping1d::SetPingInterval::ID, "ping1d.set_ping_interval", ping1d::SetPingInterval::PAYLOAD_SIZE),
    fixed(ping1d::SetGainSetting::ID, "ping1d.set_gain_setting", ping1d::SetGainSetting::PAYLOAD_SIZE),
    fixed(ping1d::SetPingEnable::ID, "ping1d.set_ping_enable", ping1d::SetPingEnable::PAYLOAD_SIZE),
    fixed(ping1d::GotoBootloader::ID, "ping1d.goto_bootloader", ping1d::GotoBootloader::PAYLOAD_SIZE),
    fixed(ping1d::FirmwareVersion::ID, "ping1d.firmware_version", ping1d::FirmwareVersion::PAYLOAD_SIZE),
    fixed(ping1d::DeviceId::ID, "ping1d.device_id", ping1d::DeviceId::PAYLOAD_SIZE),
    fixed(ping1d::Voltage5::ID, "ping1d.voltage_5", ping1d::Voltage5::PAYLOAD_SIZE),
    fixed(ping1d::SpeedOfSound::ID, "ping1d.speed_of_sound", ping1d::SpeedOfSound::PAYLOAD_SIZE),
    fixed(ping1d::Range::ID, "ping1d.range", ping1d::Range::PAYLOAD_SIZE),
    fixed(ping1d::ModeAuto::ID, "ping1d.mode_auto", ping1d::ModeAuto::PAYLOAD_SIZE),
    fixed(ping1d::PingInterval::ID, "ping1d.ping_interval", ping1d::PingInterval::PAYLOAD_SIZE),
    fixed(ping1d::GainSetting::ID, "ping1d.gain_setting", ping1d::GainSetting::PAYLOAD_SIZE),
    fixed(ping1d::TransmitDuration::ID, "ping1d.transmit_duration", ping1d::TransmitDuration::PAYLOAD_SIZE),
    fixed(ping1d::GeneralInfo::ID, "ping1d.general_info", ping1d::GeneralInfo::PAYLOAD_SIZE),
    fixed(ping1d::DistanceSimple::ID, "ping1d.distance_simple", ping1d::DistanceSimple::PAYLOAD_SIZE),
    fixed(ping1d::Distance::ID, "ping1d.distance", ping1d::Distance::PAYLOAD_SIZE),
    fixed(ping1d::ProcessorTemperature::ID, "ping1d.processor_temperature", ping1d::ProcessorTemperature::PAYLOAD_SIZE),
    fixed(ping1d::PcbTemperature::ID, "ping1d.pcb_temperature", ping1d::PcbTemperature::PAYLOAD_SIZE),
    variable(ping1d::Profile::ID, "ping1d.profile"),
    fixed(ping1d::ContinuousStart::ID, "ping1d.continuous_start", ping1d::ContinuousStart::PAYLOAD_SIZE),
    fixed(ping1d::ContinuousStop::ID, "ping1d.continuous_stop", ping1d::ContinuousStop::PAYLOAD_SIZE),
    fixed(ping360::SetDeviceId::ID, "ping360.set_device_id", ping360::SetDeviceId::PAYLOAD_SIZE),
    variable(ping360::DeviceData::ID, "ping360.device_data"),
    fixed(ping360::Reset::ID, "ping360.reset", ping360::Reset::PAYLOAD_SIZE),
    fixed(ping360::Transducer::ID, "ping360.transducer", ping360::Transducer::PAYLOAD_SIZE),
    fixed(ping360::MotorOff::ID, "ping360.motor_off", ping360::MotorOff::PAYLOAD_SIZE),
];

/// Look up a catalog entry by message ID.
pub fn lookup(message_id: u16) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.message_id == message_id)
}

/// Human name for a message ID, `"unknown"` if unregistered.
pub fn message_name(message_id: u16) -> &'static str {
    lookup(message_id).map_or("unknown", |entry| entry.name)
}
