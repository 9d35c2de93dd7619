use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use pingproto_messages::catalog::{CatalogEntry, PayloadLayout};
use pingproto_messages::{Message, Ping1dMessage, Ping360Message};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_message(message: &Message, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(message).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "NAME", "SUMMARY"])
                .add_row(vec![
                    message.message_id().to_string(),
                    message.name().to_string(),
                    summary(message),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} ({}): {}",
                message.name(),
                message.message_id(),
                summary(message)
            );
        }
    }
}

pub fn print_catalog(entries: &[CatalogEntry], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "NAME", "PAYLOAD"]);
            for entry in entries {
                table.add_row(vec![
                    entry.message_id.to_string(),
                    entry.name.to_string(),
                    layout_label(entry.layout),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for entry in entries {
                println!(
                    "{:>5}  {:<30} {}",
                    entry.message_id,
                    entry.name,
                    layout_label(entry.layout)
                );
            }
        }
    }
}

fn layout_label(layout: PayloadLayout) -> String {
    match layout {
        PayloadLayout::Fixed(size) => format!("fixed ({size} bytes)"),
        PayloadLayout::Variable => "variable".to_string(),
    }
}

/// One-line field dump per message variant.
pub fn summary(message: &Message) -> String {
    match message {
        Message::Acknowledged(m) => format!("acked_id={}", m.acked_id),
        Message::NotAcknowledged(m) => {
            format!("nacked_id={} message={:?}", m.nacked_id, m.message)
        }
        Message::AsciiMessage(m) => format!("message={:?}", m.message),
        Message::DeviceInformation(m) => format!(
            "type={} revision={} firmware={}",
            m.device_type, m.device_revision, m.firmware_version
        ),
        Message::ProtocolVersion(m) => format!("version={}", m.version),
        Message::GeneralRequest(m) => format!("requested_id={}", m.requested_id),
        Message::SetDeviceId(m) => format!("device_id={}", m.device_id),
        Message::Ping1d(Ping1dMessage::Distance(m)) => format!(
            "distance={}mm confidence={}% ping={}",
            m.info.distance, m.info.confidence, m.info.ping_number
        ),
        Message::Ping1d(Ping1dMessage::DistanceSimple(m)) => {
            format!("distance={}mm confidence={}%", m.distance, m.confidence)
        }
        Message::Ping1d(Ping1dMessage::Profile(m)) => format!(
            "distance={}mm confidence={}% samples={}",
            m.info.distance,
            m.info.confidence,
            m.data.len()
        ),
        Message::Ping1d(Ping1dMessage::GeneralInfo(m)) => format!(
            "fw={}.{} voltage={}mV interval={}ms gain={} auto={}",
            m.firmware_version_major,
            m.firmware_version_minor,
            m.voltage_5,
            m.ping_interval,
            m.gain_setting,
            m.mode_auto
        ),
        Message::Ping1d(Ping1dMessage::Voltage5(m)) => format!("voltage={}mV", m.voltage),
        Message::Ping1d(m) => format!("{m:?}"),
        Message::Ping360(Ping360Message::DeviceData(m)) => format!(
            "angle={} samples={} period={}",
            m.parameters.angle,
            m.data.len(),
            m.parameters.sample_period
        ),
        Message::Ping360(m) => format!("{m:?}"),
        Message::Unknown {
            message_id,
            payload,
        } => format!("id={message_id} payload={} bytes", payload.len()),
    }
}
