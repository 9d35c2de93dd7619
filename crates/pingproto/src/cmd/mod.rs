use std::path::PathBuf;

use clap::{Args, Subcommand};
use pingproto_client::{HandshakeConfig, PingClient};
use pingproto_transport::DeviceStream;

use crate::exit::{client_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod catalog;
pub mod monitor;
pub mod request;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every message in the catalog.
    Catalog(CatalogArgs),
    /// Request a single message from a device and print the reply.
    Request(RequestArgs),
    /// Stream decoded messages from a device until Ctrl-C.
    Monitor(MonitorArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Catalog(args) => catalog::run(args, format),
        Command::Request(args) => request::run(args, format),
        Command::Monitor(args) => monitor::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// How to reach the device; exactly one link must be given.
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// UDP address of the device bridge (e.g. 192.168.2.2:9092).
    #[arg(long, value_name = "ADDR", conflicts_with = "serial")]
    pub udp: Option<String>,

    /// Serial device path (e.g. /dev/ttyUSB0).
    #[arg(long, value_name = "PATH")]
    pub serial: Option<PathBuf>,

    /// Serial baud rate.
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,

    /// Give up the handshake after N attempts instead of retrying forever.
    #[arg(long, value_name = "N")]
    pub handshake_attempts: Option<u32>,
}

impl LinkArgs {
    pub fn connect(&self) -> CliResult<PingClient<DeviceStream>> {
        let config = HandshakeConfig {
            max_attempts: self.handshake_attempts,
        };

        match (&self.udp, &self.serial) {
            (Some(addr), None) => PingClient::connect_udp(addr.as_str(), &config)
                .map_err(|err| client_error("connect", err)),
            (None, Some(path)) => PingClient::open_serial(path, self.baud, &config)
                .map_err(|err| client_error("open", err)),
            _ => Err(CliError::new(
                USAGE,
                "exactly one of --udp or --serial is required",
            )),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct CatalogArgs {}

#[derive(Args, Debug)]
pub struct RequestArgs {
    #[command(flatten)]
    pub link: LinkArgs,

    /// Message ID to request (e.g. 1212 for ping1d.distance).
    pub message_id: u16,

    /// Maximum number of unrelated frames to skip while waiting.
    #[arg(long, default_value_t = 32)]
    pub max_skips: u32,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    #[command(flatten)]
    pub link: LinkArgs,

    /// Exit after receiving N messages.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
