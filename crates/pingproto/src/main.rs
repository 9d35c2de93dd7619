mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "pingproto", version, about = "Ping sonar protocol CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Emit logs as JSON (stderr).
    #[arg(long, global = true)]
    log_json: bool,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_json);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_subcommand() {
        let cli = Cli::try_parse_from([
            "pingproto",
            "request",
            "--udp",
            "192.168.2.2:9092",
            "1212",
        ])
        .expect("request args should parse");

        assert!(matches!(cli.command, Command::Request(_)));
    }

    #[test]
    fn rejects_udp_and_serial_together() {
        let err = Cli::try_parse_from([
            "pingproto",
            "monitor",
            "--udp",
            "192.168.2.2:9092",
            "--serial",
            "/dev/ttyUSB0",
        ])
        .expect_err("conflicting links should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn catalog_needs_no_link() {
        let cli = Cli::try_parse_from(["pingproto", "catalog"]).expect("catalog should parse");
        assert!(matches!(cli.command, Command::Catalog(_)));
    }
}
