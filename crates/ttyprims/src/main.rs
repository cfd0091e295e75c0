mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "ttyprims", version, about = "Serial port terminal and tools")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "text",
        env = "TTYPRIMS_LOG_FORMAT",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "TTYPRIMS_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

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
    use ttyprims_termios::{BaudRate, Parity, StopBits};

    #[test]
    fn parses_send_with_serial_flags() {
        let cli = Cli::try_parse_from([
            "ttyprims",
            "send",
            "/dev/ttyUSB0",
            "--data",
            "hello",
            "--baud",
            "115200",
            "--parity",
            "even",
            "--data-bits",
            "7",
            "--two-stop-bits",
        ])
        .expect("send args should parse");

        let Command::Send(args) = cli.command else {
            panic!("expected send");
        };
        let settings = args.serial.settings().expect("settings should build");
        assert_eq!(settings.receive_rate, BaudRate::Baud115200);
        assert_eq!(settings.parity, Parity::Even);
        assert_eq!(settings.data_bits.bits(), 7);
        assert_eq!(settings.stop_bits, StopBits::Two);
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "ttyprims",
            "send",
            "/dev/ttyUSB0",
            "--data",
            "hello",
            "--file",
            "/tmp/payload.bin",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_unsupported_baud_rate() {
        let err = Cli::try_parse_from(["ttyprims", "listen", "/dev/ttyUSB0", "--baud", "12345"])
            .expect_err("unsupported rate should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn rejects_out_of_range_data_bits() {
        let err = Cli::try_parse_from(["ttyprims", "listen", "/dev/ttyUSB0", "--data-bits", "9"])
            .expect_err("data bits outside 5..=8 should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_listen_with_count() {
        let cli = Cli::try_parse_from([
            "ttyprims",
            "--format",
            "raw",
            "listen",
            "/dev/ttyUSB0",
            "--lines",
            "--count",
            "3",
        ])
        .expect("listen args should parse");
        let Command::Listen(args) = cli.command else {
            panic!("expected listen");
        };
        assert!(args.lines);
        assert_eq!(args.count, Some(3));
        assert_eq!(args.serial.baud, BaudRate::Baud9600);
    }
}
