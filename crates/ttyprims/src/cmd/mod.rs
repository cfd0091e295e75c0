use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand, ValueEnum};
use ttyprims_port::SerialPort;
use ttyprims_termios::{BaudRate, DataBits, Parity, Settings, StopBits};

use crate::exit::{CliError, CliResult, INTERNAL, USAGE};
use crate::output::OutputFormat;

pub mod bauds;
pub mod listen;
pub mod send;
pub mod terminal;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive session: print device input, relay stdin lines to the device.
    Terminal(TerminalArgs),
    /// Write one payload to a device.
    Send(SendArgs),
    /// Print data received from a device.
    Listen(ListenArgs),
    /// List supported baud rates.
    Bauds(BaudsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Terminal(args) => terminal::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Bauds(_) => bauds::run(format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ParityArg {
    None,
    Odd,
    Even,
}

impl From<ParityArg> for Parity {
    fn from(parity: ParityArg) -> Self {
        match parity {
            ParityArg::None => Parity::None,
            ParityArg::Odd => Parity::Odd,
            ParityArg::Even => Parity::Even,
        }
    }
}

/// Line settings shared by every command that opens a device.
#[derive(Args, Debug)]
pub struct SerialArgs {
    /// Line speed in both directions.
    #[arg(long, default_value = "9600", env = "TTYPRIMS_BAUD")]
    pub baud: BaudRate,
    /// Parity checking.
    #[arg(long, value_enum, default_value = "none", env = "TTYPRIMS_PARITY")]
    pub parity: ParityArg,
    /// Bits per character (5-8).
    #[arg(
        long,
        default_value = "8",
        env = "TTYPRIMS_DATA_BITS",
        value_parser = clap::value_parser!(u8).range(5..=8)
    )]
    pub data_bits: u8,
    /// Use two stop bits instead of one.
    #[arg(long, env = "TTYPRIMS_TWO_STOP_BITS")]
    pub two_stop_bits: bool,
    /// Enable RTS/CTS flow control.
    #[arg(long, env = "TTYPRIMS_HARDWARE_FLOW_CONTROL")]
    pub hardware_flow_control: bool,
    /// Enable XON/XOFF flow control.
    #[arg(long, env = "TTYPRIMS_SOFTWARE_FLOW_CONTROL")]
    pub software_flow_control: bool,
    /// Minimum bytes per read (VMIN).
    #[arg(long, default_value = "1", env = "TTYPRIMS_MIN_BYTES")]
    pub min_bytes: u8,
    /// Read timeout in tenths of a second (VTIME); 0 waits indefinitely.
    #[arg(long, default_value = "0", env = "TTYPRIMS_TIMEOUT")]
    pub timeout: u8,
}

impl SerialArgs {
    pub fn settings(&self) -> CliResult<Settings> {
        let data_bits = DataBits::try_from(self.data_bits)
            .map_err(|bits| CliError::new(USAGE, format!("unsupported data bits: {bits}")))?;
        let stop_bits = if self.two_stop_bits {
            StopBits::Two
        } else {
            StopBits::One
        };
        Ok(Settings::new(self.baud)
            .with_parity(self.parity.into())
            .with_data_bits(data_bits)
            .with_stop_bits(stop_bits)
            .with_hardware_flow_control(self.hardware_flow_control)
            .with_software_flow_control(self.software_flow_control)
            .with_minimum_bytes_to_read(self.min_bytes)
            .with_timeout(self.timeout))
    }
}

#[derive(Args, Debug)]
pub struct TerminalArgs {
    /// Serial device path.
    pub path: String,
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Print complete lines instead of raw chunks.
    #[arg(long)]
    pub lines: bool,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device path.
    pub path: String,
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Text payload.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Append a newline to the payload.
    #[arg(long)]
    pub newline: bool,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Serial device path.
    pub path: String,
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Print complete lines instead of raw chunks.
    #[arg(long)]
    pub lines: bool,
    /// Exit after receiving N items.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct BaudsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Close `port` on Ctrl-C, which ends every read view.
pub fn close_on_ctrlc(port: Arc<SerialPort>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        tracing::info!("interrupted; closing port");
        port.close();
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
