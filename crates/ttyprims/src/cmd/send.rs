use std::fs;

use tracing::warn;
use ttyprims_port::{PortMode, SerialPort};

use crate::cmd::SendArgs;
use crate::exit::{io_error, port_error, CliResult, SUCCESS};
use crate::output::{print_write_report, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let settings = args.serial.settings()?;
    let payload = resolve_payload(&args)?;

    let port = SerialPort::new(args.path.as_str());
    port.open(PortMode::Transmit)
        .map_err(|err| port_error("open failed", err))?;
    port.configure(&settings)
        .map_err(|err| port_error("configure failed", err))?;

    let written = port
        .write_bytes(&payload)
        .map_err(|err| port_error("write failed", err))?;
    if written < payload.len() {
        warn!(
            written,
            requested = payload.len(),
            "device accepted a partial write"
        );
    }
    port.close();

    print_write_report(port.path(), payload.len(), written, format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    let mut payload = if let Some(data) = &args.data {
        data.as_bytes().to_vec()
    } else if let Some(path) = &args.file {
        fs::read(path).map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?
    } else {
        Vec::new()
    };
    if args.newline {
        payload.push(b'\n');
    }
    Ok(payload)
}
