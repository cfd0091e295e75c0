use std::io::BufRead;
use std::sync::Arc;
use std::thread;

use tracing::{debug, error};
use ttyprims_port::{PortMode, SerialPort};

use crate::cmd::{close_on_ctrlc, TerminalArgs};
use crate::exit::{io_error, port_error, CliResult, SUCCESS};
use crate::output::{print_chunk, print_line, OutputFormat};

pub fn run(args: TerminalArgs, format: OutputFormat) -> CliResult<i32> {
    let settings = args.serial.settings()?;

    let port = Arc::new(SerialPort::new(args.path.as_str()));
    port.open(PortMode::ReceiveAndTransmit)
        .map_err(|err| port_error("open failed", err))?;
    port.configure(&settings)
        .map_err(|err| port_error("configure failed", err))?;
    close_on_ctrlc(Arc::clone(&port))?;

    // Subscribe before any input is relayed so replies are not missed.
    if args.lines {
        let mut lines = port
            .line_stream()
            .map_err(|err| port_error("subscribe failed", err))?;
        spawn_relay(&port)?;
        while let Some(line) = lines.blocking_recv() {
            print_line(&line, port.path(), format);
        }
    } else {
        let mut chunks = port
            .chunk_stream()
            .map_err(|err| port_error("subscribe failed", err))?;
        spawn_relay(&port)?;
        while let Some(chunk) = chunks.blocking_recv() {
            print_chunk(&chunk, port.path(), format);
        }
    }

    debug!("read views finished");
    Ok(SUCCESS)
}

fn spawn_relay(port: &Arc<SerialPort>) -> CliResult<()> {
    let port = Arc::clone(port);
    thread::Builder::new()
        .name("ttyprims-stdin".into())
        .spawn(move || relay_stdin(&port))
        .map(drop)
        .map_err(|err| io_error("stdin relay failed to start", err))
}

/// Send each stdin line to the port; end of input closes the port.
fn relay_stdin(port: &SerialPort) {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!(error = %err, "stdin read failed");
                break;
            }
        };
        let result = port
            .write_string(&line)
            .and_then(|_| port.write_char('\n'));
        if let Err(err) = result {
            error!(error = %err, "write failed");
            break;
        }
    }
    port.close();
}
