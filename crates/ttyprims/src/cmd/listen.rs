use std::sync::Arc;

use ttyprims_port::{PortMode, ReadView, SerialPort};

use crate::cmd::{close_on_ctrlc, ListenArgs};
use crate::exit::{port_error, CliResult, SUCCESS};
use crate::output::{print_chunk, print_line, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let settings = args.serial.settings()?;

    let port = Arc::new(SerialPort::new(args.path.as_str()));
    port.open(PortMode::Receive)
        .map_err(|err| port_error("open failed", err))?;
    port.configure(&settings)
        .map_err(|err| port_error("configure failed", err))?;
    close_on_ctrlc(Arc::clone(&port))?;

    if args.lines {
        let view = port
            .line_stream()
            .map_err(|err| port_error("subscribe failed", err))?;
        drain(view, args.count, |line| print_line(&line, port.path(), format));
    } else {
        let view = port
            .chunk_stream()
            .map_err(|err| port_error("subscribe failed", err))?;
        drain(view, args.count, |chunk| print_chunk(&chunk, port.path(), format));
    }

    port.close();
    Ok(SUCCESS)
}

/// Print items until the view ends or `count` items were printed.
fn drain<T: Clone>(mut view: ReadView<T>, count: Option<usize>, mut print: impl FnMut(T)) {
    let mut printed = 0usize;
    while let Some(item) = view.blocking_recv() {
        print(item);
        printed = printed.saturating_add(1);
        if count.is_some_and(|count| printed >= count) {
            break;
        }
    }
}
