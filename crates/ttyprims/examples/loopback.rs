//! Send one line and print the first line that comes back.
//!
//! Run with a loopback adapter (TX wired to RX) or any device that echoes:
//!   cargo run --example loopback -- /dev/ttyUSB0 115200

use ttyprims::{BaudRate, PortMode, SerialPort, Settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let rate: BaudRate = args.next().as_deref().unwrap_or("115200").parse()?;

    let port = SerialPort::new(path);
    port.open(PortMode::ReceiveAndTransmit)?;
    port.configure(&Settings::new(rate))?;
    eprintln!("Opened {} at {rate}", port.path());

    // Subscribe before writing so the reply cannot be missed.
    let mut lines = port.line_stream()?;
    let written = port.write_string("hello from ttyprims\n")?;
    eprintln!("Wrote {written} bytes");

    match lines.blocking_recv() {
        Some(line) => println!("{line}"),
        None => eprintln!("Port closed before a line arrived"),
    }

    port.close();
    Ok(())
}
