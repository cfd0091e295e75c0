//! Managed POSIX serial ports with composable read views.
//!
//! ttyprims wraps a serial character device in a [`SerialPort`] that owns the
//! open/configure/close lifecycle, serialises all device access behind one
//! lock, and turns device readiness into shared chunk, byte and line views.
//!
//! # Crate Structure
//!
//! - [`termios`]: baud rates, line settings and their translation to `termios`
//! - [`stream`]: the read pipeline and its fan-out views
//! - [`port`]: the serial port itself
//!
//! ```no_run
//! use ttyprims::{BaudRate, PortMode, SerialPort, Settings};
//!
//! let port = SerialPort::new("/dev/ttyACM0");
//! port.open(PortMode::ReceiveAndTransmit)?;
//! port.configure(&Settings::new(BaudRate::Baud115200))?;
//! let mut bytes = port.byte_stream()?;
//! port.write_data(b"ping\n")?;
//! while let Some(byte) = bytes.blocking_recv() {
//!     print!("{}", byte as char);
//! }
//! # Ok::<(), ttyprims::PortError>(())
//! ```

/// Re-export termios types.
pub mod termios {
    pub use ttyprims_termios::*;
}

/// Re-export read pipeline types.
pub mod stream {
    pub use ttyprims_stream::*;
}

/// Re-export port types.
pub mod port {
    pub use ttyprims_port::*;
}

pub use ttyprims_port::{PortConfig, PortError, PortMode, SerialPort};
pub use ttyprims_stream::{ReadStats, ReadView};
pub use ttyprims_termios::{BaudRate, DataBits, Parity, Settings, StopBits};
