//! Serial port lifecycle management.
//!
//! [`SerialPort`] owns the device handle for one path. It opens and closes
//! the device, applies [`Settings`](ttyprims_termios::Settings), writes raw
//! bytes, and exposes the chunk/byte/line [`ReadView`]s fed by a readiness
//! worker that runs for as long as the port is open in a receiving mode.
//!
//! All device access goes through one lock: open, configure, close, every
//! write, and each read performed by the readiness worker.

pub mod config;
mod device;
pub mod error;
pub mod mode;
pub mod port;
mod readiness;

pub use config::PortConfig;
pub use error::{PortError, Result};
pub use mode::PortMode;
pub use port::SerialPort;

pub use ttyprims_stream::{ReadStats, ReadView, ViewKind, NON_UTF8_LINE};
pub use ttyprims_termios::{BaudRate, DataBits, Parity, Settings, StopBits, TermiosError};
