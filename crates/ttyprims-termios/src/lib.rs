//! Typed serial line settings and their termios translation.
//!
//! This is the lowest layer of ttyprims. It knows nothing about ports or
//! streams; it only turns a [`Settings`] value into the bits of a
//! `struct termios` and commits them to an open descriptor.
//!
//! The control structure differs between platform families, so the
//! platform-specific parts live behind the [`backend::Backend`] trait:
//! - Linux/Android (`CRTSCTS`, `B*` speed codes)
//! - BSD/Darwin (`CRTS_IFLOW | CCTS_OFLOW`, numeric speeds, `IOSSIOSPEED`)

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
)))]
compile_error!("ttyprims-termios supports Linux and BSD/Darwin targets only");

pub mod backend;
pub mod baud;
pub mod configure;
pub mod error;
pub mod settings;

pub use backend::{Backend, Platform};
pub use baud::BaudRate;
pub use configure::{apply, configure};
pub use error::{Result, TermiosError};
pub use settings::{DataBits, Parity, Settings, StopBits};
