//! Platform seam for the parts of `struct termios` that differ between
//! Linux and BSD/Darwin.
//!
//! Exactly one implementation is compiled in and exported as [`Platform`].

use std::os::fd::BorrowedFd;

use crate::baud::BaudRate;
use crate::error::Result;
use crate::settings::Settings;

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
mod bsd;
#[cfg(any(target_os = "linux", target_os = "android"))]
mod linux;

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
pub use bsd::Bsd;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub use linux::Linux;

/// The back-end selected for the compilation target.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub type Platform = Linux;

/// The back-end selected for the compilation target.
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
pub type Platform = Bsd;

/// Platform-specific termios behaviour.
pub trait Backend {
    /// Back-end name for diagnostics.
    const NAME: &'static str;

    /// OS speed code for a rate.
    fn speed_code(rate: BaudRate) -> libc::speed_t;

    /// Speed code written into the control structure itself.
    ///
    /// Differs from [`Backend::speed_code`] only when the platform cannot
    /// carry the rate in `termios` and sets it after the commit instead.
    fn termios_speed(rate: BaudRate) -> libc::speed_t {
        Self::speed_code(rate)
    }

    /// Set or clear RTS/CTS flow control.
    fn set_hardware_flow_control(termios: &mut libc::termios, enabled: bool);

    /// Apply speeds that `termios` could not carry. Runs after `tcsetattr`.
    fn commit_custom_speed(_fd: BorrowedFd<'_>, _settings: &Settings) -> Result<()> {
        Ok(())
    }
}
