use crate::backend::Backend;
use crate::baud::BaudRate;

#[cfg(any(target_os = "macos", target_os = "ios"))]
use std::os::fd::{AsRawFd, BorrowedFd};

#[cfg(any(target_os = "macos", target_os = "ios"))]
use crate::error::{Result, TermiosError};
#[cfg(any(target_os = "macos", target_os = "ios"))]
use crate::settings::Settings;

/// `_IOW('T', 2, speed_t)` from `<IOKit/serial/ioss.h>`.
#[cfg(any(target_os = "macos", target_os = "ios"))]
const IOSSIOSPEED: libc::c_ulong = 0x8000_0000
    | (((std::mem::size_of::<libc::speed_t>() as libc::c_ulong) & 0x1fff) << 16)
    | ((b'T' as libc::c_ulong) << 8)
    | 2;

/// Highest rate Darwin accepts through `cfsetspeed` + `tcsetattr`.
#[cfg(any(target_os = "macos", target_os = "ios"))]
const MAX_TERMIOS_RATE: u32 = 230_400;

/// BSD/Darwin control structure layout.
///
/// Speed codes are the numeric rates themselves.
#[derive(Debug, Clone, Copy)]
pub struct Bsd;

impl Backend for Bsd {
    const NAME: &'static str = "bsd";

    fn speed_code(rate: BaudRate) -> libc::speed_t {
        libc::speed_t::from(rate.value())
    }

    #[cfg(any(target_os = "macos", target_os = "ios"))]
    fn termios_speed(rate: BaudRate) -> libc::speed_t {
        if rate.value() > MAX_TERMIOS_RATE {
            libc::B9600
        } else {
            Self::speed_code(rate)
        }
    }

    fn set_hardware_flow_control(termios: &mut libc::termios, enabled: bool) {
        let flags = libc::CRTS_IFLOW | libc::CCTS_OFLOW;
        if enabled {
            termios.c_cflag |= flags;
        } else {
            termios.c_cflag &= !flags;
        }
    }

    /// Darwin has a single line speed for both directions once it is set
    /// through `IOSSIOSPEED`; the transmit rate wins when both are custom.
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    fn commit_custom_speed(fd: BorrowedFd<'_>, settings: &Settings) -> Result<()> {
        let rate = if settings.transmit_rate.value() > MAX_TERMIOS_RATE {
            settings.transmit_rate
        } else if settings.receive_rate.value() > MAX_TERMIOS_RATE {
            settings.receive_rate
        } else {
            return Ok(());
        };

        let speed = Self::speed_code(rate);
        // SAFETY: `fd` is a live descriptor borrowed for the duration of the call
        // and `speed` is a valid `speed_t` that outlives it.
        let rc = unsafe { libc::ioctl(fd.as_raw_fd(), IOSSIOSPEED, &speed) };
        if rc == -1 {
            return Err(TermiosError::CustomSpeed {
                rate: rate.value(),
                source: std::io::Error::last_os_error(),
            });
        }
        tracing::debug!(rate = rate.value(), "applied custom line speed");
        Ok(())
    }
}
