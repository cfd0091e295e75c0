use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;

/// Direction(s) a port is opened for. Fixed for one open lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PortMode {
    Receive,
    Transmit,
    #[default]
    ReceiveAndTransmit,
}

impl PortMode {
    /// Whether the port reads, and so gets a readiness worker and read views.
    pub fn receives(self) -> bool {
        matches!(self, PortMode::Receive | PortMode::ReceiveAndTransmit)
    }

    /// Whether the port is opened for writing.
    pub fn transmits(self) -> bool {
        matches!(self, PortMode::Transmit | PortMode::ReceiveAndTransmit)
    }

    /// `open(2)` options for this mode.
    ///
    /// The device never becomes the controlling terminal. On BSD/Darwin an
    /// exclusive lock is requested so a second opener is refused by the OS.
    pub(crate) fn open_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options
            .read(self.receives())
            .write(self.transmits())
            .custom_flags(libc::O_NOCTTY | exclusive_flag());
        options
    }
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
fn exclusive_flag() -> libc::c_int {
    libc::O_EXLOCK
}

#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
)))]
fn exclusive_flag() -> libc::c_int {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions() {
        assert!(PortMode::Receive.receives());
        assert!(!PortMode::Receive.transmits());
        assert!(!PortMode::Transmit.receives());
        assert!(PortMode::Transmit.transmits());
        assert!(PortMode::ReceiveAndTransmit.receives());
        assert!(PortMode::ReceiveAndTransmit.transmits());
    }

    #[test]
    fn default_is_bidirectional() {
        assert_eq!(PortMode::default(), PortMode::ReceiveAndTransmit);
    }
}
