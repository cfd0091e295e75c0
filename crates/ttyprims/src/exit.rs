use std::fmt;
use std::io;

use ttyprims_port::PortError;

// sysexits-style exit codes.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DEVICE_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => USAGE,
        _ => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn port_error(context: &str, err: PortError) -> CliError {
    match err {
        PortError::OpenFailed { path, source } => {
            io_error(&format!("{context}: cannot open {path}"), source)
        }
        PortError::Write(source) | PortError::Readiness(source) => io_error(context, source),
        PortError::InvalidPath => CliError::new(USAGE, format!("{context}: {err}")),
        PortError::AlreadyOpen => CliError::new(FAILURE, format!("{context}: {err}")),
        PortError::Encoding => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        PortError::Configuration(_) => CliError::new(DEVICE_ERROR, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_maps_to_usage() {
        let err = port_error(
            "open failed",
            PortError::OpenFailed {
                path: "/dev/missing".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        );
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("/dev/missing"));
    }

    #[test]
    fn configuration_failure_maps_to_device_error() {
        let err = port_error(
            "configure failed",
            PortError::Configuration(ttyprims_termios::TermiosError::GetAttributes(
                io::Error::from_raw_os_error(libc::ENOTTY),
            )),
        );
        assert_eq!(err.code, DEVICE_ERROR);
    }

    #[test]
    fn permission_denied_is_preserved() {
        let err = port_error(
            "write failed",
            PortError::Write(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
