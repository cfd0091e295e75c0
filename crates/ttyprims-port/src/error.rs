/// Errors that can occur in serial port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The port was created with an empty path.
    #[error("serial port path is empty")]
    InvalidPath,

    /// This port instance already holds an open handle.
    #[error("serial port is already open")]
    AlreadyOpen,

    /// The OS refused to open the device.
    #[error("failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        source: std::io::Error,
    },

    /// The operation needs an open port (in a receiving mode, for read views).
    #[error("serial port must be open")]
    MustBeOpen,

    /// The text is not valid Unicode and cannot be sent as UTF-8.
    #[error("text cannot be encoded as UTF-8")]
    Encoding,

    /// Applying line settings failed.
    #[error("configuration failed: {0}")]
    Configuration(#[from] ttyprims_termios::TermiosError),

    /// The write call failed.
    #[error("write failed: {0}")]
    Write(std::io::Error),

    /// The readiness worker could not be started.
    #[error("failed to start readiness source: {0}")]
    Readiness(std::io::Error),

    /// A derived read view could not be materialised.
    #[error("read view error: {0}")]
    View(#[from] ttyprims_stream::StreamError),
}

pub type Result<T> = std::result::Result<T, PortError>;
