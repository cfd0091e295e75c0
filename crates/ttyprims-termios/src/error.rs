/// Errors that can occur while building or applying serial line settings.
#[derive(Debug, thiserror::Error)]
pub enum TermiosError {
    /// The rate is not one of the supported baud rates.
    #[error("unsupported baud rate: {0}")]
    InvalidRate(u32),

    /// The text could not be parsed as a baud rate.
    #[error("invalid baud rate {0:?}: expected an integer")]
    UnparsableRate(String),

    /// `tcgetattr` failed.
    #[error("failed to read terminal attributes: {0}")]
    GetAttributes(std::io::Error),

    /// `cfsetispeed`/`cfsetospeed` rejected the speed code.
    #[error("failed to set line speed {rate}: {source}")]
    SetSpeed { rate: u32, source: std::io::Error },

    /// `tcsetattr` failed.
    #[error("failed to commit terminal attributes: {0}")]
    SetAttributes(std::io::Error),

    /// The post-commit custom speed ioctl failed (Darwin only).
    #[error("failed to set custom line speed {rate}: {source}")]
    CustomSpeed { rate: u32, source: std::io::Error },
}

pub type Result<T> = std::result::Result<T, TermiosError>;
