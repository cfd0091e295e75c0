use std::time::Duration;

/// Default size of the buffer used for each readiness-triggered read.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Default pause after a readiness signal that produced no data.
pub const DEFAULT_EMPTY_READ_PAUSE: Duration = Duration::from_millis(50);

/// Configuration for a [`SerialPort`](crate::SerialPort).
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Upper bound for one read; each read allocates a fresh buffer of this size.
    pub read_buffer_size: usize,
    /// How long the readiness worker waits before polling again after a read
    /// returned zero bytes or an error (for example a hung-up device that
    /// stays readable).
    pub empty_read_pause: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            empty_read_pause: DEFAULT_EMPTY_READ_PAUSE,
        }
    }
}
