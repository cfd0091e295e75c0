use std::ffi::OsStr;
use std::io::Write;
use std::os::fd::AsRawFd;

use bytes::Bytes;
use tracing::{debug, info, trace};
use ttyprims_stream::{ReadPipeline, ReadStats, ReadView};
use ttyprims_termios::Settings;

use crate::config::PortConfig;
use crate::device::Device;
use crate::error::{PortError, Result};
use crate::mode::PortMode;
use crate::readiness::Readiness;

/// A serial device addressed by path.
///
/// Created closed. [`open`](Self::open) acquires the device, after which it
/// can be configured, written to, and (in a receiving mode) observed through
/// the read views. [`close`](Self::close) releases everything and may be
/// followed by another `open`. Dropping the port closes it.
///
/// All methods take `&self` and may be called from any thread.
///
/// # Example
///
/// ```no_run
/// use ttyprims_port::{BaudRate, PortMode, SerialPort, Settings};
///
/// let port = SerialPort::new("/dev/ttyUSB0");
/// port.open(PortMode::ReceiveAndTransmit)?;
/// port.configure(&Settings::new(BaudRate::Baud115200))?;
/// let mut lines = port.line_stream()?;
/// port.write_string("AT\r\n")?;
/// if let Some(line) = lines.blocking_recv() {
///     println!("{line}");
/// }
/// port.close();
/// # Ok::<(), ttyprims_port::PortError>(())
/// ```
pub struct SerialPort {
    path: String,
    config: PortConfig,
    device: Device,
}

impl SerialPort {
    /// Create a closed port for `path` with default configuration.
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_config(path, PortConfig::default())
    }

    pub fn with_config(path: impl Into<String>, config: PortConfig) -> Self {
        Self {
            path: path.into(),
            config,
            device: Device::default(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn config(&self) -> &PortConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.device.lock().is_open()
    }

    /// Mode of the current open lifetime, `None` when closed.
    pub fn mode(&self) -> Option<PortMode> {
        self.device.lock().mode()
    }

    /// Acquire the device.
    ///
    /// In a receiving mode a fresh read pipeline and readiness worker are
    /// started; views obtained afterwards observe only this open lifetime.
    ///
    /// # Errors
    ///
    /// - [`PortError::InvalidPath`] if the path is empty.
    /// - [`PortError::AlreadyOpen`] if this instance already holds a handle.
    ///   The existing handle is unaffected.
    /// - [`PortError::OpenFailed`] if the OS refuses the device.
    /// - [`PortError::Readiness`] if the readiness worker cannot be started.
    pub fn open(&self, mode: PortMode) -> Result<()> {
        if self.path.is_empty() {
            return Err(PortError::InvalidPath);
        }

        let mut state = self.device.lock();
        if state.is_open() {
            return Err(PortError::AlreadyOpen);
        }

        let file = mode
            .open_options()
            .open(&self.path)
            .map_err(|source| PortError::OpenFailed {
                path: self.path.clone(),
                source,
            })?;

        let receiving = if mode.receives() {
            let (pipeline, sink) = ReadPipeline::new();
            // The worker blocks on the lock we hold until the file is installed.
            let readiness =
                Readiness::start(self.device.clone(), file.as_raw_fd(), sink, &self.config)
                    .map_err(PortError::Readiness)?;
            Some((readiness, pipeline))
        } else {
            None
        };

        state.install(file, mode, receiving);
        info!(path = %self.path, ?mode, "serial port opened");
        Ok(())
    }

    /// Apply line settings to the open device.
    ///
    /// # Errors
    ///
    /// [`PortError::MustBeOpen`] when closed, [`PortError::Configuration`]
    /// when a termios call fails. A failed commit may leave the device with
    /// some settings applied.
    pub fn configure(&self, settings: &Settings) -> Result<()> {
        let state = self.device.lock();
        let file = state.file()?;
        ttyprims_termios::configure(file, settings)?;
        debug!(path = %self.path, rate = %settings.receive_rate, "serial port configured");
        Ok(())
    }

    /// Release the device. A no-op when already closed.
    ///
    /// Returns once the readiness worker and all view workers have stopped;
    /// every read view then reports end of stream after draining what was
    /// already delivered.
    pub fn close(&self) {
        let teardown = self.device.lock().release();
        if let Some(teardown) = teardown {
            teardown.finish();
            info!(path = %self.path, "serial port closed");
        }
    }

    /// Raw chunks as returned by each device read.
    ///
    /// Every view, chunk or derived, starts at the moment it is requested;
    /// data read earlier is not replayed. From then on nothing is dropped,
    /// however far the consumer falls behind.
    ///
    /// # Errors
    ///
    /// [`PortError::MustBeOpen`] unless open in a receiving mode.
    pub fn chunk_stream(&self) -> Result<ReadView<Bytes>> {
        Ok(self.device.lock().pipeline_mut()?.chunks())
    }

    /// Individual bytes, in arrival order.
    pub fn byte_stream(&self) -> Result<ReadView<u8>> {
        Ok(self.device.lock().pipeline_mut()?.bytes()?)
    }

    /// `\n`-terminated lines decoded as UTF-8, without the terminator.
    ///
    /// Lines that are not valid UTF-8 are delivered as
    /// [`NON_UTF8_LINE`](crate::NON_UTF8_LINE).
    pub fn line_stream(&self) -> Result<ReadView<String>> {
        Ok(self.device.lock().pipeline_mut()?.lines()?)
    }

    /// Counters for the current open lifetime.
    pub fn read_stats(&self) -> Result<ReadStats> {
        Ok(self.device.lock().pipeline()?.stats())
    }

    /// Submit `data` in a single write call.
    ///
    /// Returns the number of bytes the OS accepted, which may be fewer than
    /// `data.len()`. No retry is performed.
    ///
    /// # Errors
    ///
    /// [`PortError::MustBeOpen`] when closed, [`PortError::Write`] when the
    /// write call fails (including on a port opened receive-only).
    pub fn write_bytes(&self, data: &[u8]) -> Result<usize> {
        let state = self.device.lock();
        let mut file = state.file()?;
        let written = file.write(data).map_err(PortError::Write)?;
        trace!(requested = data.len(), written, "serial port write");
        Ok(written)
    }

    pub fn write_data(&self, data: impl AsRef<[u8]>) -> Result<usize> {
        self.write_bytes(data.as_ref())
    }

    /// Write `text` as UTF-8.
    ///
    /// # Errors
    ///
    /// [`PortError::Encoding`] if `text` is not valid Unicode. This is
    /// checked before the port state, so it takes precedence over
    /// [`PortError::MustBeOpen`].
    pub fn write_string(&self, text: impl AsRef<OsStr>) -> Result<usize> {
        let text = text.as_ref().to_str().ok_or(PortError::Encoding)?;
        self.write_bytes(text.as_bytes())
    }

    /// Write one character as its UTF-8 encoding.
    pub fn write_char(&self, ch: char) -> Result<usize> {
        let mut buf = [0u8; 4];
        self.write_bytes(ch.encode_utf8(&mut buf).as_bytes())
    }
}

impl Drop for SerialPort {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPort")
            .field("path", &self.path)
            .field("mode", &self.mode())
            .finish()
    }
}
