use std::fs::File;
use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::{Bytes, BytesMut};
use tracing::debug;
use ttyprims_stream::ReadPipeline;

use crate::error::{PortError, Result};
use crate::mode::PortMode;
use crate::readiness::Readiness;

/// Shared handle to the guarded device state.
///
/// Cloned into the readiness worker. Every access to the file descriptor
/// happens while the lock is held.
#[derive(Clone, Default)]
pub(crate) struct Device {
    state: Arc<Mutex<DeviceState>>,
}

impl Device {
    /// Lock the device. A panicked holder leaves the state consistent
    /// (every mutation is a single field swap), so poisoning is ignored.
    pub(crate) fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Everything tied to one open lifetime of the port.
#[derive(Default)]
pub(crate) struct DeviceState {
    file: Option<File>,
    mode: Option<PortMode>,
    readiness: Option<Readiness>,
    pipeline: Option<ReadPipeline>,
}

/// Work left over after the handle is released, done outside the lock.
pub(crate) struct Teardown {
    readiness: Option<Readiness>,
    pipeline: Option<ReadPipeline>,
}

impl DeviceState {
    pub(crate) fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub(crate) fn mode(&self) -> Option<PortMode> {
        self.mode
    }

    pub(crate) fn file(&self) -> Result<&File> {
        self.file.as_ref().ok_or(PortError::MustBeOpen)
    }

    /// The read pipeline of a port open in a receiving mode.
    pub(crate) fn pipeline_mut(&mut self) -> Result<&mut ReadPipeline> {
        self.pipeline.as_mut().ok_or(PortError::MustBeOpen)
    }

    pub(crate) fn pipeline(&self) -> Result<&ReadPipeline> {
        self.pipeline.as_ref().ok_or(PortError::MustBeOpen)
    }

    pub(crate) fn install(
        &mut self,
        file: File,
        mode: PortMode,
        receiving: Option<(Readiness, ReadPipeline)>,
    ) {
        let (readiness, pipeline) = receiving.unzip();
        self.file = Some(file);
        self.mode = Some(mode);
        self.readiness = readiness;
        self.pipeline = pipeline;
    }

    /// Perform one read of at most `capacity` bytes into a fresh buffer.
    pub(crate) fn read_chunk(&self, capacity: usize) -> std::io::Result<Bytes> {
        let mut file = self.file.as_ref().ok_or(std::io::ErrorKind::NotConnected)?;
        let mut buf = BytesMut::zeroed(capacity);
        let n = file.read(&mut buf)?;
        buf.truncate(n);
        Ok(buf.freeze())
    }

    /// Cancel the readiness worker and release the handle.
    ///
    /// The cancellation is raised before the descriptor is closed so the
    /// worker can never read from a descriptor number the OS has reused.
    /// Returns `None` when the port is not open.
    pub(crate) fn release(&mut self) -> Option<Teardown> {
        if let Some(readiness) = &self.readiness {
            readiness.cancel();
        }
        let file = self.file.take()?;
        drop(file);
        self.mode = None;
        debug!("device handle released");
        Some(Teardown {
            readiness: self.readiness.take(),
            pipeline: self.pipeline.take(),
        })
    }
}

impl Teardown {
    /// Wait for the readiness worker, then for the view workers it fed.
    ///
    /// Must be called without the device lock held.
    pub(crate) fn finish(self) {
        if let Some(readiness) = self.readiness {
            readiness.join();
        }
        if let Some(pipeline) = self.pipeline {
            for worker in pipeline.shutdown() {
                if worker.join().is_err() {
                    debug!("view worker panicked during shutdown");
                }
            }
        }
    }
}
