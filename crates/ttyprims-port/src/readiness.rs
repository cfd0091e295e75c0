//! Readiness-driven reads.
//!
//! One worker thread per open receiving port waits in `poll(2)` on the
//! device descriptor and on a wake socket. Each readiness signal leads to
//! exactly one read under the device lock; positive results are published
//! as a chunk, zero-length and failed reads are counted and dropped.

use std::io::{self, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace, warn};
use ttyprims_stream::ChunkSink;

use crate::config::PortConfig;
use crate::device::Device;

/// Handle to a running readiness worker.
pub(crate) struct Readiness {
    cancelled: Arc<AtomicBool>,
    waker: UnixStream,
    thread: JoinHandle<()>,
}

struct Worker {
    device: Device,
    fd: RawFd,
    wake: UnixStream,
    cancelled: Arc<AtomicBool>,
    sink: ChunkSink,
    read_buffer_size: usize,
    empty_read_pause: Duration,
}

enum Wait {
    Readable { hangup: bool },
    Woken,
    TimedOut,
    Failed,
}

impl Readiness {
    /// Start a worker for the descriptor `fd`, which must belong to the file
    /// about to be installed in `device`.
    pub(crate) fn start(
        device: Device,
        fd: RawFd,
        sink: ChunkSink,
        config: &PortConfig,
    ) -> io::Result<Self> {
        let (waker, wake) = UnixStream::pair()?;
        waker.set_nonblocking(true)?;
        let cancelled = Arc::new(AtomicBool::new(false));
        let worker = Worker {
            device,
            fd,
            wake,
            cancelled: Arc::clone(&cancelled),
            sink,
            read_buffer_size: config.read_buffer_size.max(1),
            empty_read_pause: config.empty_read_pause,
        };
        let thread = thread::Builder::new()
            .name("ttyprims-readiness".into())
            .spawn(move || worker.run())?;
        Ok(Self {
            cancelled,
            waker,
            thread,
        })
    }

    /// Raise the cancellation flag and wake the worker. Call with the device
    /// lock held, before the descriptor is closed.
    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        if let Err(e) = (&self.waker).write(&[1]) {
            // A full socket buffer already holds a pending wake.
            trace!(error = %e, "wake write failed");
        }
    }

    pub(crate) fn join(self) {
        if self.thread.join().is_err() {
            warn!("readiness worker panicked");
        }
    }
}

impl Worker {
    fn run(self) {
        debug!(fd = self.fd, "readiness source started");
        loop {
            let hangup = match self.wait() {
                Wait::Readable { hangup } => hangup,
                Wait::Woken | Wait::TimedOut | Wait::Failed => break,
            };

            let state = self.device.lock();
            if self.cancelled.load(Ordering::Acquire) {
                break;
            }
            let outcome = state.read_chunk(self.read_buffer_size);
            drop(state);

            match outcome {
                Ok(chunk) if !chunk.is_empty() => {
                    self.sink.publish(chunk);
                    continue;
                }
                Ok(_) => {
                    self.sink.record_dropped_read();
                    trace!(hangup, "readiness signal produced no data");
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.sink.record_dropped_read();
                    debug!(error = %e, "read failed; result dropped");
                }
            }

            // A device that stays readable without producing data would
            // otherwise keep this thread spinning.
            let pause = i32::try_from(self.empty_read_pause.as_millis()).unwrap_or(i32::MAX);
            if let Wait::Woken | Wait::Failed = self.wait_for_wake(pause) {
                break;
            }
        }
        debug!(fd = self.fd, "readiness source stopped");
    }

    /// Block until the device or the wake socket signals.
    fn wait(&self) -> Wait {
        loop {
            let mut fds = [
                libc::pollfd {
                    fd: self.fd,
                    events: libc::POLLIN,
                    revents: 0,
                },
                libc::pollfd {
                    fd: self.wake.as_raw_fd(),
                    events: libc::POLLIN,
                    revents: 0,
                },
            ];
            // SAFETY: `fds` is a valid array of two pollfd structs for the
            // duration of the call.
            let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, -1) };
            if rc < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                warn!(error = %err, "poll failed; stopping readiness source");
                return Wait::Failed;
            }
            if fds[1].revents != 0 || self.cancelled.load(Ordering::Acquire) {
                return Wait::Woken;
            }
            let revents = fds[0].revents;
            if revents & libc::POLLNVAL != 0 {
                warn!(fd = self.fd, "device descriptor invalid; stopping readiness source");
                return Wait::Failed;
            }
            return Wait::Readable {
                hangup: revents & libc::POLLHUP != 0,
            };
        }
    }

    /// Sleep for up to `timeout_ms`, returning early only on cancellation.
    fn wait_for_wake(&self, timeout_ms: i32) -> Wait {
        let mut fd = libc::pollfd {
            fd: self.wake.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: `fd` is a valid pollfd for the duration of the call.
        let rc = unsafe { libc::poll(&mut fd, 1, timeout_ms) };
        if rc > 0 || self.cancelled.load(Ordering::Acquire) {
            Wait::Woken
        } else {
            Wait::TimedOut
        }
    }
}
