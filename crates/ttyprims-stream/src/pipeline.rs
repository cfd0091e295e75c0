use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::{Result, StreamError};
use crate::fanout::Fanout;
use crate::line::LineDecoder;
use crate::view::{ReadView, ViewKind};

/// Counters for one pipeline lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Chunks published.
    pub chunks: u64,
    /// Bytes published across all chunks.
    pub bytes: u64,
    /// Readiness signals whose read returned zero bytes or an error.
    pub dropped_reads: u64,
}

#[derive(Debug, Default)]
struct Counters {
    chunks: AtomicU64,
    bytes: AtomicU64,
    dropped_reads: AtomicU64,
}

/// Producer side of the chunk view.
///
/// Handed to the readiness worker. Dropping it finishes the chunk view and,
/// through it, every derived view.
pub struct ChunkSink {
    chunks: Fanout<Bytes>,
    counters: Arc<Counters>,
}

impl ChunkSink {
    /// Publish one chunk read from the device. Empty chunks are ignored.
    pub fn publish(&self, chunk: Bytes) {
        if chunk.is_empty() {
            return;
        }
        self.counters.chunks.fetch_add(1, Ordering::Relaxed);
        self.counters
            .bytes
            .fetch_add(chunk.len() as u64, Ordering::Relaxed);
        trace!(len = chunk.len(), "publishing chunk");
        // No subscribers is not an error; the chunk is simply not observed.
        self.chunks.publish(chunk);
    }

    /// Record a readiness signal whose read produced nothing.
    pub fn record_dropped_read(&self) {
        self.counters.dropped_reads.fetch_add(1, Ordering::Relaxed);
    }
}

impl Drop for ChunkSink {
    fn drop(&mut self) {
        self.chunks.close();
    }
}

impl std::fmt::Debug for ChunkSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkSink")
            .field("subscribers", &self.chunks.subscriber_count())
            .finish()
    }
}

/// The chunk/byte/line views of one open port.
///
/// The chunk view exists from construction. The byte and line views are
/// derived on first request by one worker thread each and reused for every
/// later request. Every view starts at the moment of subscription and is
/// lossless from then on: a subscriber that falls behind keeps its elements
/// queued, in order, until it catches up.
pub struct ReadPipeline {
    chunks: Fanout<Bytes>,
    bytes: Option<Fanout<u8>>,
    lines: Option<Fanout<String>>,
    workers: Vec<JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl ReadPipeline {
    /// Create a pipeline and the sink that feeds it.
    pub fn new() -> (Self, ChunkSink) {
        let chunks = Fanout::new();
        let counters = Arc::new(Counters::default());
        let sink = ChunkSink {
            chunks: chunks.clone(),
            counters: Arc::clone(&counters),
        };
        let pipeline = Self {
            chunks,
            bytes: None,
            lines: None,
            workers: Vec::new(),
            counters,
        };
        (pipeline, sink)
    }

    /// Subscribe to raw chunks.
    pub fn chunks(&mut self) -> ReadView<Bytes> {
        ReadView::subscribe(ViewKind::Chunks, &self.chunks)
    }

    /// Subscribe to individual bytes, materialising the byte view if needed.
    pub fn bytes(&mut self) -> Result<ReadView<u8>> {
        let fanout = self.byte_fanout()?;
        Ok(ReadView::subscribe(ViewKind::Bytes, &fanout))
    }

    /// Subscribe to decoded lines, materialising the line view (and the byte
    /// view it is derived from) if needed.
    pub fn lines(&mut self) -> Result<ReadView<String>> {
        let fanout = self.line_fanout()?;
        Ok(ReadView::subscribe(ViewKind::Lines, &fanout))
    }

    /// Whether a derived view has been materialised.
    pub fn is_materialised(&self, kind: ViewKind) -> bool {
        match kind {
            ViewKind::Chunks => true,
            ViewKind::Bytes => self.bytes.is_some(),
            ViewKind::Lines => self.lines.is_some(),
        }
    }

    /// Snapshot of the pipeline counters.
    pub fn stats(&self) -> ReadStats {
        ReadStats {
            chunks: self.counters.chunks.load(Ordering::Relaxed),
            bytes: self.counters.bytes.load(Ordering::Relaxed),
            dropped_reads: self.counters.dropped_reads.load(Ordering::Relaxed),
        }
    }

    /// Finish the chunk view and hand back the derivation workers, which
    /// exit once they have forwarded everything already queued.
    pub fn shutdown(self) -> Vec<JoinHandle<()>> {
        self.chunks.close();
        self.workers
    }

    fn byte_fanout(&mut self) -> Result<Fanout<u8>> {
        if let Some(fanout) = &self.bytes {
            return Ok(fanout.clone());
        }
        let fanout = Fanout::new();
        let upstream = self.chunks.subscribe();
        let downstream = fanout.clone();
        let worker = spawn_worker(ViewKind::Bytes, move || expand_chunks(upstream, downstream))?;
        self.workers.push(worker);
        self.bytes = Some(fanout.clone());
        debug!(view = %ViewKind::Bytes, "materialised read view");
        Ok(fanout)
    }

    fn line_fanout(&mut self) -> Result<Fanout<String>> {
        if let Some(fanout) = &self.lines {
            return Ok(fanout.clone());
        }
        let fanout = Fanout::new();
        let upstream = self.byte_fanout()?.subscribe();
        let downstream = fanout.clone();
        let worker = spawn_worker(ViewKind::Lines, move || split_lines(upstream, downstream))?;
        self.workers.push(worker);
        self.lines = Some(fanout.clone());
        debug!(view = %ViewKind::Lines, "materialised read view");
        Ok(fanout)
    }
}

fn spawn_worker<F>(kind: ViewKind, work: F) -> Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    std::thread::Builder::new()
        .name(format!("ttyprims-{kind}-view"))
        .spawn(work)
        .map_err(|source| StreamError::Spawn { kind, source })
}

fn expand_chunks(mut upstream: mpsc::UnboundedReceiver<Bytes>, downstream: Fanout<u8>) {
    while let Some(chunk) = upstream.blocking_recv() {
        downstream.publish_all(chunk.iter().copied());
    }
    downstream.close();
    debug!(view = %ViewKind::Bytes, "upstream finished; byte view closed");
}

fn split_lines(mut upstream: mpsc::UnboundedReceiver<u8>, downstream: Fanout<String>) {
    let mut decoder = LineDecoder::new();
    while let Some(byte) = upstream.blocking_recv() {
        if let Some(line) = decoder.push(byte) {
            downstream.publish(line);
        }
    }
    downstream.close();
    if decoder.pending() > 0 {
        debug!(
            pending = decoder.pending(),
            "discarding unterminated line at end of stream"
        );
    }
    debug!(view = %ViewKind::Lines, "upstream finished; line view closed");
}
