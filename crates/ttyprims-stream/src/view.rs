use std::fmt;

use tokio::sync::mpsc;

use crate::fanout::Fanout;

/// Granularity of a read view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Chunks,
    Bytes,
    Lines,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewKind::Chunks => "chunk",
            ViewKind::Bytes => "byte",
            ViewKind::Lines => "line",
        };
        f.write_str(name)
    }
}

/// A subscriber handle on one shared read view.
///
/// All handles of the same kind observe the same sequence, starting from the
/// moment they subscribed. Nothing is dropped for a handle that falls behind;
/// its elements wait in its own queue. `recv` returns `None` once the port is
/// closed and everything queued for this handle has been delivered.
pub struct ReadView<T> {
    kind: ViewKind,
    receiver: mpsc::UnboundedReceiver<T>,
    fanout: Fanout<T>,
}

impl<T: Clone> ReadView<T> {
    pub(crate) fn subscribe(kind: ViewKind, fanout: &Fanout<T>) -> Self {
        Self {
            kind,
            receiver: fanout.subscribe(),
            fanout: fanout.clone(),
        }
    }

    /// Which granularity this view delivers.
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Wait for the next element.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Block the current thread until the next element.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context.
    pub fn blocking_recv(&mut self) -> Option<T> {
        self.receiver.blocking_recv()
    }

    /// Another handle on the same view, starting at the current position of
    /// the shared sequence (nothing already published is replayed).
    pub fn resubscribe(&self) -> Self {
        Self::subscribe(self.kind, &self.fanout)
    }
}

#[cfg(feature = "async")]
impl<T: Clone + Send + 'static> ReadView<T> {
    /// Adapt this handle into a [`tokio_stream::Stream`].
    pub fn into_stream(self) -> tokio_stream::wrappers::UnboundedReceiverStream<T> {
        tokio_stream::wrappers::UnboundedReceiverStream::new(self.receiver)
    }
}

impl<T> fmt::Debug for ReadView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadView").field("kind", &self.kind).finish()
    }
}
