use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

/// Lossless delivery of one element sequence to every current subscriber.
///
/// Each subscriber owns an unbounded queue, so a slow consumer never loses
/// or reorders elements; it only holds them in memory until it catches up.
/// Queues whose receiver was dropped are pruned on the next publish.
pub(crate) struct Fanout<T> {
    shared: Arc<Mutex<Subscribers<T>>>,
}

struct Subscribers<T> {
    senders: Vec<mpsc::UnboundedSender<T>>,
    closed: bool,
}

impl<T> Clone for Fanout<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone> Fanout<T> {
    pub(crate) fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Subscribers {
                senders: Vec::new(),
                closed: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers<T>> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A queue receiving every element published from now on. After
    /// [`close`](Self::close) the returned queue is already finished.
    pub(crate) fn subscribe(&self) -> mpsc::UnboundedReceiver<T> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut subscribers = self.lock();
        if !subscribers.closed {
            subscribers.senders.push(sender);
        }
        receiver
    }

    pub(crate) fn publish(&self, item: T) {
        self.publish_all(std::iter::once(item));
    }

    /// Publish several elements while holding the subscriber list once, so
    /// no subscriber can join in the middle of the batch.
    pub(crate) fn publish_all(&self, items: impl IntoIterator<Item = T>) {
        let mut subscribers = self.lock();
        for item in items {
            subscribers
                .senders
                .retain(|sender| sender.send(item.clone()).is_ok());
            if subscribers.senders.is_empty() {
                break;
            }
        }
    }

    /// Finish every subscriber queue. Elements already queued are still
    /// delivered. Idempotent.
    pub(crate) fn close(&self) {
        let mut subscribers = self.lock();
        subscribers.closed = true;
        subscribers.senders.clear();
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.lock().senders.len()
    }
}
