//! Fixed-capacity queue between producers and the dispatcher worker
//!
//! Built on a bounded `crossbeam_channel`. The queue keeps both ends of the
//! channel so that a `DropOldest` push can evict from the receiving side, and
//! so the channel can never become disconnected while the queue is alive.
//!
//! `DropOldest` has one inherent race: the consumer may pop between a failed
//! send and the eviction, so an item can be evicted although a slot had just
//! been freed. The send is retried once before evicting to keep that window
//! small; the outcome still reports exactly what happened to the queue.

use super::overflow_policy::{OverflowPolicy, PushOutcome};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use std::time::Duration;

/// Default number of records buffered between producers and the worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

pub struct BoundedQueue<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    capacity: usize,
    policy: OverflowPolicy,
    /// Serializes `DropOldest` pushes so a freed slot cannot be taken by
    /// another producer between the eviction and the send.
    push_lock: Mutex<()>,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items (at least one).
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        // A zero-capacity crossbeam channel is a rendezvous channel, which
        // would make every non-blocking push fail.
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
            policy,
            push_lock: Mutex::new(()),
        }
    }

    /// Enqueue without blocking on the consumer, applying the overflow policy
    /// when full.
    pub fn push(&self, item: T) -> PushOutcome {
        match self.policy {
            OverflowPolicy::DropNewest => match self.sender.try_send(item) {
                Ok(()) => PushOutcome::Enqueued,
                Err(_) => PushOutcome::Dropped,
            },
            OverflowPolicy::DropOldest => self.push_evicting(item),
        }
    }

    fn push_evicting(&self, item: T) -> PushOutcome {
        let _guard = self.push_lock.lock();
        let mut item = item;
        for _ in 0..2 {
            item = match self.sender.try_send(item) {
                Ok(()) => return PushOutcome::Enqueued,
                Err(TrySendError::Full(item)) => item,
                Err(TrySendError::Disconnected(_)) => return PushOutcome::Dropped,
            };
        }

        // Only the consumer can remove items while the lock is held, so once
        // a slot is free the send below cannot fail.
        let evicted = self.receiver.try_recv().is_ok();
        match self.sender.try_send(item) {
            Ok(()) if evicted => PushOutcome::Evicted,
            Ok(()) => PushOutcome::Enqueued,
            Err(_) => PushOutcome::Dropped,
        }
    }

    /// Wait up to `timeout` for the next item.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        match self.receiver.recv_timeout(timeout) {
            Ok(item) => Some(item),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Take the next item if one is ready.
    pub fn try_pop(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}
