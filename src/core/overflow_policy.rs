//! Overflow policies for the dispatcher queue
//!
//! Producers never wait for queue space. When the queue is full, the policy
//! decides which record is lost.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy for handling a push into a full queue
///
/// # Example
///
/// ```
/// use log_dispatch::OverflowPolicy;
///
/// // Default behavior: the incoming record is discarded
/// assert_eq!(OverflowPolicy::default(), OverflowPolicy::DropNewest);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Discard the record being pushed; everything already queued is kept.
    #[default]
    DropNewest,

    /// Evict the oldest queued record to make room for the new one.
    DropOldest,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::DropOldest => write!(f, "DropOldest"),
        }
    }
}

/// What happened to a single push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Queued without losing anything.
    Enqueued,
    /// Queue was full; the pushed item was discarded.
    Dropped,
    /// Queue was full; the oldest item was discarded and the pushed item queued.
    Evicted,
}

impl PushOutcome {
    /// `true` if the pushed item is now in the queue.
    pub fn is_queued(&self) -> bool {
        !matches!(self, PushOutcome::Dropped)
    }
}
