//! # Detail Broadcast Cache
//!
//! Single-slot broadcast of the most recently loaded task manager detail
//! record. Any number of views of the currently selected worker can share
//! one record without re-fetching it.

use std::sync::Arc;

use tokio::sync::watch;

use crate::types::TaskManagerDetail;

/// Single-slot, replay-last-value broadcast for `TaskManagerDetail`
///
/// Subscribers may attach at any time: each immediately observes the most
/// recently published record (or nothing, before the first publish) and is
/// notified of every later publish. Publishing overwrites the slot, never
/// merges; once a newer record is published, the older one can no longer be
/// observed.
///
/// Cloning the cache yields another handle to the same slot.
#[derive(Debug, Clone)]
pub struct TaskManagerDetailCache {
    slot: Arc<watch::Sender<Option<TaskManagerDetail>>>,
}

impl TaskManagerDetailCache {
    /// Create an empty cache
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { slot: Arc::new(tx) }
    }

    /// Publish a detail record, overwriting the previous one
    ///
    /// The record is stored even when no subscriber is currently attached, so
    /// a later subscriber still observes it.
    pub fn publish(&self, detail: TaskManagerDetail) {
        self.slot.send_replace(Some(detail));
    }

    /// Attach a new subscriber
    ///
    /// The receiver's current value is the last published record; await
    /// `changed()` on it for subsequent publishes.
    pub fn subscribe(&self) -> watch::Receiver<Option<TaskManagerDetail>> {
        self.slot.subscribe()
    }

    /// The last published record, if any
    pub fn latest(&self) -> Option<TaskManagerDetail> {
        self.slot.borrow().clone()
    }
}

impl Default for TaskManagerDetailCache {
    fn default() -> Self {
        Self::new()
    }
}
