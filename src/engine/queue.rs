// src/engine/queue.rs

use std::collections::BTreeMap;
use std::mem;
use std::path::PathBuf;

use tracing::debug;

use crate::registry::TargetName;

/// Per-target queues of changed paths accepted since the last dispatch.
///
/// Semantics:
/// - `enqueue` appends unconditionally; there is **no dedup**. A file that
///   changed twice in one window is queued twice, preserving event-count
///   semantics for any consumer that cares.
/// - `drain_all` hands the whole map to the dispatcher and resets it in one
///   step, so an event accepted during dispatch lands in the *next* cycle's
///   queue instead of being lost or double-counted. The single-threaded
///   event-loop model is what makes the take atomic from the scheduler's
///   point of view.
#[derive(Debug, Default)]
pub struct PendingQueue {
    pending: BTreeMap<TargetName, Vec<PathBuf>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no target has pending work.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Append a changed path to a target's queue, creating the queue if this
    /// is the target's first event of the cycle.
    pub fn enqueue(&mut self, target: &str, path: PathBuf) {
        let queue = self.pending.entry(target.to_string()).or_default();
        queue.push(path);
        debug!(target = %target, queued = queue.len(), "queued changed path");
    }

    /// Take the full pending map, leaving the queue empty.
    pub fn drain_all(&mut self) -> BTreeMap<TargetName, Vec<PathBuf>> {
        let snapshot = mem::take(&mut self.pending);
        debug!(targets = snapshot.len(), "drained pending queue for dispatch");
        snapshot
    }
}
