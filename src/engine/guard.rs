// src/engine/guard.rs

use std::time::{Duration, Instant};

/// Decide whether an incoming change event should be accepted, or discarded
/// as a probable echo of this target's own tasks rewriting a watched file.
///
/// A task that rewrites watched files (e.g. a formatter) generates change
/// events of its own; those arrive shortly after the cycle restarted, i.e.
/// shortly after `cycle_started_at` was reset. Rejecting events on
/// rewrite-sensitive targets inside a short post-start window breaks the
/// rewrite -> event -> rewrite loop without content hashing.
///
/// Purely time-based and therefore a heuristic: a slow task finishing after
/// the window, or an unrelated edit landing inside it, will be classified
/// wrongly. That trade-off is deliberate.
///
/// The comparison is strict: an event arriving exactly at
/// `cycle_started_at + threshold` is accepted.
pub fn accept_event(
    rewrite_sensitive: bool,
    cycle_started_at: Instant,
    now: Instant,
    rewrite_threshold: Duration,
) -> bool {
    if !rewrite_sensitive {
        return true;
    }
    now.duration_since(cycle_started_at) >= rewrite_threshold
}
