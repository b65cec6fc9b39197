// src/watch/mod.rs

//! File watching: the adapter seam and the notify-backed implementation.
//!
//! This module is responsible for:
//! - Compiling each target's `watch` glob patterns (`patterns.rs`).
//! - Wiring up a cross-platform filesystem watcher (`watcher.rs`) that
//!   turns raw notify events into per-target [`WatchEvent`]s.
//!
//! It knows nothing about debouncing, task lists or dispatch; it only tags
//! filesystem changes with the targets they belong to.
//!
//! [`WatchEvent`]: crate::engine::WatchEvent

pub mod patterns;
pub mod watcher;

pub use patterns::TargetWatchProfile;
pub use watcher::{route_targets, NotifyAdapter};

use crate::errors::Result;

/// The watcher adapter the runtime attaches targets through.
///
/// One `attach` call per resolved target; the runtime's initialized-target
/// set guarantees it is never called twice for the same target. The adapter
/// owns its event sender and delivers `WatchEvent::FileChanged` scoped to
/// the attached targets, and `WatchEvent::WatchError` on watcher failure.
pub trait WatcherAdapter {
    fn attach(&mut self, target: &str, patterns: &[String]) -> Result<()>;
}
