// src/engine/mod.rs

//! The aggregation and dispatch core of surveil.
//!
//! This module ties together:
//! - the rewrite-loop guard (`guard.rs`): is an incoming event real, or an
//!   echo of our own tasks rewriting a watched file?
//! - the pending-batch queue (`queue.rs`): accepted events accumulated per
//!   target until the next dispatch
//! - the task-list builder (`builder.rs`): pending snapshot -> ordered task
//!   names, via each target's filter hook
//! - the runtime (`runtime.rs`): the single-timer debounce loop and the
//!   dispatch cycle lifecycle

pub mod builder;
pub mod guard;
pub mod queue;
pub mod runtime;

pub use builder::build_task_list;
pub use guard::accept_event;
pub use queue::PendingQueue;
pub use runtime::{Runtime, TaskName, WatchEvent, WatchOptions};
