// src/exec/mod.rs

//! Task execution layer.
//!
//! The engine only ever hands a host runner an ordered list of task names;
//! what a task *means* is the runner's business (including any colon-
//! qualified "task:subtarget" naming convention — the engine never parses
//! task-name syntax). [`TaskRunner`] is that seam; [`shell`] provides the
//! bundled implementation that maps task names to `[task.<name>].cmd`
//! shell commands.

pub mod shell;

pub use shell::ShellRunner;

use crate::engine::runtime::TaskName;
use crate::errors::Result;

/// The host task runner the dispatcher submits batches to.
///
/// `set_force` mirrors a "keep going after failure" flag some runners
/// apply: the dispatcher restores it to its configured default at the start
/// of every fresh watch invocation and force-enables it just before each
/// submit, so one failed batch never suppresses the next dispatch.
///
/// `submit` runs a whole batch to completion (or failure) before returning;
/// individual task failures are the runner's own reporting path, not an
/// `Err` here. Errors are reserved for the runner itself being unusable.
#[allow(async_fn_in_trait)]
pub trait TaskRunner: Send {
    fn set_force(&mut self, force: bool);

    async fn submit(&mut self, tasks: Vec<TaskName>) -> Result<()>;
}
