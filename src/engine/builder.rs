// src/engine/builder.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::engine::runtime::TaskName;
use crate::registry::{Registry, TargetName};

/// Build the ordered task list for one dispatch from a drained pending
/// snapshot.
///
/// For each target with pending paths, in registry order:
/// - start from the target's configured task list,
/// - drop every task for which the target's filter hook returns `Ok(false)`
///   (no hook means all tasks run),
/// - append the survivors in the target's declared order.
///
/// There is **no dedup across targets**: if two targets name the same task
/// it appears twice and the runner executes it twice. A hook may have scoped
/// each occurrence to different pending files as a side effect, so the two
/// invocations must stay distinct from the runner's perspective.
///
/// A hook error fails the whole dispatch. Running a partial list could
/// execute some of a cycle's tasks and not others, leaving inconsistent
/// state on disk.
pub fn build_task_list(
    registry: &mut Registry,
    pending: &BTreeMap<TargetName, Vec<PathBuf>>,
) -> Result<Vec<TaskName>> {
    let ordered: Vec<TargetName> = registry.names().map(|s| s.to_string()).collect();

    let mut tasks: Vec<TaskName> = Vec::new();

    for target in ordered {
        let Some(paths) = pending.get(&target) else {
            continue;
        };
        if paths.is_empty() {
            continue;
        }

        let cfg_tasks = registry.target(&target)?.tasks.clone();

        for task in cfg_tasks {
            let include = registry
                .run_filter_hook(&target, paths, &task)
                .with_context(|| {
                    format!("filter hook failed for task '{}' of target '{}'", task, target)
                })?;

            if include {
                tasks.push(task);
            } else {
                debug!(target = %target, task = %task, "filter hook excluded task");
            }
        }
    }

    debug!(tasks = tasks.len(), "built dispatch task list");
    Ok(tasks)
}
