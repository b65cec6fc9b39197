// src/config/validate.rs

use anyhow::{anyhow, Context, Result};
use globset::Glob;

use crate::config::model::ConfigFile;

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one target
/// - every target has at least one watch pattern and at least one task
/// - every task a target references exists as a `[task.<name>]` entry
/// - every watch pattern is a valid glob
///
/// It does **not** check that watched paths exist on disk; a pattern that
/// matches nothing is legal and simply never fires.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_targets(cfg)?;
    validate_targets(cfg)?;
    Ok(())
}

fn ensure_has_targets(cfg: &ConfigFile) -> Result<()> {
    if cfg.target.is_empty() {
        return Err(anyhow!(
            "config must contain at least one [target.<name>] section"
        ));
    }
    Ok(())
}

fn validate_targets(cfg: &ConfigFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        if target.watch.is_empty() {
            return Err(anyhow!(
                "target '{}' has an empty `watch` list; it would never fire",
                name
            ));
        }
        if target.tasks.is_empty() {
            return Err(anyhow!(
                "target '{}' has an empty `tasks` list; nothing to run",
                name
            ));
        }

        for task in target.tasks.iter() {
            if !cfg.task.contains_key(task) {
                return Err(anyhow!(
                    "target '{}' references unknown task '{}' (no [task.{}] section)",
                    name,
                    task,
                    task
                ));
            }
        }

        for pattern in target.watch.iter() {
            Glob::new(pattern).with_context(|| {
                format!("invalid glob pattern '{}' in target '{}'", pattern, name)
            })?;
        }
    }
    Ok(())
}
