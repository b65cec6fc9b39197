// src/registry.rs

//! The target registry: a read-only view over per-target configuration,
//! plus the filter-hook seam and target-name resolution.
//!
//! The registry itself carries no cycle state; all of that lives in the
//! engine. Hooks are the one mutable part: a hook may keep state across
//! dispatches (e.g. to write partial-scope config for the host runner as a
//! side effect), which is why [`FilterHook::filter`] takes `&mut self`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::anyhow;

use crate::config::model::{ConfigFile, TargetConfig};
use crate::errors::Result;

/// Name of a watch target. Targets are the unit of configuration: a set of
/// watched paths plus an ordered task list.
pub type TargetName = String;

/// A target-supplied hook that decides, per dispatch, which of the target's
/// configured tasks actually run.
///
/// `pending` is the ordered list of changed paths for the target this cycle
/// (duplicates preserved). Returning `Ok(false)` excludes `task` from the
/// dispatch; `Ok(true)` includes it. An `Err` fails the whole dispatch —
/// running a partial task list could leave inconsistent state.
pub trait FilterHook: Send {
    fn filter(&mut self, pending: &[PathBuf], task: &str, target: &str) -> Result<bool>;
}

impl<F> FilterHook for F
where
    F: FnMut(&[PathBuf], &str, &str) -> Result<bool> + Send,
{
    fn filter(&mut self, pending: &[PathBuf], task: &str, target: &str) -> Result<bool> {
        self(pending, task, target)
    }
}

/// Wrap a closure as a boxed [`FilterHook`].
///
/// Mostly a type-inference aid: it pins the closure's signature to the
/// hook shape so callers don't have to annotate the error type.
pub fn hook_fn<F>(f: F) -> Box<dyn FilterHook>
where
    F: FnMut(&[PathBuf], &str, &str) -> Result<bool> + Send + 'static,
{
    Box::new(f)
}

struct TargetEntry {
    config: TargetConfig,
    hook: Option<Box<dyn FilterHook>>,
}

/// Read-only lookup over the configured targets, in registry order
/// (name order, as fixed by the config's `BTreeMap`).
pub struct Registry {
    targets: BTreeMap<TargetName, TargetEntry>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("targets", &self.targets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    /// Build a registry from a validated [`ConfigFile`].
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let targets = cfg
            .target
            .iter()
            .map(|(name, target)| {
                (
                    name.clone(),
                    TargetEntry {
                        config: target.clone(),
                        hook: None,
                    },
                )
            })
            .collect();
        Self { targets }
    }

    /// All target names, in registry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(|s| s.as_str())
    }

    /// Look up a target's configuration.
    pub fn target(&self, name: &str) -> Result<&TargetConfig> {
        self.targets
            .get(name)
            .map(|entry| &entry.config)
            .ok_or_else(|| anyhow!("no such target in registry: '{}'", name))
    }

    /// Attach a filter hook to a target, replacing any existing hook.
    ///
    /// Hooks are a library-level seam (the original's `prepare` function);
    /// there is no way to express one in the TOML config.
    pub fn set_filter_hook(&mut self, name: &str, hook: Box<dyn FilterHook>) -> Result<()> {
        let entry = self
            .targets
            .get_mut(name)
            .ok_or_else(|| anyhow!("no such target in registry: '{}'", name))?;
        entry.hook = Some(hook);
        Ok(())
    }

    /// Run a target's filter hook for one task, if a hook is attached.
    ///
    /// Absent hook means "include all tasks unchanged".
    pub fn run_filter_hook(
        &mut self,
        name: &str,
        pending: &[PathBuf],
        task: &str,
    ) -> Result<bool> {
        let entry = self
            .targets
            .get_mut(name)
            .ok_or_else(|| anyhow!("no such target in registry: '{}'", name))?;
        match entry.hook.as_mut() {
            Some(hook) => hook.filter(pending, task, name),
            None => Ok(true),
        }
    }
}

/// Resolve a requested target name to the ordered list of target names the
/// watch invocation should cover.
///
/// `None` means "all targets" (registry order). A name that is not in the
/// registry is a fatal configuration error, reported before any watcher is
/// attached.
pub fn resolve_targets(requested: Option<&str>, registry: &Registry) -> Result<Vec<TargetName>> {
    match requested {
        None => Ok(registry.names().map(|s| s.to_string()).collect()),
        Some(name) => {
            if registry.target(name).is_err() {
                return Err(anyhow!("the supplied target was not found: '{}'", name));
            }
            Ok(vec![name.to_string()])
        }
    }
}
