// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::registry::TargetName;

/// Compiled watch glob patterns for a single target.
///
/// The patterns are assumed to be relative to the project root (the config
/// file's directory). The watcher passes relative paths
/// (e.g. `"tasks/lib/util.js"`) into `matches`.
#[derive(Clone)]
pub struct TargetWatchProfile {
    target: TargetName,
    watch_set: GlobSet,
}

impl fmt::Debug for TargetWatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetWatchProfile")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl TargetWatchProfile {
    /// Compile a profile from a target's raw pattern strings.
    pub fn compile(target: impl Into<TargetName>, patterns: &[String]) -> Result<Self> {
        let target = target.into();
        let watch_set = build_globset(patterns)
            .with_context(|| format!("building watch globset for target '{}'", target))?;
        Ok(Self { target, watch_set })
    }

    /// Name of the target this profile belongs to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns true if this target watches the given path (relative to the
    /// project root), e.g. `"src/foo/bar.js"`.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.watch_set.is_match(rel_path)
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
