// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [options]
/// emit_on_all_targets = false
/// delay_ms = 0
/// rewrite_threshold_ms = 100
///
/// [target.js]
/// watch = ["*.js", "src/**/*.js"]
/// tasks = ["eslint", "esformatter"]
/// rewrite_sensitive = true
///
/// [task.eslint]
/// cmd = "eslint ."
/// ```
///
/// All sections are optional and have reasonable defaults, except that at
/// least one `[target.<name>]` must exist (checked in `validate.rs`).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Global behaviour options from `[options]`.
    #[serde(default)]
    pub options: OptionsSection,

    /// All watch targets from `[target.<name>]`.
    ///
    /// Keys are the *target names* (e.g. `"js"`, `"css"`). The map is
    /// ordered by name; that order is the registry order used when
    /// concatenating task lists across targets.
    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,

    /// Task definitions from `[task.<name>]`, consumed by the bundled shell
    /// runner. Targets reference tasks by name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// `[options]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsSection {
    /// If true, a change matching *any* target's patterns is delivered to
    /// every watched target instead of only the matching ones.
    #[serde(default)]
    pub emit_on_all_targets: bool,

    /// Debounce quiet period in milliseconds.
    ///
    /// `0` (the default) still coalesces events that arrive in the same
    /// burst: the dispatcher only fires once the event channel has drained.
    #[serde(default)]
    pub delay_ms: u64,

    /// Window in milliseconds after a cycle restart during which events on
    /// rewrite-sensitive targets are discarded as probable self-rewrite
    /// echoes. Purely time-based; a heuristic, not a guarantee.
    #[serde(default = "default_rewrite_threshold_ms")]
    pub rewrite_threshold_ms: u64,
}

fn default_rewrite_threshold_ms() -> u64 {
    100
}

impl Default for OptionsSection {
    fn default() -> Self {
        Self {
            emit_on_all_targets: false,
            delay_ms: 0,
            rewrite_threshold_ms: default_rewrite_threshold_ms(),
        }
    }
}

/// `[target.<name>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TargetConfig {
    /// Glob patterns (relative to the config file's directory) defining
    /// which paths this target watches.
    #[serde(default)]
    pub watch: Vec<String>,

    /// Ordered list of task names to run when this target has pending
    /// changes. Names refer to `[task.<name>]` entries.
    #[serde(default)]
    pub tasks: Vec<String>,

    /// Whether this target's own tasks can rewrite files it watches
    /// (e.g. a formatter). Enables the rewrite-echo discard window.
    #[serde(default)]
    pub rewrite_sensitive: bool,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// The shell command to execute for this task.
    pub cmd: String,
}
