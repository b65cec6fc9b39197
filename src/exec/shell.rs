// src/exec/shell.rs

use std::collections::BTreeMap;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::model::ConfigFile;
use crate::engine::runtime::TaskName;
use crate::exec::TaskRunner;

/// The bundled task runner: resolves task names to shell commands from
/// `[task.<name>]` config sections and runs each batch sequentially.
///
/// Failure semantics follow the classic task-queue force flag. With force
/// off, a failing task aborts the rest of its batch and latches `halted`,
/// which suppresses later batches too. With force on, every task runs and
/// the latch is ignored. The dispatcher force-enables before each submit,
/// so in watch mode the latch only matters to embedders driving the runner
/// directly.
#[derive(Debug)]
pub struct ShellRunner {
    commands: BTreeMap<TaskName, String>,
    force: bool,
    halted: bool,
}

impl ShellRunner {
    /// Build a runner from the validated config's `[task.<name>]` table.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let commands = cfg
            .task
            .iter()
            .map(|(name, task)| (name.clone(), task.cmd.clone()))
            .collect();
        Self {
            commands,
            force: false,
            halted: false,
        }
    }

    async fn run_one(&self, task: &str) -> Result<bool> {
        let cmd = self
            .commands
            .get(task)
            .with_context(|| format!("no [task.{task}] command configured"))?;

        info!(task = %task, cmd = %cmd, "running task");

        // Shell out the same way on each platform the command was written
        // for; task output goes straight to the user's terminal.
        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(cmd);
            c
        };

        command
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let status = command
            .status()
            .await
            .with_context(|| format!("spawning process for task '{task}'"))?;

        if !status.success() {
            warn!(
                task = %task,
                exit_code = status.code().unwrap_or(-1),
                "task failed"
            );
        }

        Ok(status.success())
    }
}

impl TaskRunner for ShellRunner {
    fn set_force(&mut self, force: bool) {
        self.force = force;
    }

    async fn submit(&mut self, tasks: Vec<TaskName>) -> Result<()> {
        if self.halted && !self.force {
            warn!(skipped = tasks.len(), "runner halted by earlier failure; batch skipped");
            return Ok(());
        }

        for (index, task) in tasks.iter().enumerate() {
            let ok = self.run_one(task).await?;

            if !ok && !self.force {
                self.halted = true;
                let remaining = tasks.len() - index - 1;
                if remaining > 0 {
                    warn!(remaining, "aborting rest of batch after failure (use --force to continue)");
                }
                break;
            }
        }

        Ok(())
    }
}
