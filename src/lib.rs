// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod registry;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::{Runtime, WatchEvent, WatchOptions};
use crate::exec::ShellRunner;
use crate::registry::{resolve_targets, Registry};
use crate::watch::NotifyAdapter;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - target registry + resolution
/// - notify watcher adapter
/// - shell task runner
/// - watch runtime
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let registry = Registry::from_config(&cfg);

    // Unknown-target requests fail here, before any watcher exists.
    let targets = resolve_targets(args.target.as_deref(), &registry)?;

    let options = WatchOptions::from(&cfg.options);
    let runner = ShellRunner::from_config(&cfg);

    // Unified event stream: watcher adapter + ctrl-c funnel into the one
    // runtime loop that owns all cycle state.
    let (events_tx, events_rx) = mpsc::channel::<WatchEvent>(64);

    let root_dir = config_root_dir(&config_path);
    let adapter = NotifyAdapter::new(root_dir, cfg.options.emit_on_all_targets, events_tx.clone())?;

    // Ctrl-C → graceful shutdown. `ctrl_c()` resolves once, so the
    // cancellation path cannot be double-invoked.
    {
        let tx = events_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(WatchEvent::ShutdownRequested).await;
        });
    }

    let runtime = Runtime::new(
        registry,
        targets,
        options,
        args.force,
        runner,
        adapter,
        events_rx,
    );
    runtime.run().await
}

/// Figure out a sensible project root for watching.
/// Currently: directory containing the config file, or `.`.
fn config_root_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Simple dry-run output: print options, targets and their tasks.
fn print_dry_run(cfg: &ConfigFile) {
    println!("surveil dry-run");
    println!(
        "  options.emit_on_all_targets = {}",
        cfg.options.emit_on_all_targets
    );
    println!("  options.delay_ms = {}", cfg.options.delay_ms);
    println!(
        "  options.rewrite_threshold_ms = {}",
        cfg.options.rewrite_threshold_ms
    );
    println!();

    println!("targets ({}):", cfg.target.len());
    for (name, target) in cfg.target.iter() {
        println!("  - {name}");
        println!("      watch: {:?}", target.watch);
        println!("      tasks: {:?}", target.tasks);
        if target.rewrite_sensitive {
            println!("      rewrite_sensitive: true");
        }
    }

    println!();
    println!("tasks ({}):", cfg.task.len());
    for (name, task) in cfg.task.iter() {
        println!("  - {name}: {}", task.cmd);
    }

    debug!("dry-run complete (no watching)");
}
