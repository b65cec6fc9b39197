// src/engine/runtime.rs

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::config::model::OptionsSection;
use crate::engine::builder::build_task_list;
use crate::engine::guard::accept_event;
use crate::engine::queue::PendingQueue;
use crate::exec::TaskRunner;
use crate::registry::{Registry, TargetName};
use crate::watch::WatcherAdapter;

/// Public type alias for task names throughout the engine.
pub type TaskName = String;

/// Events sent into the runtime from the watcher adapter and the signal
/// handler. The single mpsc receiver serializes all of them, which is what
/// lets the cycle state live in plain fields without locking.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A path under one target's watch patterns changed. The event kind
    /// (add/change/remove) is deliberately not carried; the scheduler treats
    /// them uniformly.
    FileChanged { target: TargetName, path: PathBuf },
    /// The underlying watcher reported an error. Fatal; the watch run halts
    /// rather than silently missing events.
    WatchError(String),
    /// Operator-initiated stop (Ctrl-C).
    ShutdownRequested,
}

/// Timing options for the watch runtime.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Debounce quiet period. Zero still coalesces same-burst events
    /// because queued events always drain before the flush timer fires.
    pub delay: Duration,
    /// Post-restart window in which rewrite-sensitive targets discard
    /// events as self-rewrite echoes.
    pub rewrite_threshold: Duration,
}

impl From<&OptionsSection> for WatchOptions {
    fn from(options: &OptionsSection) -> Self {
        Self {
            delay: Duration::from_millis(options.delay_ms),
            rewrite_threshold: Duration::from_millis(options.rewrite_threshold_ms),
        }
    }
}

/// Why the held watch invocation was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleEnd {
    /// The debounce timer fired; run the dispatch sequence.
    Flush,
    /// Shutdown was requested; exit without a partial dispatch.
    Shutdown,
}

/// The watch runtime: debounce timer, dispatcher and cycle lifecycle.
///
/// One instance owns all mutable cycle state: the pending queue, the flush
/// deadline, the initialized-target set and the saved force flag
/// (`default_force`). Nothing here is process-global, so independent
/// runtimes can coexist in tests.
///
/// `R` is the host task runner the built task lists are submitted to; `A`
/// is the watcher adapter that turns filesystem activity into
/// [`WatchEvent`]s on `events_rx`.
pub struct Runtime<R: TaskRunner, A: WatcherAdapter> {
    registry: Registry,
    /// Resolved target names this invocation covers, registry order.
    targets: Vec<TargetName>,
    options: WatchOptions,
    /// Force flag restored into the runner at every fresh invocation.
    default_force: bool,

    runner: R,
    adapter: A,
    events_rx: mpsc::Receiver<WatchEvent>,

    pending: PendingQueue,
    /// Reset every time the watch cycle (re)initializes, i.e. every
    /// dispatch, not just process start. The rewrite-loop guard measures
    /// event arrival against this.
    cycle_started_at: Instant,
    /// At most one outstanding debounce deadline; replacing it cancels the
    /// previous one.
    flush_at: Option<tokio::time::Instant>,
    /// Targets with a live watcher attached. Survives re-invocation so a
    /// second watcher is never attached for the same target.
    initialized: HashSet<TargetName>,
}

impl<R: TaskRunner, A: WatcherAdapter> Runtime<R, A> {
    pub fn new(
        registry: Registry,
        targets: Vec<TargetName>,
        options: WatchOptions,
        default_force: bool,
        runner: R,
        adapter: A,
        events_rx: mpsc::Receiver<WatchEvent>,
    ) -> Self {
        Self {
            registry,
            targets,
            options,
            default_force,
            runner,
            adapter,
            events_rx,
            pending: PendingQueue::new(),
            cycle_started_at: Instant::now(),
            flush_at: None,
            initialized: HashSet::new(),
        }
    }

    /// Watch until shutdown.
    ///
    /// Each iteration of the outer loop is one top-level watch invocation:
    /// restore the runner's force flag to its configured default, reset the
    /// cycle clock, attach watchers for any target that doesn't have one
    /// yet, then hold on the event loop until the debounce timer releases
    /// us. The dispatch sequence after the hold runs as ordinary sequential
    /// code; looping back around is the tail self-re-queue that keeps the
    /// process listening forever.
    pub async fn run(mut self) -> Result<()> {
        info!(targets = ?self.targets, "surveil runtime started");

        loop {
            self.begin_invocation()?;

            let end = match self.hold_until_flush().await? {
                CycleEnd::Flush => self.dispatch().await?,
                CycleEnd::Shutdown => CycleEnd::Shutdown,
            };

            if end == CycleEnd::Shutdown {
                info!("shutdown requested, stopping watch runtime");
                return Ok(());
            }
        }
    }

    /// Start a fresh top-level invocation.
    ///
    /// Attaching is idempotent: a target already in `initialized` is
    /// skipped, so re-invocation after a dispatch never duplicates event
    /// delivery.
    fn begin_invocation(&mut self) -> Result<()> {
        self.runner.set_force(self.default_force);
        self.cycle_started_at = Instant::now();

        if self.initialized.len() == self.targets.len() {
            debug!("watcher(s) re-attached");
            return Ok(());
        }

        for name in self.targets.clone() {
            if self.initialized.contains(&name) {
                continue;
            }
            let patterns = self.registry.target(&name)?.watch.clone();
            self.adapter.attach(&name, &patterns)?;
            self.initialized.insert(name);
        }

        Ok(())
    }

    /// Hold the invocation open, feeding accepted events into the pending
    /// queue, until the shared debounce timer fires or shutdown arrives.
    ///
    /// The select is `biased` with the event arm first: events already
    /// queued in the channel always drain before an elapsed timer is
    /// observed. That is what makes `delay = 0` still coalesce a same-tick
    /// burst, and what guarantees the timer only releases once no accepted
    /// event has arrived for the full quiet period.
    async fn hold_until_flush(&mut self) -> Result<CycleEnd> {
        loop {
            let deadline = self.flush_at;

            tokio::select! {
                biased;

                event = self.events_rx.recv() => match event {
                    Some(WatchEvent::FileChanged { target, path }) => {
                        Self::note_change(
                            &self.registry,
                            self.options,
                            self.cycle_started_at,
                            &mut self.pending,
                            &mut self.flush_at,
                            target,
                            path,
                        );
                    }
                    Some(WatchEvent::WatchError(message)) => {
                        return Err(anyhow!("file watcher error: {message}"));
                    }
                    Some(WatchEvent::ShutdownRequested) | None => {
                        if !self.pending.is_empty() {
                            warn!("discarding pending changes on shutdown");
                        }
                        self.flush_at = None;
                        return Ok(CycleEnd::Shutdown);
                    }
                },

                _ = sleep_until(deadline), if deadline.is_some() => {
                    self.flush_at = None;
                    return Ok(CycleEnd::Flush);
                }
            }
        }
    }

    /// Run one accepted-or-discarded decision and, on accept, queue the path
    /// and extend the shared quiet period for *all* pending targets (this is
    /// what coalesces cross-target bursts into one dispatch).
    ///
    /// An associated fn over the exact fields it touches, because it is also
    /// called mid-dispatch while `self.runner` is mutably borrowed by the
    /// in-flight submission.
    fn note_change(
        registry: &Registry,
        options: WatchOptions,
        cycle_started_at: Instant,
        pending: &mut PendingQueue,
        flush_at: &mut Option<tokio::time::Instant>,
        target: TargetName,
        path: PathBuf,
    ) {
        let rewrite_sensitive = match registry.target(&target) {
            Ok(cfg) => cfg.rewrite_sensitive,
            Err(_) => {
                // The adapter only emits resolved targets; anything else is
                // a stray late event from a dropped subscription.
                warn!(target = %target, "event for unregistered target ignored");
                return;
            }
        };

        let accepted = accept_event(
            rewrite_sensitive,
            cycle_started_at,
            Instant::now(),
            options.rewrite_threshold,
        );

        if !accepted {
            trace!(target = %target, path = ?path, "skipped event due to rewrite flag");
            return;
        }

        pending.enqueue(&target, path);
        *flush_at = Some(tokio::time::Instant::now() + options.delay);
    }

    /// The dispatch sequence, in order: force-enable the runner so a prior
    /// failure cannot suppress this batch, drain the pending queue, build
    /// the ordered task list, submit it. Submission is awaited, so a new
    /// dispatch can never begin while this one's batch is outstanding.
    ///
    /// While the submission is in flight the event stream stays live:
    /// change events are queued for the next cycle, and an interrupt drops
    /// the submission future on the spot, cancelling every queued-but-not-
    /// started task in the batch (the bundled runner also kills the child
    /// it is currently waiting on, via `kill_on_drop`).
    async fn dispatch(&mut self) -> Result<CycleEnd> {
        self.runner.set_force(true);

        let snapshot = self.pending.drain_all();
        let tasks = build_task_list(&mut self.registry, &snapshot)?;

        info!(tasks = ?tasks, "dispatching task batch");

        let submit = self.runner.submit(tasks);
        tokio::pin!(submit);

        loop {
            tokio::select! {
                biased;

                event = self.events_rx.recv() => match event {
                    Some(WatchEvent::FileChanged { target, path }) => {
                        Self::note_change(
                            &self.registry,
                            self.options,
                            self.cycle_started_at,
                            &mut self.pending,
                            &mut self.flush_at,
                            target,
                            path,
                        );
                    }
                    Some(WatchEvent::WatchError(message)) => {
                        return Err(anyhow!("file watcher error: {message}"));
                    }
                    Some(WatchEvent::ShutdownRequested) | None => {
                        warn!("interrupt during dispatch; remaining batch tasks cancelled");
                        return Ok(CycleEnd::Shutdown);
                    }
                },

                result = &mut submit => {
                    result?;
                    return Ok(CycleEnd::Flush);
                }
            }
        }
    }
}

async fn sleep_until(deadline: Option<tokio::time::Instant>) {
    if let Some(deadline) = deadline {
        tokio::time::sleep_until(deadline).await;
    }
}
