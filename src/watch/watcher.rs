// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::WatchEvent;
use crate::registry::TargetName;
use crate::watch::patterns::TargetWatchProfile;
use crate::watch::WatcherAdapter;

/// Messages into the adapter's forwarding loop: raw filesystem activity
/// from notify, or a new per-target subscription from `attach`.
///
/// Routing subscriptions through the same channel as events keeps the
/// profile list owned by one task, so no locking is needed.
enum AdapterMsg {
    Fs(notify::Result<Event>),
    Attach(TargetWatchProfile),
}

/// Filesystem watcher adapter backed by `notify`.
///
/// One recursive `notify` watcher observes the project root; each attached
/// target gets a compiled glob profile, and a forwarding task tags every
/// changed path with the targets whose profiles match it. With
/// `emit_on_all_targets`, a path matching any profile is instead delivered
/// to every attached target.
///
/// Dropping the adapter stops file watching.
pub struct NotifyAdapter {
    _inner: RecommendedWatcher,
    msg_tx: mpsc::UnboundedSender<AdapterMsg>,
}

impl std::fmt::Debug for NotifyAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyAdapter").finish()
    }
}

impl NotifyAdapter {
    /// Start watching `root` recursively and spawn the forwarding loop.
    ///
    /// `root` is the directory all target glob patterns are evaluated
    /// against (normally the config file's directory). `events_tx` is the
    /// channel into the runtime.
    pub fn new(
        root: impl Into<PathBuf>,
        emit_on_all_targets: bool,
        events_tx: mpsc::Sender<WatchEvent>,
    ) -> Result<Self> {
        let root = root.into();
        let root = root.canonicalize().unwrap_or_else(|_| root.clone()); // best-effort

        let (msg_tx, msg_rx) = mpsc::unbounded_channel::<AdapterMsg>();

        // Closure called synchronously by notify whenever an event arrives.
        let mut watcher = RecommendedWatcher::new(
            {
                let msg_tx = msg_tx.clone();
                move |res: notify::Result<Event>| {
                    if msg_tx.send(AdapterMsg::Fs(res)).is_err() {
                        // Forwarding loop is gone; nothing left to notify.
                        eprintln!("surveil: dropped notify event, forwarder closed");
                    }
                }
            },
            Config::default(),
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        info!("file watcher started on {:?}", root);

        tokio::spawn(forward_events(root, emit_on_all_targets, msg_rx, events_tx));

        Ok(Self {
            _inner: watcher,
            msg_tx,
        })
    }
}

impl WatcherAdapter for NotifyAdapter {
    fn attach(&mut self, target: &str, patterns: &[String]) -> Result<()> {
        let profile = TargetWatchProfile::compile(target, patterns)?;
        let _ = self.msg_tx.send(AdapterMsg::Attach(profile));
        info!(target = %target, "watcher created for target");
        Ok(())
    }
}

/// Consume adapter messages and forward per-target change events to the
/// runtime. A notify error is forwarded as `WatchEvent::WatchError` and
/// ends the loop; the runtime treats it as fatal.
async fn forward_events(
    root: PathBuf,
    emit_on_all_targets: bool,
    mut msg_rx: mpsc::UnboundedReceiver<AdapterMsg>,
    events_tx: mpsc::Sender<WatchEvent>,
) {
    let mut profiles: Vec<TargetWatchProfile> = Vec::new();

    while let Some(msg) = msg_rx.recv().await {
        match msg {
            AdapterMsg::Attach(profile) => {
                debug!(target = %profile.target(), "subscription registered");
                profiles.push(profile);
            }
            AdapterMsg::Fs(Err(err)) => {
                warn!("file watch error: {err}");
                let _ = events_tx
                    .send(WatchEvent::WatchError(err.to_string()))
                    .await;
                return;
            }
            AdapterMsg::Fs(Ok(event)) => {
                debug!("received notify event: {:?}", event);

                for path in &event.paths {
                    let Some(rel) = relative_str(&root, path) else {
                        debug!("path {:?} outside watch root, ignored", path);
                        continue;
                    };

                    for target in route_targets(&profiles, emit_on_all_targets, &rel) {
                        debug!(target = %target, path = %rel, "watch match -> change event");
                        if events_tx
                            .send(WatchEvent::FileChanged {
                                target,
                                path: path.clone(),
                            })
                            .await
                            .is_err()
                        {
                            // Runtime is gone; no point keeping the loop alive.
                            return;
                        }
                    }
                }
            }
        }
    }

    debug!("file watcher forwarding loop ended");
}

/// Decide which targets a changed path is delivered to.
///
/// A path matching no profile goes nowhere. Otherwise it goes to every
/// matching target, or, with `emit_on_all_targets`, to every attached
/// target regardless of whose pattern matched. Un-scoped emission mirrors
/// watcher libraries that fan every change out to all live instances.
pub fn route_targets(
    profiles: &[TargetWatchProfile],
    emit_on_all_targets: bool,
    rel_path: &str,
) -> Vec<TargetName> {
    let matched: Vec<&TargetWatchProfile> =
        profiles.iter().filter(|p| p.matches(rel_path)).collect();
    if matched.is_empty() {
        return Vec::new();
    }

    if emit_on_all_targets {
        profiles.iter().map(|p| p.target().to_string()).collect()
    } else {
        matched.iter().map(|p| p.target().to_string()).collect()
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be relativized.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}
