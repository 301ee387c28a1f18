//! Watch mode: rebuild automatically when source files change.
//!
//! A `notify` watcher pushes filesystem events into a channel from its own
//! callback thread. The watch loop owns the pending-change set and runs
//! build cycles itself, so a build in progress structurally excludes a
//! concurrent build; events that arrive mid-build sit in the channel and
//! start the next debounce window.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use notify::{EventKind, RecursiveMode, Watcher};

use crate::error::BuildError;
use crate::pipeline::{BuildCycle, BuildReport};

/// Settings for a watch session.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Quiet period after the last event before a build triggers.
    pub debounce: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
        }
    }
}

/// Watches the project and reruns the build cycle after each burst of
/// changes.
///
/// Blocks the calling thread. `on_cycle` receives the number of distinct
/// changed files that triggered the cycle and the resulting report. Returns
/// when the watcher disconnects; interrupting the process (Ctrl+C) is the
/// normal way to leave watch mode.
pub fn watch(
    cycle: &mut BuildCycle,
    options: WatchOptions,
    mut on_cycle: impl FnMut(usize, &BuildReport),
) -> Result<(), BuildError> {
    let (tx, rx) = crossbeam_channel::unbounded();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let Ok(event) = res else { return };
        if !is_relevant_kind(&event.kind) {
            return;
        }
        for path in event.paths {
            if is_source(&path) {
                let _ = tx.send(path);
            }
        }
    })
    .map_err(|e| BuildError::Watcher {
        reason: e.to_string(),
    })?;

    watcher
        .watch(cycle.project_root(), RecursiveMode::Recursive)
        .map_err(|e| BuildError::Watcher {
            reason: e.to_string(),
        })?;

    loop {
        // Block until the first event of a burst.
        let first = match rx.recv() {
            Ok(path) => path,
            Err(_) => return Ok(()),
        };
        let mut pending = BTreeSet::from([first]);
        collect_until_quiet(&rx, options.debounce, &mut pending);

        let report = cycle.run(false)?;
        on_cycle(pending.len(), &report);
    }
}

/// Drains events until a full quiet period passes with none arriving.
///
/// Every received event restarts the quiet window, mirroring a debounce
/// timer that is reset on each filesystem notification.
fn collect_until_quiet(rx: &Receiver<PathBuf>, quiet: Duration, pending: &mut BTreeSet<PathBuf>) {
    loop {
        match rx.recv_timeout(quiet) {
            Ok(path) => {
                pending.insert(path);
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

/// Only creations and modifications trigger rebuilds.
fn is_relevant_kind(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

/// Only `.poh` files are watched.
fn is_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "poh")
}
