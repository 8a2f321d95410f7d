// src/exec/reaper.rs

//! The reaper owns the OS child for its whole life.
//!
//! It waits for the child to exit and, until then, delivers termination
//! requests coming from the watcher or the caller. Because nothing else ever
//! holds the `Child`, a request can never reach a recycled pid.

use std::io;
use std::process::ExitStatus;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::process::Child;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::exec::signal::{self, Termination};

/// How the child ended, as observed by the reaper.
pub(crate) type ExitOutcome = Result<ExitStatus, io::ErrorKind>;

/// State shared between the handle, the watcher and the reaper.
#[derive(Debug, Default)]
pub(crate) struct ProcessState {
    /// Set exactly once, by the reaper.
    pub exit: Option<ExitOutcome>,
    /// Set at most once, by the watcher. Never reset.
    pub timed_out: bool,
}

#[derive(Debug, Default)]
pub(crate) struct SharedState {
    inner: Mutex<ProcessState>,
}

impl SharedState {
    pub fn lock(&self) -> MutexGuard<'_, ProcessState> {
        // A poisoned lock only means another holder panicked; the two fields
        // are still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Spawn the reaper task for `child`.
///
/// `exited` flips to `true` once `state.exit` has been recorded.
pub(crate) fn spawn_reaper(
    mut child: Child,
    pid: u32,
    state: Arc<SharedState>,
    mut requests: mpsc::UnboundedReceiver<Termination>,
    exited: watch::Sender<bool>,
) {
    tokio::spawn(async move {
        let outcome = loop {
            tokio::select! {
                res = child.wait() => break res.map_err(|e| e.kind()),
                Some(request) = requests.recv() => {
                    debug!(pid, ?request, "delivering termination request");
                    if let Err(e) = signal::deliver(&mut child, request) {
                        warn!(pid, ?request, error = %e, "failed to signal child process");
                    }
                }
            }
        };

        match &outcome {
            Ok(status) => debug!(pid, %status, "child process reaped"),
            Err(kind) => warn!(pid, ?kind, "waiting for child process failed"),
        }

        state.lock().exit = Some(outcome);
        exited.send_replace(true);
    });
}
