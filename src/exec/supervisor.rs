// src/exec/supervisor.rs

//! Spawning and deadline enforcement.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::args::ResolvedCommand;
use crate::errors::{Diagnostics, Result, ShellwrapError};
use crate::exec::handle::ProcessHandle;
use crate::exec::reaper::{SharedState, spawn_reaper};
use crate::exec::signal::Termination;

/// Runtime knobs for the supervisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupervisorOptions {
    /// After a termination request, escalate to a forced kill if the process
    /// is still alive once this grace period elapses. `None` never escalates.
    pub kill_grace: Option<Duration>,
}

/// Spawns resolved commands and enforces their deadlines.
#[derive(Debug, Clone, Default)]
pub struct Supervisor {
    options: SupervisorOptions,
}

impl Supervisor {
    pub fn new(options: SupervisorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> SupervisorOptions {
        self.options
    }

    /// Spawn `cmd` with piped stdout/stderr.
    ///
    /// With a timeout, a watcher task is started alongside the process. Must
    /// be called from within a Tokio runtime.
    pub fn spawn(&self, cmd: &ResolvedCommand) -> Result<ProcessHandle> {
        let (program, rest) = cmd.argv.split_first().ok_or_else(|| {
            ShellwrapError::Config("cannot spawn an empty command line".to_string())
        })?;

        if tokio::runtime::Handle::try_current().is_err() {
            return Err(ShellwrapError::Config(
                "spawning a supervised process requires a Tokio runtime".to_string(),
            ));
        }

        let mut command = Command::new(program);
        command
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(env) = &cmd.spawn.env {
            command.env_clear().envs(env);
        }
        if let Some(cwd) = &cmd.spawn.cwd {
            command.current_dir(cwd);
        }

        let label = cmd.command_line();
        let mut child = command.spawn().map_err(|e| {
            warn!(argv = ?cmd.argv, error = %e, "failed to spawn process");
            let diagnostics = Diagnostics {
                label: label.clone(),
                argv: cmd.argv.clone(),
                cwd: cmd.spawn.cwd.clone(),
                ..Default::default()
            };
            ShellwrapError::from_spawn(&label, diagnostics, e)
        })?;

        let pid = child.id().ok_or_else(|| {
            ShellwrapError::io(
                label.clone(),
                std::io::Error::other("child exited before its pid could be read"),
            )
        })?;

        info!(
            pid,
            argv = ?cmd.argv,
            timeout_ms = cmd.timeout.map(|t| t.as_millis() as u64),
            "spawned process"
        );

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let state = Arc::new(SharedState::default());
        let (req_tx, req_rx) = mpsc::unbounded_channel::<Termination>();
        let (exit_tx, exit_rx) = watch::channel(false);

        spawn_reaper(child, pid, Arc::clone(&state), req_rx, exit_tx);

        if let Some(timeout) = cmd.timeout {
            spawn_watcher(
                pid,
                timeout,
                self.options.kill_grace,
                Arc::clone(&state),
                req_tx.clone(),
            );
        }

        Ok(ProcessHandle {
            pid,
            argv: cmd.argv.clone(),
            spawn: cmd.spawn.clone(),
            timeout: cmd.timeout,
            stdout,
            stderr,
            output: None,
            state,
            exited: exit_rx,
            requests: req_tx,
        })
    }
}

/// Fire-and-forget deadline task for one process.
///
/// Sleeps for `timeout`; if the process has not exited by then it requests
/// termination and marks the handle as timed out. With a grace period, a
/// process that survives the request is killed.
fn spawn_watcher(
    pid: u32,
    timeout: Duration,
    kill_grace: Option<Duration>,
    state: Arc<SharedState>,
    requests: mpsc::UnboundedSender<Termination>,
) {
    tokio::spawn(async move {
        sleep(timeout).await;

        {
            let mut st = state.lock();
            if st.exit.is_some() {
                debug!(pid, "deadline elapsed after process exit; nothing to do");
                return;
            }
            if requests.send(Termination::Terminate).is_err() {
                debug!(pid, "reaper already gone at deadline");
                return;
            }
            st.timed_out = true;
        }

        warn!(
            pid,
            timeout_ms = timeout.as_millis() as u64,
            "process outlived its deadline; termination requested"
        );

        if let Some(grace) = kill_grace {
            sleep(grace).await;
            let still_running = state.lock().exit.is_none();
            if still_running && requests.send(Termination::Kill).is_ok() {
                warn!(
                    pid,
                    grace_ms = grace.as_millis() as u64,
                    "process survived termination request; killing"
                );
            }
        }
    });
}
