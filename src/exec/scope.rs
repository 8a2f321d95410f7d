// src/exec/scope.rs

//! Scoped execution: a deadline-bound process that is always cleaned up.

use std::ops::{Deref, DerefMut};
use std::process::ExitStatus;

use tracing::{debug, warn};

use crate::args::ArgModel;
use crate::errors::{Result, ShellwrapError};
use crate::exec::handle::{Process, ProcessHandle};
use crate::exec::supervisor::Supervisor;

/// A supervised process bound to a scope.
///
/// Open it with [`ScopedExecution::enter`] and close it with
/// [`ScopedExecution::exit`], which terminates a still-running process and
/// waits for it. If the value is dropped without `exit` (early return, `?`,
/// panic), `Drop` still sends the termination request; the reaper task
/// collects the process in the background.
#[derive(Debug)]
pub struct ScopedExecution {
    handle: ProcessHandle,
    supervisor: Supervisor,
    closed: bool,
}

impl ScopedExecution {
    /// Spawn `model` with default supervisor settings.
    pub fn enter(model: &ArgModel) -> Result<Self> {
        Self::enter_with(&Supervisor::default(), model)
    }

    /// Spawn `model` under `supervisor`.
    ///
    /// Fails with a configuration error, without spawning anything, when no
    /// layer of the model sets a timeout.
    pub fn enter_with(supervisor: &Supervisor, model: &ArgModel) -> Result<Self> {
        let cmd = model.resolve();
        if cmd.timeout.is_none() {
            return Err(ShellwrapError::Config(format!(
                "scoped execution of `{}` requires a timeout",
                cmd.command_line()
            )));
        }

        let handle = supervisor.spawn(&cmd)?;
        debug!(pid = handle.pid(), "entered execution scope");
        Ok(Self {
            handle,
            supervisor: supervisor.clone(),
            closed: false,
        })
    }

    pub fn handle(&self) -> &ProcessHandle {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut ProcessHandle {
        &mut self.handle
    }

    /// Close the scope: terminate the process if it is still running, then
    /// wait for it to exit.
    ///
    /// Termination racing with a natural exit (or with the watcher) is
    /// expected and ignored.
    pub async fn exit(mut self) -> Result<ExitStatus> {
        self.closed = true;

        if !self.handle.has_exited() {
            match self.handle.terminate() {
                Ok(()) => debug!(pid = self.handle.pid(), "terminated process on scope exit"),
                Err(ShellwrapError::AlreadyExited { pid }) => {
                    debug!(pid, "process exited before scope cleanup");
                }
                Err(e) => return Err(e),
            }
        }

        match self.supervisor.options().kill_grace {
            Some(grace) => match tokio::time::timeout(grace, self.handle.wait()).await {
                Ok(res) => res,
                Err(_) => {
                    warn!(pid = self.handle.pid(), "process ignored termination; killing");
                    if let Err(ShellwrapError::AlreadyExited { pid }) = self.handle.kill() {
                        debug!(pid, "process exited before kill");
                    }
                    self.handle.wait().await
                }
            },
            None => self.handle.wait().await,
        }
    }
}

impl Deref for ScopedExecution {
    type Target = ProcessHandle;

    fn deref(&self) -> &ProcessHandle {
        &self.handle
    }
}

impl DerefMut for ScopedExecution {
    fn deref_mut(&mut self) -> &mut ProcessHandle {
        &mut self.handle
    }
}

impl Drop for ScopedExecution {
    fn drop(&mut self) {
        if self.closed || self.handle.has_exited() {
            return;
        }
        if self.handle.terminate().is_ok() {
            debug!(
                pid = self.handle.pid(),
                "execution scope dropped; termination requested"
            );
        }
    }
}
