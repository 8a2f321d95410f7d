// src/exec/handle.rs

//! Handle to a supervised child process.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{ChildStderr, ChildStdout};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::args::SpawnOptions;
use crate::errors::{Result, ShellwrapError};
use crate::exec::output::{self, CapturedOutput};
use crate::exec::reaper::SharedState;
use crate::exec::signal::Termination;

/// Read-only view of a running or finished process.
///
/// [`ProcessHandle`] implements this by forwarding to the state it keeps for
/// the wrapped child.
pub trait Process {
    fn pid(&self) -> u32;

    /// The argv the process was launched with.
    fn argv(&self) -> &[String];

    /// `None` while the process has not been reaped.
    fn exit_status(&self) -> Option<ExitStatus>;

    /// Exit code once reaped; termination by signal `n` reads as `-n`.
    fn exit_code(&self) -> Option<i32> {
        self.exit_status().map(exit_code_of)
    }

    fn has_exited(&self) -> bool {
        self.exit_status().is_some()
    }

    /// Whether the watcher terminated this process for outliving its deadline.
    ///
    /// Always `false` until the process has exited.
    fn timed_out(&self) -> bool;
}

/// Convert an exit status into a single integer code.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return -sig;
        }
    }
    -1
}

/// A spawned child process, optionally watched by a deadline.
#[derive(Debug)]
pub struct ProcessHandle {
    pub(crate) pid: u32,
    pub(crate) argv: Vec<String>,
    pub(crate) spawn: SpawnOptions,
    pub(crate) timeout: Option<Duration>,
    pub(crate) stdout: Option<ChildStdout>,
    pub(crate) stderr: Option<ChildStderr>,
    pub(crate) output: Option<CapturedOutput>,
    pub(crate) state: Arc<SharedState>,
    pub(crate) exited: watch::Receiver<bool>,
    pub(crate) requests: mpsc::UnboundedSender<Termination>,
}

impl ProcessHandle {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.spawn.cwd.as_deref()
    }

    /// The replacement environment, if one was configured.
    pub fn env(&self) -> Option<&BTreeMap<String, String>> {
        self.spawn.env.as_ref()
    }

    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }

    /// Wait until the process has exited and return its status.
    ///
    /// Safe to call while the watcher is terminating the process, and again
    /// after the process has exited.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        if self.exited.wait_for(|done| *done).await.is_err() {
            // The reaper went away without recording an outcome.
            return Err(ShellwrapError::io(
                self.command_line(),
                std::io::Error::other("process reaper stopped unexpectedly"),
            ));
        }

        let exit = self.state.lock().exit;
        match exit {
            Some(Ok(status)) => Ok(status),
            Some(Err(kind)) => Err(ShellwrapError::io(
                self.command_line(),
                std::io::Error::from(kind),
            )),
            None => Err(ShellwrapError::io(
                self.command_line(),
                std::io::Error::other("process exit was not recorded"),
            )),
        }
    }

    /// Ask the process to terminate.
    ///
    /// Fails with [`ShellwrapError::AlreadyExited`] once the process has been
    /// reaped.
    pub fn terminate(&self) -> Result<()> {
        self.request(Termination::Terminate)
    }

    /// Forcefully kill the process.
    pub fn kill(&self) -> Result<()> {
        self.request(Termination::Kill)
    }

    fn request(&self, request: Termination) -> Result<()> {
        if self.has_exited() {
            return Err(ShellwrapError::AlreadyExited { pid: self.pid });
        }
        debug!(pid = self.pid, ?request, "termination requested by caller");
        self.requests
            .send(request)
            .map_err(|_| ShellwrapError::AlreadyExited { pid: self.pid })
    }

    /// Take the stdout pipe for streaming reads.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.stdout.take()
    }

    /// Take the stderr pipe for streaming reads.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.stderr.take()
    }

    /// Drain stdout and stderr concurrently to end-of-stream.
    ///
    /// The result is cached; later calls return the same data. Pipes already
    /// taken with [`take_stdout`](Self::take_stdout) or
    /// [`take_stderr`](Self::take_stderr) read as empty.
    pub async fn read_output(&mut self) -> Result<&CapturedOutput> {
        self.collect_output(None).await
    }

    /// Like [`read_output`](Self::read_output), but once the watcher has
    /// terminated the process, stop reading `grace` after it was reaped.
    ///
    /// A descendant that inherited the pipes can keep them open past the
    /// deadline; whatever was read before the cut-off is kept.
    pub async fn read_output_within(&mut self, grace: Duration) -> Result<&CapturedOutput> {
        self.collect_output(Some(grace)).await
    }

    async fn collect_output(&mut self, grace: Option<Duration>) -> Result<&CapturedOutput> {
        if self.output.is_none() {
            let mut stdout_pipe = self.stdout.take();
            let mut stderr_pipe = self.stderr.take();
            let mut captured = CapturedOutput::default();

            let finished = {
                let read = async {
                    tokio::try_join!(
                        output::drain_into(stdout_pipe.as_mut(), &mut captured.stdout),
                        output::drain_into(stderr_pipe.as_mut(), &mut captured.stderr),
                    )
                };
                let cut_off = self.timed_out_cut_off(grace);
                tokio::select! {
                    res = read => Some(res),
                    _ = cut_off => None,
                }
            };

            match finished {
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(ShellwrapError::io(self.command_line(), e)),
                None => warn!(
                    pid = self.pid,
                    stdout_bytes = captured.stdout.len(),
                    stderr_bytes = captured.stderr.len(),
                    "pipes still open after timed-out process was reaped; output truncated"
                ),
            }
            self.output = Some(captured);
        }
        Ok(self.output.get_or_insert_with(CapturedOutput::default))
    }

    /// Resolves `grace` after a timed-out process has been reaped; never
    /// resolves without a grace period or for a process that was not timed
    /// out.
    fn timed_out_cut_off(
        &self,
        grace: Option<Duration>,
    ) -> impl std::future::Future<Output = ()> + use<> {
        let mut exited = self.exited.clone();
        let state = Arc::clone(&self.state);
        async move {
            let Some(grace) = grace else {
                return std::future::pending().await;
            };
            if exited.wait_for(|done| *done).await.is_err() {
                return std::future::pending().await;
            }
            let timed_out = state.lock().timed_out;
            if !timed_out {
                return std::future::pending().await;
            }
            tokio::time::sleep(grace).await;
        }
    }

    /// Output captured by an earlier [`read_output`](Self::read_output).
    pub fn output(&self) -> Option<&CapturedOutput> {
        self.output.as_ref()
    }
}

impl Process for ProcessHandle {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn argv(&self) -> &[String] {
        &self.argv
    }

    fn exit_status(&self) -> Option<ExitStatus> {
        match self.state.lock().exit {
            Some(Ok(status)) => Some(status),
            _ => None,
        }
    }

    fn has_exited(&self) -> bool {
        self.state.lock().exit.is_some()
    }

    fn timed_out(&self) -> bool {
        let state = self.state.lock();
        state.exit.is_some() && state.timed_out
    }
}
