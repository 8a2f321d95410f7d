// src/classify.rs

//! Error classification for finished processes.
//!
//! [`Classifier::check`] turns a process that exited non-zero or was
//! terminated by its watcher into a [`ShellwrapError`] carrying full
//! [`Diagnostics`]. Output is drained *before* waiting, so the pipes are read
//! while they are still open and stdout stays available to the caller. The
//! drain of a timed-out process is bounded, so the deadline holds even when a
//! descendant keeps the pipes open.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, info};

use crate::args::ArgModel;
use crate::errors::{Diagnostics, Result, ShellwrapError};
use crate::exec::{CapturedOutput, Process, ProcessHandle, Supervisor};

/// What goes into the diagnostics of a classified failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Environment variables copied into [`Diagnostics::env`].
    pub env_keys: Vec<String>,
    /// Maximum number of stderr bytes kept in [`Diagnostics::stderr`].
    pub stderr_limit: usize,
    /// How long to keep reading the pipes of a timed-out process after it
    /// was reaped. Descendants holding the pipes open are cut off after this.
    pub drain_grace: Duration,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            env_keys: default_env_keys(),
            stderr_limit: default_stderr_limit(),
            drain_grace: default_drain_grace(),
        }
    }
}

pub(crate) fn default_env_keys() -> Vec<String> {
    ["PATH", "HOME", "LANG", "LC_ALL"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn default_stderr_limit() -> usize {
    64 * 1024
}

pub(crate) fn default_drain_grace() -> Duration {
    Duration::from_millis(500)
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    options: ClassifierOptions,
}

impl Classifier {
    pub fn new(options: ClassifierOptions) -> Self {
        Self { options }
    }

    /// Drain output, wait for exit, then classify.
    ///
    /// A timeout wins over a plain non-zero exit. On success the captured
    /// output is returned. For a timed-out process, reading stops
    /// `drain_grace` after it was reaped even if the pipes are still open.
    pub async fn check(&self, handle: &mut ProcessHandle, label: &str) -> Result<CapturedOutput> {
        let output = handle
            .read_output_within(self.options.drain_grace)
            .await?
            .clone();
        let status = handle.wait().await?;

        let timed_out = handle.timed_out();
        let code = handle.exit_code();
        debug!(label, pid = handle.pid(), %status, timed_out, "classifying process");

        if timed_out {
            let diagnostics = self.diagnostics(handle, label, &output);
            info!(label, pid = handle.pid(), "process timed out");
            return Err(ShellwrapError::Timeout {
                timeout: handle.timeout().unwrap_or_default(),
                diagnostics: Box::new(diagnostics),
            });
        }

        match code {
            Some(0) => Ok(output),
            other => {
                let code = other.unwrap_or(-1);
                let diagnostics = self.diagnostics(handle, label, &output);
                info!(label, pid = handle.pid(), exit_code = code, "process failed");
                Err(ShellwrapError::NonZeroExit {
                    code,
                    diagnostics: Box::new(diagnostics),
                })
            }
        }
    }

    /// Build the diagnostic payload for `handle`.
    pub fn diagnostics(
        &self,
        handle: &ProcessHandle,
        label: &str,
        output: &CapturedOutput,
    ) -> Diagnostics {
        let limit = self.options.stderr_limit.min(output.stderr.len());
        Diagnostics {
            label: label.to_string(),
            argv: handle.argv().to_vec(),
            exit_code: handle.exit_code(),
            pid: Some(handle.pid()),
            cwd: handle.cwd().map(|p| p.to_path_buf()),
            env: self.filtered_env(handle.env()),
            stderr: String::from_utf8_lossy(&output.stderr[..limit]).into_owned(),
        }
    }

    /// Allowlisted variables as the child saw them: from the override map
    /// when one replaced the environment, otherwise from our own.
    fn filtered_env(&self, overrides: Option<&BTreeMap<String, String>>) -> BTreeMap<String, String> {
        self.options
            .env_keys
            .iter()
            .filter_map(|key| {
                let value = match overrides {
                    Some(env) => env.get(key).cloned(),
                    None => std::env::var(key).ok(),
                };
                value.map(|v| (key.clone(), v))
            })
            .collect()
    }
}

/// Spawn `model`, capture its output, wait and classify in one call.
pub async fn run_checked(model: &ArgModel, label: &str) -> Result<CapturedOutput> {
    let mut handle = Supervisor::default().spawn(&model.resolve())?;
    Classifier::default().check(&mut handle, label).await
}
