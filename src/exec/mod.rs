// src/exec/mod.rs

//! Process execution layer.
//!
//! This module spawns external programs with `tokio::process::Command` and
//! enforces wall-clock deadlines on them.
//!
//! - [`supervisor`] spawns a resolved command and, when a timeout is set,
//!   starts the watcher task that terminates an overdue process.
//! - [`reaper`] owns each OS child, waits for it and delivers termination
//!   requests; it is the only place a signal is sent from.
//! - [`handle`] is the caller's [`ProcessHandle`] and the [`Process`] trait it
//!   implements.
//! - [`output`] captures stdout/stderr.
//! - [`scope`] provides [`ScopedExecution`], which refuses to run without a
//!   deadline and always cleans up.
//! - [`signal`] maps termination requests onto OS signals.

pub mod handle;
pub mod output;
pub(crate) mod reaper;
pub mod scope;
pub mod signal;
pub mod supervisor;

pub use handle::{Process, ProcessHandle, exit_code_of};
pub use output::CapturedOutput;
pub use scope::ScopedExecution;
pub use signal::Termination;
pub use supervisor::{Supervisor, SupervisorOptions};
