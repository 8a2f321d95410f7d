// src/lib.rs

//! Layered command-line construction and timeout-supervised process
//! execution.
//!
//! The pieces, leaf first:
//! - [`args`]: an [`ArgModel`] composes a command line from layered
//!   `(positional, options)` pairs and resolves it on demand.
//! - [`exec`]: the [`Supervisor`] spawns a resolved command and, when a
//!   deadline is set, runs a watcher that terminates an overdue process;
//!   [`ScopedExecution`] guarantees cleanup and refuses to run without one.
//! - [`classify`]: the [`Classifier`] turns a failed or timed-out process into
//!   a [`ShellwrapError`] with full diagnostics.
//!
//! ```no_run
//! use std::time::Duration;
//! use shellwrap::{ArgModel, Options, classify::run_checked};
//!
//! # async fn demo() -> shellwrap::errors::Result<()> {
//! let cvs = ArgModel::create("cvs", shellwrap::args::no_args(), Options::new().with("q", true))
//!     .with_timeout(Duration::from_secs(10))
//!     .with_cwd("/repo");
//! let update = cvs.after(["update"], Options::new().with("d", true));
//! let output = run_checked(&update, "update").await?;
//! for line in output.stdout_lines() {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod classify;
pub mod config;
pub mod duration;
pub mod errors;
pub mod exec;
pub mod logging;

pub use args::{ArgModel, ArgValue, Options, ResolvedCommand};
pub use classify::{Classifier, ClassifierOptions, run_checked};
pub use errors::{Diagnostics, ErrorKind, Result, ShellwrapError};
pub use exec::{
    CapturedOutput, Process, ProcessHandle, ScopedExecution, Supervisor, SupervisorOptions,
};
