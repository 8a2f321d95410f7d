// src/errors.rs

//! Crate-wide error type.
//!
//! Every failure surfaced by the execution core is a [`ShellwrapError`]. The
//! variants produced by the classifier carry a boxed [`Diagnostics`] record so
//! the caller can log the full context of a failed run; the core itself never
//! prints it.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Diagnostic payload attached to classified failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Human-readable label of the command (e.g. `"checkout"`).
    pub label: String,
    /// The argv the process was launched with.
    pub argv: Vec<String>,
    /// Exit code; negative values carry the terminating signal number.
    pub exit_code: Option<i32>,
    pub pid: Option<u32>,
    pub cwd: Option<PathBuf>,
    /// Allowlisted subset of the child's environment.
    pub env: BTreeMap<String, String>,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
}

impl Diagnostics {
    /// The argv joined with spaces, for log lines and error messages.
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command `{}`", self.command_line())?;
        if let Some(pid) = self.pid {
            write!(f, ", pid {pid}")?;
        }
        if let Some(code) = self.exit_code {
            write!(f, ", exit code {code}")?;
        }
        if let Some(cwd) = &self.cwd {
            write!(f, ", cwd {}", cwd.display())?;
        }
        if !self.env.is_empty() {
            write!(f, ", env {:?}", self.env)?;
        }
        if !self.stderr.is_empty() {
            write!(f, ", stderr: {}", self.stderr.trim_end())?;
        }
        Ok(())
    }
}

/// Discriminant of a [`ShellwrapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidTarget,
    PermissionDenied,
    Timeout,
    NonZeroExit,
    Io,
    Config,
    InvalidArgument,
    AlreadyExited,
}

#[derive(Error, Debug)]
pub enum ShellwrapError {
    #[error("{label}: cannot execute target: {source}")]
    InvalidTarget {
        label: String,
        diagnostics: Box<Diagnostics>,
        #[source]
        source: std::io::Error,
    },

    #[error("{label}: permission denied: {source}")]
    PermissionDenied {
        label: String,
        diagnostics: Box<Diagnostics>,
        #[source]
        source: std::io::Error,
    },

    #[error("{} timed out after {timeout:?}", .diagnostics.label)]
    Timeout {
        timeout: Duration,
        diagnostics: Box<Diagnostics>,
    },

    #[error("{} failed with exit code {code}: {}", .diagnostics.label, .diagnostics.stderr.trim_end())]
    NonZeroExit {
        code: i32,
        diagnostics: Box<Diagnostics>,
    },

    #[error("{label}: I/O error: {source}")]
    Io {
        label: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("process {pid} has already exited")]
    AlreadyExited { pid: u32 },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ShellwrapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShellwrapError::InvalidTarget { .. } => ErrorKind::InvalidTarget,
            ShellwrapError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            ShellwrapError::Timeout { .. } => ErrorKind::Timeout,
            ShellwrapError::NonZeroExit { .. } => ErrorKind::NonZeroExit,
            ShellwrapError::Io { .. } => ErrorKind::Io,
            ShellwrapError::Config(_) | ShellwrapError::Toml(_) => ErrorKind::Config,
            ShellwrapError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ShellwrapError::AlreadyExited { .. } => ErrorKind::AlreadyExited,
        }
    }

    /// Diagnostic payload, for the kinds that carry one.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            ShellwrapError::InvalidTarget { diagnostics, .. }
            | ShellwrapError::PermissionDenied { diagnostics, .. }
            | ShellwrapError::Timeout { diagnostics, .. }
            | ShellwrapError::NonZeroExit { diagnostics, .. } => Some(diagnostics.as_ref()),
            _ => None,
        }
    }

    /// Map a spawn-time I/O failure onto the matching kind.
    pub(crate) fn from_spawn(label: &str, diagnostics: Diagnostics, err: std::io::Error) -> Self {
        let label = label.to_string();
        let diagnostics = Box::new(diagnostics);
        match err.kind() {
            std::io::ErrorKind::NotFound => ShellwrapError::InvalidTarget {
                label,
                diagnostics,
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => ShellwrapError::PermissionDenied {
                label,
                diagnostics,
                source: err,
            },
            _ => ShellwrapError::Io { label, source: err },
        }
    }

    pub(crate) fn io(label: impl Into<String>, source: std::io::Error) -> Self {
        ShellwrapError::Io {
            label: label.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShellwrapError>;
