// src/args/resolved.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Spawn-time options routed out of the reserved keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnOptions {
    /// Replacement environment for the child. `None` inherits the caller's.
    pub env: Option<BTreeMap<String, String>>,
    pub cwd: Option<PathBuf>,
}

/// A command line ready to execute: `(timeout, spawn options, argv)`.
///
/// Always derived from an [`ArgModel`](crate::args::ArgModel) on demand, never
/// stored alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub timeout: Option<Duration>,
    pub spawn: SpawnOptions,
    pub argv: Vec<String>,
}

impl ResolvedCommand {
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}
