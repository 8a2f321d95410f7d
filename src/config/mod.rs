// src/config/mod.rs

//! TOML configuration: supervisor knobs, diagnostics settings and named
//! command profiles.
//!
//! [`RawConfigFile`] is what `serde` reads; [`Config`] is the validated form
//! the rest of the crate consumes.

pub mod loader;
pub mod model;
pub mod validate;

use crate::args::{ArgModel, CWD_KEY, ENV_KEY, TIMEOUT_KEY};
use crate::classify::ClassifierOptions;
use crate::duration::parse_duration;
use crate::errors::{Result, ShellwrapError};
use crate::exec::SupervisorOptions;
use crate::logging::LogLevel;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    DiagnosticsSection, LoggingSection, ProfileConfig, RawConfigFile, SupervisorSection,
};

/// Validated configuration.
///
/// Construct through `Config::try_from(raw)` or [`load_and_validate`]; all
/// duration strings are known to parse.
#[derive(Debug, Clone, Default)]
pub struct Config {
    raw: RawConfigFile,
}

impl Config {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &RawConfigFile {
        &self.raw
    }

    pub fn supervisor(&self) -> SupervisorOptions {
        SupervisorOptions {
            kill_grace: self
                .raw
                .supervisor
                .kill_grace
                .as_deref()
                .and_then(|s| parse_duration(s).ok()),
        }
    }

    pub fn classifier(&self) -> ClassifierOptions {
        ClassifierOptions {
            env_keys: self.raw.diagnostics.env_keys.clone(),
            stderr_limit: self.raw.diagnostics.stderr_limit,
            drain_grace: self
                .raw
                .diagnostics
                .drain_grace
                .as_deref()
                .and_then(|s| parse_duration(s).ok())
                .unwrap_or_else(crate::classify::default_drain_grace),
        }
    }

    pub fn log_level(&self) -> Option<LogLevel> {
        self.raw.logging.level
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.raw.profile.keys().map(String::as_str)
    }

    /// Build the argument model for profile `name`.
    ///
    /// The profile's timeout, working directory and environment are placed in
    /// the first layer under the reserved keys; `[supervisor].default_timeout`
    /// fills in a missing timeout.
    pub fn model(&self, name: &str) -> Result<ArgModel> {
        let profile = self
            .raw
            .profile
            .get(name)
            .ok_or_else(|| ShellwrapError::Config(format!("unknown profile '{name}'")))?;

        let mut options = profile.options.clone();

        let timeout = profile
            .timeout
            .as_deref()
            .or(self.raw.supervisor.default_timeout.as_deref())
            .and_then(|s| parse_duration(s).ok());
        if let Some(timeout) = timeout {
            options.set(TIMEOUT_KEY, timeout);
        }
        if let Some(cwd) = &profile.cwd {
            options.set(CWD_KEY, cwd.clone());
        }
        if let Some(env) = &profile.env {
            options.set(ENV_KEY, env.clone());
        }

        Ok(ArgModel::create(
            profile.binary.clone(),
            profile.args.clone(),
            options,
        ))
    }
}
