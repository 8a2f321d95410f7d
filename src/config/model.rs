// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::args::Options;
use crate::logging::LogLevel;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [supervisor]
/// kill_grace = "2s"
/// default_timeout = "30s"
///
/// [diagnostics]
/// env_keys = ["PATH", "HOME", "CVSROOT"]
///
/// [profile.cvs]
/// binary = "cvs"
/// options = { q = true }
/// timeout = "10s"
/// cwd = "/repo"
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub supervisor: SupervisorSection,

    #[serde(default)]
    pub diagnostics: DiagnosticsSection,

    #[serde(default)]
    pub logging: LoggingSection,

    /// Named command profiles from `[profile.<name>]`.
    #[serde(default)]
    pub profile: BTreeMap<String, ProfileConfig>,
}

/// `[supervisor]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SupervisorSection {
    /// Grace period before a terminated process is killed (e.g. `"2s"`).
    #[serde(default)]
    pub kill_grace: Option<String>,

    /// Timeout for profiles that do not set their own.
    #[serde(default)]
    pub default_timeout: Option<String>,
}

/// `[diagnostics]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsSection {
    #[serde(default = "crate::classify::default_env_keys")]
    pub env_keys: Vec<String>,

    #[serde(default = "crate::classify::default_stderr_limit")]
    pub stderr_limit: usize,

    /// How long output of a timed-out process is still read (e.g. `"500ms"`).
    #[serde(default)]
    pub drain_grace: Option<String>,
}

impl Default for DiagnosticsSection {
    fn default() -> Self {
        Self {
            env_keys: crate::classify::default_env_keys(),
            stderr_limit: crate::classify::default_stderr_limit(),
            drain_grace: None,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: Option<LogLevel>,
}

/// `[profile.<name>]` section: the first layer of an argument model.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    pub binary: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub options: Options,

    #[serde(default)]
    pub timeout: Option<String>,

    #[serde(default)]
    pub cwd: Option<PathBuf>,

    #[serde(default)]
    pub env: Option<BTreeMap<String, String>>,
}
