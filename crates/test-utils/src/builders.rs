// crates/test-utils/src/builders.rs

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use shellwrap::args::no_args;
use shellwrap::config::{Config, ProfileConfig, RawConfigFile};
use shellwrap::{ArgModel, Options};

/// `sh -c <script>` as an argument model.
pub fn sh(script: &str) -> ArgModel {
    ArgModel::create("sh", ["-c", script], Options::new())
}

/// `sh -c <script>` with a deadline.
pub fn sh_with_timeout(script: &str, timeout: Duration) -> ArgModel {
    sh(script).with_timeout(timeout)
}

/// `sleep <secs>`.
pub fn sleep_for(secs: &str) -> ArgModel {
    ArgModel::create("sleep", [secs], Options::new())
}

/// A model for a binary that does not exist.
pub fn missing_binary() -> ArgModel {
    ArgModel::create("shellwrap-no-such-binary", no_args(), Options::new())
}

/// Builder for `Config` to simplify test setup.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_profile(mut self, name: &str, profile: ProfileConfig) -> Self {
        self.config.profile.insert(name.to_string(), profile);
        self
    }

    pub fn with_kill_grace(mut self, grace: &str) -> Self {
        self.config.supervisor.kill_grace = Some(grace.to_string());
        self
    }

    pub fn with_default_timeout(mut self, timeout: &str) -> Self {
        self.config.supervisor.default_timeout = Some(timeout.to_string());
        self
    }

    pub fn with_env_keys(mut self, keys: &[&str]) -> Self {
        self.config.diagnostics.env_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn build(self) -> Config {
        Config::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ProfileConfig`.
pub struct ProfileBuilder {
    profile: ProfileConfig,
}

impl ProfileBuilder {
    pub fn new(binary: &str) -> Self {
        Self {
            profile: ProfileConfig {
                binary: binary.to_string(),
                args: vec![],
                options: Options::new(),
                timeout: None,
                cwd: None,
                env: None,
            },
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.profile.args.push(arg.to_string());
        self
    }

    pub fn option(mut self, key: &str, value: impl Into<shellwrap::ArgValue>) -> Self {
        self.profile.options.set(key, value);
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.profile.timeout = Some(timeout.to_string());
        self
    }

    pub fn cwd(mut self, cwd: &str) -> Self {
        self.profile.cwd = Some(cwd.into());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.profile
            .env
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> ProfileConfig {
        self.profile
    }
}
