// src/config/validate.rs

use std::time::Duration;

use crate::config::{Config, RawConfigFile};
use crate::duration::parse_duration;
use crate::errors::{Result, ShellwrapError};

impl TryFrom<RawConfigFile> for Config {
    type Error = ShellwrapError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(Config::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_supervisor(cfg)?;
    if let Some(grace) = &cfg.diagnostics.drain_grace {
        parse_field("[diagnostics].drain_grace", grace)?;
    }
    validate_profiles(cfg)?;
    Ok(())
}

fn validate_supervisor(cfg: &RawConfigFile) -> Result<()> {
    if let Some(grace) = &cfg.supervisor.kill_grace {
        parse_field("[supervisor].kill_grace", grace)?;
    }
    if let Some(timeout) = &cfg.supervisor.default_timeout {
        nonzero_timeout("[supervisor].default_timeout", timeout)?;
    }
    Ok(())
}

fn validate_profiles(cfg: &RawConfigFile) -> Result<()> {
    for (name, profile) in cfg.profile.iter() {
        if profile.binary.trim().is_empty() {
            return Err(ShellwrapError::Config(format!(
                "profile '{}' has an empty `binary`",
                name
            )));
        }
        if let Some(timeout) = &profile.timeout {
            nonzero_timeout(&format!("[profile.{name}].timeout"), timeout)?;
        }
    }
    Ok(())
}

fn parse_field(field: &str, value: &str) -> Result<Duration> {
    parse_duration(value)
        .map_err(|e| ShellwrapError::Config(format!("{field}: {e}")))
}

fn nonzero_timeout(field: &str, value: &str) -> Result<Duration> {
    let d = parse_field(field, value)?;
    if d.is_zero() {
        return Err(ShellwrapError::Config(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(d)
}
