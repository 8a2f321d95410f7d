// src/args/value.rs

//! Option values and their truthiness rules.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Value attached to a named option in an argset layer.
///
/// Ordinary options only look at [`ArgValue::is_truthy`] and
/// [`ArgValue::to_arg`]. The path, duration and environment variants exist
/// for the reserved keys (`__cwd`, `__timeout`, `__env`).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ArgValue {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Path(PathBuf),
    Duration(Duration),
    Env(BTreeMap<String, String>),
}

impl ArgValue {
    /// Falsy values (`false`, empty, zero, none) suppress the flag entirely.
    pub fn is_truthy(&self) -> bool {
        match self {
            ArgValue::None => false,
            ArgValue::Bool(b) => *b,
            ArgValue::Int(i) => *i != 0,
            ArgValue::Float(f) => *f != 0.0,
            ArgValue::Str(s) => !s.is_empty(),
            ArgValue::Path(p) => !p.as_os_str().is_empty(),
            ArgValue::Duration(d) => !d.is_zero(),
            ArgValue::Env(env) => !env.is_empty(),
        }
    }

    /// `true` emits a bare flag with no argument token.
    pub fn is_bare_flag(&self) -> bool {
        matches!(self, ArgValue::Bool(true))
    }

    /// String form used as the argument token following a flag.
    pub fn to_arg(&self) -> String {
        match self {
            ArgValue::None => String::new(),
            ArgValue::Bool(b) => b.to_string(),
            ArgValue::Int(i) => i.to_string(),
            ArgValue::Float(f) => f.to_string(),
            ArgValue::Str(s) => s.clone(),
            ArgValue::Path(p) => p.to_string_lossy().into_owned(),
            ArgValue::Duration(d) => d.as_secs_f64().to_string(),
            ArgValue::Env(env) => env
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Interpret the value as a timeout. Numbers are seconds.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            ArgValue::Duration(d) => Some(*d),
            ArgValue::Int(i) if *i > 0 => Some(Duration::from_secs(*i as u64)),
            ArgValue::Float(f) if *f > 0.0 => Duration::try_from_secs_f64(*f).ok(),
            ArgValue::Str(s) => crate::duration::parse_duration(s).ok(),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<PathBuf> {
        match self {
            ArgValue::Path(p) => Some(p.clone()),
            ArgValue::Str(s) => Some(PathBuf::from(s)),
            _ => None,
        }
    }

    pub fn as_env(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ArgValue::Env(env) => Some(env),
            _ => None,
        }
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Bool(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Int(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        ArgValue::Int(v as i64)
    }
}

impl From<u32> for ArgValue {
    fn from(v: u32) -> Self {
        ArgValue::Int(v as i64)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        ArgValue::Float(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Str(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::Str(v)
    }
}

impl From<&Path> for ArgValue {
    fn from(v: &Path) -> Self {
        ArgValue::Path(v.to_path_buf())
    }
}

impl From<PathBuf> for ArgValue {
    fn from(v: PathBuf) -> Self {
        ArgValue::Path(v)
    }
}

impl From<Duration> for ArgValue {
    fn from(v: Duration) -> Self {
        ArgValue::Duration(v)
    }
}

impl From<BTreeMap<String, String>> for ArgValue {
    fn from(v: BTreeMap<String, String>) -> Self {
        ArgValue::Env(v)
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ArgValue::None)
    }
}

/// Scalar shapes accepted from TOML (`options = { q = true, r = "HEAD" }`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawArgValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl<'de> Deserialize<'de> for ArgValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match RawArgValue::deserialize(deserializer)? {
            RawArgValue::Bool(b) => ArgValue::Bool(b),
            RawArgValue::Int(i) => ArgValue::Int(i),
            RawArgValue::Float(f) => ArgValue::Float(f),
            RawArgValue::Str(s) => ArgValue::Str(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_values() {
        for v in [
            ArgValue::None,
            ArgValue::Bool(false),
            ArgValue::Int(0),
            ArgValue::Float(0.0),
            ArgValue::Str(String::new()),
        ] {
            assert!(!v.is_truthy(), "{v:?} should be falsy");
        }
    }

    #[test]
    fn stringification() {
        assert_eq!(ArgValue::from(42).to_arg(), "42");
        assert_eq!(ArgValue::from(0.5).to_arg(), "0.5");
        assert_eq!(ArgValue::from("HEAD").to_arg(), "HEAD");
        assert!(ArgValue::from(true).is_bare_flag());
        assert!(!ArgValue::from("true").is_bare_flag());
    }

    #[test]
    fn timeouts_accept_numbers_and_strings() {
        assert_eq!(ArgValue::from(10).as_duration(), Some(Duration::from_secs(10)));
        assert_eq!(
            ArgValue::from(0.5).as_duration(),
            Some(Duration::from_millis(500))
        );
        assert_eq!(
            ArgValue::from("250ms").as_duration(),
            Some(Duration::from_millis(250))
        );
        assert_eq!(ArgValue::from(true).as_duration(), None);
    }

    #[test]
    fn out_of_range_floats_are_not_timeouts() {
        assert_eq!(ArgValue::from(1e30).as_duration(), None);
        assert_eq!(ArgValue::from(f64::INFINITY).as_duration(), None);
        assert_eq!(ArgValue::from(f64::NAN).as_duration(), None);
        assert_eq!(ArgValue::from("99999999999999999h").as_duration(), None);
    }
}
