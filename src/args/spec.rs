// src/args/spec.rs

//! Typed mapping from caller-facing argument names to tool options.
//!
//! A [`CommandSpec`] lets a wrapper expose friendly names (`revision`) while
//! emitting the tool's own option keys (`r`), converting each value to the
//! declared kind on the way.

use std::collections::BTreeMap;

use crate::args::options::Options;
use crate::args::value::ArgValue;
use crate::errors::{Result, ShellwrapError};

/// Target type of an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
}

impl ValueKind {
    fn convert(self, name: &str, value: &ArgValue) -> Result<ArgValue> {
        let invalid = || {
            ShellwrapError::InvalidArgument(format!(
                "argument '{}' expects {:?}, got {:?}",
                name, self, value
            ))
        };

        match (self, value) {
            (_, ArgValue::None) => Ok(ArgValue::None),
            (ValueKind::Str, v) => Ok(ArgValue::Str(v.to_arg())),
            (ValueKind::Int, ArgValue::Int(i)) => Ok(ArgValue::Int(*i)),
            (ValueKind::Int, ArgValue::Str(s)) => {
                s.trim().parse().map(ArgValue::Int).map_err(|_| invalid())
            }
            (ValueKind::Float, ArgValue::Float(f)) => Ok(ArgValue::Float(*f)),
            (ValueKind::Float, ArgValue::Int(i)) => Ok(ArgValue::Float(*i as f64)),
            (ValueKind::Float, ArgValue::Str(s)) => {
                s.trim().parse().map(ArgValue::Float).map_err(|_| invalid())
            }
            (ValueKind::Bool, v) => Ok(ArgValue::Bool(v.is_truthy())),
            _ => Err(invalid()),
        }
    }
}

/// How one caller-facing argument maps onto a tool option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    /// Option key emitted into the argset layer.
    pub param: String,
    pub kind: ValueKind,
    /// Used when the caller does not supply the argument.
    pub default: ArgValue,
}

impl OptionSpec {
    pub fn new(param: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            param: param.into(),
            kind,
            default: ArgValue::None,
        }
    }

    pub fn with_default(mut self, default: impl Into<ArgValue>) -> Self {
        self.default = default.into();
        self
    }

    /// Convert a supplied value, or fall back to the default.
    pub fn parse(&self, name: &str, value: Option<&ArgValue>) -> Result<ArgValue> {
        match value {
            None | Some(ArgValue::None) => Ok(self.default.clone()),
            Some(v) => self.kind.convert(name, v),
        }
    }
}

/// A set of named [`OptionSpec`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSpec {
    pub options: BTreeMap<String, OptionSpec>,
}

impl CommandSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn option(mut self, name: impl Into<String>, spec: OptionSpec) -> Self {
        self.options.insert(name.into(), spec);
        self
    }

    /// Split caller arguments into `(parsed, unparsed)`.
    ///
    /// Declared names are converted and re-keyed to their `param`; falsy
    /// results are dropped. Undeclared names are returned untouched.
    pub fn parse_arguments(&self, arguments: &Options) -> Result<(Options, Options)> {
        let mut parsed = Options::new();
        let mut unparsed = arguments.clone();

        for (name, spec) in &self.options {
            let supplied = unparsed.remove(name);
            let value = spec.parse(name, supplied.as_ref())?;
            if value.is_truthy() {
                parsed.set(spec.param.clone(), value);
            }
        }

        Ok((parsed, unparsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn checkout_spec() -> CommandSpec {
        CommandSpec::new()
            .option("revision", OptionSpec::new("r", ValueKind::Str))
            .option(
                "prune",
                OptionSpec::new("P", ValueKind::Bool).with_default(true),
            )
            .option("depth", OptionSpec::new("depth", ValueKind::Int))
    }

    #[test]
    fn parses_declared_and_keeps_unknown() {
        let args = Options::new()
            .with("revision", "HEAD")
            .with("depth", "3")
            .with("verbose", true);
        let (parsed, unparsed) = checkout_spec().parse_arguments(&args).unwrap();

        assert_eq!(parsed.get("r"), Some(&ArgValue::from("HEAD")));
        assert_eq!(parsed.get("P"), Some(&ArgValue::Bool(true)));
        assert_eq!(parsed.get("depth"), Some(&ArgValue::Int(3)));
        assert_eq!(unparsed.len(), 1);
        assert!(unparsed.contains_key("verbose"));
    }

    #[test]
    fn falsy_values_are_dropped() {
        let args = Options::new().with("prune", false).with("revision", "");
        let (parsed, _) = checkout_spec().parse_arguments(&args).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn conversion_failure_is_invalid_argument() {
        let args = Options::new().with("depth", "deep");
        let err = checkout_spec().parse_arguments(&args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("depth"));
    }
}
