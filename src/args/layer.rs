// src/args/layer.rs

//! A single stage of the argset stack and the per-layer resolution step.

use tracing::warn;

use crate::args::options::Options;
use crate::args::resolved::ResolvedCommand;
use crate::args::value::ArgValue;

/// Reserved key overriding the child's environment.
pub const ENV_KEY: &str = "__env";
/// Reserved key overriding the child's working directory.
pub const CWD_KEY: &str = "__cwd";
/// Reserved key setting the wall-clock deadline.
pub const TIMEOUT_KEY: &str = "__timeout";

/// Keys routed into spawn options / timeout instead of the argv.
pub const RESERVED_KEYS: [&str; 3] = [ENV_KEY, CWD_KEY, TIMEOUT_KEY];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Spell an option key as a command-line flag.
///
/// Precedence, first match wins:
/// - `__name` → `--name`
/// - `_name` → `-name`
/// - single character `x` → `-x`
/// - anything else → `--key`
///
/// Keys are not validated; `"_"` yields `-` and `"__"` yields `--`.
pub fn flag_for(key: &str) -> String {
    if let Some(rest) = key.strip_prefix("__") {
        format!("--{rest}")
    } else if let Some(rest) = key.strip_prefix('_') {
        format!("-{rest}")
    } else if key.chars().count() == 1 {
        format!("-{key}")
    } else {
        format!("--{key}")
    }
}

/// One `(positional arguments, named options)` pair of the argset stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgLayer {
    pub positional: Vec<String>,
    pub options: Options,
}

impl ArgLayer {
    pub fn new(positional: Vec<String>, options: Options) -> Self {
        Self {
            positional,
            options,
        }
    }

    /// A copy of this layer extended with more positionals and options.
    pub fn extended(&self, positional: Vec<String>, options: &Options) -> Self {
        let mut layer = self.clone();
        layer.positional.extend(positional);
        layer.options.merge(options);
        layer
    }

    /// Fold this layer into the partially resolved command.
    ///
    /// Reserved keys override whatever earlier layers set; positionals are
    /// appended before this layer's flags.
    pub fn apply(&self, mut acc: ResolvedCommand) -> ResolvedCommand {
        if let Some(value) = self.options.get(TIMEOUT_KEY) {
            acc.timeout = match value.as_duration() {
                Some(d) if !d.is_zero() => Some(d),
                _ if !value.is_truthy() => None,
                _ => {
                    warn!(key = TIMEOUT_KEY, ?value, "unusable timeout value; ignoring");
                    acc.timeout
                }
            };
        }

        if let Some(value) = self.options.get(CWD_KEY) {
            acc.spawn.cwd = if !value.is_truthy() {
                None
            } else if let Some(path) = value.as_path() {
                Some(path)
            } else {
                warn!(key = CWD_KEY, ?value, "unusable working directory; ignoring");
                acc.spawn.cwd.take()
            };
        }

        if let Some(value) = self.options.get(ENV_KEY) {
            acc.spawn.env = match value {
                ArgValue::Env(env) => Some(env.clone()),
                v if !v.is_truthy() => None,
                _ => {
                    warn!(key = ENV_KEY, ?value, "unusable environment override; ignoring");
                    acc.spawn.env.take()
                }
            };
        }

        acc.argv.extend(self.positional.iter().cloned());

        for (key, value) in self.options.iter() {
            if is_reserved(key) || !value.is_truthy() {
                continue;
            }
            acc.argv.push(flag_for(key));
            if !value.is_bare_flag() {
                acc.argv.push(value.to_arg());
            }
        }

        acc
    }
}
