// src/args/mod.rs

//! Argument model.
//!
//! A command is described by a binary name plus an *argset stack*: an ordered
//! list of `(positional, options)` layers. Resolution is a pure fold over the
//! stack that produces a [`ResolvedCommand`].
//!
//! - [`value`] holds option values and their truthiness rules.
//! - [`options`] is the insertion-ordered option map of a layer.
//! - [`layer`] implements the flag naming convention and reserved keys.
//! - [`model`] is the public [`ArgModel`] (`create` / `bake` / `after` /
//!   `resolve`).
//! - [`spec`] maps friendly argument names onto typed tool options.

pub mod layer;
pub mod model;
pub mod options;
pub mod resolved;
pub mod spec;
pub mod value;

pub use layer::{ArgLayer, CWD_KEY, ENV_KEY, RESERVED_KEYS, TIMEOUT_KEY, flag_for};
pub use model::{ArgModel, no_args};
pub use options::Options;
pub use resolved::{ResolvedCommand, SpawnOptions};
pub use spec::{CommandSpec, OptionSpec, ValueKind};
pub use value::ArgValue;
