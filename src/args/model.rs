// src/args/model.rs

//! The argument model: a binary name plus an immutable argset stack.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::args::layer::{ArgLayer, CWD_KEY, ENV_KEY, TIMEOUT_KEY};
use crate::args::options::Options;
use crate::args::resolved::ResolvedCommand;
use crate::errors::Result;
use crate::exec::{ProcessHandle, Supervisor};

/// Layered description of an external command.
///
/// Every composition method returns a fresh model; the receiver is never
/// mutated. Layers are shared between models through an `Arc`, so baking is
/// cheap even for deep stacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgModel {
    binary: String,
    layers: Arc<Vec<ArgLayer>>,
}

impl ArgModel {
    /// A model with a single layer.
    pub fn create<I, S>(binary: impl Into<String>, positional: I, options: Options) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            binary: binary.into(),
            layers: Arc::new(vec![ArgLayer::new(collect(positional), options)]),
        }
    }

    /// A model for `binary` with no arguments.
    pub fn new(binary: impl Into<String>) -> Self {
        Self::create(binary, no_args(), Options::new())
    }

    /// Extend the last layer with more positionals (appended) and options
    /// (merged, the new keys win).
    pub fn bake<I, S>(&self, positional: I, options: Options) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut layers: Vec<ArgLayer> = self.layers.as_ref().clone();
        match layers.last_mut() {
            Some(last) => *last = last.extended(collect(positional), &options),
            None => layers.push(ArgLayer::new(collect(positional), options)),
        }
        Self {
            binary: self.binary.clone(),
            layers: Arc::new(layers),
        }
    }

    /// Like [`ArgModel::bake`], but pushes the extension as a new terminal
    /// layer instead of merging it into the last one.
    pub fn after<I, S>(&self, positional: I, options: Options) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut layers: Vec<ArgLayer> = self.layers.as_ref().clone();
        layers.push(ArgLayer::new(collect(positional), options));
        Self {
            binary: self.binary.clone(),
            layers: Arc::new(layers),
        }
    }

    /// [`ArgModel::bake`] with options only.
    pub fn bake_options(&self, options: Options) -> Self {
        self.bake(no_args(), options)
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.bake_options(Options::new().with(TIMEOUT_KEY, timeout))
    }

    pub fn with_cwd(&self, cwd: impl Into<PathBuf>) -> Self {
        self.bake_options(Options::new().with(CWD_KEY, cwd.into()))
    }

    pub fn with_env(&self, env: BTreeMap<String, String>) -> Self {
        self.bake_options(Options::new().with(ENV_KEY, env))
    }

    /// Fold the argset stack into a command line.
    pub fn resolve(&self) -> ResolvedCommand {
        let init = ResolvedCommand {
            argv: vec![self.binary.clone()],
            ..Default::default()
        };
        self.layers.iter().fold(init, |acc, layer| layer.apply(acc))
    }

    pub fn working_directory(&self) -> Option<PathBuf> {
        self.resolve().spawn.cwd
    }

    pub fn environment(&self) -> Option<BTreeMap<String, String>> {
        self.resolve().spawn.env
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.resolve().timeout
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn layers(&self) -> &[ArgLayer] {
        &self.layers
    }

    /// Bake the extra arguments and spawn the result with default supervisor
    /// settings.
    pub fn call<I, S>(&self, positional: I, options: Options) -> Result<ProcessHandle>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Supervisor::default().spawn(&self.bake(positional, options).resolve())
    }
}

/// Empty positional list for calls that only pass options.
pub fn no_args() -> std::iter::Empty<String> {
    std::iter::empty()
}

fn collect<I, S>(positional: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    positional.into_iter().map(Into::into).collect()
}
