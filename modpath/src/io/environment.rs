//! Read access to the live process environment.
//!
//! The [`EnvironmentPort`] trait keeps the rest of the crate away from
//! `std::env`, so path-list loading and variable expansion can be tested
//! against a plain map.

#[cfg(any(test, feature = "test-support"))]
use std::collections::BTreeMap;
use std::env::{self, VarError};

use anyhow::{Result, anyhow};
use tracing::debug;

use crate::core::path_list::PathList;

/// Read-only view of environment variables.
pub trait EnvironmentPort {
    /// Value of `name`, or `None` if it is not set.
    fn var(&self, name: &str) -> Result<Option<String>>;
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentPort for ProcessEnvironment {
    fn var(&self, name: &str) -> Result<Option<String>> {
        match env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(anyhow!("{name} is not valid unicode")),
        }
    }
}

/// Fixed set of variables, for tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: BTreeMap<String, String>,
}

#[cfg(any(test, feature = "test-support"))]
impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

#[cfg(any(test, feature = "test-support"))]
impl EnvironmentPort for MapEnvironment {
    fn var(&self, name: &str) -> Result<Option<String>> {
        Ok(self.vars.get(name).cloned())
    }
}

/// Resolve a variable for expansion. Unreadable values count as unset.
pub fn lookup_var<E: EnvironmentPort + ?Sized>(env: &E, name: &str) -> Option<String> {
    env.var(name).ok().flatten()
}

/// Load `variable` and split it into segments.
///
/// An unset variable is an empty list. A set but empty value is a single
/// empty segment, like any other value split on `separator`.
pub fn load_path_list<E: EnvironmentPort + ?Sized>(
    env: &E,
    variable: &str,
    separator: char,
) -> Result<PathList> {
    let Some(raw) = env.var(variable)? else {
        debug!(variable, "variable not set, starting from an empty list");
        return Ok(PathList::default());
    };
    let list = PathList::split(&raw, separator);
    debug!(variable, segments = list.len(), "loaded path list");
    Ok(list)
}
