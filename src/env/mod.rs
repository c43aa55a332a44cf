//! Environment access for credential switching.
//!
//! All switch/restore logic is written against the [`Environment`] trait.
//! [`ProcessEnv`] reads and writes the real process environment, while
//! [`MapEnv`] keeps variables in memory for embedding and tests.

mod scope;

pub use scope::EnvScope;
pub(crate) use scope::lock_env;
#[cfg(test)]
pub(crate) use scope::env_locked;

use std::collections::BTreeMap;

/// A mutable set of environment variables.
pub trait Environment: Send {
    /// Returns the variable's value, or `None` if it is unset.
    fn var(&self, name: &str) -> Option<String>;

    /// Whether the variable is set at all, even to a value [`var`](Self::var)
    /// can't return.
    fn is_set(&self, name: &str) -> bool {
        self.var(name).is_some()
    }

    /// Sets the variable, replacing any previous value.
    fn set_var(&mut self, name: &str, value: &str);

    /// Removes the variable. Does nothing if it is unset.
    fn remove_var(&mut self, name: &str);
}

/// The process environment (`std::env`).
///
/// The process environment is shared by every thread, so writes should only
/// happen inside an [`EnvScope`], which serializes them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn is_set(&self, name: &str) -> bool {
        std::env::var_os(name).is_some()
    }

    fn set_var(&mut self, name: &str, value: &str) {
        std::env::set_var(name, value);
    }

    fn remove_var(&mut self, name: &str) {
        if std::env::var_os(name).is_some() {
            std::env::remove_var(name);
        }
    }
}

/// An in-memory environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an environment from `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Whether the variable is set.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }
}

impl Environment for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set_var(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    fn remove_var(&mut self, name: &str) {
        self.vars.remove(name);
    }
}
