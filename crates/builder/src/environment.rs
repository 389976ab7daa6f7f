//! Read access to environment variables
//!
//! Builders read toolchain locations from the environment at query time.
//! Going through [`EnvironmentAccess`] keeps that read injectable so callers
//! can supply a fixed set of variables instead of the process environment.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Source of environment variables
pub trait EnvironmentAccess: Send + Sync {
    /// Look up a variable, `None` when it is not set
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the live process environment on every lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EnvironmentAccess for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory variable set that can be changed after it is handed out
#[derive(Debug, Default)]
pub struct MapEnvironment {
    vars: RwLock<HashMap<String, String>>,
}

impl MapEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            vars: RwLock::new(vars),
        }
    }

    /// Set or replace a variable
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Remove a variable
    pub fn remove(&self, key: &str) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl EnvironmentAccess for MapEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}
