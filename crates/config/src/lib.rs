#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for exbuild
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/exbuild/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;

use constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_OUTPUT_PREFIX, ENV_DRY_RUN, ENV_OUTPUT_PREFIX,
    ENV_REPOSITORY_ROOT,
};
use exbuild_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildConfig {
    #[serde(default = "default_output_prefix")]
    pub output_prefix: PathBuf,
    #[serde(default)]
    pub dry_run: bool,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PathConfig {
    pub repository_root: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_prefix: default_output_prefix(),
            dry_run: false,
        }
    }
}

fn default_output_prefix() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PREFIX)
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the default file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading configuration");
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds a value that cannot
    /// be interpreted.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_from(|key| std::env::var(key).ok())
    }

    /// Merge overrides from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if `EXBUILD_DRY_RUN` is not a recognised boolean.
    pub fn merge_from<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup(ENV_OUTPUT_PREFIX) {
            self.build.output_prefix = PathBuf::from(prefix);
        }

        if let Some(root) = lookup(ENV_REPOSITORY_ROOT) {
            self.paths.repository_root = Some(PathBuf::from(root));
        }

        if let Some(dry_run) = lookup(ENV_DRY_RUN) {
            self.build.dry_run = match dry_run.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_DRY_RUN.to_string(),
                        value: dry_run,
                    }
                    .into())
                }
            };
        }

        Ok(())
    }

    /// Repository root (defaults to the current directory)
    #[must_use]
    pub fn repository_root(&self) -> PathBuf {
        self.paths
            .repository_root
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Output prefix resolved against the current directory
    #[must_use]
    pub fn output_prefix(&self) -> PathBuf {
        let prefix = &self.build.output_prefix;
        if prefix.is_absolute() {
            prefix.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(prefix))
                .unwrap_or_else(|_| prefix.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.build.output_prefix, PathBuf::from("out"));
        assert!(!config.build.dry_run);
        assert!(config.paths.repository_root.is_none());
    }

    #[test]
    fn test_merge_overrides() {
        let mut config = Config::default();
        config
            .merge_from(lookup(&[
                (ENV_OUTPUT_PREFIX, "/tmp/out"),
                (ENV_REPOSITORY_ROOT, "/src/chip"),
                (ENV_DRY_RUN, "yes"),
            ]))
            .unwrap();

        assert_eq!(config.build.output_prefix, PathBuf::from("/tmp/out"));
        assert_eq!(config.repository_root(), PathBuf::from("/src/chip"));
        assert!(config.build.dry_run);
    }

    #[test]
    fn test_invalid_dry_run_value() {
        let mut config = Config::default();
        let err = config
            .merge_from(lookup(&[(ENV_DRY_RUN, "maybe")]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { ref field, .. }) if field == ENV_DRY_RUN
        ));
    }

    #[test]
    fn test_absolute_output_prefix_kept() {
        let mut config = Config::default();
        config.build.output_prefix = PathBuf::from("/var/out");
        assert_eq!(config.output_prefix(), PathBuf::from("/var/out"));
    }

    #[test]
    fn test_relative_output_prefix_resolved() {
        let config = Config::default();
        assert!(config.output_prefix().is_absolute());
        assert!(config.output_prefix().ends_with("out"));
    }
}
