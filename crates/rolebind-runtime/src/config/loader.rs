//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.rolebind/config.toml`)
//! 3. Project config (`.rolebind/config.toml`)
//! 4. Environment variables (`ROLEBIND_*`)
//!
//! Each layer overrides the previous.

use super::{
    default_config_path, ConfigError, RolebindConfig, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Helper macro for parsing boolean environment variables.
macro_rules! parse_env_bool {
    ($env:expr, $field:expr, $var:literal) => {
        if let Some(val) = $env($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```
/// use rolebind_runtime::config::{ConfigLoader, RolebindConfig};
///
/// let config = ConfigLoader::new()
///     .skip_global_config()
///     .skip_project_config()
///     .skip_env_vars()
///     .load()
///     .unwrap();
/// assert_eq!(config, RolebindConfig::default());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.rolebind/config.toml).
    global_config_path: Option<PathBuf>,

    /// Project root directory.
    project_root: Option<PathBuf>,

    /// Skip environment variable loading.
    skip_env: bool,

    /// Skip global config loading.
    skip_global: bool,

    /// Skip project config loading.
    skip_project: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_config_path: None,
            project_root: None,
            skip_env: false,
            skip_global: false,
            skip_project: false,
        }
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config will be loaded from `<project_root>/.rolebind/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    ///
    /// Useful for testing with deterministic config.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Skips project config loading.
    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any config file exists but cannot be
    /// parsed, or an environment variable holds an invalid value.
    /// Missing config files are silently ignored.
    pub fn load(&self) -> Result<RolebindConfig, ConfigError> {
        self.load_with_env(|name| std::env::var(name).ok())
    }

    /// Like [`load`](Self::load), reading variables through `env`.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_with_env<F>(&self, env: F) -> Result<RolebindConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = RolebindConfig::default();

        // Layer 1: Global config
        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global_config) = self.load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.merge(&global_config);
            }
        }

        // Layer 2: Project config
        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let project_config_path = project_root
                    .join(PROJECT_CONFIG_DIR)
                    .join(PROJECT_CONFIG_FILE);

                if let Some(project_config) = self.load_file(&project_config_path)? {
                    debug!(
                        path = %project_config_path.display(),
                        project = %project_root.display(),
                        "Loaded project config"
                    );
                    config.merge(&project_config);
                }
            }
        }

        // Layer 3: Environment variables
        if !self.skip_env {
            Self::apply_env_vars(&mut config, &env)?;
        }

        Ok(config)
    }

    /// Loads a config file, returning None if it doesn't exist.
    fn load_file(&self, path: &Path) -> Result<Option<RolebindConfig>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

        let config =
            RolebindConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

        Ok(Some(config))
    }

    /// Applies environment variable overrides.
    fn apply_env_vars<F>(config: &mut RolebindConfig, env: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        parse_env_bool!(env, config.debug, "ROLEBIND_DEBUG");
        parse_env_bool!(env, config.store.prune_locks, "ROLEBIND_PRUNE_LOCKS");

        if let Some(val) = env("ROLEBIND_LOG_LEVEL") {
            config.logging.level = Some(val);
        }

        if let Some(val) = env("ROLEBIND_STATE_FILE") {
            config.paths.state_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env("ROLEBIND_DIRECTORY_FILE") {
            config.paths.directory_file = Some(PathBuf::from(val));
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off" (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
