//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default snapshot file name inside the global config directory.
pub const DEFAULT_STATE_FILE: &str = "state.json";

/// Default directory file name inside the global config directory.
pub const DEFAULT_DIRECTORY_FILE: &str = "directory.json";

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use rolebind_runtime::config::RolebindConfig;
///
/// let config = RolebindConfig::default();
/// assert!(!config.debug);
/// assert!(config.store.prune_locks);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RolebindConfig {
    /// Enable debug logging.
    pub debug: bool,

    /// File locations.
    pub paths: PathsConfig,

    /// Log filter settings.
    pub logging: LoggingConfig,

    /// Binding service settings.
    pub store: StoreConfig,
}

impl RolebindConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.paths.merge(&other.paths);
        self.logging.merge(&other.logging);
        self.store.merge(&other.store);
    }

    /// The effective log filter directive.
    ///
    /// `debug = true` wins over `logging.level`.
    #[must_use]
    pub fn log_directive(&self) -> Option<&str> {
        if self.debug {
            Some("debug")
        } else {
            self.logging.level.as_deref()
        }
    }
}

/// Path configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    /// Relationship snapshot file.
    pub state_file: Option<PathBuf>,

    /// Directory file listing known users and groups.
    pub directory_file: Option<PathBuf>,
}

impl PathsConfig {
    fn merge(&mut self, other: &Self) {
        if other.state_file.is_some() {
            self.state_file = other.state_file.clone();
        }
        if other.directory_file.is_some() {
            self.directory_file = other.directory_file.clone();
        }
    }

    /// Returns the snapshot file, falling back to `~/.rolebind/state.json`.
    #[must_use]
    pub fn state_file_or_default(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| super::default_config_dir().join(DEFAULT_STATE_FILE))
    }

    /// Returns the directory file, falling back to `~/.rolebind/directory.json`.
    #[must_use]
    pub fn directory_file_or_default(&self) -> PathBuf {
        self.directory_file
            .clone()
            .unwrap_or_else(|| super::default_config_dir().join(DEFAULT_DIRECTORY_FILE))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"rolebind_runtime=debug"`.
    pub level: Option<String>,
}

impl LoggingConfig {
    fn merge(&mut self, other: &Self) {
        if other.level.is_some() {
            self.level = other.level.clone();
        }
    }
}

/// Binding service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Drop a pair's lock once the pair has no roles left.
    pub prune_locks: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { prune_locks: true }
    }
}

impl StoreConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.prune_locks != default.prune_locks {
            self.prune_locks = other.prune_locks;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RolebindConfig::default();
        assert!(!config.debug);
        assert!(config.paths.state_file.is_none());
        assert!(config.logging.level.is_none());
        assert!(config.store.prune_locks);
    }

    #[test]
    fn toml_roundtrip() {
        let config = RolebindConfig {
            debug: true,
            paths: PathsConfig {
                state_file: Some(PathBuf::from("/tmp/state.json")),
                directory_file: None,
            },
            logging: LoggingConfig {
                level: Some("info".into()),
            },
            store: StoreConfig { prune_locks: false },
        };
        let toml = toml::to_string_pretty(&config).expect("should serialize config to TOML");
        let restored =
            RolebindConfig::from_toml(&toml).expect("should deserialize roundtripped TOML");
        assert_eq!(config, restored);
    }

    #[test]
    fn toml_partial_parse() {
        let toml = r#"
[paths]
state_file = "/srv/rolebind/state.json"
"#;
        let config =
            RolebindConfig::from_toml(toml).expect("should parse partial TOML with defaults");
        assert_eq!(
            config.paths.state_file,
            Some(PathBuf::from("/srv/rolebind/state.json"))
        );
        // Defaults for unspecified fields
        assert!(!config.debug);
        assert!(config.store.prune_locks);
    }

    #[test]
    fn merge_overrides_non_default() {
        let mut base = RolebindConfig::default();
        let overlay = RolebindConfig {
            debug: true,
            store: StoreConfig { prune_locks: false },
            ..Default::default()
        };

        base.merge(&overlay);

        assert!(base.debug);
        assert!(!base.store.prune_locks);
        assert!(base.logging.level.is_none());
    }

    #[test]
    fn merge_keeps_base_when_overlay_is_default() {
        let mut base = RolebindConfig {
            debug: true,
            logging: LoggingConfig {
                level: Some("warn".into()),
            },
            ..Default::default()
        };

        base.merge(&RolebindConfig::default());

        assert!(base.debug);
        assert_eq!(base.logging.level.as_deref(), Some("warn"));
    }

    #[test]
    fn log_directive_prefers_debug() {
        let mut config = RolebindConfig {
            logging: LoggingConfig {
                level: Some("info".into()),
            },
            ..Default::default()
        };
        assert_eq!(config.log_directive(), Some("info"));

        config.debug = true;
        assert_eq!(config.log_directive(), Some("debug"));
    }

    #[test]
    fn path_defaults_live_in_config_dir() {
        let paths = PathsConfig::default();
        assert!(paths.state_file_or_default().ends_with(".rolebind/state.json"));
        assert!(paths
            .directory_file_or_default()
            .ends_with(".rolebind/directory.json"));
    }
}
