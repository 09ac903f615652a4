//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌─────────────────────────────────────────────┐
//! │  1. Environment Variables (ROLEBIND_*)      │  Runtime override
//! ├─────────────────────────────────────────────┤
//! │  2. Project Config (.rolebind/config.toml)  │  Project-specific
//! ├─────────────────────────────────────────────┤
//! │  3. Global Config (~/.rolebind/config.toml) │  User defaults
//! ├─────────────────────────────────────────────┤
//! │  4. Default Values (compile-time)           │  Fallback
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Directory Structure
//!
//! ```text
//! ~/.rolebind/                 # Global directory
//! ├── config.toml              # Global configuration
//! ├── state.json               # Relationship snapshot (default)
//! └── directory.json           # Known users and groups (default)
//!
//! <project>/.rolebind/
//! └── config.toml              # Project configuration (overrides global)
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `ROLEBIND_DEBUG` | `debug` | bool |
//! | `ROLEBIND_STATE_FILE` | `paths.state_file` | PathBuf |
//! | `ROLEBIND_DIRECTORY_FILE` | `paths.directory_file` | PathBuf |
//! | `ROLEBIND_LOG_LEVEL` | `logging.level` | String |
//! | `ROLEBIND_PRUNE_LOCKS` | `store.prune_locks` | bool |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.rolebind/config.toml
//! debug = false
//!
//! [paths]
//! state_file = "~/.rolebind/state.json"
//! directory_file = "~/.rolebind/directory.json"
//!
//! [logging]
//! level = "info"
//!
//! [store]
//! prune_locks = true
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::{ConfigResolver, NoOpResolver};
pub use types::{
    LoggingConfig, PathsConfig, RolebindConfig, StoreConfig, DEFAULT_DIRECTORY_FILE,
    DEFAULT_STATE_FILE,
};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".rolebind")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".rolebind";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
