//! Configuration errors.

use rolebind_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while layering config files and `ROLEBIND_*` variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("cannot read config '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file is not valid TOML for [`RolebindConfig`](super::RolebindConfig).
    #[error("invalid config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A `ROLEBIND_*` variable holds a value of the wrong shape.
    #[error("{name}: {message}")]
    InvalidEnvVar { name: String, message: String },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "CONFIG_READ_FILE",
            Self::ParseToml { .. } => "CONFIG_PARSE_TOML",
            Self::InvalidEnvVar { .. } => "CONFIG_INVALID_ENV_VAR",
        }
    }

    // The user can fix the file or the variable and rerun.
    fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidEnvVar { .. } | Self::ParseToml { .. })
    }
}
