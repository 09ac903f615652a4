//! Configuration resolver trait for layered overrides.
//!
//! # Architecture
//!
//! ```text
//! ConfigLoader.load()  →  RolebindConfig (base)
//!                              │
//!                              ▼
//!                     ConfigResolver.apply()
//!                              │
//!                              ▼
//!                     RolebindConfig (final)
//! ```
//!
//! # Example
//!
//! ```
//! use rolebind_runtime::config::{ConfigResolver, RolebindConfig};
//! use std::path::PathBuf;
//!
//! struct CliOverrides {
//!     state_file: Option<PathBuf>,
//! }
//!
//! impl ConfigResolver for CliOverrides {
//!     fn apply(&self, config: &mut RolebindConfig) {
//!         if let Some(path) = &self.state_file {
//!             config.paths.state_file = Some(path.clone());
//!         }
//!     }
//! }
//!
//! let mut config = RolebindConfig::default();
//! CliOverrides { state_file: Some("/tmp/state.json".into()) }.apply(&mut config);
//! assert!(config.paths.state_file.is_some());
//! ```

use super::RolebindConfig;

/// Trait for applying configuration overrides.
///
/// Separates config loading (file/env) from runtime overrides
/// (CLI flags, programmatic settings).
pub trait ConfigResolver {
    /// Applies overrides to the given configuration.
    ///
    /// Only non-None values should be applied, preserving existing values
    /// for unspecified options.
    fn apply(&self, config: &mut RolebindConfig);
}

/// No-op resolver that makes no changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResolver;

impl ConfigResolver for NoOpResolver {
    fn apply(&self, _config: &mut RolebindConfig) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_resolver_does_nothing() {
        let mut config = RolebindConfig::default();
        let original = config.clone();

        NoOpResolver.apply(&mut config);

        assert_eq!(config, original);
    }

    #[test]
    fn custom_resolver() {
        struct TestResolver {
            prune: Option<bool>,
        }

        impl ConfigResolver for TestResolver {
            fn apply(&self, config: &mut RolebindConfig) {
                if let Some(p) = self.prune {
                    config.store.prune_locks = p;
                }
            }
        }

        let mut config = RolebindConfig::default();
        assert!(config.store.prune_locks);

        TestResolver { prune: Some(false) }.apply(&mut config);

        assert!(!config.store.prune_locks);
    }
}
