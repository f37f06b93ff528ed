//! # Featureflag config
//!
//! A [`featureflag`] evaluator driven by configuration files.
//!
//! The configuration is loaded in layers through the `config` crate: first a
//! file (its format follows the extension), then environment variables
//! prefixed with `FEATUREFLAG__`, with `__` separating nested keys. Environment
//! keys are lowercased, so `FEATUREFLAG__FEATURES__NEW_SEARCH=true` sets the
//! feature `new_search`.
//!
//! See [`model`] for the file format.
//!
//! ```rust,no_run
//! use featureflag_config::{ConfigEvaluator, FeatureConfig};
//!
//! # fn main() -> featureflag_config::Result<()> {
//! let config = FeatureConfig::load("features.toml")?;
//! featureflag::set_global_default(ConfigEvaluator::new(config));
//!
//! if featureflag::is_enabled!("new-checkout", false) {
//!     // ...
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod evaluator;
pub mod model;

use std::collections::HashMap;
use std::path::Path;

use config::{Config, Environment, File};
use tracing::info;

pub use crate::error::{ConfigError, ConfigErrorExt, Result};
pub use crate::evaluator::ConfigEvaluator;
pub use crate::model::FeatureConfig;

/// Prefix of environment variables overriding file settings.
pub const ENV_PREFIX: &str = "FEATUREFLAG";

impl FeatureConfig {
    /// Loads the configuration from `path`, overridden by the process environment.
    ///
    /// # Errors
    /// Fails if the file is missing or malformed, or if the merged settings do
    /// not match [`FeatureConfig`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_layers(path.as_ref(), None)
    }

    /// Like [`load`](Self::load), with `env` standing in for the process environment.
    ///
    /// # Errors
    /// See [`load`](Self::load).
    pub fn load_with_env(path: impl AsRef<Path>, env: HashMap<String, String>) -> Result<Self> {
        Self::load_layers(path.as_ref(), Some(env))
    }

    fn load_layers(path: &Path, env: Option<HashMap<String, String>>) -> Result<Self> {
        let builder = Config::builder().add_source(File::from(path).required(true)).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        info!("Loading feature configuration from {}", path.display());

        let config = builder
            .build()
            .context("Failed to build feature configuration")?
            .try_deserialize::<Self>()
            .context("Failed to deserialize feature configuration")?;

        info!(features = config.features.len(), "feature configuration loaded");
        Ok(config)
    }
}

impl ConfigEvaluator {
    /// Creates an evaluator from the configuration at `path`.
    ///
    /// # Errors
    /// See [`FeatureConfig::load`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        FeatureConfig::load(path).map(Self::new)
    }

    /// Reloads the configuration from `path`.
    ///
    /// The current configuration is kept when loading fails.
    ///
    /// # Errors
    /// See [`FeatureConfig::load`].
    pub fn reload_from(&self, path: impl AsRef<Path>) -> Result<()> {
        self.reload(FeatureConfig::load(path)?);
        Ok(())
    }
}
