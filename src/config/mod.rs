//! Configuration handling for tsbun
//!
//! Locates and evaluates the optional `tsbun.config.ts` in the project root.
//! A broken config never stops a build: it is reported and ignored.

mod evaluator;
mod schema;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;
use crate::report::Reporter;

pub use evaluator::{BunEvaluator, ConfigEvaluator};
pub use schema::*;

/// Conventional config file name, relative to the working directory
pub const CONFIG_FILE: &str = "tsbun.config.ts";

/// Outcome of config loading
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: Option<BuildConfig>,
    pub path: Option<PathBuf>,
}

/// Loads `tsbun.config.ts` through a [`ConfigEvaluator`]
pub struct ConfigLoader<'a> {
    root: PathBuf,
    evaluator: &'a dyn ConfigEvaluator,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(root: impl Into<PathBuf>, evaluator: &'a dyn ConfigEvaluator) -> Self {
        Self {
            root: root.into(),
            evaluator,
        }
    }

    /// Path the loader looks at
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Load the config, degrading any failure to "no config" with a warning
    pub async fn load(&self, reporter: &Reporter) -> LoadedConfig {
        match self.try_load().await {
            Ok(loaded) => loaded,
            Err(err) => {
                debug!("Config load failed: {:?}", err);
                reporter.warning(format!("Ignoring {}: {}", CONFIG_FILE, err));
                LoadedConfig::default()
            }
        }
    }

    /// Load the config, surfacing failures
    pub async fn try_load(&self) -> Result<LoadedConfig, ConfigError> {
        let path = self.config_path();
        if !path.is_file() {
            debug!("No config file at {}", path.display());
            return Ok(LoadedConfig::default());
        }

        let json = self.evaluator.evaluate(&path).await?;
        let config = parse_config(&path, &json)?;
        debug!("Loaded config from {}: {:?}", path.display(), config);

        Ok(LoadedConfig {
            config: Some(config),
            path: Some(path),
        })
    }
}

fn parse_config(path: &Path, json: &str) -> Result<BuildConfig, ConfigError> {
    serde_json::from_str(json.trim()).map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}
