//! Configuration loading and merging logic
//!
//! Handles loading configuration from its sources and applying them according
//! to precedence rules.

use super::{paths, schema::Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers applied
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Config file
    /// 3. Built-in defaults
    ///
    /// Command line flags are applied on top by the caller.
    pub fn load() -> Result<Config> {
        let config = match paths::config_file() {
            Some(path) if path.exists() => Self::load_file(&path)?,
            Some(path) => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Self::load_defaults()
            }
            None => {
                tracing::debug!("No config directory available, using defaults");
                Self::load_defaults()
            }
        };

        let config = Self::apply_env_overrides(config, |key| std::env::var(key).ok());
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Check values serde cannot reject on its own
    pub fn validate(config: &Config) -> Result<()> {
        if config.default_namespace.is_empty() {
            return Err(anyhow::anyhow!("defaultNamespace must not be empty"));
        }
        if config.max_concurrent_listings == 0 {
            return Err(anyhow::anyhow!("maxConcurrentListings must be at least 1"));
        }
        if config.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("requestTimeoutSeconds must be at least 1"));
        }

        for (index, spec) in config.kinds.iter().enumerate() {
            if spec.kind.is_empty() || spec.version.is_empty() || spec.plural.is_empty() {
                return Err(anyhow::anyhow!(
                    "kinds[{}] needs kind, version and plural",
                    index
                ));
            }
            if config.kinds[..index].iter().any(|s| s.kind == spec.kind) {
                return Err(anyhow::anyhow!("kind {} is listed more than once", spec.kind));
            }
        }

        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// `lookup` reads a variable; tests pass a map instead of the process environment.
    pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        // KUBE_LINEAGE_NAMESPACE override
        if let Some(namespace) = lookup("KUBE_LINEAGE_NAMESPACE").filter(|ns| !ns.is_empty()) {
            config.default_namespace = namespace;
        }

        // KUBE_LINEAGE_OUTPUT override
        if let Some(output) = lookup("KUBE_LINEAGE_OUTPUT") {
            match output.parse() {
                Ok(format) => config.output = format,
                Err(e) => tracing::warn!("Ignoring KUBE_LINEAGE_OUTPUT: {}", e),
            }
        }

        // KUBE_LINEAGE_TIMEOUT override
        if let Some(timeout) = lookup("KUBE_LINEAGE_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(seconds) => config.timeout_seconds = seconds,
                Err(e) => tracing::warn!("Ignoring KUBE_LINEAGE_TIMEOUT={:?}: {}", timeout, e),
            }
        }

        config
    }
}
