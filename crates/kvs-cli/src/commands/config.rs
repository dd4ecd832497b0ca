//! Configuration loading and `kvs-retention config`.

use anyhow::{Context, Result};
use kvs_core::StandardizerConfig;
use std::path::Path;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "kvs-retention.yaml";

/// Load the explicit config file, else `./kvs-retention.yaml` if it exists,
/// else built-in defaults.
pub fn load(path: Option<&Path>) -> Result<StandardizerConfig> {
    match path {
        Some(path) => StandardizerConfig::load_with_context(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                StandardizerConfig::load_with_context(fallback)
                    .with_context(|| format!("failed to load config from {}", DEFAULT_CONFIG_FILE))
            } else {
                Ok(StandardizerConfig::default())
            }
        }
    }
}

/// Print the effective configuration as YAML.
pub fn show(config: &StandardizerConfig) -> Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}
