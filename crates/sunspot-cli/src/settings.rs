use std::path::PathBuf;

use anyhow::{Context, Result};
use sunspot_core::config::SunspotConfig;

/// Options shared by every subcommand.
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub data_root: Option<PathBuf>,
}

impl GlobalArgs {
    /// Configuration from `--config` (or defaults) with `--data-root` applied.
    pub fn load_config(&self) -> Result<SunspotConfig> {
        let mut config = match self.config {
            Some(ref path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => SunspotConfig::default(),
        };
        if let Some(ref root) = self.data_root {
            config.data_root = root.clone();
        }
        Ok(config)
    }
}
