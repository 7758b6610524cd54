use serde::{Deserialize, Serialize};

/// Overlay configuration, loadable from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// If true, location icons are always visible regardless of exploration
    /// status. Set to false to hide the icons beneath the fog of war.
    pub ignore_fog: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig { ignore_fog: true }
    }
}

impl OverlayConfig {
    /// Load config from a TOML file.
    #[cfg(feature = "bin")]
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = toml::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }
}
