use anyhow::Context;
use seedpath_core::{SearchConfig, DEFAULT_MAX_INDEX};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub default_max_index: u32,
    pub json_output: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_max_index: DEFAULT_MAX_INDEX,
            json_output: false,
        }
    }
}

impl CliConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("seedpath").join("config.json"))
    }

    /// Reads `path` when given, otherwise the default location if a file
    /// exists there. Falls back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        SearchConfig::new(config.default_max_index)
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn search_config(&self, max_index: Option<u32>) -> SearchConfig {
        SearchConfig::new(max_index.unwrap_or(self.default_max_index))
    }
}
