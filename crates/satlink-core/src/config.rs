//! # Analysis Configuration Files
//!
//! YAML-based configuration for a complete analysis run: link parameters,
//! altitude sampling, logging and plot bounds. Every section is optional and
//! falls back to the downlink reference analysis.
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `SATLINK_CONFIG` environment variable
//! 2. `./satlink.yaml` (current directory)
//! 3. `~/.config/satlink/config.yaml` (user config)
//! 4. `/etc/satlink/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! link:
//!   direction: uplink
//!   frequency_hz: 2.07e9
//!   tx_power_dbm: 45.0
//!   noise:
//!     system:
//!       kind: noise_figure
//!       noise_figure_db: 5.0
//!     antenna_k: 50.0
//!
//! sweep:
//!   start_km: 400
//!   end_km: 60000
//!   spacing:
//!     count: 500
//!
//! logging:
//!   level: debug
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LinkError;
use crate::observe::LogConfig;
use crate::params::{LinkConfiguration, LinkParams};
use crate::sweep::{AltitudeSampling, PlotBounds};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "SATLINK_CONFIG";

/// Error type for configuration file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("config not found: {0}")]
    NotFound(String),
    /// Failed to read or write configuration file
    #[error("failed to read config: {0}")]
    Read(String),
    /// Failed to parse configuration
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// Parsed configuration holds invalid values
    #[error(transparent)]
    Invalid(#[from] LinkError),
}

/// Complete analysis run description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub link: LinkParams,
    pub sweep: AltitudeSampling,
    pub logging: LogConfig,
    pub plot: PlotBounds,
}

impl AnalysisConfig {
    /// Load from the search path, falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load_from(&path);
            }
            return Err(ConfigError::NotFound(format!(
                "{} (from {CONFIG_ENV_VAR})",
                path.display()
            )));
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        tracing::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "loading configuration");
        Self::parse(&content)
    }

    /// Parse YAML text.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Write as YAML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_yaml()?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Candidate files after the environment variable, in priority order.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./satlink.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "satlink") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/satlink/config.yaml"));
        paths
    }

    /// Check the link parameters and the sampling.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.link.validate()?;
        self.sweep.validate()?;
        Ok(())
    }

    /// Validated link configuration.
    pub fn link_configuration(&self) -> Result<LinkConfiguration, ConfigError> {
        Ok(LinkConfiguration::new(self.link.clone())?)
    }

    /// Documented example: the uplink preset with the reference sweep.
    pub fn example_yaml() -> Result<String, ConfigError> {
        Self {
            link: LinkParams::uplink(),
            ..Default::default()
        }
        .to_yaml()
    }
}
