use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::series::{MonthLabels, YearWindow};
use crate::data::view::ViewOptions;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PPP_DASHBOARD_CONFIG";

/// Config file picked up from the working directory when no override is set.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Dashboard settings, read from TOML.
///
/// ```toml
/// data_file = "data/datos_unificados_ppp_tesis.csv"
/// top_n = 10
/// min_year = 2000
/// month_labels = "es"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Table loaded at startup, if any.
    pub data_file: Option<PathBuf>,
    pub top_n: usize,
    /// First year shown in the yearly evolution chart.
    pub min_year: i32,
    pub month_labels: MonthLabels,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_file: None,
            top_n: 10,
            min_year: YearWindow::DEFAULT_FIRST_YEAR,
            month_labels: MonthLabels::Spanish,
            window_width: 1280.0,
            window_height: 860.0,
        }
    }
}

impl DashboardConfig {
    /// Load from `$PPP_DASHBOARD_CONFIG`, else `./dashboard.toml`, else defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DashboardConfig =
            toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        log::info!("loaded dashboard config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        if !(self.window_width > 0.0 && self.window_height > 0.0) {
            return Err(ConfigError::Invalid(
                "window dimensions must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            top_n: self.top_n,
            years: YearWindow::through_current_year(self.min_year),
            month_labels: self.month_labels,
        }
    }
}
