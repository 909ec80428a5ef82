//! Configuration file handling.
//!
//! `AppConfig` is a plain value object. It is built once (TOML file, then
//! environment, then CLI flags) and passed explicitly to the engine and the
//! session; nothing reads configuration from global state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::CategorySource;
use crate::error::AppError;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sales.toml";

/// Environment variable overriding `data.path`.
pub const DATA_PATH_ENV: &str = "SALES_DATA_PATH";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application identity (shown in the "about" view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default = "default_author")]
    pub author: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            author: default_author(),
        }
    }
}

fn default_app_name() -> String {
    "Sales Insights".to_string()
}

fn default_author() -> String {
    "Sales Insights contributors".to_string()
}

/// Data source and fixture generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file holding the record set.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Number of records produced by `generate` / `regenerate`.
    #[serde(default = "default_records")]
    pub default_records: usize,

    /// Length of the generated history window, in days.
    #[serde(default = "default_history_days")]
    pub history_days: u32,

    /// Fixed generator seed (random when absent).
    #[serde(default)]
    pub seed: Option<u64>,

    /// Generate fixtures when the data file is missing.
    #[serde(default)]
    pub auto_generate: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            default_records: default_records(),
            history_days: default_history_days(),
            seed: None,
            auto_generate: false,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/sample_sales.csv")
}

fn default_records() -> usize {
    2000
}

fn default_history_days() -> u32 {
    90
}

/// Aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Default `n` for top products.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Number of trailing months averaged by the forecast.
    #[serde(default = "default_forecast_window")]
    pub forecast_window: usize,

    #[serde(default)]
    pub category_source: CategorySource,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            forecast_window: default_forecast_window(),
            category_source: CategorySource::default(),
        }
    }
}

fn default_top_n() -> usize {
    5
}

fn default_forecast_window() -> usize {
    3
}

/// Logging settings (used only by the binary when installing the subscriber).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// `tracing` level name: error, warn, info, debug, trace.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::new(2, format!("Failed to read config file '{}': {e}", path.display())))?;
        Self::from_toml(&content)
            .map_err(|e| AppError::new(2, format!("Failed to parse config file '{}': {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.normalize();
        Ok(config)
    }

    /// Resolve configuration for a run.
    ///
    /// An explicit path must exist; otherwise `sales.toml` is used when present,
    /// falling back to defaults. `.env` and `SALES_DATA_PATH` are applied last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        dotenvy::dotenv().ok();
        if let Ok(path) = std::env::var(DATA_PATH_ENV) {
            config.apply_data_path_override(&path);
        }
        Ok(config)
    }

    fn apply_data_path_override(&mut self, value: &str) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            self.data.path = PathBuf::from(trimmed);
        }
    }

    /// Clamp values that would make queries meaningless.
    fn normalize(&mut self) {
        self.analysis.forecast_window = self.analysis.forecast_window.max(1);
        self.data.history_days = self.data.history_days.max(1);
    }

    /// Short summary for start-up logging.
    pub fn summary(&self) -> String {
        format!(
            "app={} data={} default_records={} top_n={} category_source={:?}",
            self.general.app_name,
            self.data.path.display(),
            self.data.default_records,
            self.analysis.top_n,
            self.analysis.category_source,
        )
    }
}
