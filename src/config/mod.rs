//! Configuration management for salesforecast
//!
//! Settings come from, in increasing precedence:
//! - built-in defaults
//! - a YAML or TOML configuration file
//! - `SALESFORECAST_*` environment variables
//! - command-line flags (applied by the binary)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::time_series::{AdditiveModelConfig, SeasonalitySetting};
use crate::vis::config::{OutputType, PlotSettings};

pub mod loader;
pub mod validation;

pub use loader::{apply_env, load_from_env, load_from_file, load_with_precedence};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesForecastConfig {
    /// Where the sales table comes from
    pub input: InputConfig,
    /// Model and horizon settings
    pub forecast: ForecastConfig,
    /// Chart output settings
    pub output: OutputConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Input table configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Spreadsheet or CSV file
    pub path: PathBuf,
    /// Sheet to read; the first sheet when unset
    pub sheet: Option<String>,
    /// Column holding the sale dates
    pub date_column: String,
    /// Column holding the units sold
    pub value_column: String,
}

/// Forecast configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of future periods to predict
    pub horizon: usize,
    pub yearly_seasonality: SeasonalitySetting,
    pub weekly_seasonality: SeasonalitySetting,
    pub daily_seasonality: SeasonalitySetting,
    /// Width of the uncertainty interval
    pub interval_width: f64,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    /// Also fit a default-configured model and log both fit metrics
    pub compare_default: bool,
}

/// Chart output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the chart files
    pub directory: PathBuf,
    /// Image format
    pub format: OutputType,
    /// Chart width (pixels)
    pub width: u32,
    /// Chart height (pixels)
    pub height: u32,
    /// Render charts at all
    pub render: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (text, json)
    pub format: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sales_data.xlsx"),
            sheet: None,
            date_column: "date".to_string(),
            value_column: "units_sold".to_string(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 90,
            yearly_seasonality: SeasonalitySetting::Enabled,
            weekly_seasonality: SeasonalitySetting::Auto,
            daily_seasonality: SeasonalitySetting::Disabled,
            interval_width: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            compare_default: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            format: OutputType::PNG,
            width: 1000,
            height: 600,
            render: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl SalesForecastConfig {
    /// Load configuration from a file, environment, or defaults
    pub fn load<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        load_with_precedence(config_file)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigurationError(format!("Failed to serialize to TOML: {}", e)))
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigurationError(format!("Failed to serialize to YAML: {}", e)))
    }
}

impl ForecastConfig {
    /// Model settings for the configured forecast
    pub fn model_config(&self) -> AdditiveModelConfig {
        AdditiveModelConfig {
            yearly_seasonality: self.yearly_seasonality,
            weekly_seasonality: self.weekly_seasonality,
            daily_seasonality: self.daily_seasonality,
            interval_width: self.interval_width,
            changepoint_prior_scale: self.changepoint_prior_scale,
            seasonality_prior_scale: self.seasonality_prior_scale,
            ..AdditiveModelConfig::default()
        }
    }
}

impl OutputConfig {
    /// Plot settings sized and formatted for this output
    pub fn plot_settings(&self) -> PlotSettings {
        PlotSettings {
            width: self.width,
            height: self.height,
            output_type: self.format,
            ..PlotSettings::default()
        }
    }

    /// `<directory>/<stem>.<png|svg>`
    pub fn chart_path(&self, stem: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", stem, self.format.extension()))
    }
}
