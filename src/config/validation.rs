//! Configuration validation utilities

use super::*;
use crate::core::error::{Error, Result};

/// Log formats understood by the binary
pub const LOG_FORMATS: &[&str] = &["text", "json"];

/// Validate the entire configuration
pub fn validate_config(config: &SalesForecastConfig) -> Result<()> {
    validate_input_config(&config.input)?;
    validate_forecast_config(&config.forecast)?;
    validate_output_config(&config.output)?;
    validate_logging_config(&config.logging)?;

    Ok(())
}

/// Validate input configuration
pub fn validate_input_config(config: &InputConfig) -> Result<()> {
    if config.path.as_os_str().is_empty() {
        return Err(Error::ConfigurationError(
            "input.path must not be empty".to_string(),
        ));
    }

    if config.date_column.trim().is_empty() || config.value_column.trim().is_empty() {
        return Err(Error::ConfigurationError(
            "input column names must not be empty".to_string(),
        ));
    }

    if config.date_column == config.value_column {
        return Err(Error::ConfigurationError(format!(
            "date_column and value_column are both '{}'",
            config.date_column
        )));
    }

    Ok(())
}

/// Validate forecast configuration
pub fn validate_forecast_config(config: &ForecastConfig) -> Result<()> {
    if config.horizon == 0 {
        return Err(Error::ConfigurationError(
            "horizon must be greater than 0".to_string(),
        ));
    }

    if !(config.interval_width > 0.0 && config.interval_width < 1.0) {
        return Err(Error::ConfigurationError(format!(
            "interval_width must be between 0 and 1, got {}",
            config.interval_width
        )));
    }

    if !(config.changepoint_prior_scale > 0.0) {
        return Err(Error::ConfigurationError(
            "changepoint_prior_scale must be positive".to_string(),
        ));
    }

    if !(config.seasonality_prior_scale > 0.0) {
        return Err(Error::ConfigurationError(
            "seasonality_prior_scale must be positive".to_string(),
        ));
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output_config(config: &OutputConfig) -> Result<()> {
    if config.width == 0 || config.height == 0 {
        return Err(Error::ConfigurationError(format!(
            "chart size must be non-zero, got {}x{}",
            config.width, config.height
        )));
    }

    Ok(())
}

/// Validate logging configuration
pub fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if !LOG_FORMATS.contains(&config.format.as_str()) {
        return Err(Error::ConfigurationError(format!(
            "Invalid log format '{}', expected one of: {}",
            config.format,
            LOG_FORMATS.join(", ")
        )));
    }

    Ok(())
}
