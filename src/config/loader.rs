//! Configuration loading utilities
//!
//! This module handles loading configuration from various sources with proper
//! precedence and validation.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::*;
use crate::core::error::{Error, Result};

/// Load configuration from environment variables on top of the defaults
pub fn load_from_env() -> Result<SalesForecastConfig> {
    let mut config = SalesForecastConfig::default();
    apply_env(&mut config)?;
    Ok(config)
}

/// Override `config` with the `SALESFORECAST_*` variables of the process environment
pub fn apply_env(config: &mut SalesForecastConfig) -> Result<()> {
    apply_env_from(config, |key| env::var(key).ok())
}

/// Override `config` from a variable lookup
pub fn apply_env_from<F>(config: &mut SalesForecastConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    // Input configuration
    if let Some(path) = lookup("SALESFORECAST_INPUT") {
        config.input.path = PathBuf::from(path);
    }

    if let Some(sheet) = lookup("SALESFORECAST_SHEET") {
        config.input.sheet = Some(sheet);
    }

    // Forecast configuration
    if let Some(horizon) = lookup("SALESFORECAST_HORIZON") {
        config.forecast.horizon = parse_var("SALESFORECAST_HORIZON", &horizon)?;
    }

    if let Some(compare) = lookup("SALESFORECAST_COMPARE_DEFAULT") {
        config.forecast.compare_default = parse_var("SALESFORECAST_COMPARE_DEFAULT", &compare)?;
    }

    // Output configuration
    if let Some(dir) = lookup("SALESFORECAST_OUTPUT_DIR") {
        config.output.directory = PathBuf::from(dir);
    }

    if let Some(format) = lookup("SALESFORECAST_OUTPUT_FORMAT") {
        config.output.format = OutputType::from_str(&format)?;
    }

    // Logging configuration
    if let Some(level) = lookup("SALESFORECAST_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
        config.logging.level = level;
    }

    if let Some(format) = lookup("SALESFORECAST_LOG_FORMAT") {
        config.logging.format = format;
    }

    Ok(())
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::ConfigurationError(format!("Invalid {}: {}", name, e)))
}

/// Load configuration from a file (YAML or TOML based on extension)
pub fn load_from_file(path: &Path) -> Result<SalesForecastConfig> {
    if !path.exists() {
        return Err(Error::ConfigurationError(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        Error::ConfigurationError(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_from_yaml(&contents),
        Some("toml") => load_from_toml(&contents),
        Some(ext) => Err(Error::ConfigurationError(format!(
            "Unsupported config file format: {}",
            ext
        ))),
        None => {
            // Try to parse as YAML first, then TOML
            load_from_yaml(&contents).or_else(|_| load_from_toml(&contents))
        }
    }
}

/// Load configuration from YAML string
pub fn load_from_yaml(yaml: &str) -> Result<SalesForecastConfig> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse YAML config: {}", e)))
}

/// Load configuration from TOML string
pub fn load_from_toml(toml: &str) -> Result<SalesForecastConfig> {
    toml::from_str(toml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse TOML config: {}", e)))
}

/// Load configuration with precedence: defaults -> file -> environment
pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<SalesForecastConfig> {
    // Missing keys in the file keep their defaults
    let mut config = match config_file {
        Some(file_path) => load_from_file(file_path.as_ref())?,
        None => SalesForecastConfig::default(),
    };

    // Environment has the highest precedence here; CLI flags are applied by the caller
    apply_env(&mut config)?;

    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SalesForecastConfig::default();
        apply_env_from(
            &mut config,
            lookup(&[
                ("SALESFORECAST_INPUT", "data/2024.csv"),
                ("SALESFORECAST_HORIZON", "30"),
                ("SALESFORECAST_OUTPUT_FORMAT", "svg"),
                ("SALESFORECAST_COMPARE_DEFAULT", "true"),
                ("RUST_LOG", "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(config.input.path, PathBuf::from("data/2024.csv"));
        assert_eq!(config.forecast.horizon, 30);
        assert_eq!(config.output.format, OutputType::SVG);
        assert!(config.forecast.compare_default);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_log_level_prefers_own_variable() {
        let mut config = SalesForecastConfig::default();
        apply_env_from(
            &mut config,
            lookup(&[("SALESFORECAST_LOG_LEVEL", "warn"), ("RUST_LOG", "trace")]),
        )
        .unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = SalesForecastConfig::default();
        let result = apply_env_from(&mut config, lookup(&[("SALESFORECAST_HORIZON", "soon")]));
        match result {
            Err(Error::ConfigurationError(msg)) => assert!(msg.contains("SALESFORECAST_HORIZON")),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = load_from_toml(
            r#"
            [forecast]
            horizon = 14
            weekly_seasonality = "disabled"
            "#,
        )
        .unwrap();
        assert_eq!(config.forecast.horizon, 14);
        assert_eq!(config.forecast.weekly_seasonality, SeasonalitySetting::Disabled);
        assert_eq!(config.forecast.yearly_seasonality, SeasonalitySetting::Enabled);
        assert_eq!(config.input.date_column, "date");
    }

    #[test]
    fn test_missing_file() {
        let result = load_from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }
}
