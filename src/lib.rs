//! # salesforecast
//!
//! Loads a daily sales table from a spreadsheet or CSV file, summarises it,
//! fits an additive trend + seasonality model and forecasts the coming days.
//! Charts of the raw series, the forecast and its components are rendered to
//! image files.
//!
//! ```no_run
//! use salesforecast::config::SalesForecastConfig;
//! use salesforecast::pipeline;
//!
//! let config = SalesForecastConfig::load::<&str>(None).unwrap();
//! let outcome = pipeline::run(&config, &mut std::io::stdout()).unwrap();
//! println!("{} forecast rows", outcome.forecast.len());
//! ```

// Core module with the error type
pub mod core;

pub mod column;
pub mod config;
pub mod dataframe;
pub mod io;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod time_series;
pub mod transform;
pub mod vis;

// Re-export core types
pub use crate::core::error::{Error, Result};

pub use column::{Column, ColumnType};
pub use config::SalesForecastConfig;
pub use dataframe::DataFrame;
pub use pipeline::{fit_and_forecast, load_table, ForecastOutcome};
pub use time_series::{
    AdditiveModel, AdditiveModelConfig, Forecast, ForecastMetrics, Forecaster, Frequency,
    SeasonalitySetting,
};
pub use transform::to_forecast_schema;
