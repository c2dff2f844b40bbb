//! Time series forecasting
//!
//! Calendar helpers, Fourier seasonalities and the additive trend/seasonality
//! model used to forecast daily sales.

pub mod additive;
pub mod core;
pub mod forecasting;
pub mod seasonality;

pub use additive::{AdditiveModel, AdditiveModelConfig};
pub use core::{date_range_after, Frequency};
pub use forecasting::{calculate_forecast_metrics, Forecast, ForecastMetrics, Forecaster};
pub use seasonality::{Seasonality, SeasonalitySetting};
