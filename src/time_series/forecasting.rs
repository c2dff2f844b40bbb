//! Forecast output table and fit-quality metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;

/// Forecast evaluation metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    /// Number of (actual, fitted) pairs evaluated
    pub count: usize,
    /// Mean Absolute Error
    pub mae: Option<f64>,
    /// Mean Squared Error
    pub mse: Option<f64>,
    /// Root Mean Squared Error
    pub rmse: Option<f64>,
    /// Mean Absolute Percentage Error, over non-zero actuals
    pub mape: Option<f64>,
}

/// Calculate forecast evaluation metrics
pub fn calculate_forecast_metrics(actual: &[f64], fitted: &[f64]) -> Result<ForecastMetrics> {
    if actual.len() != fitted.len() {
        return Err(Error::InconsistentRowCount {
            expected: actual.len(),
            found: fitted.len(),
        });
    }

    let valid_pairs: Vec<(f64, f64)> = actual
        .iter()
        .zip(fitted)
        .filter(|(a, f)| a.is_finite() && f.is_finite())
        .map(|(&a, &f)| (a, f))
        .collect();

    if valid_pairs.is_empty() {
        return Ok(ForecastMetrics {
            count: 0,
            mae: None,
            mse: None,
            rmse: None,
            mape: None,
        });
    }

    let n = valid_pairs.len() as f64;

    let mae = valid_pairs
        .iter()
        .map(|(actual, fitted)| (actual - fitted).abs())
        .sum::<f64>()
        / n;

    let mse = valid_pairs
        .iter()
        .map(|(actual, fitted)| (actual - fitted).powi(2))
        .sum::<f64>()
        / n;

    let nonzero: Vec<&(f64, f64)> = valid_pairs.iter().filter(|(a, _)| *a != 0.0).collect();
    let mape = if nonzero.is_empty() {
        None
    } else {
        Some(
            nonzero
                .iter()
                .map(|(actual, fitted)| ((actual - fitted) / actual).abs())
                .sum::<f64>()
                / nonzero.len() as f64
                * 100.0,
        )
    };

    Ok(ForecastMetrics {
        count: valid_pairs.len(),
        mae: Some(mae),
        mse: Some(mse),
        rmse: Some(mse.sqrt()),
        mape,
    })
}

/// Common interface of fitted forecasting models
pub trait Forecaster {
    /// Fit the model to a `ds` / `y` table
    fn fit(&mut self, frame: &DataFrame) -> Result<()>;

    /// Predict every date in `dates`, one output row per date
    fn predict(&self, dates: &[NaiveDate]) -> Result<Forecast>;

    /// Get model name
    fn name(&self) -> &str;

    /// In-sample fit metrics over the fitted history
    fn fit_metrics(&self) -> Result<ForecastMetrics>;
}

/// Model output: one row per requested date
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub ds: Vec<NaiveDate>,
    pub trend: Vec<f64>,
    pub yhat_lower: Vec<f64>,
    pub yhat_upper: Vec<f64>,
    /// Per-seasonality contributions, in model order
    pub seasonal: Vec<(String, Vec<f64>)>,
    /// Sum of the seasonal contributions
    pub additive_terms: Vec<f64>,
    pub yhat: Vec<f64>,
    /// Width of the `yhat_lower..yhat_upper` interval, e.g. 0.8
    pub interval_width: f64,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.ds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ds.is_empty()
    }

    /// Values of a named seasonal component
    pub fn component(&self, name: &str) -> Option<&[f64]> {
        self.seasonal
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Names of the seasonal components present
    pub fn component_names(&self) -> Vec<&str> {
        self.seasonal.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Table view: `ds, trend, yhat_lower, yhat_upper, <seasonalities>, additive_terms, yhat`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let floats = |values: &[f64]| Column::Float64(values.iter().copied().map(Some).collect());

        let mut df = DataFrame::new();
        df.add_column("ds", Column::Date(self.ds.iter().copied().map(Some).collect()))?;
        df.add_column("trend", floats(&self.trend))?;
        df.add_column("yhat_lower", floats(&self.yhat_lower))?;
        df.add_column("yhat_upper", floats(&self.yhat_upper))?;
        for (name, values) in &self.seasonal {
            df.add_column(name.clone(), floats(values))?;
        }
        df.add_column("additive_terms", floats(&self.additive_terms))?;
        df.add_column("yhat", floats(&self.yhat))?;
        Ok(df)
    }
}
