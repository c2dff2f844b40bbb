//! End-to-end run: load, summarise, transform, fit, forecast, render.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::{OutputConfig, SalesForecastConfig};
use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;
use crate::io::read_table;
use crate::report;
use crate::time_series::{
    AdditiveModel, AdditiveModelConfig, Forecast, ForecastMetrics, Forecaster,
};
use crate::transform::{to_forecast_schema, DS, Y};

/// Everything produced by fitting and forecasting
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    /// The fitted model
    pub model: AdditiveModel,
    /// History dates followed by the horizon
    pub future: Vec<NaiveDate>,
    /// One prediction row per entry of `future`
    pub forecast: Forecast,
    /// In-sample fit metrics
    pub metrics: ForecastMetrics,
}

/// Read the raw sales table
pub fn load_table<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<DataFrame> {
    let table = read_table(path.as_ref(), sheet)?;
    log::info!(
        "loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.as_ref().display()
    );
    Ok(table)
}

/// Fit a model to a `ds` / `y` table and predict the history plus `horizon` periods
pub fn fit_and_forecast(
    table: &DataFrame,
    horizon: usize,
    model_config: &AdditiveModelConfig,
) -> Result<ForecastOutcome> {
    let mut model = AdditiveModel::new(model_config.clone());
    model.fit(table)?;

    let future = model.make_future_dataframe(horizon, None, true)?;
    let forecast = model.predict(&future)?;
    let metrics = model.fit_metrics()?;

    log::info!(
        "{}: forecast {} rows ({} ahead), in-sample rmse {}",
        model.name(),
        forecast.len(),
        horizon,
        metrics.rmse.map_or("n/a".to_string(), |v| format!("{:.4}", v))
    );

    Ok(ForecastOutcome {
        model,
        future,
        forecast,
        metrics,
    })
}

/// Fit a default-configured model to the same table and log its metrics next to `configured`
pub fn compare_default(
    table: &DataFrame,
    configured: &ForecastMetrics,
) -> Result<ForecastMetrics> {
    let mut model = AdditiveModel::default();
    model.fit(table)?;
    let metrics = model.fit_metrics()?;

    let show = |v: Option<f64>| v.map_or("n/a".to_string(), |v| format!("{:.4}", v));
    log::info!(
        "configured model: mae {} rmse {} mape {}",
        show(configured.mae),
        show(configured.rmse),
        show(configured.mape)
    );
    log::info!(
        "default model:    mae {} rmse {} mape {}",
        show(metrics.mae),
        show(metrics.rmse),
        show(metrics.mape)
    );
    Ok(metrics)
}

/// Rows of a `ds` / `y` table with both values present
pub fn observed_points(table: &DataFrame) -> Result<Vec<(NaiveDate, f64)>> {
    let dates = table
        .column(DS)?
        .as_dates()
        .ok_or_else(|| Error::Type("column ds must hold dates".to_string()))?;
    let values = table.column(Y)?.to_f64_values()?;

    Ok(dates
        .iter()
        .zip(values)
        .filter_map(|(date, value)| match (date, value) {
            (Some(d), Some(v)) if v.is_finite() => Some((*d, v)),
            _ => None,
        })
        .collect())
}

/// Write the sales trend chart, returning the files written
#[cfg(feature = "visualization")]
pub fn render_sales_trend(
    points: &[(NaiveDate, f64)],
    output: &OutputConfig,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&output.directory)?;
    let path = output.chart_path("sales_trend");
    let settings = output
        .plot_settings()
        .titled("Daily Sales Over Time", "Date", "Units Sold");

    let dates: Vec<NaiveDate> = points.iter().map(|(d, _)| *d).collect();
    let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    crate::vis::plot_sales_trend(&dates, &values, &path, &settings)?;

    log::info!("wrote {}", path.display());
    Ok(vec![path])
}

/// Write the forecast and components charts, returning the files written
#[cfg(feature = "visualization")]
pub fn render_forecast(
    points: &[(NaiveDate, f64)],
    outcome: &ForecastOutcome,
    output: &OutputConfig,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&output.directory)?;
    let settings = output.plot_settings();

    let forecast_path = output.chart_path("forecast");
    crate::vis::plot_forecast(
        points,
        &outcome.forecast,
        &forecast_path,
        &settings.titled("Sales Forecast", DS, Y),
    )?;
    log::info!("wrote {}", forecast_path.display());

    let components_path = output.chart_path("components");
    crate::vis::plot_components(
        &outcome.model,
        &outcome.forecast,
        &components_path,
        &settings.titled("Forecast Components", DS, ""),
    )?;
    log::info!("wrote {}", components_path.display());

    Ok(vec![forecast_path, components_path])
}

#[cfg(not(feature = "visualization"))]
pub fn render_sales_trend(
    _points: &[(NaiveDate, f64)],
    _output: &OutputConfig,
) -> Result<Vec<PathBuf>> {
    log::warn!("chart rendering requested but the `visualization` feature is disabled");
    Ok(Vec::new())
}

#[cfg(not(feature = "visualization"))]
pub fn render_forecast(
    _points: &[(NaiveDate, f64)],
    _outcome: &ForecastOutcome,
    _output: &OutputConfig,
) -> Result<Vec<PathBuf>> {
    log::warn!("chart rendering requested but the `visualization` feature is disabled");
    Ok(Vec::new())
}

/// Run the whole pipeline, writing the text report to `out`
pub fn run<W: Write>(config: &SalesForecastConfig, out: &mut W) -> Result<ForecastOutcome> {
    let table = load_table(&config.input.path, config.input.sheet.as_deref())?;
    report::print_overview(&table, out)?;
    writeln!(out)?;

    let prepared = to_forecast_schema(
        &table,
        &config.input.date_column,
        &config.input.value_column,
    )?;
    let points = observed_points(&prepared)?;
    if config.output.render {
        render_sales_trend(&points, &config.output)?;
    }

    report::print_prepared(&prepared, out)?;
    writeln!(out)?;

    let outcome = fit_and_forecast(
        &prepared,
        config.forecast.horizon,
        &config.forecast.model_config(),
    )?;

    if config.forecast.compare_default {
        compare_default(&prepared, &outcome.metrics)?;
    }

    report::print_forecast_tail(&outcome.forecast, out)?;
    if config.output.render {
        render_forecast(&points, &outcome, &config.output)?;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use chrono::Duration;

    fn prepared(n: i64) -> DataFrame {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        DataFrame::from_columns(vec![
            (
                DS,
                Column::Date((0..n).map(|i| Some(start + Duration::days(i))).collect()),
            ),
            (
                Y,
                Column::Float64((0..n).map(|i| Some(20.0 + (i % 7) as f64)).collect()),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_fit_and_forecast_extends_history() {
        let table = prepared(60);
        let outcome = fit_and_forecast(&table, 90, &AdditiveModelConfig::default()).unwrap();
        assert_eq!(outcome.future.len(), 150);
        assert_eq!(outcome.forecast.len(), 150);
        assert_eq!(outcome.forecast.ds, outcome.future);
        assert_eq!(outcome.metrics.count, 60);
    }

    #[test]
    fn test_compare_default_runs() {
        let table = prepared(40);
        let outcome = fit_and_forecast(&table, 7, &AdditiveModelConfig::default()).unwrap();
        let metrics = compare_default(&table, &outcome.metrics).unwrap();
        assert_eq!(metrics.count, 40);
    }

    #[test]
    fn test_observed_points_skip_nulls() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let table = DataFrame::from_columns(vec![
            (DS, Column::Date(vec![Some(day), None, Some(day)])),
            (Y, Column::Float64(vec![Some(1.0), Some(2.0), None])),
        ])
        .unwrap();
        assert_eq!(observed_points(&table).unwrap(), vec![(day, 1.0)]);
    }
}
