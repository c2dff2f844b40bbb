use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use salesforecast::config::SalesForecastConfig;
use salesforecast::pipeline::{self, load_table};
use salesforecast::vis::OutputType;
use salesforecast::{fit_and_forecast, to_forecast_schema, Column, DataFrame, Error};
use tempfile::tempdir;

fn write_sales(path: &Path, days: i64) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut contents = String::from("date,units_sold,store\n");
    for i in 0..days {
        let date = start + Duration::days(i);
        let units = 40 + (i % 7) * 3 + i / 10;
        contents.push_str(&format!("{},{},main\n", date.format("%Y-%m-%d"), units));
    }
    fs::write(path, contents).unwrap();
}

fn config_for(dir: &Path) -> SalesForecastConfig {
    let mut config = SalesForecastConfig::default();
    config.input.path = dir.join("sales.csv");
    config.output.directory = dir.join("charts");
    config.output.render = false;
    config
}

#[test]
fn test_run_writes_report() -> Result<(), Error> {
    let dir = tempdir().unwrap();
    write_sales(&dir.path().join("sales.csv"), 60);
    let config = config_for(dir.path());

    let mut out = Vec::new();
    let outcome = pipeline::run(&config, &mut out)?;
    let report = String::from_utf8(out).unwrap();

    assert!(report.starts_with("First 5 rows:"));
    assert!(report.contains("Data Info:"));
    assert!(report.contains("RangeIndex: 60 entries, 0 to 59"));
    assert!(report.contains("Prepared data:"));
    assert!(report.contains("Forecast (last 5 rows):"));
    // last forecast day: 2024-02-29 + 90 days
    assert!(report.contains("2024-05-29"));

    assert_eq!(outcome.future.len(), 150);
    assert_eq!(outcome.forecast.len(), 150);
    assert!(!dir.path().join("charts").exists());
    Ok(())
}

#[test]
fn test_steps_compose() -> Result<(), Error> {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sales.csv");
    write_sales(&path, 30);

    let table = load_table(&path, None)?;
    let prepared = to_forecast_schema(&table, "date", "units_sold")?;
    let config = SalesForecastConfig::default();
    let outcome = fit_and_forecast(&prepared, 90, &config.forecast.model_config())?;

    assert_eq!(outcome.future.len(), 120);
    assert_eq!(outcome.forecast.component_names(), vec!["yearly", "weekly"]);
    Ok(())
}

#[test]
fn test_three_day_history_stays_bounded() -> Result<(), Error> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates = (0..3).map(|i| Some(start + Duration::days(i))).collect();
    let table = DataFrame::from_columns(vec![
        ("ds", Column::Date(dates)),
        ("y", Column::Float64(vec![Some(10.0), Some(12.0), Some(9.0)])),
    ])?;

    let config = SalesForecastConfig::default();
    let outcome = fit_and_forecast(&table, 90, &config.forecast.model_config())?;
    let forecast = &outcome.forecast;
    assert_eq!(forecast.len(), 93);

    // three points cannot pin down a yearly cycle; the forecast follows the trend
    assert!((forecast.yhat[0] - 10.0).abs() < 3.0, "yhat {}", forecast.yhat[0]);
    assert!(
        forecast.yhat.iter().all(|v| v.abs() < 60.0),
        "last yhat {:?}",
        forecast.yhat.last()
    );

    let width = forecast.yhat_upper[0] - forecast.yhat_lower[0];
    assert!(width > 1.0 && width < 20.0, "interval width {}", width);
    assert!(outcome.model.noise_std()? > 0.5);
    Ok(())
}

#[test]
fn test_compare_default_keeps_configured_outcome() -> Result<(), Error> {
    let dir = tempdir().unwrap();
    write_sales(&dir.path().join("sales.csv"), 45);
    let mut config = config_for(dir.path());
    config.forecast.compare_default = true;
    config.forecast.horizon = 10;

    let outcome = pipeline::run(&config, &mut Vec::new())?;
    assert_eq!(outcome.forecast.len(), 55);
    assert_eq!(outcome.model.config().yearly_seasonality, config.forecast.yearly_seasonality);
    Ok(())
}

#[test]
fn test_missing_value_column() {
    let dir = tempdir().unwrap();
    write_sales(&dir.path().join("sales.csv"), 10);
    let mut config = config_for(dir.path());
    config.input.value_column = "revenue".to_string();

    let result = pipeline::run(&config, &mut Vec::new());
    assert!(matches!(result, Err(Error::ColumnNotFound(name)) if name == "revenue"));
}

#[cfg(feature = "visualization")]
#[test]
fn test_run_renders_charts() {
    let dir = tempdir().unwrap();
    write_sales(&dir.path().join("sales.csv"), 60);
    let mut config = config_for(dir.path());
    config.output.render = true;
    config.output.format = OutputType::SVG;
    config.output.width = 400;
    config.output.height = 300;

    match pipeline::run(&config, &mut Vec::new()) {
        Ok(_) => {
            for stem in ["sales_trend", "forecast", "components"] {
                let path = dir.path().join("charts").join(format!("{}.svg", stem));
                assert!(path.exists(), "{} missing", path.display());
            }
        }
        // Text layout needs system fonts, which minimal environments lack
        Err(Error::Visualization(_)) => {}
        Err(e) => panic!("unexpected error: {}", e),
    }
}
