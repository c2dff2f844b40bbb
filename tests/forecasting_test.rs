use chrono::{Duration, NaiveDate};
use salesforecast::time_series::calculate_forecast_metrics;
use salesforecast::{
    AdditiveModel, AdditiveModelConfig, Column, DataFrame, Error, Forecaster, Frequency,
    SeasonalitySetting,
};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
}

/// Two years of daily sales with a trend, a yearly cycle and a weekend bump
fn daily_sales(days: i64) -> DataFrame {
    let dates: Vec<Option<NaiveDate>> = (0..days)
        .map(|i| Some(start() + Duration::days(i)))
        .collect();
    let values: Vec<Option<f64>> = (0..days)
        .map(|i| {
            let t = i as f64;
            let yearly = 15.0 * (2.0 * std::f64::consts::PI * t / 365.25).sin();
            let weekend = if i % 7 == 1 || i % 7 == 2 { 8.0 } else { 0.0 };
            Some(100.0 + 0.05 * t + yearly + weekend)
        })
        .collect();
    DataFrame::from_columns(vec![
        ("ds", Column::Date(dates)),
        ("y", Column::Float64(values)),
    ])
    .unwrap()
}

fn configured() -> AdditiveModelConfig {
    AdditiveModelConfig {
        yearly_seasonality: SeasonalitySetting::Enabled,
        daily_seasonality: SeasonalitySetting::Disabled,
        ..AdditiveModelConfig::default()
    }
}

#[test]
fn test_future_index_extends_history() -> Result<(), Error> {
    let table = daily_sales(120);
    let mut model = AdditiveModel::new(configured());
    model.fit(&table)?;

    let history: Vec<NaiveDate> = table
        .column("ds")?
        .as_dates()
        .unwrap()
        .iter()
        .flatten()
        .copied()
        .collect();
    let future = model.make_future_dataframe(90, None, true)?;

    assert_eq!(future.len(), history.len() + 90);
    assert_eq!(&future[..history.len()], history.as_slice());
    assert_eq!(future[history.len()], start() + Duration::days(120));
    assert!(future.windows(2).all(|w| w[0] < w[1]));

    let forecast = model.predict(&future)?;
    assert_eq!(forecast.len(), future.len());
    assert_eq!(forecast.ds, future);
    Ok(())
}

#[test]
fn test_components_follow_configuration() -> Result<(), Error> {
    let table = daily_sales(730);
    let mut model = AdditiveModel::new(configured());
    model.fit(&table)?;

    let future = model.make_future_dataframe(90, None, true)?;
    let forecast = model.predict(&future)?;
    assert_eq!(forecast.component_names(), vec!["yearly", "weekly"]);
    assert!(forecast.component("daily").is_none());

    let frame = forecast.to_dataframe()?;
    assert_eq!(
        frame.column_names(),
        &["ds", "trend", "yhat_lower", "yhat_upper", "yearly", "weekly", "additive_terms", "yhat"]
    );
    assert_eq!(frame.row_count(), 820);
    Ok(())
}

#[test]
fn test_in_sample_fit_is_close() -> Result<(), Error> {
    let table = daily_sales(730);
    let mut model = AdditiveModel::new(configured());
    model.fit(&table)?;

    let metrics = model.fit_metrics()?;
    assert_eq!(metrics.count, 730);
    assert!(metrics.mape.unwrap() < 5.0, "mape {:?}", metrics.mape);
    assert!(model.noise_std()? < 5.0);
    Ok(())
}

#[test]
fn test_weekly_history_uses_weekly_steps() -> Result<(), Error> {
    let dates: Vec<Option<NaiveDate>> = (0..30)
        .map(|i| Some(start() + Duration::weeks(i)))
        .collect();
    let values: Vec<Option<f64>> = (0..30).map(|i| Some(50.0 + i as f64)).collect();
    let table =
        DataFrame::from_columns(vec![("ds", Column::Date(dates)), ("y", Column::Float64(values))])?;

    let mut model = AdditiveModel::new(AdditiveModelConfig {
        yearly_seasonality: SeasonalitySetting::Disabled,
        ..configured()
    });
    model.fit(&table)?;
    assert!(model.seasonalities()?.is_empty());
    let future = model.make_future_dataframe(4, None, false)?;
    assert_eq!(future[0], start() + Duration::weeks(30));
    assert_eq!(future[3], start() + Duration::weeks(33));

    let daily = model.make_future_dataframe(2, Some(Frequency::Daily), false)?;
    assert_eq!(daily[1], start() + Duration::weeks(29) + Duration::days(2));
    Ok(())
}

#[test]
fn test_fit_requires_ds_and_y() {
    let table = DataFrame::from_columns(vec![(
        "date",
        Column::Date(vec![Some(start()), Some(start() + Duration::days(1))]),
    )])
    .unwrap();
    let mut model = AdditiveModel::default();
    assert!(matches!(model.fit(&table), Err(Error::ColumnNotFound(_))));
}

#[test]
fn test_fit_rejects_too_few_rows() {
    let table = DataFrame::from_columns(vec![
        ("ds", Column::Date(vec![Some(start()), Some(start() + Duration::days(1))])),
        ("y", Column::Float64(vec![Some(3.0), None])),
    ])
    .unwrap();
    let mut model = AdditiveModel::default();
    assert!(matches!(model.fit(&table), Err(Error::InsufficientData(_))));
}

#[test]
fn test_refit_is_rejected() -> Result<(), Error> {
    let table = daily_sales(30);
    let mut model = AdditiveModel::default();
    model.fit(&table)?;
    assert!(matches!(model.fit(&table), Err(Error::InvalidOperation(_))));
    Ok(())
}

#[test]
fn test_metrics_of_perfect_fit() -> Result<(), Error> {
    let metrics = calculate_forecast_metrics(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0])?;
    assert_eq!(metrics.mae, Some(0.0));
    assert_eq!(metrics.rmse, Some(0.0));
    Ok(())
}
