use chrono::NaiveDate;
use salesforecast::{to_forecast_schema, Column, DataFrame, Error};

fn d(day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, day)
}

fn raw_sales() -> DataFrame {
    DataFrame::from_columns(vec![
        ("date", Column::Date(vec![d(1), d(2), d(3)])),
        ("units_sold", Column::Int64(vec![Some(10), Some(12), Some(9)])),
        ("promo", Column::Boolean(vec![Some(false), Some(true), Some(false)])),
    ])
    .unwrap()
}

#[test]
fn test_three_day_scenario() -> Result<(), Error> {
    let prepared = to_forecast_schema(&raw_sales(), "date", "units_sold")?;

    assert_eq!(prepared.column_names(), &["ds", "y"]);
    assert_eq!(prepared.column("ds")?, &Column::Date(vec![d(1), d(2), d(3)]));
    assert_eq!(
        prepared.column("y")?,
        &Column::Float64(vec![Some(10.0), Some(12.0), Some(9.0)])
    );
    Ok(())
}

#[test]
fn test_row_alignment_with_unsorted_duplicates() -> Result<(), Error> {
    let raw = DataFrame::from_columns(vec![
        ("date", Column::Date(vec![d(5), d(1), d(5), None])),
        ("units_sold", Column::Float64(vec![Some(1.5), None, Some(2.5), Some(4.0)])),
    ])?;
    let prepared = to_forecast_schema(&raw, "date", "units_sold")?;

    assert_eq!(prepared.row_count(), raw.row_count());
    assert_eq!(prepared.column("ds")?, raw.column("date")?);
    assert_eq!(prepared.column("y")?, raw.column("units_sold")?);
    Ok(())
}

#[test]
fn test_transformation_is_idempotent() -> Result<(), Error> {
    let once = to_forecast_schema(&raw_sales(), "date", "units_sold")?;
    let twice = to_forecast_schema(&once, "ds", "y")?;
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn test_missing_columns() {
    let raw = raw_sales();
    assert!(matches!(
        to_forecast_schema(&raw, "day", "units_sold"),
        Err(Error::ColumnNotFound(name)) if name == "day"
    ));
    assert!(matches!(
        to_forecast_schema(&raw, "date", "sales"),
        Err(Error::ColumnNotFound(name)) if name == "sales"
    ));
}

#[test]
fn test_wrong_column_types() {
    let raw = raw_sales();
    assert!(matches!(
        to_forecast_schema(&raw, "units_sold", "units_sold"),
        Err(Error::Type(_))
    ));
    assert!(matches!(
        to_forecast_schema(&raw, "date", "promo"),
        Err(Error::Type(_))
    ));
}
