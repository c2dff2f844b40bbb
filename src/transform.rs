//! Projection of a raw sales table onto the `ds` / `y` forecasting schema.

use crate::column::{Column, ColumnType};
use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;

/// Name of the date column expected by the forecaster
pub const DS: &str = "ds";
/// Name of the value column expected by the forecaster
pub const Y: &str = "y";

/// Rename `date_column` to `ds` and `value_column` to `y` and drop everything else.
///
/// Row count and row order are preserved and nulls pass through unchanged.
/// The value column is converted to `Float64`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use salesforecast::{Column, DataFrame};
/// use salesforecast::transform::to_forecast_schema;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let df = DataFrame::from_columns(vec![
///     ("date", Column::Date(vec![Some(day)])),
///     ("units_sold", Column::Int64(vec![Some(10)])),
/// ])
/// .unwrap();
///
/// let projected = to_forecast_schema(&df, "date", "units_sold").unwrap();
/// assert_eq!(projected.column_names(), &["ds", "y"]);
/// ```
pub fn to_forecast_schema(
    df: &DataFrame,
    date_column: &str,
    value_column: &str,
) -> Result<DataFrame> {
    let date_type = df.column_type(date_column)?;
    if date_type != ColumnType::Date {
        return Err(Error::Type(format!(
            "column '{}' must hold dates, found {}",
            date_column, date_type
        )));
    }

    let value_type = df.column_type(value_column)?;
    if !value_type.is_numeric() {
        return Err(Error::Type(format!(
            "column '{}' must be numeric, found {}",
            value_column, value_type
        )));
    }

    let projected = df
        .select(&[date_column, value_column])?
        .rename(&[(date_column, DS), (value_column, Y)])?;

    let values = projected.column(Y)?.to_f64_values()?;
    DataFrame::from_columns(vec![
        (DS, projected.column(DS)?.clone()),
        (Y, Column::Float64(values)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sales() -> DataFrame {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day);
        DataFrame::from_columns(vec![
            ("store", Column::String(vec![Some("a".into()), Some("b".into()), None])),
            ("date", Column::Date(vec![d(1), d(2), d(3)])),
            ("units_sold", Column::Int64(vec![Some(10), None, Some(9)])),
        ])
        .unwrap()
    }

    #[test]
    fn test_projection_keeps_rows_and_nulls() {
        let projected = to_forecast_schema(&sales(), "date", "units_sold").unwrap();
        assert_eq!(projected.column_names(), &["ds", "y"]);
        assert_eq!(projected.row_count(), 3);
        assert_eq!(
            projected.column("y").unwrap(),
            &Column::Float64(vec![Some(10.0), None, Some(9.0)])
        );
    }

    #[test]
    fn test_errors() {
        let df = sales();
        assert!(matches!(
            to_forecast_schema(&df, "day", "units_sold"),
            Err(Error::ColumnNotFound(_))
        ));
        assert!(matches!(
            to_forecast_schema(&df, "store", "units_sold"),
            Err(Error::Type(_))
        ));
        assert!(matches!(
            to_forecast_schema(&df, "date", "store"),
            Err(Error::Type(_))
        ));
    }
}
