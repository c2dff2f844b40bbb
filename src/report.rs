//! Plain-text summaries written to standard output.

use std::io::Write;

use crate::core::error::Result;
use crate::dataframe::DataFrame;
use crate::time_series::Forecast;

/// Rows shown by the previews
pub const PREVIEW_ROWS: usize = 5;

/// Write the first rows and the structural summary of `df`
pub fn print_overview<W: Write>(df: &DataFrame, out: &mut W) -> Result<()> {
    writeln!(out, "First {} rows:", PREVIEW_ROWS)?;
    write!(out, "{}", df.head(PREVIEW_ROWS)?)?;
    writeln!(out)?;
    writeln!(out, "Data Info:")?;
    write!(out, "{}", df.info())?;
    Ok(())
}

/// Write the head of the table handed to the model
pub fn print_prepared<W: Write>(df: &DataFrame, out: &mut W) -> Result<()> {
    writeln!(out, "Prepared data:")?;
    write!(out, "{}", df.head(PREVIEW_ROWS)?)?;
    Ok(())
}

/// Write the last rows of a forecast: `ds`, `yhat`, `yhat_lower`, `yhat_upper`
pub fn print_forecast_tail<W: Write>(forecast: &Forecast, out: &mut W) -> Result<()> {
    let table = forecast
        .to_dataframe()?
        .select(&["ds", "yhat", "yhat_lower", "yhat_upper"])?;
    writeln!(out, "Forecast (last {} rows):", PREVIEW_ROWS)?;
    write!(out, "{}", table.tail(PREVIEW_ROWS)?)?;
    Ok(())
}
