//! Table loading from spreadsheet and delimited files.
//!
//! Each reader collects raw cells column by column and hands them to
//! [`infer_column`], so a CSV file and a workbook with the same content produce
//! the same typed [`DataFrame`].

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::column::Column;
use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;

// Re-export commonly used functions
pub use self::csv::read_csv;
#[cfg(feature = "excel")]
pub use self::excel::read_excel;

/// Date layouts recognised in text cells
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// A single cell as read from the source file, before type inference
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
}

impl RawCell {
    /// Classify a text field from a delimited file
    pub fn from_text(text: &str) -> RawCell {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(trimmed.to_string())
        }
    }

    fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RawCell::Date(d) => Some(*d),
            RawCell::Text(s) => parse_date(s),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            RawCell::Int(i) => Some(*i),
            // Spreadsheets store every number as a float
            RawCell::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Some(*f as i64),
            RawCell::Text(s) => s.parse::<i64>().ok(),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            RawCell::Int(i) => Some(*i as f64),
            RawCell::Float(f) => Some(*f),
            RawCell::Text(s) => s.parse::<f64>().ok(),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            RawCell::Bool(b) => Some(*b),
            RawCell::Text(s) => match s.to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    fn to_text(&self) -> Option<String> {
        match self {
            RawCell::Empty => None,
            RawCell::Int(i) => Some(i.to_string()),
            RawCell::Float(f) => Some(f.to_string()),
            RawCell::Bool(b) => Some(b.to_string()),
            RawCell::Text(s) => Some(s.clone()),
            RawCell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Parse a calendar date from text, accepting a trailing time of day
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Infer the column type from its cells.
///
/// Empty cells become nulls and are ignored for inference. Types are tried
/// from most to least specific: date, integer, float, boolean, text.
pub fn infer_column(cells: &[RawCell]) -> Column {
    let present: Vec<&RawCell> = cells.iter().filter(|c| **c != RawCell::Empty).collect();

    if present.is_empty() {
        return Column::Float64(vec![None; cells.len()]);
    }

    if present.iter().all(|c| c.as_date().is_some()) {
        Column::Date(cells.iter().map(RawCell::as_date).collect())
    } else if present.iter().all(|c| c.as_int().is_some()) {
        Column::Int64(cells.iter().map(RawCell::as_int).collect())
    } else if present.iter().all(|c| c.as_float().is_some()) {
        Column::Float64(cells.iter().map(RawCell::as_float).collect())
    } else if present.iter().all(|c| c.as_bool().is_some()) {
        Column::Boolean(cells.iter().map(RawCell::as_bool).collect())
    } else {
        Column::String(cells.iter().map(RawCell::to_text).collect())
    }
}

/// Assemble a DataFrame from headers and per-column raw cells
pub(crate) fn build_dataframe(
    headers: Vec<String>,
    columns: Vec<Vec<RawCell>>,
) -> Result<DataFrame> {
    let mut df = DataFrame::new();
    for (name, cells) in headers.into_iter().zip(columns) {
        df.add_column(name, infer_column(&cells))?;
    }
    Ok(df)
}

/// Load a table, picking the reader from the file extension.
///
/// `.csv` files go through [`read_csv`]; workbook formats go through
/// `read_excel` on the named sheet (first sheet when `None`).
pub fn read_table<P: AsRef<Path>>(path: P, sheet_name: Option<&str>) -> Result<DataFrame> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    log::debug!("reading table from {}", path.display());

    match extension.as_deref() {
        Some("csv") => read_csv(path, true),
        #[cfg(feature = "excel")]
        Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
            read_excel(path, sheet_name, true)
        }
        #[cfg(not(feature = "excel"))]
        Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
            let _ = sheet_name;
            Err(Error::InvalidInput(format!(
                "{} is a workbook but the `excel` feature is disabled",
                path.display()
            )))
        }
        _ => Err(Error::InvalidInput(format!(
            "unsupported input file type: {}",
            path.display()
        ))),
    }
}
