//! Typed, nullable column storage used by [`DataFrame`](crate::DataFrame).

use std::fmt;

use chrono::NaiveDate;

use crate::core::error::{Error, Result};

/// Enum to identify column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int64,
    Float64,
    String,
    Boolean,
    Date,
}

impl ColumnType {
    /// Name used by the structural summary (`DataFrame::info`)
    pub fn dtype_name(&self) -> &'static str {
        match self {
            ColumnType::Int64 => "int64",
            ColumnType::Float64 => "float64",
            ColumnType::String => "object",
            ColumnType::Boolean => "bool",
            ColumnType::Date => "datetime64[ns]",
        }
    }

    /// Whether values of this type can be read as `f64`
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Int64 | ColumnType::Float64)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dtype_name())
    }
}

/// Enum representing a column. Every cell is nullable.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    String(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
    Date(Vec<Option<NaiveDate>>),
}

impl Column {
    /// Returns the length of the column
    pub fn len(&self) -> usize {
        match self {
            Column::Int64(v) => v.len(),
            Column::Float64(v) => v.len(),
            Column::String(v) => v.len(),
            Column::Boolean(v) => v.len(),
            Column::Date(v) => v.len(),
        }
    }

    /// Returns whether the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the type of the column
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int64(_) => ColumnType::Int64,
            Column::Float64(_) => ColumnType::Float64,
            Column::String(_) => ColumnType::String,
            Column::Boolean(_) => ColumnType::Boolean,
            Column::Date(_) => ColumnType::Date,
        }
    }

    /// Number of cells holding a value
    pub fn non_null_count(&self) -> usize {
        match self {
            Column::Int64(v) => v.iter().filter(|c| c.is_some()).count(),
            Column::Float64(v) => v.iter().filter(|c| matches!(c, Some(x) if !x.is_nan())).count(),
            Column::String(v) => v.iter().filter(|c| c.is_some()).count(),
            Column::Boolean(v) => v.iter().filter(|c| c.is_some()).count(),
            Column::Date(v) => v.iter().filter(|c| c.is_some()).count(),
        }
    }

    /// Approximate in-memory size of the cell payloads in bytes
    pub fn memory_usage(&self) -> usize {
        match self {
            Column::Int64(v) => v.len() * std::mem::size_of::<i64>(),
            Column::Float64(v) => v.len() * std::mem::size_of::<f64>(),
            Column::Boolean(v) => v.len() * std::mem::size_of::<bool>(),
            Column::Date(v) => v.len() * std::mem::size_of::<NaiveDate>(),
            Column::String(v) => v
                .iter()
                .map(|s| std::mem::size_of::<usize>() + s.as_ref().map_or(0, |s| s.len()))
                .sum(),
        }
    }

    /// Copy of the rows in `start..end`
    pub fn slice(&self, start: usize, end: usize) -> Result<Column> {
        if start > end || end > self.len() {
            return Err(Error::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }

        Ok(match self {
            Column::Int64(v) => Column::Int64(v[start..end].to_vec()),
            Column::Float64(v) => Column::Float64(v[start..end].to_vec()),
            Column::String(v) => Column::String(v[start..end].to_vec()),
            Column::Boolean(v) => Column::Boolean(v[start..end].to_vec()),
            Column::Date(v) => Column::Date(v[start..end].to_vec()),
        })
    }

    /// Borrow the cells of a date column
    pub fn as_dates(&self) -> Option<&[Option<NaiveDate>]> {
        match self {
            Column::Date(v) => Some(v),
            _ => None,
        }
    }

    /// Read a numeric column as floats, keeping nulls
    pub fn to_f64_values(&self) -> Result<Vec<Option<f64>>> {
        match self {
            Column::Int64(v) => Ok(v.iter().map(|c| c.map(|x| x as f64)).collect()),
            Column::Float64(v) => Ok(v.iter().map(|c| c.filter(|x| !x.is_nan())).collect()),
            other => Err(Error::Type(format!(
                "expected a numeric column, found {}",
                other.column_type()
            ))),
        }
    }

    /// Text rendering of one cell
    pub fn display_value(&self, index: usize) -> Result<String> {
        if index >= self.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.len(),
            });
        }

        Ok(match self {
            Column::Int64(v) => v[index].map_or_else(|| "NaN".to_string(), |x| x.to_string()),
            Column::Float64(v) => v[index].map_or_else(|| "NaN".to_string(), format_float),
            Column::String(v) => v[index].clone().unwrap_or_else(|| "None".to_string()),
            Column::Boolean(v) => v[index].map_or_else(|| "None".to_string(), |x| {
                if x { "True".to_string() } else { "False".to_string() }
            }),
            Column::Date(v) => v[index].map_or_else(
                || "NaT".to_string(),
                |d| d.format("%Y-%m-%d").to_string(),
            ),
        })
    }
}

/// Float formatting close to what spreadsheet users expect: `10.0`, `12.5`, `0.333333`
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{:.1}", value);
    }
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0');
    text.trim_end_matches('.').to_string()
}
