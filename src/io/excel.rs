use std::io::ErrorKind;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};

use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;
use crate::io::{build_dataframe, RawCell};

/// Read DataFrame from a workbook (.xlsx, .xlsm, .xlsb, .xls, .ods)
///
/// # Arguments
///
/// * `path` - Path to the workbook
/// * `sheet_name` - Name of the sheet to read. If None, reads the first sheet
/// * `header` - Whether a header row exists. If true, treats the first row as header
///
/// # Returns
///
/// * `Result<DataFrame>` - DataFrame containing the read data, or an error
///
/// # Examples
///
/// ```no_run
/// use salesforecast::io::read_excel;
///
/// // Read first sheet with default settings
/// let df = read_excel("sales_data.xlsx", None, true).unwrap();
///
/// // Read a specific sheet
/// let df = read_excel("sales_data.xlsx", Some("2024"), true).unwrap();
/// ```
pub fn read_excel<P: AsRef<Path>>(
    path: P,
    sheet_name: Option<&str>,
    header: bool,
) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::Io(std::io::Error::new(
            ErrorKind::NotFound,
            format!("Could not open Excel file: {}", path.display()),
        )));
    }

    let mut workbook = open_workbook_auto(path)?;

    // Get sheet name (first sheet if not specified)
    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet_name {
        Some(name) if sheet_names.iter().any(|s| s == name) => name.to_string(),
        Some(name) => {
            return Err(Error::IoError(format!(
                "Sheet '{}' not found; available sheets: {}",
                name,
                sheet_names.join(", ")
            )))
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| Error::IoError("Excel file has no sheets".to_string()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Error::IoError(format!("Could not read sheet '{}': {}", sheet_name, e)))?;

    let mut rows = range.rows();
    let width = range.width();

    let headers: Vec<String> = if header {
        match rows.next() {
            Some(header_row) => (0..width)
                .map(|i| match header_row.get(i) {
                    Some(cell) if !cell.is_empty() => cell.to_string(),
                    _ => format!("Column{}", i + 1),
                })
                .collect(),
            None => Vec::new(),
        }
    } else {
        (0..width).map(|i| format!("Column{}", i + 1)).collect()
    };

    let mut columns: Vec<Vec<RawCell>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(row.get(i).map_or(RawCell::Empty, raw_cell));
        }
    }

    log::debug!(
        "read sheet '{}' ({} columns) from {}",
        sheet_name,
        headers.len(),
        path.display()
    );

    build_dataframe(headers, columns)
}

/// Convert a calamine cell into a raw cell
fn raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::String(s) => RawCell::from_text(s),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => RawCell::Date(date),
            None => RawCell::Text(cell.to_string()),
        },
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(_) => RawCell::Empty,
    }
}
