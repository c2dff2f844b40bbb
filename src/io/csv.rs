use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;

use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;
use crate::io::{build_dataframe, RawCell};

/// Read a DataFrame from a CSV file
///
/// Without a header row the columns are named `column_0`, `column_1`, ...
/// Short rows are padded with empty cells.
pub fn read_csv<P: AsRef<Path>>(path: P, has_header: bool) -> Result<DataFrame> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;

    // Set up the CSV reader
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut headers: Vec<String> = if has_header {
        rdr.headers()?.iter().map(|h| h.to_string()).collect()
    } else {
        Vec::new()
    };

    let mut columns: Vec<Vec<RawCell>> = vec![Vec::new(); headers.len()];
    let mut row_count = 0usize;

    for result in rdr.records() {
        let record = result?;

        // Headerless files get their column names from the widest row
        while !has_header && headers.len() < record.len() {
            headers.push(format!("column_{}", headers.len()));
            columns.push(vec![RawCell::Empty; row_count]);
        }

        for (i, column) in columns.iter_mut().enumerate() {
            let cell = record.get(i).map_or(RawCell::Empty, RawCell::from_text);
            column.push(cell);
        }
        row_count += 1;
    }

    log::debug!(
        "read {} rows x {} columns from {}",
        row_count,
        headers.len(),
        path.as_ref().display()
    );

    build_dataframe(headers, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use std::io::Write;

    #[test]
    fn test_read_csv_with_header() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "date,units_sold,region").unwrap();
        writeln!(file, "2024-01-01,10,north").unwrap();
        writeln!(file, "2024-01-02,,south").unwrap();
        writeln!(file, "2024-01-03,9").unwrap();
        file.flush().unwrap();

        let df = read_csv(file.path(), true).unwrap();
        assert_eq!(df.shape(), (3, 3));
        assert_eq!(
            df.column("units_sold").unwrap(),
            &Column::Int64(vec![Some(10), None, Some(9)])
        );
        assert_eq!(
            df.column("region").unwrap(),
            &Column::String(vec![Some("north".to_string()), Some("south".to_string()), None])
        );
    }

    #[test]
    fn test_read_csv_without_header() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "1.5,2").unwrap();
        writeln!(file, "2.5,3").unwrap();
        file.flush().unwrap();

        let df = read_csv(file.path(), false).unwrap();
        assert_eq!(df.column_names(), &["column_0", "column_1"]);
        assert_eq!(df.row_count(), 2);
        assert_eq!(
            df.column("column_0").unwrap(),
            &Column::Float64(vec![Some(1.5), Some(2.5)])
        );
    }

    #[test]
    fn test_read_csv_missing_file() {
        let result = read_csv("definitely/not/here.csv", true);
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
