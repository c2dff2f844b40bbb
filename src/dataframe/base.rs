use std::collections::HashMap;
use std::fmt;

use crate::column::{Column, ColumnType};
use crate::core::error::{Error, Result};

/// DataFrame struct: Column-oriented 2D data structure
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    columns: HashMap<String, Column>,
    column_order: Vec<String>,
    row_count: usize,
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFrame {
    /// Create a new empty DataFrame
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
            column_order: Vec::new(),
            row_count: 0,
        }
    }

    /// Build a DataFrame from `(name, column)` pairs, keeping their order
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut df = Self::new();
        for (name, column) in columns {
            df.add_column(name, column)?;
        }
        Ok(df)
    }

    /// Check if the DataFrame contains a column with the given name
    pub fn contains_column(&self, column_name: &str) -> bool {
        self.columns.contains_key(column_name)
    }

    /// Get the number of rows in the DataFrame
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Get the number of columns in the DataFrame
    pub fn column_count(&self) -> usize {
        self.column_order.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count, self.column_order.len())
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> &[String] {
        &self.column_order
    }

    /// Add a column to the DataFrame
    pub fn add_column(&mut self, column_name: impl Into<String>, column: Column) -> Result<()> {
        let column_name = column_name.into();
        if self.contains_column(&column_name) {
            return Err(Error::DuplicateColumnName(column_name));
        }

        // The first column fixes the row count
        if !self.column_order.is_empty() && column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }

        self.row_count = column.len();
        self.column_order.push(column_name.clone());
        self.columns.insert(column_name, column);
        Ok(())
    }

    /// Get a column by name
    pub fn column(&self, column_name: &str) -> Result<&Column> {
        self.columns
            .get(column_name)
            .ok_or_else(|| Error::ColumnNotFound(column_name.to_string()))
    }

    /// Type of a named column
    pub fn column_type(&self, column_name: &str) -> Result<ColumnType> {
        Ok(self.column(column_name)?.column_type())
    }

    /// Return a copy with columns renamed according to `mapping` (old, new).
    ///
    /// Names absent from the frame are ignored. Renaming onto an existing
    /// name that is not itself renamed away is an error.
    pub fn rename(&self, mapping: &[(&str, &str)]) -> Result<DataFrame> {
        let lookup: HashMap<&str, &str> = mapping.iter().copied().collect();
        let mut renamed = DataFrame::new();

        for name in &self.column_order {
            let new_name = lookup.get(name.as_str()).copied().unwrap_or(name.as_str());
            let column = self.column(name)?.clone();
            renamed.add_column(new_name, column)?;
        }

        // A frame with no columns still keeps its row count
        renamed.row_count = self.row_count;
        Ok(renamed)
    }

    /// Return a copy holding only `names`, in the given order
    pub fn select(&self, names: &[&str]) -> Result<DataFrame> {
        let mut selected = DataFrame::new();
        for name in names {
            selected.add_column(*name, self.column(name)?.clone())?;
        }
        if names.is_empty() {
            selected.row_count = self.row_count;
        }
        Ok(selected)
    }

    /// Rows `start..end` as a new DataFrame
    pub fn slice(&self, start: usize, end: usize) -> Result<DataFrame> {
        let mut sliced = DataFrame::new();
        for name in &self.column_order {
            sliced.add_column(name.clone(), self.column(name)?.slice(start, end)?)?;
        }
        Ok(sliced)
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Result<DataFrame> {
        self.slice(0, n.min(self.row_count))
    }

    /// Last `n` rows
    pub fn tail(&self, n: usize) -> Result<DataFrame> {
        let start = self.row_count.saturating_sub(n);
        self.slice(start, self.row_count)
    }

    /// Structural summary: entries, per-column non-null counts and dtypes
    pub fn info(&self) -> String {
        let mut out = String::new();
        out.push_str("<class 'salesforecast::DataFrame'>\n");
        if self.row_count == 0 {
            out.push_str("RangeIndex: 0 entries\n");
        } else {
            out.push_str(&format!(
                "RangeIndex: {} entries, 0 to {}\n",
                self.row_count,
                self.row_count - 1
            ));
        }
        out.push_str(&format!(
            "Data columns (total {} columns):\n",
            self.column_order.len()
        ));

        let name_width = self
            .column_order
            .iter()
            .map(|n| n.len())
            .max()
            .unwrap_or(0)
            .max("Column".len());

        out.push_str(&format!(
            " #   {:<width$}  Non-Null Count  Dtype\n",
            "Column",
            width = name_width
        ));
        out.push_str(&format!(
            "---  {:<width$}  --------------  -----\n",
            "------",
            width = name_width
        ));

        let mut dtype_counts: Vec<(ColumnType, usize)> = Vec::new();
        let mut memory = 0usize;
        for (idx, name) in self.column_order.iter().enumerate() {
            let column = &self.columns[name];
            let column_type = column.column_type();
            let non_null = format!("{} non-null", column.non_null_count());
            out.push_str(&format!(
                " {:<3} {:<width$}  {:<14}  {}\n",
                idx,
                name,
                non_null,
                column_type,
                width = name_width
            ));

            match dtype_counts.iter_mut().find(|(t, _)| *t == column_type) {
                Some((_, count)) => *count += 1,
                None => dtype_counts.push((column_type, 1)),
            }
            memory += column.memory_usage();
        }

        let dtypes: Vec<String> = dtype_counts
            .iter()
            .map(|(t, count)| format!("{}({})", t, count))
            .collect();
        out.push_str(&format!("dtypes: {}\n", dtypes.join(", ")));
        out.push_str(&format!("memory usage: {:.1} bytes\n", memory as f64));
        out
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.column_order.is_empty() {
            return writeln!(f, "Empty DataFrame ({} rows)", self.row_count);
        }

        // Render every cell once so the widths can be measured
        let mut cells: Vec<Vec<String>> = Vec::with_capacity(self.column_order.len());
        for name in &self.column_order {
            let column = &self.columns[name];
            let mut rendered = Vec::with_capacity(self.row_count);
            for row in 0..self.row_count {
                rendered.push(column.display_value(row).map_err(|_| fmt::Error)?);
            }
            cells.push(rendered);
        }

        let index_width = self.row_count.saturating_sub(1).to_string().len();
        let widths: Vec<usize> = self
            .column_order
            .iter()
            .zip(&cells)
            .map(|(name, values)| {
                values
                    .iter()
                    .map(|v| v.len())
                    .max()
                    .unwrap_or(0)
                    .max(name.len())
            })
            .collect();

        write!(f, "{:width$}", "", width = index_width)?;
        for (name, width) in self.column_order.iter().zip(&widths) {
            write!(f, "  {:>width$}", name, width = width)?;
        }
        writeln!(f)?;

        for row in 0..self.row_count {
            write!(f, "{:<width$}", row, width = index_width)?;
            for (values, width) in cells.iter().zip(&widths) {
                write!(f, "  {:>width$}", values[row], width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
