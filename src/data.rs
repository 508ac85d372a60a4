use crate::errors::SensorError;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tokens read as "no value" when parsing delimited text.
pub const NA_VALUES: [&str; 10] = ["", "NA", "N/A", "n/a", "NaN", "nan", "-nan", "null", "NULL", "None"];

/// A single value of a tabular dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// No value is recorded.
    Missing,
    /// A numeric value.
    Number(f64),
    /// Any other, non numeric, value.
    Text(String),
}

impl Cell {
    /// Parse a raw text field, recognising the common missing value tokens.
    pub fn parse(raw: &str) -> Cell {
        let raw = raw.trim();
        if NA_VALUES.contains(&raw) {
            return Cell::Missing;
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_nan() => Cell::Missing,
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(raw.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Coerce to a float, missing values become NaN.
    /// Returns `None` for text that does not parse as a number.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Cell::Missing => Some(f64::NAN),
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Missing => write!(f, ""),
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A named column of row aligned cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Column {
            name: name.into(),
            cells,
        }
    }

    /// Build a fully numeric column.
    pub fn from_f64(name: impl Into<String>, values: &[f64]) -> Self {
        let cells = values
            .iter()
            .map(|v| if v.is_nan() { Cell::Missing } else { Cell::Number(*v) })
            .collect();
        Column::new(name, cells)
    }

    /// Fraction of rows holding no value. An empty column has fraction 0.
    pub fn missing_fraction(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let missing = self.cells.iter().filter(|c| c.is_missing()).count();
        missing as f64 / self.cells.len() as f64
    }
}

/// In memory table of uniquely named, order preserving, equal length columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Create a dataset, checking column names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self, SensorError> {
        let rows = columns.first().map_or(0, |c| c.cells.len());
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SensorError::DataAccess(format!("duplicate column name {}", column.name)));
            }
            if column.cells.len() != rows {
                return Err(SensorError::DataAccess(format!(
                    "column {} has {} rows, expected {}",
                    column.name,
                    column.cells.len(),
                    rows
                )));
            }
        }
        drop(seen);
        Ok(Dataset { columns, rows })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Treat every text cell equal to `sentinel` as missing.
    pub fn replace_sentinel(mut self, sentinel: &str) -> Self {
        for column in self.columns.iter_mut() {
            for cell in column.cells.iter_mut() {
                if matches!(cell, Cell::Text(s) if s.as_str() == sentinel) {
                    *cell = Cell::Missing;
                }
            }
        }
        self
    }

    /// Fraction of missing values for each column, in column order.
    pub fn missing_profile(&self) -> MissingValueProfile {
        MissingValueProfile {
            fractions: self
                .columns
                .iter()
                .map(|c| (c.name.clone(), c.missing_fraction()))
                .collect(),
        }
    }

    /// Remove the named columns. Returns `None` when no column is left.
    pub fn drop_columns(self, names: &[String]) -> Option<Dataset> {
        let rows = self.rows;
        let columns: Vec<Column> = self
            .columns
            .into_iter()
            .filter(|c| !names.contains(&c.name))
            .collect();
        if columns.is_empty() {
            None
        } else {
            Some(Dataset { columns, rows })
        }
    }

    /// Coerce every column not named in `excluded` to floating point.
    pub fn to_numeric(&self, excluded: &[String]) -> Result<NumericView, SensorError> {
        let mut columns = Vec::with_capacity(self.columns.len());
        for column in self.columns.iter().filter(|c| !excluded.contains(&c.name)) {
            let mut values = Vec::with_capacity(self.rows);
            for (row, cell) in column.cells.iter().enumerate() {
                let v = cell.to_f64().ok_or_else(|| SensorError::NonNumericValue {
                    column: column.name.clone(),
                    row,
                    value: cell.to_string(),
                })?;
                values.push(v);
            }
            columns.push((column.name.clone(), values));
        }
        Ok(NumericView { columns })
    }
}

/// Column name to fraction of rows holding no value.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingValueProfile {
    fractions: Vec<(String, f64)>,
}

impl MissingValueProfile {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.fractions.iter().find(|(n, _)| n == name).map(|(_, f)| *f)
    }

    /// Columns whose missing fraction is strictly above `threshold`.
    pub fn exceeding(&self, threshold: f64) -> Vec<String> {
        self.fractions
            .iter()
            .filter(|(_, f)| *f > threshold)
            .map(|(n, _)| n.clone())
            .collect()
    }
}

/// Float only view of a dataset, missing values are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericView {
    columns: Vec<(String, Vec<f64>)>,
}

impl NumericView {
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }
}

/// A lightweight row major matrix, used as the on disk
/// format of the transformed train and test arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowMajorMatrix<T> {
    /// The raw data in row-major order.
    pub data: Vec<T>,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl<T> RowMajorMatrix<T> {
    /// Create a new RowMajorMatrix.
    pub fn new(data: Vec<T>, rows: usize, cols: usize) -> Self {
        RowMajorMatrix { data, rows, cols }
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[i * self.cols + j]
    }

    /// Get a row of the matrix as a slice.
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
}

impl<T: Copy> RowMajorMatrix<T> {
    /// Separate the trailing column, returning the remaining
    /// columns as features and the last one as the target.
    pub fn split_target(&self) -> Result<(RowMajorMatrix<T>, Vec<T>), SensorError> {
        if self.cols < 2 {
            return Err(SensorError::DataAccess(format!(
                "array needs at least one feature and one target column, found {} columns",
                self.cols
            )));
        }
        let n_features = self.cols - 1;
        let mut features = Vec::with_capacity(self.rows * n_features);
        let mut target = Vec::with_capacity(self.rows);
        for i in 0..self.rows {
            let row = self.row(i);
            features.extend_from_slice(&row[..n_features]);
            target.push(row[n_features]);
        }
        Ok((RowMajorMatrix::new(features, self.rows, n_features), target))
    }
}
