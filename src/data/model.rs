use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::schema::{CONTINENT, COUNTRY, GDP_PERCAP, LIFE_EXP, POP, YEAR};
use crate::error::{AnalysisError, AnalysisResult};

// ---------------------------------------------------------------------------
// Record – one row of the source file
// ---------------------------------------------------------------------------

/// A single country-year observation. Numeric fields are NaN when the
/// source cell was empty or unparseable.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub continent: String,
    pub year: f64,
    pub life_exp: f64,
    pub pop: f64,
    pub gdp_percap: f64,
}

// ---------------------------------------------------------------------------
// Column – a named, typed sequence of per-row values
// ---------------------------------------------------------------------------

/// Which variant a column is, used in schema listings and type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Scalar,
    Vector,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Scalar => write!(f, "scalar"),
            ColumnKind::Vector => write!(f, "vector"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Fixed-width numeric vector per row, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorColumn {
    width: usize,
    values: Vec<f64>,
    /// One label per component (category name, or `source[slot]`).
    slot_names: Vec<String>,
}

impl VectorColumn {
    /// Build from row-major values. `values.len()` must be a multiple of the
    /// number of slot names.
    pub fn new(slot_names: Vec<String>, values: Vec<f64>) -> AnalysisResult<Self> {
        let width = slot_names.len();
        if width == 0 {
            return Err(AnalysisError::InvalidParameter(
                "vector column needs at least one slot".into(),
            ));
        }
        if values.len() % width != 0 {
            return Err(AnalysisError::InvalidParameter(format!(
                "{} values do not fill rows of width {width}",
                values.len()
            )));
        }
        Ok(Self {
            width,
            values,
            slot_names,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.values.len() / self.width
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn slot_names(&self) -> &[String] {
        &self.slot_names
    }

    /// The vector stored for row `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.width..(i + 1) * self.width]
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.values.chunks_exact(self.width)
    }

    /// All components, row 0 first.
    pub fn as_flat(&self) -> &[f64] {
        &self.values
    }

    /// Values of a single component across rows.
    pub fn slot(&self, slot: usize) -> Vec<f64> {
        self.rows().map(|r| r[slot]).collect()
    }
}

/// A column of the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Scalar(Vec<f64>),
    Vector(VectorColumn),
    Categorical(Vec<String>),
}

impl Column {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Scalar(_) => ColumnKind::Scalar,
            Column::Vector(_) => ColumnKind::Vector,
            Column::Categorical(_) => ColumnKind::Categorical,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Column::Scalar(v) => v.len(),
            Column::Vector(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values per row: 1 for scalar and categorical columns.
    pub fn width(&self) -> usize {
        match self {
            Column::Vector(v) => v.width(),
            Column::Scalar(_) | Column::Categorical(_) => 1,
        }
    }

    /// Copy of the column restricted to `indices`, in that order.
    fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Scalar(v) => Column::Scalar(indices.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(indices.iter().map(|&i| v[i].clone()).collect())
            }
            Column::Vector(v) => {
                let mut values = Vec::with_capacity(indices.len() * v.width);
                for &i in indices {
                    values.extend_from_slice(v.row(i));
                }
                Column::Vector(VectorColumn {
                    width: v.width,
                    values,
                    slot_names: v.slot_names.clone(),
                })
            }
        }
    }
}

/// Schema entry returned by [`Dataset::schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub width: usize,
}

// ---------------------------------------------------------------------------
// Dataset – ordered, immutable collection of equal-length columns
// ---------------------------------------------------------------------------

/// Columnar dataset. Every transformation returns a new `Dataset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<(String, Column)>,
    row_count: usize,
}

impl Dataset {
    /// Assemble a dataset, checking names are unique and lengths agree.
    pub fn from_columns(columns: Vec<(String, Column)>) -> AnalysisResult<Self> {
        let row_count = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let mut seen = HashSet::new();
        for (name, col) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(AnalysisError::DuplicateColumn(name.clone()));
            }
            if col.len() != row_count {
                return Err(AnalysisError::LengthMismatch {
                    left: columns[0].0.clone(),
                    left_len: row_count,
                    right: name.clone(),
                    right_len: col.len(),
                });
            }
        }
        Ok(Self { columns, row_count })
    }

    /// Columnar view of loaded records, using the gapminder column names.
    pub fn from_records(records: &[Record]) -> Self {
        let columns = vec![
            (
                COUNTRY.to_string(),
                Column::Categorical(records.iter().map(|r| r.country.clone()).collect()),
            ),
            (
                CONTINENT.to_string(),
                Column::Categorical(records.iter().map(|r| r.continent.clone()).collect()),
            ),
            (YEAR.to_string(), Column::Scalar(records.iter().map(|r| r.year).collect())),
            (LIFE_EXP.to_string(), Column::Scalar(records.iter().map(|r| r.life_exp).collect())),
            (POP.to_string(), Column::Scalar(records.iter().map(|r| r.pop).collect())),
            (
                GDP_PERCAP.to_string(),
                Column::Scalar(records.iter().map(|r| r.gdp_percap).collect()),
            ),
        ];
        Dataset {
            columns,
            row_count: records.len(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.row_count
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn schema(&self) -> Vec<ColumnInfo> {
        self.columns
            .iter()
            .map(|(name, col)| ColumnInfo {
                name: name.clone(),
                kind: col.kind(),
                width: col.width(),
            })
            .collect()
    }

    pub fn column(&self, name: &str) -> AnalysisResult<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| AnalysisError::ColumnNotFound(name.to_string()))
    }

    pub fn get_scalar(&self, name: &str) -> AnalysisResult<&[f64]> {
        match self.column(name)? {
            Column::Scalar(v) => Ok(v),
            other => Err(mismatch(name, ColumnKind::Scalar, other)),
        }
    }

    pub fn get_vector(&self, name: &str) -> AnalysisResult<&VectorColumn> {
        match self.column(name)? {
            Column::Vector(v) => Ok(v),
            other => Err(mismatch(name, ColumnKind::Vector, other)),
        }
    }

    pub fn get_categorical(&self, name: &str) -> AnalysisResult<&[String]> {
        match self.column(name)? {
            Column::Categorical(v) => Ok(v),
            other => Err(mismatch(name, ColumnKind::Categorical, other)),
        }
    }

    /// New dataset with `column` replacing the column of the same name, or
    /// appended when no such column exists.
    pub fn with_column(&self, name: &str, column: Column) -> AnalysisResult<Dataset> {
        if column.len() != self.row_count && !self.columns.is_empty() {
            return Err(AnalysisError::LengthMismatch {
                left: self.columns[0].0.clone(),
                left_len: self.row_count,
                right: name.to_string(),
                right_len: column.len(),
            });
        }
        let mut columns = self.columns.clone();
        match columns.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = column,
            None => columns.push((name.to_string(), column)),
        }
        Dataset::from_columns(columns)
    }

    /// New dataset holding only `indices`, in the given order.
    pub fn take_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            columns: self
                .columns
                .iter()
                .map(|(n, c)| (n.clone(), c.take(indices)))
                .collect(),
            row_count: indices.len(),
        }
    }
}

fn mismatch(name: &str, expected: ColumnKind, found: &Column) -> AnalysisError {
    AnalysisError::ColumnTypeMismatch {
        name: name.to_string(),
        expected,
        actual: found.kind(),
    }
}
