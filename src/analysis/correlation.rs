//! Pearson correlation matrices over mixed scalar / vector columns.
//!
//! Pairing policy:
//! - Columns of equal width are flattened row-major and compared directly.
//! - A width-1 column paired with a width-N column repeats each row value N
//!   times, so every component is compared against its own row.
//! - Two vector columns of different widths cannot be aligned by row; their
//!   cell is NaN and listed by [`CorrelationMatrix::undefined_pairs`].
//!
//! A series with zero variance correlates as 0 with everything, itself
//! included.

use log::{debug, warn};
use serde::Serialize;

use crate::data::model::{Column, ColumnKind, Dataset};
use crate::error::{AnalysisError, AnalysisResult};

/// Pearson correlation of two equal-length series.
///
/// Returns 0 when either series is constant, NaN when either contains NaN.
pub fn pearson(x: &[f64], y: &[f64]) -> AnalysisResult<f64> {
    if x.len() != y.len() {
        return Err(AnalysisError::LengthMismatch {
            left: "x".into(),
            left_len: x.len(),
            right: "y".into(),
            right_len: y.len(),
        });
    }
    let n = x.len();
    if n == 0 {
        return Ok(0.0);
    }

    let mx = x.iter().sum::<f64>() / n as f64;
    let my = y.iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx.is_nan() || syy.is_nan() {
        return Ok(f64::NAN);
    }
    if is_constant(x) || is_constant(y) {
        return Ok(0.0);
    }
    Ok((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Every entry equal to the first. Summed squared deviations of a repeated
/// decimal such as 70.1 are not exactly zero, so spread is not a usable test.
pub(crate) fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

/// Flatten a numeric column into one series, row 0's components first.
pub fn flatten(name: &str, column: &Column) -> AnalysisResult<Vec<f64>> {
    match column {
        Column::Scalar(v) => Ok(v.clone()),
        Column::Vector(v) => Ok(v.as_flat().to_vec()),
        Column::Categorical(_) => Err(AnalysisError::ColumnTypeMismatch {
            name: name.to_string(),
            expected: ColumnKind::Scalar,
            actual: ColumnKind::Categorical,
        }),
    }
}

/// Flattened series of `column`, each row's components repeated so the
/// result has `width` entries per row.
fn flatten_to_width(name: &str, column: &Column, width: usize) -> AnalysisResult<Vec<f64>> {
    let own = column.width();
    let flat = flatten(name, column)?;
    if own == width {
        return Ok(flat);
    }
    // own == 1 here: repeat the row value across the partner's slots
    Ok(flat
        .iter()
        .flat_map(|&v| std::iter::repeat(v).take(width))
        .collect())
}

/// Correlation of two columns under the pairing policy; `None` when the
/// widths cannot be aligned.
fn paired_correlation(
    (a_name, a): (&str, &Column),
    (b_name, b): (&str, &Column),
) -> AnalysisResult<Option<f64>> {
    let (wa, wb) = (a.width(), b.width());
    if wa != wb && wa != 1 && wb != 1 {
        return Ok(None);
    }
    let width = wa.max(wb);
    let x = flatten_to_width(a_name, a, width)?;
    let y = flatten_to_width(b_name, b, width)?;
    if x.len() != y.len() {
        return Err(AnalysisError::LengthMismatch {
            left: a_name.to_string(),
            left_len: x.len(),
            right: b_name.to_string(),
            right_len: y.len(),
        });
    }
    pearson(&x, &y).map(Some)
}

// ---------------------------------------------------------------------------
// CorrelationMatrix
// ---------------------------------------------------------------------------

/// Square, symmetric correlation matrix with row/column labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    /// Row-major, `labels.len()²` entries.
    values: Vec<f64>,
}

impl CorrelationMatrix {
    fn from_fn(
        labels: Vec<String>,
        mut cell: impl FnMut(usize, usize) -> AnalysisResult<f64>,
    ) -> AnalysisResult<Self> {
        let n = labels.len();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let r = cell(i, j)?;
                values[i * n + j] = r;
                values[j * n + i] = r;
            }
        }
        Ok(Self { labels, values })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size() + j]
    }

    /// Look a cell up by label.
    pub fn get_by_label(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        Some(self.get(i, j))
    }

    /// Upper-triangle (i ≤ j) positions whose correlation is undefined.
    pub fn undefined_pairs(&self) -> Vec<(usize, usize)> {
        let n = self.size();
        (0..n)
            .flat_map(|i| (i..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.get(i, j).is_nan())
            .collect()
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            (0..n).all(|j| {
                let (a, b) = (self.get(i, j), self.get(j, i));
                (a.is_nan() && b.is_nan()) || (a - b).abs() <= tolerance
            })
        })
    }
}

/// Correlation between the requested columns, one cell per column pair, in
/// request order.
pub fn correlation_matrix(dataset: &Dataset, names: &[&str]) -> AnalysisResult<CorrelationMatrix> {
    let columns = names
        .iter()
        .map(|&n| dataset.column(n).map(|c| (n, c)))
        .collect::<AnalysisResult<Vec<_>>>()?;
    for &(name, col) in &columns {
        if col.kind() == ColumnKind::Categorical {
            return Err(AnalysisError::ColumnTypeMismatch {
                name: name.to_string(),
                expected: ColumnKind::Scalar,
                actual: ColumnKind::Categorical,
            });
        }
    }

    let labels = names.iter().map(|s| s.to_string()).collect();
    let matrix = CorrelationMatrix::from_fn(labels, |i, j| {
        if i == j {
            let series = flatten(columns[i].0, columns[i].1)?;
            return Ok(self_correlation(&series));
        }
        Ok(paired_correlation(columns[i], columns[j])?.unwrap_or(f64::NAN))
    })?;

    for (i, j) in matrix.undefined_pairs() {
        warn!(
            "Correlation of '{}' (width {}) and '{}' (width {}) is undefined",
            names[i],
            columns[i].1.width(),
            names[j],
            columns[j].1.width()
        );
    }
    debug!("Computed {}x{} column correlation matrix", matrix.size(), matrix.size());
    Ok(matrix)
}

/// Correlation between every scalar-equivalent dimension of the requested
/// columns: each vector slot becomes its own row, labelled `column[slot]`.
pub fn component_correlation_matrix(
    dataset: &Dataset,
    names: &[&str],
) -> AnalysisResult<CorrelationMatrix> {
    let mut labels = Vec::new();
    let mut series = Vec::new();
    for &name in names {
        match dataset.column(name)? {
            Column::Scalar(v) => {
                labels.push(name.to_string());
                series.push(v.clone());
            }
            Column::Vector(v) => {
                for (slot, slot_name) in v.slot_names().iter().enumerate() {
                    labels.push(format!("{name}[{slot_name}]"));
                    series.push(v.slot(slot));
                }
            }
            Column::Categorical(_) => {
                return Err(AnalysisError::ColumnTypeMismatch {
                    name: name.to_string(),
                    expected: ColumnKind::Scalar,
                    actual: ColumnKind::Categorical,
                })
            }
        }
    }

    let matrix = CorrelationMatrix::from_fn(labels, |i, j| {
        if i == j {
            Ok(self_correlation(&series[i]))
        } else {
            pearson(&series[i], &series[j])
        }
    })?;
    debug!("Computed {}x{} component correlation matrix", matrix.size(), matrix.size());
    Ok(matrix)
}

/// 1 for a series with spread, 0 for a constant one.
fn self_correlation(series: &[f64]) -> f64 {
    let r = pearson(series, series).unwrap_or(0.0);
    if r.is_nan() {
        r
    } else if r == 0.0 {
        0.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::VectorColumn;

    fn dataset() -> Dataset {
        let onehot = VectorColumn::new(
            vec!["Asia".into(), "Europe".into()],
            vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0],
        )
        .unwrap();
        let three = VectorColumn::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
        )
        .unwrap();
        Dataset::from_columns(vec![
            ("X".into(), Column::Scalar(vec![1.0, 2.0, 3.0, 4.0])),
            ("Y".into(), Column::Scalar(vec![2.0, 4.0, 6.0, 8.0])),
            ("Z".into(), Column::Scalar(vec![4.0, 3.0, 2.0, 1.0])),
            ("Flat".into(), Column::Scalar(vec![5.0; 4])),
            ("Enc".into(), Column::Vector(onehot)),
            ("Three".into(), Column::Vector(three)),
            ("Name".into(), Column::Categorical(vec!["a".into(); 4])),
        ])
        .unwrap()
    }

    #[test]
    fn test_pearson_perfect() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_length_mismatch() {
        let err = pearson(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::LengthMismatch { left_len: 2, right_len: 1, .. }));
    }

    #[test]
    fn test_pearson_constant_is_zero() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_repeated_decimal_is_constant() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(pearson(&[70.1; 7], &x).unwrap(), 0.0);
        assert_eq!(pearson(&[70.1; 7], &[0.1; 7]).unwrap(), 0.0);
    }

    #[test]
    fn test_decimal_constant_columns_on_diagonal() {
        let ds = Dataset::from_columns(vec![
            ("Life".into(), Column::Scalar(vec![70.1; 7])),
            ("Tenth".into(), Column::Scalar(vec![0.1; 7])),
            ("X".into(), Column::Scalar((1..=7).map(f64::from).collect())),
        ])
        .unwrap();
        let m = correlation_matrix(&ds, &["Life", "Tenth", "X"]).unwrap();
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.get(1, 1), 0.0);
        assert_eq!(m.get(0, 1), 0.0);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.get(2, 2), 1.0);
    }

    #[test]
    fn test_matrix_symmetric_with_labels() {
        let ds = dataset();
        let m = correlation_matrix(&ds, &["Z", "X", "Y", "Enc"]).unwrap();
        assert_eq!(m.labels(), &["Z", "X", "Y", "Enc"]);
        assert!(m.is_symmetric(1e-12));
        assert!((m.get_by_label("X", "Y").unwrap() - 1.0).abs() < 1e-12);
        assert!((m.get_by_label("Z", "X").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_diagonal_policy() {
        let ds = dataset();
        let m = correlation_matrix(&ds, &["X", "Flat", "Enc"]).unwrap();
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(1, 1), 0.0);
        assert_eq!(m.get(2, 2), 1.0);
        assert_eq!(m.get(0, 1), 0.0);
    }

    #[test]
    fn test_scalar_vector_pair_repeats_scalar() {
        let ds = dataset();
        let m = correlation_matrix(&ds, &["X", "Enc"]).unwrap();
        // X repeated per slot: [1,1,2,2,3,3,4,4] against [1,0,0,1,1,0,0,1]
        let expected = pearson(
            &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0],
            &[1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0],
        )
        .unwrap();
        assert!((m.get(0, 1) - expected).abs() < 1e-12);
        assert!(m.undefined_pairs().is_empty());
    }

    #[test]
    fn test_unequal_vector_widths_are_undefined() {
        let ds = dataset();
        let m = correlation_matrix(&ds, &["Enc", "Three"]).unwrap();
        assert!(m.get(0, 1).is_nan());
        assert!(m.get(1, 0).is_nan());
        assert_eq!(m.undefined_pairs(), vec![(0, 1)]);
        assert!(m.is_symmetric(0.0));
    }

    #[test]
    fn test_categorical_rejected() {
        let err = correlation_matrix(&dataset(), &["X", "Name"]).unwrap_err();
        assert!(matches!(err, AnalysisError::ColumnTypeMismatch { ref name, .. } if name == "Name"));
    }

    #[test]
    fn test_missing_column() {
        let err = correlation_matrix(&dataset(), &["X", "Nope"]).unwrap_err();
        assert!(matches!(err, AnalysisError::ColumnNotFound(_)));
    }

    #[test]
    fn test_component_matrix_expands_slots() {
        let ds = dataset();
        let m = component_correlation_matrix(&ds, &["X", "Enc"]).unwrap();
        assert_eq!(m.labels(), &["X", "Enc[Asia]", "Enc[Europe]"]);
        assert!(m.is_symmetric(1e-12));
        assert!((m.get(1, 2) + 1.0).abs() < 1e-12);
        assert_eq!(m.get(1, 1), 1.0);
    }
}
