//! Descriptive statistics over scalar columns.
//!
//! Invalid entries (see [`Validity`]) are excluded from the mean and replaced
//! by that mean in the cleaned series, so the cleaned series keeps the
//! length and row alignment of the input.

use std::collections::HashSet;
use std::hash::Hash;

use log::warn;
use serde::Serialize;

/// Which values of a column count as valid observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Validity {
    /// Anything but NaN or infinity.
    Finite,
    /// Finite and strictly positive (calendar years).
    PositiveFinite,
}

impl Validity {
    pub fn accepts(self, value: f64) -> bool {
        match self {
            Validity::Finite => value.is_finite(),
            Validity::PositiveFinite => value.is_finite() && value > 0.0,
        }
    }
}

/// Summary of one scalar column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Mean of valid entries (NaN when there are none).
    pub mean: f64,
    /// Sample standard deviation of the mean-imputed series.
    pub std_dev: f64,
    pub valid_count: usize,
    pub count: usize,
    pub min: f64,
    pub max: f64,
}

/// Describe a scalar column under the given validity rule.
pub fn describe(values: &[f64], validity: Validity) -> Summary {
    let valid: Vec<f64> = values.iter().copied().filter(|&v| validity.accepts(v)).collect();
    let mean = mean(&valid);
    let cleaned = impute_with(values, validity, mean);

    Summary {
        mean,
        std_dev: std_dev(&cleaned),
        valid_count: valid.len(),
        count: values.len(),
        min: valid.iter().copied().fold(f64::NAN, f64::min),
        max: valid.iter().copied().fold(f64::NAN, f64::max),
    }
}

/// Replace invalid entries with the mean of the valid ones.
///
/// A column with no valid entry is returned unchanged.
pub fn impute_mean(values: &[f64], validity: Validity) -> Vec<f64> {
    let valid: Vec<f64> = values.iter().copied().filter(|&v| validity.accepts(v)).collect();
    if valid.is_empty() && !values.is_empty() {
        warn!("No valid values among {} entries; nothing to impute from", values.len());
    }
    impute_with(values, validity, mean(&valid))
}

fn impute_with(values: &[f64], validity: Validity, fill: f64) -> Vec<f64> {
    if fill.is_nan() {
        return values.to_vec();
    }
    values
        .iter()
        .map(|&v| if validity.accepts(v) { v } else { fill })
        .collect()
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 denominator); NaN below two values.
pub fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Number of distinct values.
pub fn distinct_count<T: Eq + Hash>(values: &[T]) -> usize {
    values.iter().collect::<HashSet<_>>().len()
}

/// Distinct values with their occurrence counts, sorted by value.
/// NaN entries are skipped.
pub fn value_counts(values: &[f64]) -> Vec<(f64, usize)> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);

    let mut counts: Vec<(f64, usize)> = Vec::new();
    for v in sorted {
        match counts.last_mut() {
            Some((last, n)) if *last == v => *n += 1,
            _ => counts.push((v, 1)),
        }
    }
    counts
}

/// Equal-width histogram over the finite entries of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Histogram {
            edges: Vec::new(),
            counts: Vec::new(),
        };
    }

    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi <= lo {
        hi = lo + 1.0;
    }
    let step = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / step).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let edges = (0..=bins).map(|i| lo + step * i as f64).collect();
    Histogram { edges, counts }
}
