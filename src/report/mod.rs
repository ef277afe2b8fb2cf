/// Report sink: everything the analysis hands to the outside world.
///
/// ```text
///               Report
///        ┌────────┼─────────┐
///        ▼        ▼         ▼
///    summary   charts    export
///   (stdout)   (PNGs)  (report.json)
/// ```

pub mod charts;
pub mod export;
pub mod summary;

use serde::Serialize;

use crate::analysis::correlation::CorrelationMatrix;
use crate::analysis::encoder::EncodingMap;
use crate::analysis::stats::{Summary, Validity};
use crate::regression::{Metrics, Model};

/// Row/column counts of the loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub row_count: usize,
    pub column_count: usize,
    pub distinct_countries: usize,
    pub distinct_continents: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub validity: Validity,
    pub summary: Summary,
}

/// Series for the distribution charts, taken from the cleaned dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distributions {
    pub life_exp: Vec<f64>,
    pub gdp_percap: Vec<f64>,
    pub pop: Vec<f64>,
    /// `(year, rows)` pairs sorted by year.
    pub year_counts: Vec<(f64, usize)>,
}

/// Paired series for a scatter plot; `groups` names each point's category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter {
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub groups: Vec<String>,
}

/// Complete output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub overview: Overview,
    pub summaries: Vec<ColumnSummary>,
    pub encodings: Vec<EncodingMap>,
    pub distributions: Distributions,
    pub scatter: Scatter,
    pub correlation: CorrelationMatrix,
    pub model: Model,
    pub metrics: Metrics,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl Report {
    /// Summary of one numeric column, if it was described.
    pub fn summary(&self, column: &str) -> Option<&Summary> {
        self.summaries
            .iter()
            .find(|s| s.column == column)
            .map(|s| &s.summary)
    }
}
