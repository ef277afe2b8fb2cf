use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::schema::{GDP_PERCAP, LIFE_EXP, POP, YEAR};
use crate::error::{AnalysisError, AnalysisResult};
use crate::regression::SolverOptions;

// ---------------------------------------------------------------------------
// Chart options
// ---------------------------------------------------------------------------

/// Size and binning of the rendered PNG charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
    /// Bins used by the three distribution histograms.
    pub histogram_bins: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 600,
            height: 400,
            histogram_bins: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything one analysis run needs. Every field has a default, so a JSON
/// config file only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Share of rows held out for evaluation.
    pub test_fraction: f64,
    pub seed: u64,
    pub solver: SolverOptions,
    /// Columns of the encoded dataset to correlate, in display order.
    pub correlation_columns: Vec<String>,
    pub charts: ChartOptions,
    /// Write `report.json` next to the charts.
    pub export_json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("dataset.csv"),
            output_dir: PathBuf::from("."),
            test_fraction: 0.2,
            seed: 0,
            solver: SolverOptions::default(),
            correlation_columns: [
                "CountryEncoded",
                "ContinentEncoded",
                YEAR,
                LIFE_EXP,
                POP,
                GDP_PERCAP,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            charts: ChartOptions::default(),
            export_json: true,
        }
    }
}

impl RunConfig {
    /// Read a JSON config file; absent fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        if !(0.0..=1.0).contains(&self.test_fraction) {
            return Err(AnalysisError::InvalidParameter(format!(
                "test_fraction {} (must be in [0, 1])",
                self.test_fraction
            )));
        }
        self.solver.validate()?;
        if self.charts.histogram_bins == 0 {
            return Err(AnalysisError::InvalidParameter(
                "charts.histogram_bins must be positive".into(),
            ));
        }
        if self.charts.width == 0 || self.charts.height == 0 {
            return Err(AnalysisError::InvalidParameter(
                "chart dimensions must be positive".into(),
            ));
        }
        if self.correlation_columns.is_empty() {
            return Err(AnalysisError::InvalidParameter(
                "correlation_columns must name at least one column".into(),
            ));
        }
        Ok(())
    }

    /// Human-readable summary of the effective settings.
    pub fn summary(&self) -> String {
        format!(
            "input:         {}\noutput dir:    {}\ntest fraction: {}\nseed:          {}\nl2 penalty:    {}\ncharts:        {}",
            self.input.display(),
            self.output_dir.display(),
            self.test_fraction,
            self.seed,
            self.solver.l2_penalty,
            if self.charts.enabled { "on" } else { "off" },
        )
    }
}
