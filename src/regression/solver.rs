//! Linear least squares by cyclic coordinate descent.
//!
//! Minimizes `(1 / 2n) Σ (y − b − x·w)² + (λ / 2) Σ w²` over standardized
//! features. The L2 term keeps collinear one-hot blocks well posed; with
//! `λ = 0` the solver still converges to a least-squares solution, just not
//! a unique one. Reported weights are on the original feature scale.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::correlation::is_constant;
use crate::data::model::{Column, ColumnKind, Dataset};
use crate::error::{AnalysisError, AnalysisResult};

/// Options for the coordinate-descent fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// L2 penalty on standardized weights (must be >= 0)
    pub l2_penalty: f64,
    /// Maximum full passes over the features
    pub max_iterations: u32,
    /// Stop once the largest squared step of a standardized weight falls
    /// below `tolerance` times the label variance
    pub tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            l2_penalty: 1e-4,
            max_iterations: 1000,
            tolerance: 1e-7,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.l2_penalty >= 0.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "l2_penalty {} (must be >= 0)",
                self.l2_penalty
            )));
        }
        if self.max_iterations == 0 {
            return Err(AnalysisError::InvalidParameter(
                "max_iterations must be positive".into(),
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "tolerance {} (must be > 0)",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// A fitted linear model. Weights line up with the slots of the feature
/// column it was trained on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    pub feature_column: String,
    pub feature_names: Vec<String>,
    pub weights: Vec<f64>,
    pub bias: f64,
    pub iterations: u32,
    pub converged: bool,
}

impl Model {
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    /// Predictions for every row of the model's feature column in `dataset`.
    pub fn predict(&self, dataset: &Dataset) -> AnalysisResult<Vec<f64>> {
        let design = DesignMatrix::from_dataset(dataset, &self.feature_column)?;
        if design.width != self.weights.len() {
            return Err(AnalysisError::LengthMismatch {
                left: "model weights".into(),
                left_len: self.weights.len(),
                right: self.feature_column.clone(),
                right_len: design.width,
            });
        }
        Ok(design.rows().map(|r| self.predict_row(r)).collect())
    }
}

/// Row-major feature values; a scalar column is a width-1 design.
pub(crate) struct DesignMatrix {
    pub width: usize,
    pub names: Vec<String>,
    values: Vec<f64>,
}

impl DesignMatrix {
    pub fn from_dataset(dataset: &Dataset, column: &str) -> AnalysisResult<Self> {
        match dataset.column(column)? {
            Column::Scalar(v) => Ok(Self {
                width: 1,
                names: vec![column.to_string()],
                values: v.clone(),
            }),
            Column::Vector(v) => Ok(Self {
                width: v.width(),
                names: v.slot_names().to_vec(),
                values: v.as_flat().to_vec(),
            }),
            Column::Categorical(_) => Err(AnalysisError::ColumnTypeMismatch {
                name: column.to_string(),
                expected: ColumnKind::Vector,
                actual: ColumnKind::Categorical,
            }),
        }
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.values.chunks_exact(self.width.max(1))
    }
}

/// Fit `label_column ≈ bias + feature_column · w` on `train`.
///
/// Rows with a non-finite feature or label are skipped. Features that are
/// constant over the remaining rows get weight 0.
pub fn fit(
    train: &Dataset,
    feature_column: &str,
    label_column: &str,
    options: &SolverOptions,
) -> AnalysisResult<Model> {
    options.validate()?;
    let design = DesignMatrix::from_dataset(train, feature_column)?;
    let labels = train.get_scalar(label_column)?;

    let usable: Vec<usize> = design
        .rows()
        .zip(labels)
        .enumerate()
        .filter(|(_, (row, y))| y.is_finite() && row.iter().all(|v| v.is_finite()))
        .map(|(i, _)| i)
        .collect();
    if usable.len() < train.len() {
        warn!(
            "Skipping {} training rows with non-finite values",
            train.len() - usable.len()
        );
    }
    if usable.is_empty() {
        return Err(AnalysisError::EmptyTrainingSet);
    }

    let n = usable.len() as f64;
    let p = design.width;
    let rows: Vec<&[f64]> = design.rows().collect();

    // Center and scale each feature; constant features stay inactive.
    let mut means = vec![0.0; p];
    let mut scales = vec![0.0; p];
    let mut standardized: Vec<Option<Vec<f64>>> = Vec::with_capacity(p);
    for j in 0..p {
        let col: Vec<f64> = usable.iter().map(|&i| rows[i][j]).collect();
        let m = col.iter().sum::<f64>() / n;
        let sd = if is_constant(&col) {
            0.0
        } else {
            (col.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n).sqrt()
        };
        means[j] = m;
        scales[j] = sd;
        standardized.push((sd > 0.0).then(|| col.iter().map(|v| (v - m) / sd).collect()));
    }

    let y_mean = usable.iter().map(|&i| labels[i]).sum::<f64>() / n;
    let mut residual: Vec<f64> = usable.iter().map(|&i| labels[i] - y_mean).collect();
    let mut beta = vec![0.0; p];

    let active = standardized.iter().filter(|c| c.is_some()).count();
    debug!(
        "Fitting '{label_column}' on '{feature_column}': {} rows, {p} features ({active} active)",
        usable.len()
    );

    let lambda = options.l2_penalty;
    let threshold = options.tolerance * residual.iter().map(|r| r * r).sum::<f64>() / n;
    let mut iterations = 0;
    let mut converged = active == 0 || threshold == 0.0;
    while !converged && iterations < options.max_iterations {
        iterations += 1;
        let mut max_delta: f64 = 0.0;
        for (j, z) in standardized.iter().enumerate() {
            let Some(z) = z else { continue };
            let rho = z.iter().zip(&residual).map(|(a, r)| a * r).sum::<f64>() / n + beta[j];
            let updated = rho / (1.0 + lambda);
            let delta = updated - beta[j];
            if delta != 0.0 {
                for (r, a) in residual.iter_mut().zip(z) {
                    *r -= delta * a;
                }
                beta[j] = updated;
                max_delta = max_delta.max(delta.abs());
            }
        }
        if beta.iter().any(|b| !b.is_finite()) {
            return Err(AnalysisError::SingularFeatureMatrix {
                column: feature_column.to_string(),
                reason: format!("weights diverged at iteration {iterations}"),
            });
        }
        converged = max_delta * max_delta < threshold;
    }

    if !converged {
        warn!(
            "Coordinate descent did not converge in {} iterations (tolerance {})",
            options.max_iterations, options.tolerance
        );
    }

    let weights: Vec<f64> = (0..p)
        .map(|j| if scales[j] > 0.0 { beta[j] / scales[j] } else { 0.0 })
        .collect();
    let bias = y_mean - weights.iter().zip(&means).map(|(w, m)| w * m).sum::<f64>();

    if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
        return Err(AnalysisError::SingularFeatureMatrix {
            column: feature_column.to_string(),
            reason: "non-finite weights".into(),
        });
    }

    info!("Fitted {p} weights in {iterations} iterations (converged: {converged})");
    Ok(Model {
        feature_column: feature_column.to_string(),
        feature_names: design.names,
        weights,
        bias,
        iterations,
        converged,
    })
}
