use log::warn;
use serde::Serialize;

use super::solver::Model;
use crate::analysis::correlation::is_constant;
use crate::data::model::Dataset;
use crate::error::{AnalysisError, AnalysisResult};

/// Regression quality on a held-out partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub rmse: f64,
    pub mae: f64,
    /// Coefficient of determination; 0 when the labels are constant.
    pub r_squared: f64,
    pub n_observations: usize,
}

/// Score `model` on `test`.
pub fn evaluate(
    model: &Model,
    test: &Dataset,
    feature_column: &str,
    label_column: &str,
) -> AnalysisResult<Metrics> {
    if test.is_empty() {
        return Err(AnalysisError::EmptyTestSet);
    }
    if feature_column != model.feature_column {
        return Err(AnalysisError::InvalidParameter(format!(
            "model was fit on '{}', not '{feature_column}'",
            model.feature_column
        )));
    }
    let predicted = model.predict(test)?;
    let actual = test.get_scalar(label_column)?;
    regression_metrics(&predicted, actual)
}

/// RMSE, MAE and R² of `predicted` against `actual`.
pub fn regression_metrics(predicted: &[f64], actual: &[f64]) -> AnalysisResult<Metrics> {
    if predicted.len() != actual.len() {
        return Err(AnalysisError::LengthMismatch {
            left: "predicted".into(),
            left_len: predicted.len(),
            right: "actual".into(),
            right_len: actual.len(),
        });
    }
    if actual.is_empty() {
        return Err(AnalysisError::EmptyTestSet);
    }

    let n = actual.len() as f64;
    let mean_actual = actual.iter().sum::<f64>() / n;

    let (mut ss_res, mut abs_sum, mut ss_tot) = (0.0, 0.0, 0.0);
    for (p, a) in predicted.iter().zip(actual) {
        let err = p - a;
        ss_res += err * err;
        abs_sum += err.abs();
        ss_tot += (a - mean_actual).powi(2);
    }

    let r_squared = if is_constant(actual) {
        warn!("Test labels are constant; R² reported as 0");
        0.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(Metrics {
        rmse: (ss_res / n).sqrt(),
        mae: abs_sum / n,
        r_squared,
        n_observations: actual.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_values() {
        let m = regression_metrics(&[2.0, 4.0, 6.0], &[1.0, 4.0, 8.0]).unwrap();
        // errors: 1, 0, -2
        assert!((m.rmse - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((m.mae - 1.0).abs() < 1e-12);
        // mean 13/3, ss_tot = (100 + 1 + 121) / 9
        assert!((m.r_squared - (1.0 - 5.0 / (222.0 / 9.0))).abs() < 1e-12);
        assert_eq!(m.n_observations, 3);
    }

    #[test]
    fn test_perfect_prediction() {
        let m = regression_metrics(&[70.0, 72.0], &[70.0, 72.0]).unwrap();
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.r_squared, 1.0);
    }

    #[test]
    fn test_constant_labels_give_zero_r_squared() {
        let m = regression_metrics(&[69.0, 71.0, 70.0], &[70.0, 70.0, 70.0]).unwrap();
        assert_eq!(m.r_squared, 0.0);
        assert!(!m.r_squared.is_nan());
        assert!(m.rmse > 0.0);

        // 70.1 has no exact binary form; the mean drifts off the value
        let m = regression_metrics(&[69.0, 71.0, 70.0, 70.5, 69.5, 70.2, 70.3], &[70.1; 7])
            .unwrap();
        assert_eq!(m.r_squared, 0.0);
    }

    #[test]
    fn test_empty_and_mismatched() {
        assert!(matches!(regression_metrics(&[], &[]), Err(AnalysisError::EmptyTestSet)));
        assert!(matches!(
            regression_metrics(&[1.0], &[1.0, 2.0]),
            Err(AnalysisError::LengthMismatch { .. })
        ));
    }
}
