use thiserror::Error;

use crate::data::model::ColumnKind;

/// Errors raised by the analysis core. Every variant is fatal to the run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Column '{name}' is a {actual} column, expected {expected}")]
    ColumnTypeMismatch {
        name: String,
        expected: ColumnKind,
        actual: ColumnKind,
    },

    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("Unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("Length mismatch: '{left}' has {left_len} values, '{right}' has {right_len}")]
    LengthMismatch {
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
    },

    // Regression
    #[error("Feature matrix of '{column}' is singular: {reason}")]
    SingularFeatureMatrix { column: String, reason: String },

    #[error("Training partition has no rows with finite features and label")]
    EmptyTrainingSet,

    #[error("Test partition is empty")]
    EmptyTestSet,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // Report sink
    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
