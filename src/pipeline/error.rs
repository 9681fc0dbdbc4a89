//! Error types for the salary pipeline.
//!
//! Cell-level coercion failures never reach this type: the loader turns them
//! into nulls. Everything here is terminal for the step that raised it.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by loading, cleaning, splitting and the feature pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input resource is missing or unreadable.
    #[error("Failed to read {}: {message}", path.display())]
    Resource { path: PathBuf, message: String },

    /// File extension is not a delimited text format.
    #[error("Unsupported file format: {extension}. Supported formats: csv, tsv, txt")]
    UnsupportedFormat { extension: String },

    /// A stage referenced a column that the table does not carry,
    /// or carries with an unusable type.
    #[error("{stage}: column '{column}' {reason}")]
    SchemaMismatch {
        stage: &'static str,
        column: String,
        reason: String,
    },

    /// A column declared non-nullable contains nulls after loading.
    #[error("Column '{column}' is declared non-nullable but has {nulls} null value(s)")]
    NullViolation { column: String, nulls: usize },

    /// Split weights are negative, non-finite, or sum to zero.
    #[error("Invalid split weights {weights:?}: {reason}")]
    InvalidWeights { weights: Vec<f64>, reason: String },

    /// A stage was configured inconsistently.
    #[error("{stage}: {reason}")]
    InvalidConfig { stage: &'static str, reason: String },

    /// Input rows that the stage cannot consume (nulls, NaN, ragged vectors).
    #[error("{stage}: {reason}")]
    InvalidInput { stage: &'static str, reason: String },

    /// Nothing to fit on.
    #[error("{stage}: {reason}")]
    EmptyInput { stage: &'static str, reason: String },

    /// Normal equations could not be solved.
    #[error("Feature matrix is singular or collinear (pivot {pivot} of {size}); cannot fit an unregularized model")]
    Singular { pivot: usize, size: usize },

    /// No view registered under this name.
    #[error("No view registered as '{0}'")]
    UnknownView(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub(crate) fn missing_column(stage: &'static str, column: &str) -> Self {
        PipelineError::SchemaMismatch {
            stage,
            column: column.to_string(),
            reason: "not found in table".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
