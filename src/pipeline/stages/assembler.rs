//! Feature vector assembly

use polars::prelude::*;

use crate::pipeline::error::{PipelineError, Result};

const STAGE: &str = "VectorAssembler";

/// What to do with a row whose inputs contain null or NaN
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandleInvalid {
    /// Fail the transform
    #[default]
    Error,
    /// Drop the row
    Skip,
    /// Keep the row, writing NaN into the vector
    Keep,
}

impl std::str::FromStr for HandleInvalid {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(HandleInvalid::Error),
            "skip" => Ok(HandleInvalid::Skip),
            "keep" => Ok(HandleInvalid::Keep),
            other => Err(format!(
                "unknown invalid-row policy '{}'. Options: error, skip, keep",
                other
            )),
        }
    }
}

/// Concatenates numeric columns into one `List(Float64)` column.
/// Stateless: fitting is a no-op.
#[derive(Debug, Clone)]
pub struct VectorAssembler {
    pub input_cols: Vec<String>,
    pub output_col: String,
    pub handle_invalid: HandleInvalid,
}

impl VectorAssembler {
    pub fn new(input_cols: &[&str], output_col: &str) -> Self {
        Self {
            input_cols: input_cols.iter().map(|s| s.to_string()).collect(),
            output_col: output_col.to_string(),
            handle_invalid: HandleInvalid::default(),
        }
    }

    pub fn with_handle_invalid(mut self, handle_invalid: HandleInvalid) -> Self {
        self.handle_invalid = handle_invalid;
        self
    }

    /// Check every input column is present and numeric
    pub fn validate(&self, df: &DataFrame) -> Result<()> {
        if self.input_cols.is_empty() {
            return Err(PipelineError::InvalidConfig {
                stage: STAGE,
                reason: "no input columns configured".to_string(),
            });
        }

        for name in &self.input_cols {
            let column = df
                .column(name)
                .map_err(|_| PipelineError::missing_column(STAGE, name))?;
            if !column.dtype().is_primitive_numeric() {
                return Err(PipelineError::SchemaMismatch {
                    stage: STAGE,
                    column: name.clone(),
                    reason: format!("must be numeric, found {}", column.dtype()),
                });
            }
        }
        Ok(())
    }

    /// Append the feature vector column
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.validate(df)?;

        let inputs: Vec<Float64Chunked> = self
            .input_cols
            .iter()
            .map(|name| -> Result<Float64Chunked> {
                let column = df.column(name)?.cast(&DataType::Float64)?;
                Ok(column.f64()?.clone())
            })
            .collect::<Result<_>>()?;

        let height = df.height();
        let mut vectors: Vec<Option<Series>> = Vec::with_capacity(height);
        let mut keep = vec![true; height];

        for row in 0..height {
            let values: Vec<f64> = inputs
                .iter()
                .map(|ca| ca.get(row).unwrap_or(f64::NAN))
                .collect();

            if values.iter().any(|v| v.is_nan()) {
                match self.handle_invalid {
                    HandleInvalid::Error => {
                        let column = self
                            .input_cols
                            .iter()
                            .zip(&values)
                            .find(|(_, v)| v.is_nan())
                            .map(|(name, _)| name.as_str())
                            .unwrap_or_default();
                        return Err(PipelineError::InvalidInput {
                            stage: STAGE,
                            reason: format!(
                                "row {} has a null or NaN value in '{}'. Clean the data or use skip/keep",
                                row, column
                            ),
                        });
                    }
                    HandleInvalid::Skip => keep[row] = false,
                    HandleInvalid::Keep => {}
                }
            }

            vectors.push(Some(Series::new(PlSmallStr::EMPTY, values)));
        }

        let features: ListChunked = vectors.into_iter().collect();
        let mut out = df.clone();
        out.with_column(features.with_name(self.output_col.as_str().into()).into_series())?;

        if keep.iter().all(|&k| k) {
            return Ok(out);
        }

        let mask: BooleanChunked = keep.into_iter().collect();
        Ok(out.filter(&mask)?)
    }
}
