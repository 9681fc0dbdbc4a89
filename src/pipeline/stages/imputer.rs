//! Missing-value imputation stage

use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::error::{PipelineError, Result};

const STAGE: &str = "Imputer";

/// Statistic used as the replacement value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImputeStrategy {
    #[default]
    Mean,
    Median,
    /// Most frequent value; ties go to the smallest value
    Mode,
}

impl std::str::FromStr for ImputeStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mean" => Ok(ImputeStrategy::Mean),
            "median" => Ok(ImputeStrategy::Median),
            "mode" => Ok(ImputeStrategy::Mode),
            other => Err(format!(
                "unknown imputation strategy '{}'. Options: mean, median, mode",
                other
            )),
        }
    }
}

impl std::fmt::Display for ImputeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImputeStrategy::Mean => write!(f, "mean"),
            ImputeStrategy::Median => write!(f, "median"),
            ImputeStrategy::Mode => write!(f, "mode"),
        }
    }
}

/// Replaces a missing marker (and nulls) in numeric columns with a fitted
/// statistic, writing the result to new columns.
///
/// The salary pipeline uses `missing_value = 0.0` on draft round and overall
/// pick. That also treats a genuine zero in those columns as missing.
/// Without [`Imputer::with_missing_value`] only nulls are replaced.
#[derive(Debug, Clone)]
pub struct Imputer {
    pub input_cols: Vec<String>,
    pub output_cols: Vec<String>,
    pub missing_value: f64,
    pub strategy: ImputeStrategy,
}

impl Imputer {
    pub fn new(input_cols: &[&str], output_cols: &[&str]) -> Self {
        Self {
            input_cols: input_cols.iter().map(|s| s.to_string()).collect(),
            output_cols: output_cols.iter().map(|s| s.to_string()).collect(),
            missing_value: f64::NAN,
            strategy: ImputeStrategy::default(),
        }
    }

    pub fn with_missing_value(mut self, missing_value: f64) -> Self {
        self.missing_value = missing_value;
        self
    }

    pub fn with_strategy(mut self, strategy: ImputeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Compute one surrogate per input column
    pub fn fit(&self, df: &DataFrame) -> Result<ImputerModel> {
        if self.input_cols.len() != self.output_cols.len() {
            return Err(PipelineError::InvalidConfig {
                stage: STAGE,
                reason: format!(
                    "{} input column(s) but {} output column(s)",
                    self.input_cols.len(),
                    self.output_cols.len()
                ),
            });
        }

        let mut surrogates = Vec::with_capacity(self.input_cols.len());
        for name in &self.input_cols {
            let values = numeric_values(df, name)?;
            let observed: Vec<f64> = values
                .into_iter()
                .flatten()
                .filter(|v| !v.is_nan() && !self.is_marker(*v))
                .collect();

            let surrogate = surrogate(&observed, self.strategy).ok_or_else(|| {
                PipelineError::EmptyInput {
                    stage: STAGE,
                    reason: format!(
                        "surrogate for '{}' cannot be computed: every value is null, NaN or the missing marker",
                        name
                    ),
                }
            })?;
            surrogates.push(surrogate);
        }

        Ok(ImputerModel {
            input_cols: self.input_cols.clone(),
            output_cols: self.output_cols.clone(),
            missing_value: self.missing_value,
            strategy: self.strategy,
            surrogates,
        })
    }

    fn is_marker(&self, value: f64) -> bool {
        !self.missing_value.is_nan() && value == self.missing_value
    }
}

/// Fitted imputer: one surrogate per input column
#[derive(Debug, Clone)]
pub struct ImputerModel {
    input_cols: Vec<String>,
    output_cols: Vec<String>,
    missing_value: f64,
    strategy: ImputeStrategy,
    surrogates: Vec<f64>,
}

impl ImputerModel {
    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }

    pub fn missing_value(&self) -> f64 {
        self.missing_value
    }

    /// Surrogates keyed by input column name
    pub fn surrogates(&self) -> HashMap<String, f64> {
        self.input_cols
            .iter()
            .cloned()
            .zip(self.surrogates.iter().copied())
            .collect()
    }

    pub fn surrogate(&self, input_col: &str) -> Option<f64> {
        self.input_cols
            .iter()
            .position(|c| c == input_col)
            .map(|i| self.surrogates[i])
    }

    /// Append the imputed output columns
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut out = df.clone();

        for ((input, output), &surrogate) in self
            .input_cols
            .iter()
            .zip(&self.output_cols)
            .zip(&self.surrogates)
        {
            let imputed: Float64Chunked = numeric_values(df, input)?
                .into_iter()
                .map(|v| match v {
                    None => Some(surrogate),
                    Some(x) if !self.missing_value.is_nan() && x == self.missing_value => {
                        Some(surrogate)
                    }
                    Some(x) => Some(x),
                })
                .collect();

            out.with_column(imputed.with_name(output.as_str().into()).into_series())?;
        }

        Ok(out)
    }
}

/// Read a numeric column as optional f64 values
fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::missing_column(STAGE, name))?;

    if !column.dtype().is_primitive_numeric() {
        return Err(PipelineError::SchemaMismatch {
            stage: STAGE,
            column: name.to_string(),
            reason: format!("must be numeric, found {}", column.dtype()),
        });
    }

    let float_col = column.cast(&DataType::Float64)?;
    Ok(float_col.f64()?.into_iter().collect())
}

fn surrogate(values: &[f64], strategy: ImputeStrategy) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let value = match strategy {
        ImputeStrategy::Mean => values.iter().sum::<f64>() / values.len() as f64,
        ImputeStrategy::Median => {
            let mut sorted = values.to_vec();
            sorted.sort_by(f64::total_cmp);
            let n = sorted.len();
            if n % 2 == 0 {
                (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
            } else {
                sorted[n / 2]
            }
        }
        ImputeStrategy::Mode => {
            let mut sorted = values.to_vec();
            sorted.sort_by(f64::total_cmp);

            let mut best = sorted[0];
            let mut best_run = 0usize;
            let mut run = 0usize;
            for (i, &v) in sorted.iter().enumerate() {
                run = if i > 0 && sorted[i - 1] == v { run + 1 } else { 1 };
                if run > best_run {
                    best_run = run;
                    best = v;
                }
            }
            best
        }
    };

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surrogate_mean_median_mode() {
        let values = [1.0, 2.0, 2.0, 7.0];
        assert_eq!(surrogate(&values, ImputeStrategy::Mean), Some(3.0));
        assert_eq!(surrogate(&values, ImputeStrategy::Median), Some(2.0));
        assert_eq!(surrogate(&values, ImputeStrategy::Mode), Some(2.0));
    }

    #[test]
    fn test_mode_ties_pick_smallest() {
        let values = [5.0, 3.0, 5.0, 3.0];
        assert_eq!(surrogate(&values, ImputeStrategy::Mode), Some(3.0));
    }

    #[test]
    fn test_surrogate_empty() {
        assert_eq!(surrogate(&[], ImputeStrategy::Mean), None);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Median".parse::<ImputeStrategy>().unwrap(), ImputeStrategy::Median);
        assert!("max".parse::<ImputeStrategy>().is_err());
    }
}
