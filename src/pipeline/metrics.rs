//! Regression quality metrics

use polars::prelude::*;
use serde::Serialize;

use super::error::{PipelineError, Result};

/// Error summary of predictions against a label
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionMetrics {
    /// Rows where both label and prediction were present
    pub rows: usize,
    pub rmse: f64,
    pub mae: f64,
    /// Coefficient of determination; NaN when the label is constant
    pub r2: f64,
}

impl RegressionMetrics {
    /// Metrics over paired label/prediction values
    pub fn from_pairs(labels: &[f64], predictions: &[f64]) -> Option<Self> {
        let n = labels.len().min(predictions.len());
        if n == 0 {
            return None;
        }

        let mean = labels[..n].iter().sum::<f64>() / n as f64;
        let (mut sse, mut sae, mut sst) = (0.0, 0.0, 0.0);
        for (&y, &p) in labels.iter().zip(predictions) {
            let residual = y - p;
            sse += residual * residual;
            sae += residual.abs();
            sst += (y - mean) * (y - mean);
        }

        let r2 = if sst > 0.0 { 1.0 - sse / sst } else { f64::NAN };

        Some(Self {
            rows: n,
            rmse: (sse / n as f64).sqrt(),
            mae: sae / n as f64,
            r2,
        })
    }
}

/// Score a transformed table, skipping rows with a missing label or prediction
pub fn regression_metrics(
    df: &DataFrame,
    label_col: &str,
    prediction_col: &str,
) -> Result<RegressionMetrics> {
    let label = float_column(df, label_col)?;
    let prediction = float_column(df, prediction_col)?;

    let (labels, predictions): (Vec<f64>, Vec<f64>) = label
        .into_iter()
        .zip(prediction.into_iter())
        .filter_map(|(y, p)| match (y, p) {
            (Some(y), Some(p)) if !y.is_nan() && !p.is_nan() => Some((y, p)),
            _ => None,
        })
        .unzip();

    RegressionMetrics::from_pairs(&labels, &predictions).ok_or_else(|| PipelineError::EmptyInput {
        stage: "Evaluation",
        reason: format!("no rows with both '{}' and '{}'", label_col, prediction_col),
    })
}

fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::missing_column("Evaluation", name))?;
    Ok(column.cast(&DataType::Float64)?.f64()?.clone())
}
