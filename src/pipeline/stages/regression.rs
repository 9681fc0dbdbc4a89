//! Ordinary least-squares linear regression

use faer::Mat;
use polars::prelude::*;

use super::normal::solve_least_squares;
use crate::pipeline::error::{PipelineError, Result};
use crate::pipeline::metrics::RegressionMetrics;

const STAGE: &str = "LinearRegression";

/// Linear regression fit through the normal equations.
///
/// `reg_param = 0.0` gives plain least squares; a collinear or otherwise
/// singular feature matrix then fails the fit.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    pub features_col: String,
    pub label_col: String,
    pub prediction_col: String,
    /// L2 penalty added to the Gram diagonal
    pub reg_param: f64,
    pub fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self {
            features_col: "features".to_string(),
            label_col: "label".to_string(),
            prediction_col: "prediction".to_string(),
            reg_param: 0.0,
            fit_intercept: true,
        }
    }
}

impl LinearRegression {
    pub fn new(features_col: &str, label_col: &str) -> Self {
        Self {
            features_col: features_col.to_string(),
            label_col: label_col.to_string(),
            ..Default::default()
        }
    }

    pub fn with_prediction_col(mut self, prediction_col: &str) -> Self {
        self.prediction_col = prediction_col.to_string();
        self
    }

    pub fn with_reg_param(mut self, reg_param: f64) -> Self {
        self.reg_param = reg_param;
        self
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn fit(&self, df: &DataFrame) -> Result<LinearRegressionModel> {
        if !self.reg_param.is_finite() || self.reg_param < 0.0 {
            return Err(PipelineError::InvalidConfig {
                stage: STAGE,
                reason: format!("reg_param must be finite and >= 0, got {}", self.reg_param),
            });
        }

        let rows = feature_rows(df, &self.features_col)?;
        let labels = label_values(df, &self.label_col)?;

        if rows.is_empty() {
            return Err(PipelineError::EmptyInput {
                stage: STAGE,
                reason: "training table has no rows".to_string(),
            });
        }

        let mut vectors = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            match row {
                Some(v) if v.iter().all(|x| x.is_finite()) => vectors.push(v),
                _ => {
                    return Err(PipelineError::InvalidInput {
                        stage: STAGE,
                        reason: format!("row {} has a null or non-finite feature vector", i),
                    })
                }
            }
        }

        let mut y = Vec::with_capacity(labels.len());
        for (i, label) in labels.into_iter().enumerate() {
            match label {
                Some(v) if v.is_finite() => y.push(v),
                _ => {
                    return Err(PipelineError::InvalidInput {
                        stage: STAGE,
                        reason: format!("row {} has a null or non-finite label '{}'", i, self.label_col),
                    })
                }
            }
        }

        let n = vectors.len();
        let p = vectors[0].len();
        if let Some(i) = vectors.iter().position(|v| v.len() != p) {
            return Err(PipelineError::InvalidInput {
                stage: STAGE,
                reason: format!(
                    "row {} has {} features, expected {}",
                    i,
                    vectors[i].len(),
                    p
                ),
            });
        }

        let (x_mean, y_mean) = if self.fit_intercept {
            let mut means = vec![0.0; p];
            for v in &vectors {
                for (m, x) in means.iter_mut().zip(v) {
                    *m += x / n as f64;
                }
            }
            (means, y.iter().sum::<f64>() / n as f64)
        } else {
            (vec![0.0; p], 0.0)
        };

        let mut x = Mat::<f64>::zeros(n, p);
        let mut y_centered = Mat::<f64>::zeros(n, 1);
        for (i, v) in vectors.iter().enumerate() {
            for j in 0..p {
                x[(i, j)] = v[j] - x_mean[j];
            }
            y_centered[(i, 0)] = y[i] - y_mean;
        }

        let coefficients = solve_least_squares(&x, &y_centered, self.reg_param)?;
        let intercept = if self.fit_intercept {
            y_mean - dot(&coefficients, &x_mean)
        } else {
            0.0
        };

        let predictions: Vec<f64> = vectors.iter().map(|v| intercept + dot(&coefficients, v)).collect();
        let summary = RegressionMetrics::from_pairs(&y, &predictions).ok_or_else(|| {
            PipelineError::EmptyInput {
                stage: STAGE,
                reason: "training table has no rows".to_string(),
            }
        })?;

        Ok(LinearRegressionModel {
            features_col: self.features_col.clone(),
            label_col: self.label_col.clone(),
            prediction_col: self.prediction_col.clone(),
            reg_param: self.reg_param,
            coefficients,
            intercept,
            summary,
        })
    }
}

/// Fitted regression: coefficients in feature-vector order plus intercept
#[derive(Debug, Clone)]
pub struct LinearRegressionModel {
    features_col: String,
    label_col: String,
    prediction_col: String,
    reg_param: f64,
    coefficients: Vec<f64>,
    intercept: f64,
    summary: RegressionMetrics,
}

impl LinearRegressionModel {
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn num_features(&self) -> usize {
        self.coefficients.len()
    }

    pub fn label_col(&self) -> &str {
        &self.label_col
    }

    pub fn prediction_col(&self) -> &str {
        &self.prediction_col
    }

    pub fn reg_param(&self) -> f64 {
        self.reg_param
    }

    /// Metrics on the rows the model was fit on
    pub fn summary(&self) -> &RegressionMetrics {
        &self.summary
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        self.intercept + dot(&self.coefficients, features)
    }

    /// Append the prediction column. Rows with no feature vector predict null.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let rows = feature_rows(df, &self.features_col)?;

        let mut predictions = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            let prediction = match row {
                Some(v) if v.len() == self.coefficients.len() => Some(self.predict(&v)),
                Some(v) => {
                    return Err(PipelineError::InvalidInput {
                        stage: STAGE,
                        reason: format!(
                            "row {} has {} features, model expects {}",
                            i,
                            v.len(),
                            self.coefficients.len()
                        ),
                    })
                }
                None => None,
            };
            predictions.push(prediction);
        }

        let prediction: Float64Chunked = predictions.into_iter().collect();
        let mut out = df.clone();
        out.with_column(prediction.with_name(self.prediction_col.as_str().into()).into_series())?;
        Ok(out)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Read a `List(Float64)` feature column into per-row vectors
fn feature_rows(df: &DataFrame, name: &str) -> Result<Vec<Option<Vec<f64>>>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::missing_column(STAGE, name))?;

    let list = column.list().map_err(|_| PipelineError::SchemaMismatch {
        stage: STAGE,
        column: name.to_string(),
        reason: format!("must be a feature vector column, found {}", column.dtype()),
    })?;

    list.into_iter()
        .map(|row| -> Result<Option<Vec<f64>>> {
            match row {
                None => Ok(None),
                Some(series) => {
                    let values = series.cast(&DataType::Float64)?;
                    Ok(Some(
                        values
                            .f64()?
                            .into_iter()
                            .map(|v| v.unwrap_or(f64::NAN))
                            .collect(),
                    ))
                }
            }
        })
        .collect()
}

fn label_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::missing_column(STAGE, name))?;

    if !column.dtype().is_primitive_numeric() {
        return Err(PipelineError::SchemaMismatch {
            stage: STAGE,
            column: name.to_string(),
            reason: format!("label must be numeric, found {}", column.dtype()),
        });
    }

    Ok(column.cast(&DataType::Float64)?.f64()?.into_iter().collect())
}
