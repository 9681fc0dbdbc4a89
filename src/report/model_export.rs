//! Fitted model export

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{ImputeStrategy, PipelineModel, RegressionMetrics};

/// Metadata about the run that produced the model
#[derive(Serialize)]
pub struct ModelMetadata {
    /// Timestamp of the export (ISO 8601 format)
    pub timestamp: String,
    /// Puckline version
    pub puckline_version: String,
    /// Input file path
    pub input_file: String,
    /// View the cleaned table was registered under
    pub view_name: String,
    /// Label column
    pub label_column: String,
    /// Train/test weights
    pub split_weights: Vec<f64>,
    /// Split seed, absent when the split was unseeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Whether rows with nulls were filtered before splitting
    pub row_filter_applied: bool,
}

/// Imputer stage parameters
#[derive(Serialize)]
pub struct ImputerExport {
    pub strategy: ImputeStrategy,
    pub missing_value: f64,
    /// Surrogate per input column
    pub surrogates: BTreeMap<String, f64>,
}

/// Regression stage parameters
#[derive(Serialize)]
pub struct RegressionExport {
    pub reg_param: f64,
    pub intercept: f64,
    /// Feature names in vector order
    pub features: Vec<String>,
    /// Coefficients in vector order
    pub coefficients: Vec<f64>,
    pub train_metrics: RegressionMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_metrics: Option<RegressionMetrics>,
}

/// Complete model export with metadata
#[derive(Serialize)]
pub struct ModelExport {
    pub metadata: ModelMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imputer: Option<ImputerExport>,
    pub regression: RegressionExport,
}

/// Parameters for the model export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub view_name: &'a str,
    pub split_weights: &'a [f64],
    pub seed: Option<u64>,
    pub row_filter_applied: bool,
    pub test_metrics: Option<RegressionMetrics>,
}

/// Build the export document for a fitted pipeline
pub fn build_model_export(model: &PipelineModel, params: &ExportParams) -> Result<ModelExport> {
    let regression = model
        .regression()
        .context("Pipeline has no regression stage to export")?;

    let imputer = model.imputer().map(|imputer| ImputerExport {
        strategy: imputer.strategy(),
        missing_value: imputer.missing_value(),
        surrogates: imputer.surrogates().into_iter().collect(),
    });

    let (features, coefficients): (Vec<String>, Vec<f64>) = if model.assembler().is_some() {
        model.named_coefficients().into_iter().unzip()
    } else {
        let features = (0..regression.num_features())
            .map(|i| format!("x{}", i))
            .collect();
        (features, regression.coefficients().to_vec())
    };

    Ok(ModelExport {
        metadata: ModelMetadata {
            timestamp: Utc::now().to_rfc3339(),
            puckline_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            view_name: params.view_name.to_string(),
            label_column: regression.label_col().to_string(),
            split_weights: params.split_weights.to_vec(),
            seed: params.seed,
            row_filter_applied: params.row_filter_applied,
        },
        imputer,
        regression: RegressionExport {
            reg_param: regression.reg_param(),
            intercept: regression.intercept(),
            features,
            coefficients,
            train_metrics: *regression.summary(),
            test_metrics: params.test_metrics,
        },
    })
}

/// Export a fitted pipeline to a JSON file
pub fn export_model(model: &PipelineModel, output_path: &Path, params: &ExportParams) -> Result<()> {
    let export = build_model_export(model, params)?;

    let json = serde_json::to_string_pretty(&export).context("Failed to serialize model to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write model to {}", output_path.display()))?;

    Ok(())
}
