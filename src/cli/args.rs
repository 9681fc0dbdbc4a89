//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{
    CleanOptions, FeatureConfig, HandleInvalid, ImputeStrategy, LoadOptions, DEFAULT_VIEW_NAME,
};

/// Puckline - load player statistics and fit a salary regression pipeline
#[derive(Parser, Debug)]
#[command(name = "puckline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input CSV file with the fourteen-column player schema
    #[arg(short, long)]
    pub input: PathBuf,

    /// Cell text that marks a null value
    #[arg(long, default_value = "NA")]
    pub null_token: String,

    /// Drop rows containing any null before splitting.
    /// Off by default, which keeps rows with nulls.
    #[arg(long, default_value = "false")]
    pub apply_row_filter: bool,

    /// Train/test split weights (comma-separated, normalized)
    #[arg(long, default_value = "0.7,0.3", value_parser = validate_weights)]
    pub split_weights: SplitWeights,

    /// Seed for the train/test split. Without it every run splits differently.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Imputation statistic for draft round and overall pick.
    /// Options: "mean" (default), "median", "mode"
    #[arg(long, default_value = "mean")]
    pub impute_strategy: ImputeStrategy,

    /// Value treated as missing in draft round and overall pick.
    /// Note that 0 also matches legitimate zero entries.
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub missing_value: f64,

    /// Policy for null/NaN feature inputs during vector assembly.
    /// Options: "error" (default), "skip", "keep"
    #[arg(long, default_value = "error")]
    pub handle_invalid: HandleInvalid,

    /// L2 regularization strength (0 = ordinary least squares)
    #[arg(long, default_value = "0.0", value_parser = validate_non_negative)]
    pub reg_param: f64,

    /// Leave the label column out of the feature vector
    #[arg(long, default_value = "false")]
    pub exclude_label: bool,

    /// Name of the session view (and durable table)
    #[arg(long, default_value = DEFAULT_VIEW_NAME)]
    pub view_name: String,

    /// SQL query to run against the registered view
    #[arg(long)]
    pub query: Option<String>,

    /// Write the cleaned table as a durable Parquet table in the warehouse
    #[arg(long, default_value = "false")]
    pub persist: bool,

    /// Directory holding durable tables.
    /// Defaults to a 'warehouse' directory next to the input file.
    #[arg(long)]
    pub warehouse: Option<PathBuf>,

    /// Write the fitted model as JSON
    #[arg(long)]
    pub model_output: Option<PathBuf>,

    /// Write test-split predictions (CSV or Parquet, determined by extension)
    #[arg(long)]
    pub predictions: Option<PathBuf>,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,
}

/// Parsed `--split-weights`
#[derive(Debug, Clone, PartialEq)]
pub struct SplitWeights(pub Vec<f64>);

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            null_token: self.null_token.clone(),
            ..Default::default()
        }
    }

    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            apply_row_filter: self.apply_row_filter,
            ..Default::default()
        }
    }

    pub fn feature_config(&self) -> FeatureConfig {
        FeatureConfig {
            impute_strategy: self.impute_strategy,
            missing_value: self.missing_value,
            handle_invalid: self.handle_invalid,
            reg_param: self.reg_param,
            exclude_label: self.exclude_label,
        }
    }

    /// Warehouse directory, derived from the input file when not provided
    pub fn warehouse_dir(&self) -> PathBuf {
        self.warehouse.clone().unwrap_or_else(|| {
            let parent = self
                .input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            parent.join("warehouse")
        })
    }
}

/// Validator for split weights
fn validate_weights(s: &str) -> Result<SplitWeights, String> {
    let weights = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a valid number", part.trim()))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    if weights.len() < 2 {
        return Err("at least two split weights are required".to_string());
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(format!("split weights must be finite and non-negative, got {:?}", weights));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err("split weights must sum to a positive value".to_string());
    }

    Ok(SplitWeights(weights))
}

/// Validator for non-negative parameters
fn validate_non_negative(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !value.is_finite() || value < 0.0 {
        Err(format!("value must be finite and >= 0, got {}", value))
    } else {
        Ok(value)
    }
}
