//! Weighted random row partitioning

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{PipelineError, Result};

/// Default train/test weights
pub const DEFAULT_SPLIT_WEIGHTS: [f64; 2] = [0.7, 0.3];

/// Validate split weights and return their cumulative, normalized bounds.
///
/// Weights must be finite and non-negative with a positive sum. They do not
/// need to sum to 1.0.
pub fn normalized_bounds(weights: &[f64]) -> Result<Vec<f64>> {
    let invalid = |reason: &str| PipelineError::InvalidWeights {
        weights: weights.to_vec(),
        reason: reason.to_string(),
    };

    if weights.is_empty() {
        return Err(invalid("at least one weight is required"));
    }
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(invalid("all weights must be finite"));
    }
    if weights.iter().any(|&w| w < 0.0) {
        return Err(invalid("weights must be non-negative"));
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(invalid("weights must sum to a positive value"));
    }

    let mut running = 0.0;
    let bounds = weights
        .iter()
        .map(|w| {
            running += w / total;
            running
        })
        .collect();

    Ok(bounds)
}

/// Assign each of `rows` rows to a partition index
pub fn assign_partitions(rows: usize, weights: &[f64], seed: Option<u64>) -> Result<Vec<usize>> {
    let bounds = normalized_bounds(weights)?;
    // Draws that escape the last bound through rounding go to the last
    // partition that can receive rows
    let fallback = weights.iter().rposition(|&w| w > 0.0).unwrap_or(0);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let assignments = (0..rows)
        .map(|_| {
            let draw: f64 = rng.gen();
            bounds
                .iter()
                .position(|&bound| draw < bound)
                .unwrap_or(fallback)
        })
        .collect();

    Ok(assignments)
}

/// Split `df` into one table per weight.
///
/// Every row lands in exactly one partition and partitions keep the input
/// row order. Without a `seed` the split differs from run to run.
pub fn random_split(df: &DataFrame, weights: &[f64], seed: Option<u64>) -> Result<Vec<DataFrame>> {
    let assignments = assign_partitions(df.height(), weights, seed)?;

    (0..weights.len())
        .map(|partition| -> Result<DataFrame> {
            let mask: BooleanChunked = assignments.iter().map(|&a| a == partition).collect();
            Ok(df.filter(&mask)?)
        })
        .collect()
}
