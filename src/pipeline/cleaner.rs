//! Column pruning and optional null-row filtering

use polars::prelude::*;

use super::error::{PipelineError, Result};
use super::missing::complete_rows_mask;
use super::schema::{COUNTRY, POSITION};

/// Cleaning options.
///
/// `apply_row_filter` defaults to `false`, so downstream stages see rows with
/// nulls. Set it to `true` to drop every row holding a null or NaN before the
/// columns are removed.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub apply_row_filter: bool,
    /// Columns removed unconditionally
    pub drop_columns: Vec<String>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            apply_row_filter: false,
            drop_columns: vec![COUNTRY.to_string(), POSITION.to_string()],
        }
    }
}

/// Produce a cleaned copy of `df`.
///
/// Column count always drops by `drop_columns.len()`; row count only changes
/// when the row filter is applied.
pub fn clean_table(df: &DataFrame, options: &CleanOptions) -> Result<DataFrame> {
    for name in &options.drop_columns {
        if df.column(name).is_err() {
            return Err(PipelineError::missing_column("Cleaner", name));
        }
    }

    let filtered = if options.apply_row_filter {
        drop_incomplete_rows(df)?
    } else {
        df.clone()
    };

    Ok(filtered.drop_many(options.drop_columns.iter().map(String::as_str)))
}

/// Remove every row that holds a null or NaN in any column
pub fn drop_incomplete_rows(df: &DataFrame) -> Result<DataFrame> {
    let mask = complete_rows_mask(df)?;
    Ok(df.filter(&mask)?)
}
