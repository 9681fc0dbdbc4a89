//! Schema-constrained loader for delimited text files

use polars::prelude::*;
use std::path::Path;

use super::error::{PipelineError, Result};
use super::schema::TableSchema;

/// Token that marks a null cell in the player dataset
pub const DEFAULT_NULL_TOKEN: &str = "NA";

/// Options for reading a delimited file
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Literal cell text treated as null
    pub null_token: String,
    pub separator: u8,
    /// Whether the first row is a header (consumed, never emitted)
    pub has_header: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            null_token: DEFAULT_NULL_TOKEN.to_string(),
            separator: b',',
            has_header: true,
        }
    }
}

/// Shape and size of a loaded table
#[derive(Debug, Clone, Copy)]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: usize,
    pub memory_mb: f64,
}

/// Load a delimited file with a fixed schema.
///
/// Cells equal to the null token, or that do not parse as the declared type,
/// come back as nulls. Short rows are padded with nulls and extra trailing
/// fields are dropped. Only an unreadable resource fails the load. A `.tsv`
/// file is read tab-separated unless `options` asks for another separator.
pub fn load_table(path: &Path, schema: &TableSchema, options: &LoadOptions) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !matches!(extension.as_str(), "csv" | "tsv" | "txt") {
        return Err(PipelineError::UnsupportedFormat { extension });
    }

    // Polars reports a missing file lazily and with little context
    if !path.is_file() {
        return Err(PipelineError::Resource {
            path: path.to_path_buf(),
            message: "file does not exist".to_string(),
        });
    }

    // A .tsv file with the default comma separator would load as all nulls
    let separator = if extension == "tsv" && options.separator == b',' {
        b'\t'
    } else {
        options.separator
    };

    let df = LazyCsvReader::new(path)
        .with_has_header(options.has_header)
        .with_separator(separator)
        .with_schema(Some(schema.to_polars()))
        .with_null_values(Some(NullValues::AllColumnsSingle(
            options.null_token.as_str().into(),
        )))
        .with_ignore_errors(true)
        .with_truncate_ragged_lines(true)
        .finish()
        .and_then(|lf| lf.collect())
        .map_err(|e| PipelineError::Resource {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    check_nullability(&df, schema)?;

    Ok(df)
}

/// Reject nulls in columns the schema declares non-nullable
fn check_nullability(df: &DataFrame, schema: &TableSchema) -> Result<()> {
    for spec in schema.columns().iter().filter(|c| !c.nullable) {
        let column = df
            .column(&spec.name)
            .map_err(|_| PipelineError::missing_column("Loader", &spec.name))?;
        let nulls = column.null_count();
        if nulls > 0 {
            return Err(PipelineError::NullViolation {
                column: spec.name.clone(),
                nulls,
            });
        }
    }
    Ok(())
}

/// Collect statistics about a loaded table
pub fn dataset_stats(df: &DataFrame) -> DatasetStats {
    let (rows, columns) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);

    DatasetStats {
        rows,
        columns,
        memory_mb,
    }
}
