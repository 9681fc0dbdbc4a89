//! Null and NaN auditing

use polars::prelude::*;
use rayon::prelude::*;

use super::error::Result;

/// Count the cells of a column that are null or, for float columns, NaN
pub fn count_missing(column: &Column) -> Result<usize> {
    match column.dtype() {
        DataType::Float32 | DataType::Float64 => {
            let float_col = column.cast(&DataType::Float64)?;
            let missing = float_col
                .f64()?
                .into_iter()
                .filter(|v| v.map_or(true, f64::is_nan))
                .count();
            Ok(missing)
        }
        _ => Ok(column.null_count()),
    }
}

/// Per-column missing counts, in the table's column order
pub fn null_counts(df: &DataFrame) -> Result<Vec<(String, usize)>> {
    df.get_columns()
        .par_iter()
        .map(|column| -> Result<(String, usize)> {
            Ok((column.name().to_string(), count_missing(column)?))
        })
        .collect()
}

/// Build a one-row summary table: one `UInt64` column per input column
/// holding its null-or-NaN count. The input is left untouched.
pub fn audit_nulls(df: &DataFrame) -> Result<DataFrame> {
    let columns: Vec<Column> = null_counts(df)?
        .into_iter()
        .map(|(name, count)| Column::new(name.into(), vec![count as u64]))
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Row mask that is `true` where no column is null or NaN
pub fn complete_rows_mask(df: &DataFrame) -> Result<BooleanChunked> {
    let mut keep = vec![true; df.height()];

    for column in df.get_columns() {
        match column.dtype() {
            DataType::Float32 | DataType::Float64 => {
                let float_col = column.cast(&DataType::Float64)?;
                for (flag, value) in keep.iter_mut().zip(float_col.f64()?.into_iter()) {
                    if value.map_or(true, f64::is_nan) {
                        *flag = false;
                    }
                }
            }
            _ => {
                if column.null_count() == 0 {
                    continue;
                }
                let nulls = column.as_materialized_series().is_null();
                for (flag, is_null) in keep.iter_mut().zip(nulls.into_iter()) {
                    if is_null.unwrap_or(false) {
                        *flag = false;
                    }
                }
            }
        }
    }

    Ok(keep.into_iter().collect())
}
