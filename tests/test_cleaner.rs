//! Tests for the cleaner

use puckline::pipeline::{
    clean_table, drop_incomplete_rows, load_table, player_schema, CleanOptions, LoadOptions,
    PipelineError,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::{assert_has_columns, assert_missing_columns, assert_shape, small_player_csv};

fn small_table() -> DataFrame {
    let (_dir, path) = small_player_csv();
    load_table(&path, &player_schema(), &LoadOptions::default()).unwrap()
}

#[test]
fn test_default_clean_drops_country_and_position_only() {
    let df = small_table();

    let cleaned = clean_table(&df, &CleanOptions::default()).unwrap();

    assert_shape(&cleaned, 5, 12);
    assert_missing_columns(&cleaned, &["Cntry", "Position"]);
    assert_has_columns(&cleaned, &["Salary", "Ht", "DftRd", "Ovrl", "TOI"]);
}

#[test]
fn test_default_clean_keeps_rows_with_nulls() {
    let df = small_table();

    let cleaned = clean_table(&df, &CleanOptions::default()).unwrap();

    assert_eq!(cleaned.column("Ht").unwrap().null_count(), 1);
    assert_eq!(cleaned.column("DftRd").unwrap().null_count(), 1);
}

#[test]
fn test_row_filter_drops_rows_with_any_null() {
    let df = small_table();
    let options = CleanOptions {
        apply_row_filter: true,
        ..Default::default()
    };

    let cleaned = clean_table(&df, &options).unwrap();

    // Rows 2 (Ht), 3 (DftRd/Ovrl) and 4 (Cntry) hold nulls
    assert_shape(&cleaned, 2, 12);
    for column in cleaned.get_columns() {
        assert_eq!(column.null_count(), 0, "'{}' still has nulls", column.name());
    }
}

#[test]
fn test_row_filter_considers_dropped_columns() {
    let df = small_table();
    let options = CleanOptions {
        apply_row_filter: true,
        ..Default::default()
    };

    let cleaned = clean_table(&df, &options).unwrap();
    let salaries: Vec<Option<f64>> = cleaned.column("Salary").unwrap().f64().unwrap().into_iter().collect();

    // The player with a null country is filtered before Cntry is dropped
    assert!(!salaries.contains(&Some(1_250_000.0)));
}

#[test]
fn test_missing_drop_column_is_schema_error() {
    let df = df! {
        "Salary" => [1.0f64, 2.0],
        "Cntry" => ["CAN", "USA"],
    }
    .unwrap();

    let err = clean_table(&df, &CleanOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::SchemaMismatch { ref column, .. } if column == "Position"
    ));
}

#[test]
fn test_drop_incomplete_rows_treats_nan_as_missing() {
    let df = df! {
        "a" => [Some(1.0f64), Some(f64::NAN), None, Some(4.0)],
        "b" => [Some("x"), Some("y"), Some("z"), None],
    }
    .unwrap();

    let filtered = drop_incomplete_rows(&df).unwrap();

    assert_eq!(filtered.height(), 1);
}
