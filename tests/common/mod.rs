//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER: &str = "Salary,Cntry,Ht,Wt,DftRd,Ovrl,Position,GP,G,A,PTS,+/-,Shifts,TOI";

/// Write raw CSV lines (header included by the caller) into a temp file
pub fn write_temp_csv(lines: &[&str]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("players.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    drop(file);

    (temp_dir, csv_path)
}

/// A small player CSV with a few `NA` cells:
/// - row 2: Ht is NA
/// - row 3: DftRd and Ovrl are NA
/// - row 4: Cntry is NA
pub fn small_player_csv() -> (TempDir, PathBuf) {
    write_temp_csv(&[
        HEADER,
        "925000,CAN,74,190,1,20,C,82,21,30,51,5,1800,1400",
        "3000000,USA,NA,205,2,45,D,78,8,25,33,-3,2100,1850",
        "575000,SWE,72,185,NA,NA,LW,40,5,6,11,2,700,520",
        "1250000,NA,75,200,0,0,RW,81,17,19,36,8,1650,1290",
        "800000,CAN,71,180,3,80,C,65,9,14,23,-1,1200,950",
    ])
}

/// Generate `rows` fully populated player rows with a seeded RNG.
/// Salary depends linearly on games played, points and time on ice.
/// PTS carries a small bonus over G + A so the features stay independent.
pub fn generated_player_lines(rows: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let countries = ["CAN", "USA", "SWE", "FIN", "RUS"];
    let positions = ["C", "LW", "RW", "D"];

    let mut lines = vec![HEADER.to_string()];
    for _ in 0..rows {
        let ht: f64 = rng.gen_range(68.0..79.0);
        let wt: f64 = rng.gen_range(170.0..240.0);
        let round: f64 = rng.gen_range(1..10) as f64;
        let pick: f64 = rng.gen_range(1..220) as f64;
        let gp: f64 = rng.gen_range(10..83) as f64;
        let g: f64 = rng.gen_range(0..40) as f64;
        let a: f64 = rng.gen_range(0..60) as f64;
        let pts = g + a + rng.gen_range(0..4) as f64;
        let pm: f64 = rng.gen_range(-20..25) as f64;
        let shifts: f64 = rng.gen_range(300..2500) as f64;
        let toi: f64 = rng.gen_range(200.0..2000.0);
        let salary = 500_000.0 + 8_000.0 * gp + 25_000.0 * pts + 300.0 * toi
            + rng.gen_range(-50_000.0..50_000.0);

        lines.push(format!(
            "{:.0},{},{:.1},{:.1},{},{},{},{},{},{},{},{},{},{:.1}",
            salary,
            countries[rng.gen_range(0..countries.len())],
            ht,
            wt,
            round,
            pick,
            positions[rng.gen_range(0..positions.len())],
            gp,
            g,
            a,
            pts,
            pm,
            shifts,
            toi
        ));
    }
    lines
}

/// Temp CSV holding [`generated_player_lines`]
pub fn generated_player_csv(rows: usize, seed: u64) -> (TempDir, PathBuf) {
    let lines = generated_player_lines(rows, seed);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_temp_csv(&refs)
}

/// Training table with Salary 1..=10 and a feature identical to it
pub fn identity_salary_dataframe() -> DataFrame {
    let salary: Vec<f64> = (1..=10).map(|v| v as f64).collect();
    df! {
        "Salary" => salary.clone(),
        "x" => salary,
    }
    .unwrap()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Read a Float64 column into optional values
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}
