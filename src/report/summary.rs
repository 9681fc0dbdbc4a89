//! Run summary and result tables

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::DataFrame;

use crate::pipeline::RegressionMetrics;

/// Summary of one load → clean → split → fit run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows_loaded: usize,
    pub columns_loaded: usize,
    pub rows_cleaned: usize,
    pub columns_cleaned: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_metrics: Option<RegressionMetrics>,
    pub test_metrics: Option<RegressionMetrics>,
}

impl RunSummary {
    pub fn new(rows_loaded: usize, columns_loaded: usize) -> Self {
        Self {
            rows_loaded,
            columns_loaded,
            rows_cleaned: rows_loaded,
            columns_cleaned: columns_loaded,
            ..Default::default()
        }
    }

    pub fn set_cleaned(&mut self, rows: usize, columns: usize) {
        self.rows_cleaned = rows;
        self.columns_cleaned = columns;
    }

    pub fn set_split(&mut self, train_rows: usize, test_rows: usize) {
        self.train_rows = train_rows;
        self.test_rows = test_rows;
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_loaded.saturating_sub(self.rows_cleaned)
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Rows Loaded"),
            Cell::new(self.rows_loaded),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Rows Dropped (nulls)"),
            Cell::new(self.rows_dropped()).fg(if self.rows_dropped() == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("🧱 Columns Kept"),
            Cell::new(format!("{} of {}", self.columns_cleaned, self.columns_loaded)),
        ]);
        table.add_row(vec![
            Cell::new("🏋 Train Rows"),
            Cell::new(self.train_rows).fg(Color::Cyan),
        ]);
        table.add_row(vec![
            Cell::new("🧪 Test Rows"),
            Cell::new(self.test_rows).fg(Color::Cyan),
        ]);

        if let Some(metrics) = &self.train_metrics {
            add_metric_rows(&mut table, "Train", metrics);
        }
        if let Some(metrics) = &self.test_metrics {
            add_metric_rows(&mut table, "Test", metrics);
        }

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

fn add_metric_rows(table: &mut Table, split: &str, metrics: &RegressionMetrics) {
    table.add_row(vec![
        Cell::new(format!("📉 {} RMSE", split)),
        Cell::new(format!("{:.4}", metrics.rmse)).fg(Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new(format!("📈 {} R²", split)),
        Cell::new(format!("{:.4}", metrics.r2))
            .fg(r2_color(metrics.r2))
            .add_attribute(Attribute::Bold),
    ]);
}

fn r2_color(r2: f64) -> Color {
    if r2.is_nan() {
        Color::White
    } else if r2 > 0.7 {
        Color::Green
    } else if r2 > 0.3 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Render the one-row null audit as a column/count table
pub fn null_audit_table(audit: &DataFrame, rows: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Null / NaN").add_attribute(Attribute::Bold),
        Cell::new("Share").add_attribute(Attribute::Bold),
    ]);

    for column in audit.get_columns() {
        let count = column
            .u64()
            .ok()
            .and_then(|ca| ca.get(0))
            .unwrap_or(0) as usize;
        let share = if rows > 0 {
            count as f64 / rows as f64 * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new(column.name().as_str()),
            Cell::new(count)
                .set_alignment(CellAlignment::Right)
                .fg(if count == 0 { Color::Green } else { Color::Yellow }),
            Cell::new(format!("{:.1}%", share)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Render fitted coefficients, intercept last
pub fn coefficients_table(coefficients: &[(String, f64)], intercept: f64) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("Coefficient").add_attribute(Attribute::Bold),
    ]);

    for (name, value) in coefficients {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{:.6}", value)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("(intercept)").add_attribute(Attribute::Italic),
        Cell::new(format!("{:.6}", intercept)).set_alignment(CellAlignment::Right),
    ]);

    table
}

/// Print a table indented to line up with step output
pub fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("      {}", line);
    }
}
