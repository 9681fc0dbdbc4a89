//! Puckline: Salary Regression CLI Tool
//!
//! Loads a player-statistics CSV with a fixed schema, audits nulls,
//! registers the cleaned table as a session view, splits it, and fits an
//! impute → assemble → linear regression pipeline on the training split.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use polars::prelude::*;

use puckline::cli::{confirm_persist_table, Cli};
use puckline::pipeline::{
    audit_nulls, clean_table, dataset_stats, load_table, null_counts, player_schema,
    random_split, regression_metrics, salary_pipeline, Session,
};
use puckline::report::{
    coefficients_table, export_model, null_audit_table, print_indented, ExportParams, RunSummary,
};
use puckline::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning, ConfigCard,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let weights = cli.split_weights.0.clone();
    let feature_config = cli.feature_config();
    let label = puckline::pipeline::schema::SALARY;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&ConfigCard {
        input: &cli.input,
        label,
        split_weights: &weights,
        seed: cli.seed,
        apply_row_filter: cli.apply_row_filter,
    });

    // Step 1: Load with the fixed schema
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading CSV with player schema...");
    let raw = load_table(&cli.input, &player_schema(), &cli.load_options())
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    finish_with_success(&spinner, "Dataset loaded");

    let stats = dataset_stats(&raw);
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", stats.rows);
    println!("      Columns: {}", stats.columns);
    println!("      Estimated memory: {:.2} MB", stats.memory_mb);
    let mut summary = RunSummary::new(stats.rows, stats.columns);
    print_step_time(step_start.elapsed());

    // Step 2: Clean
    print_step_header(2, "Clean");
    let step_start = Instant::now();
    let clean_options = cli.clean_options();
    let df = clean_table(&raw, &clean_options)?;
    print_success(&format!("Dropped columns: {}", clean_options.drop_columns.join(", ")));
    if clean_options.apply_row_filter {
        print_success(&format!(
            "Removed {} row(s) with nulls",
            raw.height() - df.height()
        ));
    } else {
        print_info("Row filter off: rows containing nulls are kept");
    }
    summary.set_cleaned(df.height(), df.width());
    print_step_time(step_start.elapsed());

    // Step 3: Null audit
    print_step_header(3, "Null Audit");
    let step_start = Instant::now();
    let audit = audit_nulls(&df)?;
    let columns_with_nulls = null_counts(&df)?.iter().filter(|(_, c)| *c > 0).count();
    if columns_with_nulls == 0 {
        print_info("No null or NaN values found");
    } else {
        print_count("column(s) with null or NaN values", columns_with_nulls, None);
    }
    print_indented(&null_audit_table(&audit, df.height()));
    print_step_time(step_start.elapsed());

    // Step 4: Register view
    print_step_header(4, "Register View");
    let step_start = Instant::now();
    let mut session = Session::new(cli.warehouse_dir());
    session.create_or_replace_temp_view(&cli.view_name, &df);
    print_success(&format!("Registered temporary view '{}'", cli.view_name));

    if let Some(query) = &cli.query {
        let result = session
            .sql(query)
            .with_context(|| format!("Query failed: {}", query))?;
        print_info(&format!("Query returned {} row(s)", result.height()));
        println!("{}", result);
    }

    if cli.persist {
        let confirmed = cli.no_confirm || confirm_persist_table(&cli.view_name, df.height())?;
        if confirmed {
            let path = session.save_as_table(&cli.view_name, &df)?;
            print_success(&format!("Durable table written to {}", path.display()));
        } else {
            print_info("Durable table write skipped");
        }
    }
    print_step_time(step_start.elapsed());

    // Step 5: Split
    print_step_header(5, "Train/Test Split");
    let step_start = Instant::now();
    if cli.seed.is_none() {
        print_warning("No --seed given: this split will not be reproducible");
    }
    let mut partitions = random_split(&df, &weights, cli.seed)?.into_iter();
    let train = partitions.next().unwrap_or_else(DataFrame::empty);
    let test = partitions.next().unwrap_or_else(DataFrame::empty);
    summary.set_split(train.height(), test.height());
    println!("      Train rows: {}", style(train.height()).yellow());
    println!("      Test rows:  {}", style(test.height()).yellow());
    print_step_time(step_start.elapsed());

    // Step 6: Fit
    print_step_header(6, "Fit Pipeline");
    let step_start = Instant::now();
    let spinner = create_spinner("Fitting imputer → assembler → linear regression...");
    let pipeline = salary_pipeline(&feature_config);
    let model = pipeline
        .fit(&train)
        .context("Failed to fit the salary pipeline on the training split")?;
    finish_with_success(&spinner, "Pipeline fitted");

    if let Some(regression) = model.regression() {
        print_indented(&coefficients_table(
            &model.named_coefficients(),
            regression.intercept(),
        ));
        summary.train_metrics = Some(*regression.summary());
    }
    if let Some(imputer) = model.imputer() {
        let mut surrogates: Vec<_> = imputer.surrogates().into_iter().collect();
        surrogates.sort_by(|a, b| a.0.cmp(&b.0));
        for (column, value) in surrogates {
            println!("      Imputed '{}' with {} = {:.4}", column, imputer.strategy(), value);
        }
    }
    print_step_time(step_start.elapsed());

    // Step 7: Evaluate and save
    print_step_header(7, "Evaluate & Save");
    let step_start = Instant::now();
    let scored_test = if test.height() > 0 {
        let spinner = create_spinner("Scoring test split...");
        match model.transform(&test) {
            Ok(scored) => {
                summary.test_metrics =
                    regression_metrics(&scored, label, puckline::pipeline::PREDICTION_COL).ok();
                finish_with_success(&spinner, "Test split scored");
                Some(scored)
            }
            Err(e) => {
                finish_with_warning(&spinner, &format!("Test split not scored: {}", e));
                None
            }
        }
    } else {
        print_info("Test split is empty; nothing to score");
        None
    };

    if let Some(path) = &cli.model_output {
        let input_file = cli.input.display().to_string();
        let params = ExportParams {
            input_file: &input_file,
            view_name: &cli.view_name,
            split_weights: &weights,
            seed: cli.seed,
            row_filter_applied: cli.apply_row_filter,
            test_metrics: summary.test_metrics,
        };
        export_model(&model, path, &params)?;
        print_success(&format!("Model saved to {}", path.display()));
    }

    if let (Some(path), Some(scored)) = (&cli.predictions, scored_test) {
        let mut scored = scored;
        save_predictions(&mut scored, path)?;
        print_success(&format!("Predictions saved to {}", path.display()));
    }
    print_step_time(step_start.elapsed());

    summary.display();
    print_completion();

    Ok(())
}

/// Save predictions to file (CSV or Parquet based on extension)
fn save_predictions(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            // CSV cannot hold the feature vector column
            let list_columns: Vec<String> = df
                .get_columns()
                .iter()
                .filter(|c| matches!(c.dtype(), DataType::List(_)))
                .map(|c| c.name().to_string())
                .collect();
            let mut flat = df.drop_many(list_columns.iter().map(String::as_str));

            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(&mut flat)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}
