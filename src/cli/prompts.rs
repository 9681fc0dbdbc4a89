//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user to confirm writing a durable table
pub fn confirm_persist_table(table_name: &str, row_count: usize) -> Result<bool> {
    let message = format!(
        "Write {} row(s) to durable table '{}'?",
        row_count, table_name
    );
    confirm_step(&message)
}
