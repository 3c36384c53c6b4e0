//! Catalog command handler

use super::session::{open_engine, Inputs};
use study_planner::config::Config;
use study_planner::core::models::Table;

/// List catalog exams with the tables they may occupy under the session's curriculum
///
/// # Errors
/// Returns a printable message if the inputs or the session cannot be loaded
pub fn run(available_only: bool, config: &Config) -> Result<(), String> {
    let inputs = Inputs::load(config)?;
    let engine = open_engine(&inputs, config)?;

    println!(
        "\n=== Catalog ({}, {}) ===\n",
        engine.curriculum(),
        engine.year()
    );

    let mut listed = 0usize;
    for exam in inputs.catalog.iter() {
        let info = engine.next_availability_info(exam);
        if available_only && info.is_some() {
            continue;
        }
        let tables = engine.allowed_tables(exam);
        let tables = if tables.is_empty() {
            Table::Optional.to_string()
        } else {
            tables
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        match info {
            Some(reason) => println!("  {} ({} CFU) [{tables}] - {reason}", exam.name, exam.credits),
            None => println!("  {} ({} CFU) [{tables}]", exam.name, exam.credits),
        }
        listed += 1;
    }

    println!("\n{listed} of {} exams listed", inputs.catalog.len());
    Ok(())
}
