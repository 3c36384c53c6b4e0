//! Plan command handler

use super::session::{open_engine, save_engine, Inputs};
use crate::args::PlanSubcommand;
use std::path::PathBuf;
use study_planner::config::Config;
use study_planner::core::export::{CsvExporter, PlanExporter};
use study_planner::core::planner::{AcademicYear, PlanEngine};
use study_planner::{error, info};

/// Run a plan subcommand against the saved session.
///
/// Mutating subcommands save the session afterwards.
///
/// # Errors
/// Returns a printable message when loading, the operation, or saving fails
pub fn run(subcommand: PlanSubcommand, config: &Config) -> Result<(), String> {
    let inputs = Inputs::load(config)?;
    let mut engine = open_engine(&inputs, config)?;

    let mutated = match subcommand {
        PlanSubcommand::Show => {
            print_plan(&engine);
            false
        }
        PlanSubcommand::Validate => {
            return validate(&engine);
        }
        PlanSubcommand::Export { output } => {
            return export(&engine, output, config);
        }
        PlanSubcommand::Add { exam, table } => {
            let id = engine.add_exam(&exam, table).map_err(|e| format!("✗ {e}"))?;
            let placed = engine.plan().get(&id).map(|e| e.table);
            if let Some(table) = placed {
                println!("✓ Added {exam} to {table}");
            }
            true
        }
        PlanSubcommand::AddCustom {
            name,
            credits,
            table,
        } => {
            let id = engine.add_custom_exam(&name, credits, table);
            println!("✓ Added custom exam {name} as '{id}'");
            true
        }
        PlanSubcommand::Remove { entry } => {
            if !engine.remove_exam(&entry) {
                return Err(format!(
                    "✗ Cannot remove '{entry}': not in the plan or mandatory"
                ));
            }
            println!("✓ Removed {entry}");
            true
        }
        PlanSubcommand::Move { entry, table } => {
            engine.move_exam(&entry, table).map_err(|e| format!("✗ {e}"))?;
            let landed = engine.plan().get(&entry).map(|e| e.table);
            match landed {
                Some(actual) if actual != table => {
                    println!("✓ Moved {entry}; rebalancing placed it in {actual}");
                }
                _ => println!("✓ Moved {entry} to {table}"),
            }
            true
        }
        PlanSubcommand::Year { year } => {
            let year = AcademicYear::new(year);
            if !year.is_well_formed() {
                return Err(format!(
                    "✗ Invalid academic year: '{year}' (expected e.g. 2024/2025)"
                ));
            }
            engine.set_year(year);
            println!("✓ Academic year set to {}", engine.year());
            true
        }
        PlanSubcommand::Curriculum { curriculum } => {
            engine.set_curriculum(curriculum);
            println!("✓ Curriculum set to {curriculum}");
            true
        }
        PlanSubcommand::Reset => {
            engine.reset();
            println!("✓ Plan reset to mandatory exams");
            true
        }
    };

    if mutated {
        save_engine(&engine, config)?;
        info!("Plan saved with {} entries", engine.plan().len());
    }
    Ok(())
}

fn print_plan(engine: &PlanEngine<'_>) {
    println!(
        "\n=== Study plan ({}, {}) ===",
        engine.curriculum(),
        engine.year()
    );
    for (table, credits) in engine.summary() {
        let entries: Vec<_> = engine
            .plan()
            .entries()
            .iter()
            .filter(|e| e.table == table)
            .collect();
        if entries.is_empty() {
            continue;
        }
        println!("\n{table} ({credits} CFU)");
        for entry in entries {
            let marker = if entry.custom { " *" } else { "" };
            println!(
                "  {:<40} {:>3} CFU  [{}]{marker}",
                entry.name, entry.credits, entry.id
            );
        }
    }
    let report = engine.validate();
    println!(
        "\nTotal: {}/{} CFU",
        report.total_credits, report.required_credits
    );
}

fn validate(engine: &PlanEngine<'_>) -> Result<(), String> {
    let report = engine.validate();

    println!("\n=== Requirements ({}) ===\n", engine.curriculum());
    for status in report.tables.iter().filter(|s| s.minimum > 0) {
        let mark = if status.current >= status.minimum {
            "✓"
        } else {
            "✗"
        };
        println!(
            "  {mark} {}: {}/{} CFU",
            status.table, status.current, status.minimum
        );
    }
    for aggregate in &report.aggregates {
        let mark = if aggregate.is_satisfied() { "✓" } else { "✗" };
        println!(
            "  {mark} {} + {}: {}/{} CFU",
            aggregate.tables[0], aggregate.tables[1], aggregate.current, aggregate.minimum
        );
    }
    println!(
        "  Total: {}/{} CFU",
        report.total_credits, report.required_credits
    );

    if report.is_valid {
        println!("\n✓ Plan meets all requirements");
        Ok(())
    } else {
        for message in &report.messages {
            eprintln!("  - {message}");
        }
        Err(format!(
            "✗ Plan is incomplete ({} unmet requirements)",
            report.messages.len()
        ))
    }
}

fn export(engine: &PlanEngine<'_>, output: Option<PathBuf>, config: &Config) -> Result<(), String> {
    let output = output.unwrap_or_else(|| {
        PathBuf::from(&config.paths.export_dir).join(format!(
            "plan-{}.csv",
            engine.curriculum().code().to_ascii_lowercase()
        ))
    });
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                format!("✗ Failed to create directory {}: {e}", parent.display())
            })?;
        }
    }

    CsvExporter.export(engine, &output).map_err(|e| {
        error!("Export to {} failed: {e}", output.display());
        format!("✗ Failed to export plan to {}: {e}", output.display())
    })?;
    println!("✓ Plan exported to: {}", output.display());
    Ok(())
}
