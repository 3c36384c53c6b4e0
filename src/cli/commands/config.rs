//! Config command handler

use super::session::session_path;
use crate::args::ConfigSubcommand;
use std::io::{self, Write};
use std::path::Path;
use study_planner::config::Config;
use study_planner::core::catalog::parse_catalog_csv;
use study_planner::core::rules::RequirementRules;
use study_planner::warn;

/// Dispatch config subcommands
///
/// # Errors
/// Returns a printable message for unknown keys, rejected values or a failed save
pub fn run(
    subcommand: Option<ConfigSubcommand>,
    config: &mut Config,
    defaults: &Config,
) -> Result<(), String> {
    match subcommand {
        None => handle_config_get(config, None),
        Some(ConfigSubcommand::Get { key }) => handle_config_get(config, key),
        Some(ConfigSubcommand::Set { key, value }) => handle_config_set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => handle_config_unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => handle_config_reset(),
    }
}

fn handle_config_get(config: &Config, key: Option<String>) -> Result<(), String> {
    let Some(key) = key else {
        println!("\n=== Configuration ===\n");
        print!("{config}");
        return Ok(());
    };
    let value = config
        .get(&key)
        .ok_or_else(|| format!("✗ Unknown config key: '{key}'"))?;
    println!("{value}");
    Ok(())
}

fn handle_config_set(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    config.set(key, value).map_err(|e| format!("✗ {e}"))?;
    save(config)?;
    println!("✓ Set {key} = {value}");
    if let Some(note) = input_note(config, key) {
        println!("  {note}");
    }
    Ok(())
}

fn handle_config_unset(config: &mut Config, defaults: &Config, key: &str) -> Result<(), String> {
    config.unset(key, defaults).map_err(|e| format!("✗ {e}"))?;
    save(config)?;
    println!("✓ Reset {key} to default");
    Ok(())
}

fn handle_config_reset() -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    print!("Reset config to defaults? Catalog, rules and session paths are reset too (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();
    let response = response.trim();

    if response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes") {
        Config::reset().map_err(|e| format!("✗ Failed to remove config file: {e}"))?;
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
    Ok(())
}

fn save(config: &Config) -> Result<(), String> {
    config
        .save()
        .map_err(|e| format!("✗ Failed to save config: {e}"))
}

/// What a changed setting means for the inputs of the next plan command.
///
/// Catalog and rules files are loaded on the spot so a bad path or document shows
/// up now rather than on the next `plan` run. Year and curriculum only seed a fresh
/// session, so an existing one is pointed out.
fn input_note(config: &Config, key: &str) -> Option<String> {
    match key.replace('-', "_").as_str() {
        "catalog_file" => {
            let path = Path::new(&config.paths.catalog_file);
            Some(match parse_catalog_csv(path) {
                Ok(catalog) => format!("Catalog has {} exams", catalog.len()),
                Err(e) => {
                    warn!("Configured catalog {} does not load: {e}", path.display());
                    format!("Warning: catalog does not load yet: {e}")
                }
            })
        }
        "rules_file" => {
            let path = Path::new(&config.paths.rules_file);
            Some(match RequirementRules::load(path) {
                Ok(rules) => format!(
                    "Rules require {} credits, {} of them mandatory",
                    rules.common.total_credits,
                    rules.mandatory_credits()
                ),
                Err(e) => {
                    warn!("Configured rules {} do not load: {e}", path.display());
                    format!("Warning: rules do not load yet: {e}")
                }
            })
        }
        "year" | "curriculum" if session_path(config).exists() => Some(format!(
            "The saved session keeps its own {key}; use `plan {key}` to change it"
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> String {
        format!("{}/samples/{name}", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn test_note_counts_catalog_exams() {
        let mut config = Config::from_defaults();
        config.paths.catalog_file = sample("catalog.csv");
        let note = input_note(&config, "catalog-file").unwrap();
        assert_eq!(note, "Catalog has 9 exams");
    }

    #[test]
    fn test_note_summarises_rules() {
        let mut config = Config::from_defaults();
        config.paths.rules_file = sample("rules.toml");
        let note = input_note(&config, "rules_file").unwrap();
        assert_eq!(note, "Rules require 120 credits, 54 of them mandatory");
    }

    #[test]
    fn test_note_warns_on_missing_rules() {
        let mut config = Config::from_defaults();
        config.paths.rules_file = sample("missing.json");
        let note = input_note(&config, "rules_file").unwrap();
        assert!(note.starts_with("Warning: rules do not load yet"));
    }

    #[test]
    fn test_no_note_for_logging_keys() {
        let config = Config::from_defaults();
        assert!(input_note(&config, "level").is_none());
    }
}
