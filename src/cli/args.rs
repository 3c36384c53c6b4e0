//! CLI argument definitions for `studyplan`

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use study_planner::config::ConfigOverrides;
use study_planner::core::models::{Curriculum, Table};
use study_planner::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level` for
/// runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

fn parse_table(value: &str) -> Result<Table, String> {
    value.parse()
}

fn parse_curriculum(value: &str) -> Result<Curriculum, String> {
    value.parse()
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `catalog_file`, `year`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum PlanSubcommand {
    /// Show the plan grouped by table with per-table credit totals.
    Show,
    /// Add a catalog exam to the plan.
    Add {
        /// Exam name as listed in the catalog
        #[arg(value_name = "EXAM")]
        exam: String,
        /// Preferred table (the next rebalance may still move the exam)
        #[arg(short, long, value_name = "TABLE", value_parser = parse_table)]
        table: Option<Table>,
    },
    /// Add an exam that is not in the catalog.
    AddCustom {
        /// Display name
        #[arg(value_name = "NAME")]
        name: String,
        /// Credits (CFU)
        #[arg(value_name = "CFU")]
        credits: u32,
        /// Table to place it in (defaults to Optional)
        #[arg(short, long, value_name = "TABLE", value_parser = parse_table)]
        table: Option<Table>,
    },
    /// Remove an entry from the plan.
    Remove {
        /// Plan entry id (see `plan show`)
        #[arg(value_name = "ENTRY")]
        entry: String,
    },
    /// Move an entry to another table.
    Move {
        /// Plan entry id (see `plan show`)
        #[arg(value_name = "ENTRY")]
        entry: String,
        /// Destination table (e.g. `A`, `Table-2`, `optional`, `out-of-plan`)
        #[arg(value_name = "TABLE", value_parser = parse_table)]
        table: Table,
    },
    /// Change the academic year of the plan.
    Year {
        /// Academic year, e.g. 2024/2025
        #[arg(value_name = "YEAR")]
        year: String,
    },
    /// Switch curriculum and migrate the plan.
    Curriculum {
        /// FBA or F94
        #[arg(value_name = "CURRICULUM", value_parser = parse_curriculum)]
        curriculum: Curriculum,
    },
    /// Start over with only the mandatory exams.
    Reset,
    /// Check the plan against the degree requirements.
    Validate,
    /// Export the plan as CSV.
    Export {
        /// Output file (defaults to `plan-<curriculum>.csv` in the configured export directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// List catalog exams with their allowed tables and availability.
    Catalog {
        /// Only list exams offered in the plan's academic year
        #[arg(long)]
        available: bool,
    },
    /// Build and check the study plan.
    ///
    /// The plan is persisted in the session file between invocations.
    Plan {
        #[command(subcommand)]
        subcommand: PlanSubcommand,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "studyplan",
    about = "Study plan builder and checker",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override the exam catalog CSV
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Override the requirement rules file (.json or .toml)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Override the session file holding the saved plan
    #[arg(long, value_name = "FILE")]
    pub session: Option<PathBuf>,

    /// Override the export directory
    #[arg(long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// # Returns
    /// A `ConfigOverrides` struct with values from CLI flags, where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.to_string_lossy().to_string());
        ConfigOverrides {
            level: self.log_level.map(|lvl| lvl.to_string()),
            file: path(&self.log_file),
            verbose: self.verbose.then_some(true),
            catalog_file: path(&self.catalog),
            rules_file: path(&self.rules),
            session_file: path(&self.session),
            export_dir: path(&self.export_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli(command: Command) -> Cli {
        Cli {
            log_level: None,
            verbose: false,
            debug_flag: false,
            log_file: None,
            catalog: None,
            rules: None,
            session: None,
            export_dir: None,
            command,
        }
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevelArg::Info), Level::Info);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let cli = bare_cli(Command::Config { subcommand: None });

        let overrides = cli.to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.catalog_file.is_none());
        assert!(overrides.rules_file.is_none());
        assert!(overrides.session_file.is_none());
        assert!(overrides.export_dir.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let mut cli = bare_cli(Command::Config { subcommand: None });
        cli.log_level = Some(LogLevelArg::Debug);
        cli.verbose = true;
        cli.log_file = Some(PathBuf::from("/tmp/test.log"));
        cli.catalog = Some(PathBuf::from("/data/catalog.csv"));
        cli.rules = Some(PathBuf::from("/data/rules.toml"));
        cli.session = Some(PathBuf::from("/tmp/session.json"));

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.catalog_file, Some("/data/catalog.csv".to_string()));
        assert_eq!(overrides.rules_file, Some("/data/rules.toml".to_string()));
        assert_eq!(overrides.session_file, Some("/tmp/session.json".to_string()));
        assert!(overrides.export_dir.is_none());
    }

    #[test]
    fn test_parse_plan_move() {
        let cli = Cli::try_parse_from(["studyplan", "plan", "move", "Optics", "table-b"])
            .expect("valid arguments");
        match cli.command {
            Command::Plan {
                subcommand: PlanSubcommand::Move { entry, table },
            } => {
                assert_eq!(entry, "Optics");
                assert_eq!(table, Table::B);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_table() {
        assert!(Cli::try_parse_from(["studyplan", "plan", "move", "Optics", "Z"]).is_err());
        assert!(Cli::try_parse_from(["studyplan", "plan", "curriculum", "X"]).is_err());
    }

    #[test]
    fn test_parse_add_custom_with_table() {
        let cli = Cli::try_parse_from([
            "studyplan",
            "--session",
            "/tmp/s.json",
            "plan",
            "add-custom",
            "Summer School",
            "3",
            "--table",
            "optional",
        ])
        .expect("valid arguments");
        assert_eq!(cli.session, Some(PathBuf::from("/tmp/s.json")));
        assert!(matches!(
            cli.command,
            Command::Plan {
                subcommand: PlanSubcommand::AddCustom {
                    credits: 3,
                    table: Some(Table::Optional),
                    ..
                }
            }
        ));
    }
}
