//! Configuration module for the study planner

use crate::core::models::Curriculum;
use crate::core::planner::AcademicYear;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

const DIR_VARIABLE: &str = "$STUDY_PLANNER";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Input and output locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Exam catalog CSV
    #[serde(default)]
    pub catalog_file: String,
    /// Requirement rules (JSON or TOML)
    #[serde(default)]
    pub rules_file: String,
    /// Saved plan session (JSON snapshot)
    #[serde(default)]
    pub session_file: String,
    /// Directory for exported plans
    #[serde(default)]
    pub export_dir: String,
}

/// Planner defaults for a fresh session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Academic year, `YYYY/YYYY`
    #[serde(default)]
    pub year: String,
    /// Curriculum code, `FBA` or `F94`
    #[serde(default)]
    pub curriculum: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Planner settings
    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override catalog file
    pub catalog_file: Option<String>,
    /// Override rules file
    pub rules_file: Option<String>,
    /// Override session file
    pub session_file: Option<String>,
    /// Override export directory
    pub export_dir: Option<String>,
}

/// Copy `default` into `value` when `value` is empty and `default` is not
fn fill_empty(value: &mut String, default: &str) -> bool {
    if value.is_empty() && !default.is_empty() {
        default.clone_into(value);
        true
    } else {
        false
    }
}

impl Config {
    /// Get the `$STUDY_PLANNER` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/studyplanner`
    /// - macOS: `~/Library/Application Support/studyplanner`
    /// - Windows: `%APPDATA%\studyplanner`
    #[must_use]
    pub fn get_study_planner_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studyplanner")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty here and non-empty in `defaults` are updated, so
    /// settings added in newer releases appear in old config files without touching
    /// user values.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let results = [
            fill_empty(&mut self.logging.level, &defaults.logging.level),
            fill_empty(&mut self.logging.file, &defaults.logging.file),
            fill_empty(&mut self.paths.catalog_file, &defaults.paths.catalog_file),
            fill_empty(&mut self.paths.rules_file, &defaults.paths.rules_file),
            fill_empty(&mut self.paths.session_file, &defaults.paths.session_file),
            fill_empty(&mut self.paths.export_dir, &defaults.paths.export_dir),
            fill_empty(&mut self.planner.year, &defaults.planner.year),
            fill_empty(&mut self.planner.curriculum, &defaults.planner.curriculum),
        ];
        results.contains(&true)
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for the current run only; the config file is not modified.
    /// Only non-`None` values replace config values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(catalog) = &overrides.catalog_file {
            self.paths.catalog_file.clone_from(catalog);
        }
        if let Some(rules) = &overrides.rules_file {
            self.paths.rules_file.clone_from(rules);
        }
        if let Some(session) = &overrides.session_file {
            self.paths.session_file.clone_from(session);
        }
        if let Some(export_dir) = &overrides.export_dir {
            self.paths.export_dir.clone_from(export_dir);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// [`get_study_planner_dir`](Self::get_study_planner_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_study_planner_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$STUDY_PLANNER` in a string to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_study_planner_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Expands `$STUDY_PLANNER` in every path value. Missing fields use their serde
    /// defaults (empty strings or false).
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.catalog_file = Self::expand_variables(&config.paths.catalog_file);
        config.paths.rules_file = Self::expand_variables(&config.paths.rules_file);
        config.paths.session_file = Self::expand_variables(&config.paths.session_file);
        config.paths.export_dir = Self::expand_variables(&config.paths.export_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// Debug builds use `DefaultCLIConfigDebug.toml`, release builds use
    /// `DefaultCLIConfigRelease.toml`.
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The defaults are
    /// compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// An existing file is merged with the defaults and re-saved when new fields were
    /// added. On first run the config directory and file are created from defaults.
    /// Any read or parse failure falls back to the defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file, creating the config directory if needed
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `catalog_file`, `rules_file`,
    /// `session_file`, `export_dir`, `year`, `curriculum`. Path keys also accept
    /// dashes (`catalog-file`).
    ///
    /// # Returns
    /// - `Some(String)`: The configuration value as a string
    /// - `None`: If the key is not recognized
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "catalog_file" | "catalog-file" => Some(self.paths.catalog_file.clone()),
            "rules_file" | "rules-file" => Some(self.paths.rules_file.clone()),
            "session_file" | "session-file" => Some(self.paths.session_file.clone()),
            "export_dir" | "export-dir" => Some(self.paths.export_dir.clone()),
            "year" => Some(self.planner.year.clone()),
            "curriculum" => Some(self.planner.curriculum.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// `verbose` must be a boolean, `year` must look like `2024/2025` and
    /// `curriculum` must be `FBA` or `F94` (stored upper-case). Other keys take
    /// any string. Call [`save()`](Config::save) to persist the change.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value is invalid
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "catalog_file" | "catalog-file" => self.paths.catalog_file = value.to_string(),
            "rules_file" | "rules-file" => self.paths.rules_file = value.to_string(),
            "session_file" | "session-file" => self.paths.session_file = value.to_string(),
            "export_dir" | "export-dir" => self.paths.export_dir = value.to_string(),
            "year" => {
                let year = AcademicYear::new(value);
                if !year.is_well_formed() {
                    return Err(format!(
                        "Invalid academic year: '{value}' (expected e.g. 2024/2025)"
                    ));
                }
                self.planner.year = year.as_str().to_string();
            }
            "curriculum" => {
                let curriculum: Curriculum = value.parse()?;
                self.planner.curriculum = curriculum.code().to_string();
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to its value in `defaults`)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "catalog_file" | "catalog-file" => self
                .paths
                .catalog_file
                .clone_from(&defaults.paths.catalog_file),
            "rules_file" | "rules-file" => {
                self.paths.rules_file.clone_from(&defaults.paths.rules_file);
            }
            "session_file" | "session-file" => self
                .paths
                .session_file
                .clone_from(&defaults.paths.session_file),
            "export_dir" | "export-dir" => {
                self.paths.export_dir.clone_from(&defaults.paths.export_dir);
            }
            "year" => self.planner.year.clone_from(&defaults.planner.year),
            "curriculum" => self
                .planner
                .curriculum
                .clone_from(&defaults.planner.curriculum),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Configured curriculum
    ///
    /// # Errors
    /// Returns an error if the stored code is not a known curriculum
    pub fn curriculum(&self) -> Result<Curriculum, String> {
        self.planner.curriculum.parse()
    }

    /// Configured academic year
    #[must_use]
    pub fn year(&self) -> AcademicYear {
        AcademicYear::new(self.planner.year.as_str())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load) recreates
    /// it. Succeeds without doing anything if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  catalog_file = \"{}\"", self.paths.catalog_file)?;
        writeln!(f, "  rules_file = \"{}\"", self.paths.rules_file)?;
        writeln!(f, "  session_file = \"{}\"", self.paths.session_file)?;
        writeln!(f, "  export_dir = \"{}\"", self.paths.export_dir)?;

        writeln!(f, "\n[planner]")?;
        writeln!(f, "  year = \"{}\"", self.planner.year)?;
        writeln!(f, "  curriculum = \"{}\"", self.planner.curriculum)?;

        Ok(())
    }
}
