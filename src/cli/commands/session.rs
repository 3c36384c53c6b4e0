//! Loading of catalog, rules and the saved plan session

use std::path::{Path, PathBuf};
use study_planner::config::Config;
use study_planner::core::catalog::{parse_catalog_csv, ExamCatalog};
use study_planner::core::export::PlanSnapshot;
use study_planner::core::planner::PlanEngine;
use study_planner::core::rules::RequirementRules;
use study_planner::{debug, error, info, verbose};

/// Catalog and rules the engine borrows for one CLI run
pub struct Inputs {
    /// Exam catalog
    pub catalog: ExamCatalog,
    /// Degree requirements
    pub rules: RequirementRules,
}

impl Inputs {
    /// Load the configured catalog and rules files
    ///
    /// # Errors
    /// Returns a printable message if either file cannot be loaded
    pub fn load(config: &Config) -> Result<Self, String> {
        let catalog_path = Path::new(&config.paths.catalog_file);
        let catalog = parse_catalog_csv(catalog_path).map_err(|e| {
            error!("Failed to load catalog {}: {e}", catalog_path.display());
            format!("✗ Failed to load catalog {}: {e}", catalog_path.display())
        })?;
        verbose!(
            "✓ Loaded {} exams from {}",
            catalog.len(),
            catalog_path.display()
        );

        let rules_path = Path::new(&config.paths.rules_file);
        let rules = RequirementRules::load(rules_path).map_err(|e| {
            error!("Failed to load rules {}: {e}", rules_path.display());
            format!("✗ Failed to load rules {}: {e}", rules_path.display())
        })?;
        info!("Requirement rules loaded: {}", rules_path.display());

        Ok(Self { catalog, rules })
    }
}

/// Session file from the config
pub fn session_path(config: &Config) -> PathBuf {
    PathBuf::from(&config.paths.session_file)
}

/// Restore the saved session, or start a fresh plan from the configured year and curriculum
///
/// # Errors
/// Returns a printable message if the session file is unreadable or inconsistent, or if
/// the configured curriculum is unknown
pub fn open_engine<'a>(inputs: &'a Inputs, config: &Config) -> Result<PlanEngine<'a>, String> {
    let path = session_path(config);
    let curriculum = config.curriculum().map_err(|e| format!("✗ {e}"))?;

    if !path.exists() {
        debug!("No session at {}, starting a fresh plan", path.display());
        return Ok(PlanEngine::with_defaults(
            &inputs.catalog,
            &inputs.rules,
            config.year(),
            curriculum,
        ));
    }

    let snapshot = PlanSnapshot::load(&path)
        .map_err(|e| format!("✗ Failed to read session {}: {e}", path.display()))?;
    let mut engine = PlanEngine::new(&inputs.catalog, &inputs.rules, config.year(), curriculum);
    engine
        .restore(snapshot)
        .map_err(|e| format!("✗ Corrupt session {}: {e}", path.display()))?;
    debug!(
        "Session restored from {} ({} entries)",
        path.display(),
        engine.plan().len()
    );
    Ok(engine)
}

/// Persist the engine state to the session file
///
/// # Errors
/// Returns a printable message if the file cannot be written
pub fn save_engine(engine: &PlanEngine<'_>, config: &Config) -> Result<(), String> {
    let path = session_path(config);
    engine
        .snapshot()
        .save(&path)
        .map_err(|e| format!("✗ Failed to save session {}: {e}", path.display()))?;
    debug!("Session saved to {}", path.display());
    Ok(())
}
