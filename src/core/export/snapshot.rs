//! Plan snapshots for session persistence

use crate::core::error::LoadError;
use crate::core::models::{Curriculum, PlanEntry};
use crate::core::planner::AcademicYear;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything needed to restore a plan: year, curriculum and the ordered entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// Active academic year
    pub year: AcademicYear,
    /// Active curriculum
    pub curriculum: Curriculum,
    /// Entries in plan order
    pub entries: Vec<PlanEntry>,
}

impl PlanSnapshot {
    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a JSON snapshot
    ///
    /// # Errors
    /// Returns an error on malformed JSON
    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Write the snapshot to `path`, creating parent directories
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written
    pub fn save(&self, path: &Path) -> Result<(), LoadError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a snapshot from `path`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
