//! Plan export: session snapshots and tabular rows

pub mod csv;
pub mod snapshot;

pub use csv::CsvExporter;
pub use snapshot::PlanSnapshot;

use crate::core::catalog::ExamCatalog;
use crate::core::models::{PlanEntry, Table};
use crate::core::planner::PlanEngine;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Trait for writing a plan to an external format
pub trait PlanExporter {
    /// Export the engine's current plan
    ///
    /// # Errors
    /// Returns an error if export fails
    fn export(&self, engine: &PlanEngine<'_>, output_path: &Path) -> Result<(), Box<dyn Error>>;
}

/// Coarse classification of an entry in exports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// In the Mandatory table
    Mandatory,
    /// Custom entry outside the Mandatory table
    Extra,
    /// Catalog exam
    Curricular,
}

impl EntryKind {
    /// Classify an entry
    #[must_use]
    pub fn of(entry: &PlanEntry) -> Self {
        if entry.table == Table::Mandatory {
            Self::Mandatory
        } else if entry.custom {
            Self::Extra
        } else {
            Self::Curricular
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mandatory => write!(f, "Mandatory"),
            Self::Extra => write!(f, "Extra"),
            Self::Curricular => write!(f, "Curricular"),
        }
    }
}

/// One exported row: an entry joined with its catalog details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// Entry name
    pub name: String,
    /// Credits
    pub credits: u32,
    /// Teaching period (catalog exams only)
    pub period: Option<u8>,
    /// Assigned table
    pub table: Table,
    /// Pillar (catalog exams only)
    pub pillar: String,
    /// Subpillar (catalog exams only)
    pub subpillar: String,
    /// Classification
    pub kind: EntryKind,
    /// Course link (catalog exams only)
    pub link: String,
}

/// Build export rows for every entry, in plan order
#[must_use]
pub fn export_rows(entries: &[PlanEntry], catalog: &ExamCatalog) -> Vec<ExportRow> {
    entries
        .iter()
        .map(|entry| {
            let exam = entry.exam_id.as_deref().and_then(|id| catalog.get(id));
            ExportRow {
                name: entry.name.clone(),
                credits: entry.credits,
                period: exam.map(|e| e.period),
                table: entry.table,
                pillar: exam.map(|e| e.pillar.clone()).unwrap_or_default(),
                subpillar: exam.map(|e| e.subpillar.clone()).unwrap_or_default(),
                kind: EntryKind::of(entry),
                link: exam.map(|e| e.link.clone()).unwrap_or_default(),
            }
        })
        .collect()
}
