//! Error types for plan operations and input loading.

use crate::core::models::{Curriculum, Table};
use thiserror::Error;

/// Rejected plan operations. The plan is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The exam id is not present in the catalog.
    #[error("unknown exam: '{0}'")]
    UnknownExam(String),

    /// The exam already has a catalog-backed entry in the plan.
    #[error("exam '{0}' is already in the plan")]
    DuplicateExam(String),

    /// No plan entry carries this id.
    #[error("unknown plan entry: '{0}'")]
    UnknownEntry(String),

    /// The entry is a configured mandatory exam and cannot be moved or removed.
    #[error("plan entry '{0}' is protected")]
    ProtectedEntry(String),

    /// The destination table is not among the exam's allowed tables.
    #[error("exam '{exam}' cannot be placed in {table} under {curriculum}")]
    TableNotAllowed {
        /// Exam id of the entry being moved
        exam: String,
        /// Requested destination
        table: Table,
        /// Curriculum in effect
        curriculum: Curriculum,
    },

    /// A restored snapshot holds two entries with the same id.
    #[error("duplicate plan entry id in snapshot: '{0}'")]
    DuplicateEntry(String),
}

/// Failures while reading the catalog, the requirement rules, or a plan snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document was malformed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A TOML document was malformed.
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// The catalog has no usable header row.
    #[error("catalog is missing a header with a '{0}' column")]
    MissingColumn(&'static str),

    /// The requirement rules are structurally valid but semantically wrong.
    #[error("invalid requirement rules: {0}")]
    Rules(String),

    /// The file extension does not select a known document format.
    #[error("unsupported file format: '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),
}
