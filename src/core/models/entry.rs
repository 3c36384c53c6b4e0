//! Plan entry model

use super::{ExamDescriptor, Table};
use serde::{Deserialize, Serialize};

/// One exam placed in the study plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Stable identifier, unique within a plan
    pub id: String,

    /// Catalog exam this entry was created from (`None` for custom entries)
    pub exam_id: Option<String>,

    /// Display name
    pub name: String,

    /// Credit value (CFU)
    pub credits: u32,

    /// Table the entry is currently assigned to
    pub table: Table,

    /// Entry was typed in by the student instead of picked from the catalog
    pub custom: bool,

    /// Entry may be removed from the plan
    pub removable: bool,
}

impl PlanEntry {
    /// Create a catalog-backed entry. The entry id is the exam id.
    #[must_use]
    pub fn from_exam(exam: &ExamDescriptor, table: Table) -> Self {
        Self {
            id: exam.id.clone(),
            exam_id: Some(exam.id.clone()),
            name: exam.name.clone(),
            credits: exam.credits,
            table,
            custom: false,
            removable: true,
        }
    }

    /// Create a custom entry that is not backed by the catalog
    #[must_use]
    pub const fn custom(id: String, name: String, credits: u32, table: Table) -> Self {
        Self {
            id,
            exam_id: None,
            name,
            credits,
            table,
            custom: true,
            removable: true,
        }
    }

    /// Create a non-removable mandatory entry; the id is derived from the name
    #[must_use]
    pub fn mandatory(name: &str, credits: u32) -> Self {
        Self {
            id: mandatory_id(name),
            exam_id: None,
            name: name.to_string(),
            credits,
            table: Table::Mandatory,
            custom: true,
            removable: false,
        }
    }

    /// Whether the entry sits in the protected Mandatory table
    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        self.table == Table::Mandatory
    }
}

/// Derive the stable id of a mandatory exam: lower-case, spaces replaced by hyphens
#[must_use]
pub fn mandatory_id(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_exam_copies_catalog_fields() {
        let exam = ExamDescriptor::new("General Relativity", 9, "A");
        let entry = PlanEntry::from_exam(&exam, Table::A);

        assert_eq!(entry.id, "General Relativity");
        assert_eq!(entry.exam_id.as_deref(), Some("General Relativity"));
        assert_eq!(entry.credits, 9);
        assert!(!entry.custom);
        assert!(entry.removable);
    }

    #[test]
    fn test_mandatory_entry_is_protected() {
        let entry = PlanEntry::mandatory("Final Thesis Work", 42);

        assert_eq!(entry.id, "final-thesis-work");
        assert!(entry.is_mandatory());
        assert!(entry.custom);
        assert!(!entry.removable);
        assert!(entry.exam_id.is_none());
    }

    #[test]
    fn test_custom_entry() {
        let entry = PlanEntry::custom(
            "custom-1".to_string(),
            "Erasmus Seminar".to_string(),
            3,
            Table::Optional,
        );

        assert!(entry.custom);
        assert!(entry.removable);
        assert_eq!(entry.table, Table::Optional);
    }
}
