//! Exam catalog: the ordered, read-only set of exams a plan can draw from

pub mod csv_parser;

use crate::core::models::ExamDescriptor;
use std::collections::HashMap;

pub use csv_parser::{parse_catalog_csv, parse_catalog_str};

/// Ordered collection of exam descriptors, indexed by exam id
#[derive(Debug, Clone, Default)]
pub struct ExamCatalog {
    exams: Vec<ExamDescriptor>,
    index: HashMap<String, usize>,
}

impl ExamCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from descriptors; later duplicates of an id are dropped
    #[must_use]
    pub fn from_exams(exams: impl IntoIterator<Item = ExamDescriptor>) -> Self {
        let mut catalog = Self::new();
        for exam in exams {
            catalog.add(exam);
        }
        catalog
    }

    /// Add an exam
    ///
    /// # Returns
    /// `true` if the exam was added, `false` if its id was already present
    pub fn add(&mut self, exam: ExamDescriptor) -> bool {
        if self.index.contains_key(&exam.id) {
            return false;
        }
        self.index.insert(exam.id.clone(), self.exams.len());
        self.exams.push(exam);
        true
    }

    /// Look up an exam by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ExamDescriptor> {
        self.index.get(id).and_then(|&pos| self.exams.get(pos))
    }

    /// Exams in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &ExamDescriptor> {
        self.exams.iter()
    }

    /// Number of exams
    #[must_use]
    pub fn len(&self) -> usize {
        self.exams.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }
}
