//! Exam descriptor model

use serde::{Deserialize, Serialize};

/// Credits assumed when a catalog row has no parsable CFU value
pub const DEFAULT_CREDITS: u32 = 6;

/// Period assumed when a catalog row has no usable period
pub const DEFAULT_PERIOD: u8 = 1;

/// Represents an exam offered in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDescriptor {
    /// Catalog identifier (the exam name in the source catalog)
    pub id: String,

    /// Display name
    pub name: String,

    /// Credit value (CFU)
    pub credits: u32,

    /// Teaching language (e.g., "EN", "IT")
    pub language: String,

    /// Teaching period, 1 to 3
    pub period: u8,

    /// Ordinamento tags the exam belongs to
    pub ordinamento: Vec<String>,

    /// Raw pipe-delimited table tags (e.g., "A|B")
    pub raw_tables: String,

    /// Scientific sector code
    pub ssd: String,

    /// Pillar classification
    pub pillar: String,

    /// Subpillar classification
    pub subpillar: String,

    /// Availability descriptor ("enabled", "disabled", "From 2024/2025", "Biennial Even", ...)
    pub availability: String,

    /// Link to the course page
    pub link: String,
}

impl ExamDescriptor {
    /// Create a descriptor with the fields the planner depends on.
    ///
    /// The id doubles as the display name; availability defaults to `"enabled"`.
    #[must_use]
    pub fn new(id: impl Into<String>, credits: u32, raw_tables: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            credits,
            language: String::new(),
            period: DEFAULT_PERIOD,
            ordinamento: Vec::new(),
            raw_tables: raw_tables.into(),
            ssd: String::new(),
            pillar: String::new(),
            subpillar: String::new(),
            availability: "enabled".to_string(),
            link: String::new(),
        }
    }

    /// Set the availability descriptor
    #[must_use]
    pub fn with_availability(mut self, availability: impl Into<String>) -> Self {
        self.availability = availability.into();
        self
    }

    /// Set the teaching period
    #[must_use]
    pub const fn with_period(mut self, period: u8) -> Self {
        self.period = period;
        self
    }

    /// Set pillar and subpillar
    #[must_use]
    pub fn with_pillar(mut self, pillar: impl Into<String>, subpillar: impl Into<String>) -> Self {
        self.pillar = pillar.into();
        self.subpillar = subpillar.into();
        self
    }

    /// Trimmed, non-empty tokens of the raw table tag string, in catalog order
    pub fn table_tags(&self) -> impl Iterator<Item = &str> {
        self.raw_tables
            .split('|')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }
}
