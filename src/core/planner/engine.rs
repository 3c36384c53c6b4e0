//! The plan engine: owns the study plan and keeps it allocated and checkable

use super::allocation::{allowed_tables, assign_tables, TableTargets};
use super::availability::{next_availability_info, AcademicYear, Availability, AvailabilityInfo};
use super::validation::{validate_plan, ValidationReport};
use crate::core::catalog::ExamCatalog;
use crate::core::error::PlanError;
use crate::core::export::PlanSnapshot;
use crate::core::models::{Curriculum, ExamDescriptor, Plan, PlanEntry, Table};
use crate::core::rules::RequirementRules;
use crate::{debug, info};
use std::collections::HashSet;

/// Study plan state plus the operations that change it.
///
/// Every mutation ends with [`rebalance_buckets`](Self::rebalance_buckets), so the
/// plan is always allocated when control returns to the caller.
#[derive(Debug, Clone)]
pub struct PlanEngine<'a> {
    catalog: &'a ExamCatalog,
    rules: &'a RequirementRules,
    year: AcademicYear,
    curriculum: Curriculum,
    plan: Plan,
    next_custom_id: u64,
}

impl<'a> PlanEngine<'a> {
    /// Create an engine with an empty plan
    #[must_use]
    pub fn new(
        catalog: &'a ExamCatalog,
        rules: &'a RequirementRules,
        year: impl Into<AcademicYear>,
        curriculum: Curriculum,
    ) -> Self {
        Self {
            catalog,
            rules,
            year: year.into(),
            curriculum,
            plan: Plan::new(),
            next_custom_id: 1,
        }
    }

    /// Create an engine whose plan holds the mandatory exams
    #[must_use]
    pub fn with_defaults(
        catalog: &'a ExamCatalog,
        rules: &'a RequirementRules,
        year: impl Into<AcademicYear>,
        curriculum: Curriculum,
    ) -> Self {
        let mut engine = Self::new(catalog, rules, year, curriculum);
        engine.init_defaults();
        engine
    }

    /// Active academic year
    #[must_use]
    pub const fn year(&self) -> &AcademicYear {
        &self.year
    }

    /// Active curriculum
    #[must_use]
    pub const fn curriculum(&self) -> Curriculum {
        self.curriculum
    }

    /// The current plan
    #[must_use]
    pub const fn plan(&self) -> &Plan {
        &self.plan
    }

    /// The catalog the engine reads from
    #[must_use]
    pub const fn catalog(&self) -> &'a ExamCatalog {
        self.catalog
    }

    /// Replace the active year. Availability is evaluated on demand, so nothing is reassigned.
    pub fn set_year(&mut self, year: impl Into<AcademicYear>) {
        self.year = year.into();
        debug!("Active year set to {}", self.year);
    }

    /// Replace the active curriculum and migrate the plan to it
    pub fn set_curriculum(&mut self, curriculum: Curriculum) {
        debug!("Curriculum changed {} -> {curriculum}", self.curriculum);
        self.curriculum = curriculum;
        self.migrate_plan();
    }

    /// Move catalog-backed entries to their best table under the active curriculum.
    ///
    /// Mandatory and custom entries are kept as they are, as are entries whose exam
    /// has disappeared from the catalog.
    pub fn migrate_plan(&mut self) {
        let mut entries = self.plan.take_entries();
        for entry in entries.iter_mut().filter(|e| !e.is_mandatory() && !e.custom) {
            let Some(exam) = self.exam_for(entry) else {
                debug!("Skipping migration of '{}': exam not in catalog", entry.id);
                continue;
            };
            entry.table = allowed_tables(exam, self.curriculum)
                .first()
                .copied()
                .unwrap_or(Table::Optional);
        }
        self.plan.set_entries(entries);
        self.rebalance_buckets();
    }

    /// Curricular tables `exam` may occupy under the active curriculum, best first
    #[must_use]
    pub fn allowed_tables(&self, exam: &ExamDescriptor) -> Vec<Table> {
        allowed_tables(exam, self.curriculum)
    }

    /// Whether `exam` is offered in the active year
    #[must_use]
    pub fn is_exam_available(&self, exam: &ExamDescriptor) -> bool {
        Availability::parse(&exam.availability).is_available_in(&self.year)
    }

    /// Why `exam` is not offered in the active year, or `None` if it is
    #[must_use]
    pub fn next_availability_info(&self, exam: &ExamDescriptor) -> Option<AvailabilityInfo> {
        next_availability_info(&exam.availability, &self.year)
    }

    /// Add a catalog exam to the plan.
    ///
    /// The entry starts in `target` if given, else in the exam's best allowed table,
    /// else in Optional, and is then rebalanced with the rest of the plan.
    ///
    /// # Errors
    /// [`PlanError::UnknownExam`] if the exam is not in the catalog,
    /// [`PlanError::DuplicateExam`] if it is already planned
    pub fn add_exam(&mut self, exam_id: &str, target: Option<Table>) -> Result<String, PlanError> {
        let catalog = self.catalog;
        let exam = catalog
            .get(exam_id)
            .ok_or_else(|| PlanError::UnknownExam(exam_id.to_string()))?;
        if self.plan.contains_exam(exam_id) || self.plan.contains(&exam.id) {
            info!("Rejected duplicate exam '{exam_id}'");
            return Err(PlanError::DuplicateExam(exam_id.to_string()));
        }

        let table = target
            .or_else(|| self.allowed_tables(exam).first().copied())
            .unwrap_or(Table::Optional);
        let entry = PlanEntry::from_exam(exam, table);
        let id = entry.id.clone();
        self.plan.push(entry);
        debug!("Added exam '{id}' ({} CFU)", exam.credits);
        self.rebalance_buckets();
        Ok(id)
    }

    /// Add an exam that is not in the catalog. Returns the generated entry id.
    pub fn add_custom_exam(&mut self, name: &str, credits: u32, table: Option<Table>) -> String {
        let id = self.fresh_custom_id();
        let entry = PlanEntry::custom(
            id.clone(),
            name.trim().to_string(),
            credits,
            table.unwrap_or(Table::Optional),
        );
        self.plan.push(entry);
        debug!("Added custom exam '{name}' as {id} ({credits} CFU)");
        self.rebalance_buckets();
        id
    }

    /// Remove an entry.
    ///
    /// # Returns
    /// `false`, with the plan unchanged, if the entry does not exist or is mandatory
    pub fn remove_exam(&mut self, entry_id: &str) -> bool {
        match self.plan.get(entry_id) {
            None => return false,
            Some(entry) if entry.is_mandatory() || !entry.removable => {
                info!("Refusing to remove protected entry '{entry_id}'");
                return false;
            }
            Some(_) => {}
        }
        self.plan.remove(entry_id);
        debug!("Removed entry '{entry_id}'");
        self.rebalance_buckets();
        true
    }

    /// Move an entry to another table.
    ///
    /// Catalog-backed entries may only move to a curricular table listed among their
    /// allowed tables. Custom entries, and moves to Optional, Mandatory or out of plan,
    /// are always permitted.
    ///
    /// # Errors
    /// [`PlanError::UnknownEntry`], [`PlanError::ProtectedEntry`] for the configured
    /// mandatory exams, or [`PlanError::TableNotAllowed`]; the plan is unchanged
    pub fn move_exam(&mut self, entry_id: &str, table: Table) -> Result<(), PlanError> {
        let entry = self
            .plan
            .get(entry_id)
            .ok_or_else(|| PlanError::UnknownEntry(entry_id.to_string()))?;

        if !entry.removable {
            info!("Refusing to move protected entry '{entry_id}'");
            return Err(PlanError::ProtectedEntry(entry_id.to_string()));
        }

        if !entry.custom && table.is_curricular() {
            let allowed = self
                .exam_for(entry)
                .map(|exam| self.allowed_tables(exam))
                .unwrap_or_default();
            if !allowed.contains(&table) {
                info!("Rejected move of '{entry_id}' to {table}");
                return Err(PlanError::TableNotAllowed {
                    exam: entry.exam_id.clone().unwrap_or_else(|| entry.name.clone()),
                    table,
                    curriculum: self.curriculum,
                });
            }
        }

        if let Some(entry) = self.plan.get_mut(entry_id) {
            entry.table = table;
        }
        debug!("Moved entry '{entry_id}' to {table}");
        self.rebalance_buckets();
        Ok(())
    }

    /// Re-run the greedy table assignment over every non-mandatory entry
    pub fn rebalance_buckets(&mut self) {
        let targets = TableTargets::new(self.rules, self.curriculum);
        let entries = self.plan.take_entries();
        let assigned = assign_tables(entries, &targets, |entry| {
            self.exam_for(entry)
                .map(|exam| allowed_tables(exam, self.curriculum))
                .unwrap_or_default()
        });
        self.plan.set_entries(assigned);
    }

    /// Check the plan against the degree requirements of the active curriculum
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        validate_plan(&self.plan, self.rules, self.curriculum)
    }

    /// Credits per table of the active curriculum schema
    #[must_use]
    pub fn summary(&self) -> Vec<(Table, u32)> {
        self.curriculum
            .schema()
            .iter()
            .map(|&t| (t, self.plan.credits_in(t)))
            .collect()
    }

    /// Empty the plan and re-create the mandatory entries
    pub fn reset(&mut self) {
        self.plan.clear();
        self.next_custom_id = 1;
        debug!("Plan reset");
        self.init_defaults();
    }

    /// Add one protected Mandatory entry per configured mandatory exam
    pub fn init_defaults(&mut self) {
        for exam in &self.rules.common.mandatory_exams {
            let entry = PlanEntry::mandatory(&exam.name, exam.credits);
            if !self.plan.push(entry) {
                debug!("Mandatory exam '{}' already planned", exam.name);
            }
        }
        self.rebalance_buckets();
    }

    /// Capture year, curriculum and entries for persistence
    #[must_use]
    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            year: self.year.clone(),
            curriculum: self.curriculum,
            entries: self.plan.entries().to_vec(),
        }
    }

    /// Restore a snapshot verbatim: no migration and no rebalancing.
    ///
    /// # Errors
    /// [`PlanError::DuplicateEntry`] or [`PlanError::DuplicateExam`] if the snapshot
    /// breaks plan invariants; the engine is unchanged in that case
    pub fn restore(&mut self, snapshot: PlanSnapshot) -> Result<(), PlanError> {
        if let Some(exam_id) = first_duplicate_exam(&snapshot.entries) {
            return Err(PlanError::DuplicateExam(exam_id));
        }
        let plan = Plan::from_entries(snapshot.entries).map_err(PlanError::DuplicateEntry)?;

        self.year = snapshot.year;
        self.curriculum = snapshot.curriculum;
        self.plan = plan;
        debug!(
            "Restored plan with {} entries ({}, {})",
            self.plan.len(),
            self.year,
            self.curriculum
        );
        Ok(())
    }

    fn exam_for(&self, entry: &PlanEntry) -> Option<&'a ExamDescriptor> {
        entry.exam_id.as_deref().and_then(|id| self.catalog.get(id))
    }

    fn fresh_custom_id(&mut self) -> String {
        loop {
            let id = format!("custom-{}", self.next_custom_id);
            self.next_custom_id += 1;
            if !self.plan.contains(&id) {
                return id;
            }
        }
    }
}

/// First exam id referenced by more than one catalog-backed entry
fn first_duplicate_exam(entries: &[PlanEntry]) -> Option<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|e| !e.custom)
        .filter_map(|e| e.exam_id.as_deref())
        .find(|id| !seen.insert(*id))
        .map(ToString::to_string)
}
