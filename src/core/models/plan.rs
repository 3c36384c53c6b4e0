//! Plan model

use super::{PlanEntry, Table};
use std::collections::HashMap;

/// Ordered collection of plan entries with an id index.
///
/// Iteration order is insertion order; the index only speeds up lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    entries: Vec<PlanEntry>,
    index: HashMap<String, usize>,
}

impl Plan {
    /// Create an empty plan
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan from entries, rejecting duplicate ids
    ///
    /// # Errors
    /// Returns the first duplicated entry id
    pub fn from_entries(entries: Vec<PlanEntry>) -> Result<Self, String> {
        let mut plan = Self::new();
        for entry in entries {
            let id = entry.id.clone();
            if !plan.push(entry) {
                return Err(id);
            }
        }
        Ok(plan)
    }

    /// Append an entry
    ///
    /// # Returns
    /// `true` if the entry was added, `false` if an entry with that id already exists
    pub fn push(&mut self, entry: PlanEntry) -> bool {
        if self.index.contains_key(&entry.id) {
            return false;
        }
        self.index.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Remove an entry by id, preserving the order of the others
    pub fn remove(&mut self, id: &str) -> Option<PlanEntry> {
        let pos = self.index.remove(id)?;
        let removed = self.entries.remove(pos);
        self.reindex();
        Some(removed)
    }

    /// Look up an entry by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PlanEntry> {
        self.index.get(id).and_then(|&pos| self.entries.get(pos))
    }

    /// Look up an entry by id for in-place mutation
    pub fn get_mut(&mut self, id: &str) -> Option<&mut PlanEntry> {
        self.index.get(id).and_then(|&pos| self.entries.get_mut(pos))
    }

    /// Whether an entry with this id exists
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Whether a catalog-backed entry references this exam
    #[must_use]
    pub fn contains_exam(&self, exam_id: &str) -> bool {
        self.entries
            .iter()
            .any(|e| !e.custom && e.exam_id.as_deref() == Some(exam_id))
    }

    /// Entries in plan order
    #[must_use]
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Take all entries out, leaving the plan empty
    pub fn take_entries(&mut self) -> Vec<PlanEntry> {
        self.index.clear();
        std::mem::take(&mut self.entries)
    }

    /// Replace the entries wholesale. Callers must guarantee unique ids.
    pub(crate) fn set_entries(&mut self, entries: Vec<PlanEntry>) {
        self.entries = entries;
        self.reindex();
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of credits currently assigned to `table`
    #[must_use]
    pub fn credits_in(&self, table: Table) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.table == table)
            .fold(0, |sum: u32, e| sum.saturating_add(e.credits))
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, e)| (e.id.clone(), pos))
            .collect();
    }
}
