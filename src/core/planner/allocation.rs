//! Table allocation: which tables an exam may use, and the greedy pass that
//! assigns every non-mandatory entry to a table.

use crate::core::models::{Curriculum, ExamDescriptor, PlanEntry, Table};
use crate::core::rules::{AggregateRule, RequirementRules};
use std::collections::HashMap;

/// Curricular tables an exam may be placed in under `curriculum`, best first.
///
/// Tags foreign to the curriculum are dropped. FBA keeps catalog order; F94 is
/// always ordered A, B, C.
#[must_use]
pub fn allowed_tables(exam: &ExamDescriptor, curriculum: Curriculum) -> Vec<Table> {
    let mut tables: Vec<Table> = exam
        .table_tags()
        .filter_map(Table::from_tag)
        .filter(|t| curriculum.has_table(*t))
        .collect();
    if curriculum.sorts_by_priority() {
        tables.sort_unstable();
    }
    tables.dedup();
    tables
}

/// Credit targets the allocation pass fills towards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableTargets {
    minimums: HashMap<Table, u32>,
    aggregate: Option<AggregateRule>,
    optional: u32,
}

impl TableTargets {
    /// Read the targets of `curriculum` from the rules
    #[must_use]
    pub fn new(rules: &RequirementRules, curriculum: Curriculum) -> Self {
        let program = rules.program(curriculum);
        Self {
            minimums: curriculum
                .tables()
                .iter()
                .map(|&t| (t, program.table_minimum(t)))
                .collect(),
            aggregate: program.aggregate(),
            optional: rules.common.free_exams_credits,
        }
    }

    fn minimum(&self, table: Table) -> u32 {
        self.minimums.get(&table).copied().unwrap_or(0)
    }
}

/// Running credit sums of one allocation pass
#[derive(Debug, Default)]
struct Fill {
    per_table: HashMap<Table, u32>,
    aggregate: u32,
}

impl Fill {
    fn current(&self, table: Table) -> u32 {
        self.per_table.get(&table).copied().unwrap_or(0)
    }

    fn accepts(&self, table: Table, targets: &TableTargets) -> bool {
        if self.current(table) < targets.minimum(table) {
            return true;
        }
        targets
            .aggregate
            .is_some_and(|agg| agg.covers(table) && self.aggregate < agg.min_credits)
    }

    fn place(&mut self, table: Table, credits: u32, targets: &TableTargets) {
        let sum = self.per_table.entry(table).or_default();
        *sum = sum.saturating_add(credits);
        if targets.aggregate.is_some_and(|agg| agg.covers(table)) {
            self.aggregate = self.aggregate.saturating_add(credits);
        }
    }
}

/// Reassign every non-mandatory entry with a single greedy left-to-right pass.
///
/// Mandatory entries come first and are not touched. Each remaining entry, in its
/// existing order, goes to the first allowed table that is still below its minimum
/// or that belongs to the aggregate pair while the aggregate is short; failing
/// that, to Optional while Optional is below its target; otherwise out of plan.
/// Custom entries have no allowed tables. The result depends on entry order.
pub fn assign_tables<F>(entries: Vec<PlanEntry>, targets: &TableTargets, allowed: F) -> Vec<PlanEntry>
where
    F: Fn(&PlanEntry) -> Vec<Table>,
{
    let (mandatory, mut active): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(PlanEntry::is_mandatory);

    let mut fill = Fill::default();
    for entry in &mut active {
        let candidates = if entry.custom {
            Vec::new()
        } else {
            allowed(entry)
        };
        let table = candidates
            .into_iter()
            .find(|&t| fill.accepts(t, targets))
            .unwrap_or_else(|| {
                if fill.current(Table::Optional) < targets.optional {
                    Table::Optional
                } else {
                    Table::OutOfPlan
                }
            });
        fill.place(table, entry.credits, targets);
        entry.table = table;
    }

    mandatory.into_iter().chain(active).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::{CommonRules, CurriculumRule};

    fn f94_targets() -> TableTargets {
        let rules = RequirementRules::new(CommonRules {
            mandatory_exams: Vec::new(),
            free_exams_credits: 12,
            total_credits: 120,
        })
        .with_program(
            Curriculum::F94,
            vec![
                CurriculumRule::table(Table::A, 6),
                CurriculumRule::table(Table::B, 30),
                CurriculumRule::table(Table::C, 12),
                CurriculumRule::sum_bc(48),
            ],
        )
        .unwrap();
        TableTargets::new(&rules, Curriculum::F94)
    }

    fn catalog_entry(id: &str, credits: u32) -> PlanEntry {
        PlanEntry::from_exam(&ExamDescriptor::new(id, credits, ""), Table::Optional)
    }

    #[test]
    fn test_allowed_tables_fba_keeps_order() {
        let exam = ExamDescriptor::new("X", 6, "2|A|1");
        assert_eq!(
            allowed_tables(&exam, Curriculum::Fba),
            vec![Table::Two, Table::One]
        );
    }

    #[test]
    fn test_allowed_tables_f94_sorted() {
        let exam = ExamDescriptor::new("X", 6, "C | 1 | A|B");
        assert_eq!(
            allowed_tables(&exam, Curriculum::F94),
            vec![Table::A, Table::B, Table::C]
        );
    }

    #[test]
    fn test_allowed_tables_empty_when_no_match() {
        let exam = ExamDescriptor::new("X", 6, "D|Optional");
        assert!(allowed_tables(&exam, Curriculum::F94).is_empty());
        assert!(allowed_tables(&exam, Curriculum::Fba).is_empty());
    }

    #[test]
    fn test_mandatory_first_and_untouched() {
        let entries = vec![
            catalog_entry("x", 6),
            PlanEntry::mandatory("Thesis", 30),
        ];
        let out = assign_tables(entries, &f94_targets(), |_| vec![Table::A]);

        assert_eq!(out[0].id, "thesis");
        assert_eq!(out[0].table, Table::Mandatory);
        assert_eq!(out[1].table, Table::A);
    }

    #[test]
    fn test_fills_first_table_below_minimum() {
        let entries = vec![catalog_entry("a1", 6), catalog_entry("a2", 6)];
        let out = assign_tables(entries, &f94_targets(), |_| vec![Table::A, Table::B]);

        assert_eq!(out[0].table, Table::A);
        // A is full at 6, B still below its minimum
        assert_eq!(out[1].table, Table::B);
    }

    #[test]
    fn test_aggregate_exception_keeps_bc_open() {
        // B reaches 30 and C reaches 12, but B+C = 42 < 48
        let mut entries: Vec<PlanEntry> = (0..5).map(|i| catalog_entry(&format!("b{i}"), 6)).collect();
        entries.extend((0..2).map(|i| catalog_entry(&format!("c{i}"), 6)));
        entries.push(catalog_entry("late", 6));

        let out = assign_tables(entries, &f94_targets(), |e| {
            if e.id.starts_with('b') {
                vec![Table::B]
            } else if e.id.starts_with('c') {
                vec![Table::C]
            } else {
                vec![Table::B, Table::C]
            }
        });

        assert_eq!(out.last().map(|e| e.table), Some(Table::B));
    }

    #[test]
    fn test_overflow_goes_optional_then_out_of_plan() {
        let entries: Vec<PlanEntry> = (0..4).map(|i| catalog_entry(&format!("a{i}"), 6)).collect();
        let out = assign_tables(entries, &f94_targets(), |_| vec![Table::A]);

        let tables: Vec<Table> = out.iter().map(|e| e.table).collect();
        assert_eq!(
            tables,
            vec![Table::A, Table::Optional, Table::Optional, Table::OutOfPlan]
        );
    }

    #[test]
    fn test_custom_entries_skip_curricular_tables() {
        let entries = vec![PlanEntry::custom(
            "custom-1".to_string(),
            "Seminar".to_string(),
            3,
            Table::A,
        )];
        let out = assign_tables(entries, &f94_targets(), |_| vec![Table::A]);
        assert_eq!(out[0].table, Table::Optional);
    }

    #[test]
    fn test_order_changes_outcome() {
        let big = || catalog_entry("big", 12);
        let small = || catalog_entry("small", 6);
        let allowed = |_: &PlanEntry| vec![Table::A];

        let first = assign_tables(vec![big(), small()], &f94_targets(), allowed);
        let second = assign_tables(vec![small(), big()], &f94_targets(), allowed);

        assert_eq!(first[0].table, Table::A);
        assert_eq!(first[1].table, Table::Optional);
        assert_eq!(second[0].table, Table::A);
        assert_eq!(second[1].table, Table::Optional);
        // A takes whichever entry comes first
        let a_credits = |out: &[PlanEntry]| -> u32 {
            out.iter().filter(|e| e.table == Table::A).map(|e| e.credits).sum()
        };
        assert_eq!(a_credits(&first), 12);
        assert_eq!(a_credits(&second), 6);
    }
}
