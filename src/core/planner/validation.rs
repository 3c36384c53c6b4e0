//! Plan validation against degree requirements

use crate::core::models::{Curriculum, Plan, Table};
use crate::core::rules::{CurriculumRule, RequirementRules, SUM_BC_TABLES};
use serde::Serialize;
use std::fmt;

/// Credits placed in one table against its minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableStatus {
    /// Table
    pub table: Table,
    /// Credits currently assigned
    pub current: u32,
    /// Credits required (0 when unconstrained)
    pub minimum: u32,
}

/// Outcome of a cross-table sum rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateStatus {
    /// Tables summed
    pub tables: [Table; 2],
    /// Combined credits currently assigned
    pub current: u32,
    /// Combined credits required
    pub minimum: u32,
}

impl AggregateStatus {
    /// Whether the combined minimum is met
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        self.current >= self.minimum
    }
}

/// A failed requirement. Hosts localise it via [`key`](Self::key); `Display` gives English.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationMessage {
    /// A curricular table is below its minimum
    TableShort {
        /// Table
        table: Table,
        /// Credits assigned
        current: u32,
        /// Credits required
        required: u32,
    },
    /// The aggregate sum is below its minimum
    AggregateShort {
        /// Tables summed
        tables: [Table; 2],
        /// Combined credits assigned
        current: u32,
        /// Combined credits required
        required: u32,
    },
    /// Mandatory credits are missing
    MandatoryShort {
        /// Credits assigned
        current: u32,
        /// Credits required
        required: u32,
    },
    /// The plan total is below the degree total
    TotalShort {
        /// Counted credits
        current: u32,
        /// Credits required
        required: u32,
    },
}

impl ValidationMessage {
    /// Localisation key of the message
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::TableShort { .. } => "validation.table_short",
            Self::AggregateShort { .. } => "validation.aggregate_short",
            Self::MandatoryShort { .. } => "validation.mandatory_short",
            Self::TotalShort { .. } => "validation.total_short",
        }
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableShort {
                table,
                current,
                required,
            } => write!(f, "{table}: {current}/{required} CFU"),
            Self::AggregateShort {
                tables: [first, second],
                current,
                required,
            } => write!(f, "{first} + {second}: {current}/{required} CFU"),
            Self::MandatoryShort { current, required } => {
                write!(f, "Mandatory exams missing: {current}/{required} CFU")
            }
            Self::TotalShort { current, required } => {
                write!(f, "Total credits: {current}/{required} CFU")
            }
        }
    }
}

/// Result of validating a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Credits counted towards the degree (everything except out-of-plan)
    pub total_credits: u32,
    /// Credits the degree requires
    pub required_credits: u32,
    /// One status per table of the curriculum schema, in schema order
    pub tables: Vec<TableStatus>,
    /// Aggregate rule outcomes
    pub aggregates: Vec<AggregateStatus>,
    /// `true` when no requirement failed
    pub is_valid: bool,
    /// Failed requirements, in check order
    pub messages: Vec<ValidationMessage>,
}

impl ValidationReport {
    /// Status of a single table, if it belongs to the schema
    #[must_use]
    pub fn table(&self, table: Table) -> Option<&TableStatus> {
        self.tables.iter().find(|s| s.table == table)
    }
}

/// Check `plan` against `rules` for `curriculum`.
///
/// Never fails: every rule is checked and every shortfall is reported.
#[must_use]
pub fn validate_plan(plan: &Plan, rules: &RequirementRules, curriculum: Curriculum) -> ValidationReport {
    let mut tables: Vec<TableStatus> = curriculum
        .schema()
        .iter()
        .map(|&table| TableStatus {
            table,
            current: plan.credits_in(table),
            minimum: 0,
        })
        .collect();
    let total_credits: u32 = plan
        .entries()
        .iter()
        .filter(|e| e.table != Table::OutOfPlan)
        .fold(0, |sum: u32, e| sum.saturating_add(e.credits));

    let mandatory_required = rules.mandatory_credits();
    set_minimum(&mut tables, Table::Mandatory, mandatory_required);
    set_minimum(&mut tables, Table::Optional, rules.common.free_exams_credits);

    let mut aggregates = Vec::new();
    let mut messages = Vec::new();

    for rule in rules.program(curriculum).rules() {
        match *rule {
            CurriculumRule::AggregateMinimum { min_credits } => {
                let current: u32 = SUM_BC_TABLES
                    .iter()
                    .fold(0, |sum: u32, &t| sum.saturating_add(plan.credits_in(t)));
                let status = AggregateStatus {
                    tables: SUM_BC_TABLES,
                    current,
                    minimum: min_credits,
                };
                if !status.is_satisfied() {
                    messages.push(ValidationMessage::AggregateShort {
                        tables: SUM_BC_TABLES,
                        current,
                        required: min_credits,
                    });
                }
                aggregates.push(status);
            }
            CurriculumRule::TableMinimum { table, min_credits } => {
                set_minimum(&mut tables, table, min_credits);
                let current = plan.credits_in(table);
                if current < min_credits {
                    messages.push(ValidationMessage::TableShort {
                        table,
                        current,
                        required: min_credits,
                    });
                }
            }
        }
    }

    let mandatory_current = plan.credits_in(Table::Mandatory);
    if mandatory_current < mandatory_required {
        messages.push(ValidationMessage::MandatoryShort {
            current: mandatory_current,
            required: mandatory_required,
        });
    }

    let required_credits = rules.common.total_credits;
    if total_credits < required_credits {
        messages.push(ValidationMessage::TotalShort {
            current: total_credits,
            required: required_credits,
        });
    }

    ValidationReport {
        total_credits,
        required_credits,
        tables,
        aggregates,
        is_valid: messages.is_empty(),
        messages,
    }
}

fn set_minimum(tables: &mut [TableStatus], table: Table, minimum: u32) {
    if let Some(status) = tables.iter_mut().find(|s| s.table == table) {
        status.minimum = minimum;
    }
}
