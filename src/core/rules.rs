//! Degree requirement rules
//!
//! Rules arrive as a JSON or TOML document:
//!
//! ```json
//! {
//!   "common_rules": {
//!     "mandatory_exams": [{ "name": "Final Thesis", "credits": 42 }],
//!     "free_exams_credits": 12,
//!     "total_credits": 120
//!   },
//!   "programs": {
//!     "F94": { "curriculum_rules": [
//!       { "source": "B", "min_credits": 30 },
//!       { "source": "sumBC", "min_sumBC_credits": 48 }
//!     ] }
//!   }
//! }
//! ```
//!
//! The document is checked while loading: unknown `source` tags, tables that the
//! curriculum does not have, missing minimums, repeated tables, a second
//! aggregate rule, a curriculum given twice (keys are case-insensitive) and
//! mandatory exams that share an id are all rejected.

use crate::core::error::LoadError;
use crate::core::models::entry::mandatory_id;
use crate::core::models::{Curriculum, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

/// `source` value marking the Table-B + Table-C aggregate rule
pub const SUM_BC_MARKER: &str = "sumBC";

/// Tables covered by the aggregate rule
pub const SUM_BC_TABLES: [Table; 2] = [Table::B, Table::C];

/// An exam every plan must contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatoryExam {
    /// Exam name
    pub name: String,
    /// Credit value
    pub credits: u32,
}

/// Requirements shared by every curriculum
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonRules {
    /// Exams materialised in the Mandatory table
    #[serde(default)]
    pub mandatory_exams: Vec<MandatoryExam>,
    /// Flat credit target of the Optional table
    #[serde(default)]
    pub free_exams_credits: u32,
    /// Credits required for the degree
    pub total_credits: u32,
}

/// One requirement of a curriculum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurriculumRule {
    /// Minimum credits in a single curricular table
    TableMinimum {
        /// Constrained table
        table: Table,
        /// Required credits
        min_credits: u32,
    },
    /// Minimum combined credits across Table-B and Table-C
    AggregateMinimum {
        /// Required combined credits
        min_credits: u32,
    },
}

impl CurriculumRule {
    /// Shorthand for a single-table minimum
    #[must_use]
    pub const fn table(table: Table, min_credits: u32) -> Self {
        Self::TableMinimum { table, min_credits }
    }

    /// Shorthand for the B+C aggregate minimum
    #[must_use]
    pub const fn sum_bc(min_credits: u32) -> Self {
        Self::AggregateMinimum { min_credits }
    }
}

/// Aggregate requirement resolved for a curriculum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateRule {
    /// Tables whose credits are summed
    pub tables: [Table; 2],
    /// Required combined credits
    pub min_credits: u32,
}

impl AggregateRule {
    /// Whether `table` contributes to this aggregate
    #[must_use]
    pub fn covers(&self, table: Table) -> bool {
        self.tables.contains(&table)
    }
}

/// Ordered rules of one curriculum
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramRules {
    rules: Vec<CurriculumRule>,
}

static NO_RULES: ProgramRules = ProgramRules { rules: Vec::new() };

impl ProgramRules {
    /// Validate and wrap an ordered rule list for `curriculum`
    ///
    /// # Errors
    /// Returns [`LoadError::Rules`] if a table is foreign to the curriculum, a table
    /// is constrained twice, or more than one aggregate rule is given
    pub fn new(curriculum: Curriculum, rules: Vec<CurriculumRule>) -> Result<Self, LoadError> {
        let mut seen = HashSet::new();
        let mut aggregates = 0;
        for rule in &rules {
            match *rule {
                CurriculumRule::TableMinimum { table, .. } => {
                    if !curriculum.has_table(table) {
                        return Err(LoadError::Rules(format!(
                            "{curriculum} has no table '{}'",
                            table.tag()
                        )));
                    }
                    if !seen.insert(table) {
                        return Err(LoadError::Rules(format!(
                            "{curriculum} constrains table '{}' more than once",
                            table.tag()
                        )));
                    }
                }
                CurriculumRule::AggregateMinimum { .. } => {
                    if !SUM_BC_TABLES.iter().all(|t| curriculum.has_table(*t)) {
                        return Err(LoadError::Rules(format!(
                            "{curriculum} has no Table-B/Table-C for an aggregate rule"
                        )));
                    }
                    aggregates += 1;
                    if aggregates > 1 {
                        return Err(LoadError::Rules(format!(
                            "{curriculum} has more than one aggregate rule"
                        )));
                    }
                }
            }
        }
        Ok(Self { rules })
    }

    /// Rules in document order
    #[must_use]
    pub fn rules(&self) -> &[CurriculumRule] {
        &self.rules
    }

    /// Minimum credits required in `table` (0 when unconstrained)
    #[must_use]
    pub fn table_minimum(&self, table: Table) -> u32 {
        self.rules
            .iter()
            .find_map(|rule| match *rule {
                CurriculumRule::TableMinimum { table: t, min_credits } if t == table => {
                    Some(min_credits)
                }
                _ => None,
            })
            .unwrap_or(0)
    }

    /// The aggregate rule, if this curriculum has one
    #[must_use]
    pub fn aggregate(&self) -> Option<AggregateRule> {
        self.rules.iter().find_map(|rule| match *rule {
            CurriculumRule::AggregateMinimum { min_credits } => Some(AggregateRule {
                tables: SUM_BC_TABLES,
                min_credits,
            }),
            CurriculumRule::TableMinimum { .. } => None,
        })
    }
}

/// Complete degree requirements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementRules {
    /// Requirements shared by every curriculum
    pub common: CommonRules,
    programs: HashMap<Curriculum, ProgramRules>,
}

impl RequirementRules {
    /// Rules with the given common part and no curriculum rules
    #[must_use]
    pub fn new(common: CommonRules) -> Self {
        Self {
            common,
            programs: HashMap::new(),
        }
    }

    /// Attach the rules of one curriculum
    ///
    /// # Errors
    /// See [`ProgramRules::new`]
    pub fn with_program(
        mut self,
        curriculum: Curriculum,
        rules: Vec<CurriculumRule>,
    ) -> Result<Self, LoadError> {
        self.programs
            .insert(curriculum, ProgramRules::new(curriculum, rules)?);
        Ok(self)
    }

    /// Rules of `curriculum` (empty when the document defines none)
    #[must_use]
    pub fn program(&self, curriculum: Curriculum) -> &ProgramRules {
        self.programs.get(&curriculum).unwrap_or(&NO_RULES)
    }

    /// Sum of the credits of all mandatory exams
    #[must_use]
    pub fn mandatory_credits(&self) -> u32 {
        self.common
            .mandatory_exams
            .iter()
            .fold(0, |sum, e| sum.saturating_add(e.credits))
    }

    /// Load rules from a `.json` or `.toml` file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, has an unknown extension, or
    /// does not describe valid rules
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Self::from_json_str(&content),
            "toml" => Self::from_toml_str(&content),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse a JSON rules document
    ///
    /// # Errors
    /// Returns an error on malformed JSON or invalid rules
    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        let raw: RawRules = serde_json::from_str(content)?;
        raw.try_into_rules()
    }

    /// Parse a TOML rules document
    ///
    /// # Errors
    /// Returns an error on malformed TOML or invalid rules
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let raw: RawRules = toml::from_str(content)?;
        raw.try_into_rules()
    }
}

#[derive(Debug, Deserialize)]
struct RawRules {
    common_rules: CommonRules,
    #[serde(default)]
    programs: BTreeMap<String, RawProgram>,
}

#[derive(Debug, Deserialize)]
struct RawProgram {
    #[serde(default)]
    curriculum_rules: Vec<RawCurriculumRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCurriculumRule {
    source: String,
    min_credits: Option<u32>,
    #[serde(rename = "min_sumBC_credits")]
    min_sum_bc_credits: Option<u32>,
}

impl RawRules {
    fn try_into_rules(self) -> Result<RequirementRules, LoadError> {
        let mut ids = HashSet::new();
        for exam in &self.common_rules.mandatory_exams {
            if !ids.insert(mandatory_id(&exam.name)) {
                return Err(LoadError::Rules(format!(
                    "mandatory exam '{}' is listed more than once",
                    exam.name.trim()
                )));
            }
        }

        let mut rules = RequirementRules::new(self.common_rules);
        for (code, program) in self.programs {
            let curriculum = code.parse::<Curriculum>().map_err(LoadError::Rules)?;
            if rules.programs.contains_key(&curriculum) {
                return Err(LoadError::Rules(format!(
                    "curriculum {curriculum} is defined more than once"
                )));
            }
            let parsed = program
                .curriculum_rules
                .into_iter()
                .map(|raw| raw.into_rule(curriculum))
                .collect::<Result<Vec<_>, _>>()?;
            rules = rules.with_program(curriculum, parsed)?;
        }
        Ok(rules)
    }
}

impl RawCurriculumRule {
    fn into_rule(self, curriculum: Curriculum) -> Result<CurriculumRule, LoadError> {
        let source = self.source.trim();
        if source == SUM_BC_MARKER {
            return self
                .min_sum_bc_credits
                .map(CurriculumRule::sum_bc)
                .ok_or_else(|| {
                    LoadError::Rules(format!(
                        "{curriculum}: '{SUM_BC_MARKER}' rule needs 'min_sumBC_credits'"
                    ))
                });
        }
        let table = Table::from_tag(source).ok_or_else(|| {
            LoadError::Rules(format!("{curriculum}: unknown rule source '{source}'"))
        })?;
        self.min_credits
            .map(|min| CurriculumRule::table(table, min))
            .ok_or_else(|| {
                LoadError::Rules(format!(
                    "{curriculum}: rule for table '{source}' needs 'min_credits'"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_RULES: &str = r#"{
        "common_rules": {
            "mandatory_exams": [
                { "name": "Lab Course", "credits": 12 },
                { "name": "Final Thesis", "credits": 42 }
            ],
            "free_exams_credits": 12,
            "total_credits": 120
        },
        "programs": {
            "FBA": { "curriculum_rules": [
                { "source": "1", "min_credits": 12 },
                { "source": "2", "min_credits": 54 }
            ] },
            "F94": { "curriculum_rules": [
                { "source": "A", "min_credits": 18 },
                { "source": "B", "min_credits": 30 },
                { "source": "C", "min_credits": 12 },
                { "source": "sumBC", "min_sumBC_credits": 48 }
            ] }
        }
    }"#;

    #[test]
    fn test_parse_json_rules() {
        let rules = RequirementRules::from_json_str(JSON_RULES).unwrap();

        assert_eq!(rules.common.total_credits, 120);
        assert_eq!(rules.common.free_exams_credits, 12);
        assert_eq!(rules.mandatory_credits(), 54);

        let fba = rules.program(Curriculum::Fba);
        assert_eq!(fba.table_minimum(Table::One), 12);
        assert_eq!(fba.table_minimum(Table::Two), 54);
        assert!(fba.aggregate().is_none());

        let f94 = rules.program(Curriculum::F94);
        assert_eq!(f94.rules().len(), 4);
        assert_eq!(f94.table_minimum(Table::C), 12);
        let aggregate = f94.aggregate().unwrap();
        assert_eq!(aggregate.min_credits, 48);
        assert!(aggregate.covers(Table::B));
        assert!(!aggregate.covers(Table::A));
    }

    #[test]
    fn test_parse_toml_rules() {
        let toml_str = r#"
[common_rules]
free_exams_credits = 6
total_credits = 60

[[common_rules.mandatory_exams]]
name = "Thesis"
credits = 30

[[programs.F94.curriculum_rules]]
source = "B"
min_credits = 12

[[programs.F94.curriculum_rules]]
source = "sumBC"
min_sumBC_credits = 18
"#;
        let rules = RequirementRules::from_toml_str(toml_str).unwrap();
        assert_eq!(rules.mandatory_credits(), 30);
        assert_eq!(rules.program(Curriculum::F94).table_minimum(Table::B), 12);
        assert_eq!(
            rules.program(Curriculum::F94).aggregate().map(|a| a.min_credits),
            Some(18)
        );
        assert!(rules.program(Curriculum::Fba).rules().is_empty());
    }

    #[test]
    fn test_rejects_unknown_source() {
        let doc = r#"{"common_rules": {"total_credits": 120},
            "programs": {"F94": {"curriculum_rules": [{"source": "D", "min_credits": 6}]}}}"#;
        let err = RequirementRules::from_json_str(doc).unwrap_err();
        assert!(err.to_string().contains("unknown rule source 'D'"));
    }

    #[test]
    fn test_rejects_table_foreign_to_curriculum() {
        let doc = r#"{"common_rules": {"total_credits": 120},
            "programs": {"FBA": {"curriculum_rules": [{"source": "A", "min_credits": 6}]}}}"#;
        assert!(matches!(
            RequirementRules::from_json_str(doc),
            Err(LoadError::Rules(_))
        ));
    }

    #[test]
    fn test_rejects_aggregate_outside_f94() {
        let result = RequirementRules::new(CommonRules::default())
            .with_program(Curriculum::Fba, vec![CurriculumRule::sum_bc(10)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_second_aggregate() {
        let result = RequirementRules::new(CommonRules::default()).with_program(
            Curriculum::F94,
            vec![CurriculumRule::sum_bc(10), CurriculumRule::sum_bc(20)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_missing_minimum() {
        let doc = r#"{"common_rules": {"total_credits": 120},
            "programs": {"F94": {"curriculum_rules": [{"source": "sumBC", "min_credits": 6}]}}}"#;
        assert!(RequirementRules::from_json_str(doc).is_err());
    }

    #[test]
    fn test_rejects_unknown_program() {
        let doc = r#"{"common_rules": {"total_credits": 120},
            "programs": {"XYZ": {"curriculum_rules": []}}}"#;
        assert!(RequirementRules::from_json_str(doc).is_err());
    }

    #[test]
    fn test_rejects_curriculum_given_twice() {
        let doc = r#"{"common_rules": {"total_credits": 120},
            "programs": {
                "FBA": {"curriculum_rules": [{"source": "1", "min_credits": 12}]},
                "fba": {"curriculum_rules": [{"source": "1", "min_credits": 30}]}
            }}"#;
        let err = RequirementRules::from_json_str(doc).unwrap_err();
        assert!(err.to_string().contains("defined more than once"));
    }

    #[test]
    fn test_rejects_mandatory_exams_sharing_an_id() {
        let doc = r#"{"common_rules": {
            "mandatory_exams": [
                { "name": "Final Thesis", "credits": 42 },
                { "name": "final thesis", "credits": 6 }
            ],
            "total_credits": 120}}"#;
        let err = RequirementRules::from_json_str(doc).unwrap_err();
        assert!(err.to_string().contains("listed more than once"));
    }

    #[test]
    fn test_rejects_unknown_rule_field() {
        let doc = r#"{"common_rules": {"total_credits": 120},
            "programs": {"F94": {"curriculum_rules": [{"source": "A", "max_credits": 6}]}}}"#;
        assert!(matches!(
            RequirementRules::from_json_str(doc),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_unconstrained_table_has_zero_minimum() {
        let rules = RequirementRules::new(CommonRules::default())
            .with_program(Curriculum::F94, vec![CurriculumRule::table(Table::A, 18)])
            .unwrap();
        assert_eq!(rules.program(Curriculum::F94).table_minimum(Table::B), 0);
    }
}
