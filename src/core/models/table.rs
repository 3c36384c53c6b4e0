//! Credit tables and curriculum variants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A bucket a plan entry is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    /// Exams every student must take
    Mandatory,
    /// FBA curricular Table-1
    #[serde(rename = "1")]
    One,
    /// FBA curricular Table-2
    #[serde(rename = "2")]
    Two,
    /// F94 curricular Table-A
    A,
    /// F94 curricular Table-B
    B,
    /// F94 curricular Table-C
    C,
    /// Free-choice credits
    Optional,
    /// Credits that do not count towards the degree
    OutOfPlan,
}

impl Table {
    /// Every table, in display order
    pub const ALL: [Self; 8] = [
        Self::Mandatory,
        Self::One,
        Self::Two,
        Self::A,
        Self::B,
        Self::C,
        Self::Optional,
        Self::OutOfPlan,
    ];

    /// Short tag as it appears in catalog and rule documents
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Mandatory => "Mandatory",
            Self::One => "1",
            Self::Two => "2",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::Optional => "Optional",
            Self::OutOfPlan => "OutOfPlan",
        }
    }

    /// Map a raw catalog tag to a curricular table.
    ///
    /// Only the five curricular tags are recognised; anything else is `None`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "1" => Some(Self::One),
            "2" => Some(Self::Two),
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            _ => None,
        }
    }

    /// Whether this table belongs to a curriculum (as opposed to Mandatory/Optional/OutOfPlan)
    #[must_use]
    pub const fn is_curricular(self) -> bool {
        matches!(self, Self::One | Self::Two | Self::A | Self::B | Self::C)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mandatory => write!(f, "Mandatory"),
            Self::Optional => write!(f, "Optional"),
            Self::OutOfPlan => write!(f, "Out of plan"),
            curricular => write!(f, "Table-{}", curricular.tag()),
        }
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(table) = Self::from_tag(&trimmed.to_ascii_uppercase()) {
            return Ok(table);
        }
        let lowered = trimmed.to_ascii_lowercase();
        if let Some(tag) = lowered.strip_prefix("table-") {
            if let Some(table) = Self::from_tag(&tag.to_ascii_uppercase()) {
                return Ok(table);
            }
        }
        match lowered.as_str() {
            "mandatory" => Ok(Self::Mandatory),
            "optional" => Ok(Self::Optional),
            "outofplan" | "out-of-plan" | "out of plan" => Ok(Self::OutOfPlan),
            _ => Err(format!("Unknown table: '{s}'")),
        }
    }
}

/// Curriculum variant governing which curricular tables exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curriculum {
    /// Tables 1 and 2, catalog order preserved
    #[serde(rename = "FBA")]
    Fba,
    /// Tables A, B and C, always prioritised A < B < C
    #[serde(rename = "F94")]
    F94,
}

impl Curriculum {
    /// Both variants
    pub const ALL: [Self; 2] = [Self::Fba, Self::F94];

    /// Code used in rule documents and configuration
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Fba => "FBA",
            Self::F94 => "F94",
        }
    }

    /// Curricular tables of this variant in priority order
    #[must_use]
    pub const fn tables(self) -> &'static [Table] {
        match self {
            Self::Fba => &[Table::One, Table::Two],
            Self::F94 => &[Table::A, Table::B, Table::C],
        }
    }

    /// Full table schema reported by validation
    #[must_use]
    pub const fn schema(self) -> &'static [Table] {
        match self {
            Self::Fba => &[
                Table::Mandatory,
                Table::One,
                Table::Two,
                Table::Optional,
                Table::OutOfPlan,
            ],
            Self::F94 => &[
                Table::Mandatory,
                Table::A,
                Table::B,
                Table::C,
                Table::Optional,
                Table::OutOfPlan,
            ],
        }
    }

    /// Whether allowed tables are re-sorted into fixed priority instead of catalog order
    #[must_use]
    pub const fn sorts_by_priority(self) -> bool {
        matches!(self, Self::F94)
    }

    /// Whether `table` is one of this variant's curricular tables
    #[must_use]
    pub fn has_table(self, table: Table) -> bool {
        self.tables().contains(&table)
    }
}

impl fmt::Display for Curriculum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Curriculum {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FBA" => Ok(Self::Fba),
            "F94" => Ok(Self::F94),
            _ => Err(format!("Unknown curriculum: '{s}' (expected FBA or F94)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_only_curricular() {
        assert_eq!(Table::from_tag(" B "), Some(Table::B));
        assert_eq!(Table::from_tag("2"), Some(Table::Two));
        assert_eq!(Table::from_tag("Optional"), None);
        assert_eq!(Table::from_tag("D"), None);
    }

    #[test]
    fn test_table_parse_accepts_labels() {
        assert_eq!("table-a".parse::<Table>(), Ok(Table::A));
        assert_eq!("Table-1".parse::<Table>(), Ok(Table::One));
        assert_eq!("c".parse::<Table>(), Ok(Table::C));
        assert_eq!("out-of-plan".parse::<Table>(), Ok(Table::OutOfPlan));
        assert_eq!("MANDATORY".parse::<Table>(), Ok(Table::Mandatory));
        assert!("Table-Z".parse::<Table>().is_err());
    }

    #[test]
    fn test_table_display() {
        assert_eq!(Table::One.to_string(), "Table-1");
        assert_eq!(Table::C.to_string(), "Table-C");
        assert_eq!(Table::OutOfPlan.to_string(), "Out of plan");
    }

    #[test]
    fn test_table_serde_uses_tags() {
        let json = serde_json::to_string(&[Table::One, Table::B, Table::OutOfPlan]).unwrap();
        assert_eq!(json, r#"["1","B","OutOfPlan"]"#);
        let back: Vec<Table> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Table::One, Table::B, Table::OutOfPlan]);
    }

    #[test]
    fn test_curriculum_schema() {
        assert_eq!(Curriculum::Fba.schema().len(), 5);
        assert_eq!(Curriculum::F94.schema().len(), 6);
        assert!(Curriculum::F94.has_table(Table::B));
        assert!(!Curriculum::Fba.has_table(Table::B));
        assert!(!Curriculum::Fba.has_table(Table::Optional));
    }

    #[test]
    fn test_curriculum_parse() {
        assert_eq!("fba".parse::<Curriculum>(), Ok(Curriculum::Fba));
        assert_eq!("F94".parse::<Curriculum>(), Ok(Curriculum::F94));
        assert!("F95".parse::<Curriculum>().is_err());
    }
}
