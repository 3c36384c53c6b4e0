//! Exam availability descriptors
//!
//! The catalog describes when an exam runs with a small free-text language:
//! `enabled`, `disabled`, `From <year>`, or `Biennial Even` / `Biennial Odd`.
//! Keywords are case-insensitive. Text that matches none of these is treated as
//! available.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Academic year token in the form `YYYY/YYYY+1` (e.g., `2024/2025`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcademicYear(String);

impl AcademicYear {
    /// Wrap a year token. Malformed tokens are kept; their start year is simply unknown.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    /// The raw token
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer before the `/`, e.g. 2024 for `2024/2025`
    #[must_use]
    pub fn start(&self) -> Option<i32> {
        start_year(&self.0)
    }

    /// Whether the token is exactly `YYYY/YYYY+1`
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let Some((first, second)) = self.0.split_once('/') else {
            return false;
        };
        let digits = |s: &str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(first) || !digits(second) {
            return false;
        }
        matches!(
            (first.parse::<i32>(), second.parse::<i32>()),
            (Ok(a), Ok(b)) if b == a + 1
        )
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AcademicYear {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

fn start_year(token: &str) -> Option<i32> {
    token.split('/').next()?.trim().parse().ok()
}

/// Year parity used by biennial exams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    /// Runs when the academic year starts in an even calendar year
    Even,
    /// Runs when the academic year starts in an odd calendar year
    Odd,
}

impl Parity {
    /// Parity of a start year
    #[must_use]
    pub const fn of(year: i32) -> Self {
        if year.rem_euclid(2) == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Even => write!(f, "even"),
            Self::Odd => write!(f, "odd"),
        }
    }
}

/// Parsed availability descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Always offered
    Enabled,
    /// Never offered
    Disabled,
    /// Offered from a given academic year on
    From {
        /// Year text as written after `From`
        label: String,
        /// Start component of that year, if it parses
        start: Option<i32>,
    },
    /// Offered every other year
    Biennial(Parity),
    /// Unrecognised text, kept verbatim
    Other(String),
}

impl Availability {
    /// Parse a catalog availability string
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        let lower = text.to_lowercase();

        match lower.as_str() {
            "enabled" => return Self::Enabled,
            "disabled" => return Self::Disabled,
            _ => {}
        }

        if lower.starts_with("from") {
            let label = text.get("from".len()..).unwrap_or_default().trim();
            if !label.is_empty() {
                return Self::From {
                    label: label.to_string(),
                    start: start_year(label),
                };
            }
        }

        if lower.contains("biennial") {
            if lower.contains("even") {
                return Self::Biennial(Parity::Even);
            }
            if lower.contains("odd") {
                return Self::Biennial(Parity::Odd);
            }
        }

        Self::Other(text.to_string())
    }

    /// Whether the exam is offered in `year`.
    ///
    /// Unknown start years and unrecognised text count as available.
    #[must_use]
    pub fn is_available_in(&self, year: &AcademicYear) -> bool {
        match self {
            Self::Enabled | Self::Other(_) => true,
            Self::Disabled => false,
            Self::From { start, .. } => match (year.start(), start) {
                (Some(current), Some(from)) => current >= *from,
                _ => true,
            },
            Self::Biennial(parity) => year.start().map_or(true, |y| Parity::of(y) == *parity),
        }
    }
}

/// Why an exam is not offered in the active year. Rendered by the host via [`key`](Self::key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AvailabilityInfo {
    /// Offered from the given year on
    AvailableFrom(String),
    /// Biennial exam; next runs in years of this parity
    NextActivation(Parity),
    /// Any other reason; the raw availability text
    Unavailable(String),
}

impl AvailabilityInfo {
    /// Localisation key of the message
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::AvailableFrom(_) => "availability.from",
            Self::NextActivation(Parity::Even) => "availability.next_even",
            Self::NextActivation(Parity::Odd) => "availability.next_odd",
            Self::Unavailable(_) => "availability.raw",
        }
    }
}

impl fmt::Display for AvailabilityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AvailableFrom(year) => write!(f, "Available from {year}"),
            Self::NextActivation(parity) => write!(f, "Next activation is in {parity} years"),
            Self::Unavailable(raw) => write!(f, "{raw}"),
        }
    }
}

/// Explain why an exam with availability `raw` is not offered in `year`.
///
/// Returns `None` when the exam is available.
#[must_use]
pub fn next_availability_info(raw: &str, year: &AcademicYear) -> Option<AvailabilityInfo> {
    let availability = Availability::parse(raw);
    if availability.is_available_in(year) {
        return None;
    }
    Some(match availability {
        Availability::From { label, .. } => AvailabilityInfo::AvailableFrom(label),
        Availability::Biennial(parity) => AvailabilityInfo::NextActivation(parity),
        Availability::Enabled | Availability::Disabled | Availability::Other(_) => {
            AvailabilityInfo::Unavailable(raw.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(token: &str) -> AcademicYear {
        AcademicYear::new(token)
    }

    #[test]
    fn test_start_year() {
        assert_eq!(year("2024/2025").start(), Some(2024));
        assert_eq!(year(" 2019 / 2020 ").start(), Some(2019));
        assert_eq!(year("next year").start(), None);
    }

    #[test]
    fn test_well_formed_year() {
        assert!(year("2024/2025").is_well_formed());
        assert!(!year("2024/2026").is_well_formed());
        assert!(!year("2024").is_well_formed());
        assert!(!year("24/25").is_well_formed());
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(Availability::parse("ENABLED"), Availability::Enabled);
        assert_eq!(Availability::parse(" Disabled "), Availability::Disabled);
        assert_eq!(
            Availability::parse("biennial EVEN"),
            Availability::Biennial(Parity::Even)
        );
    }

    #[test]
    fn test_from_year() {
        let from = Availability::parse("From 2020");
        assert!(!from.is_available_in(&year("2018/2019")));
        assert!(from.is_available_in(&year("2020/2021")));
        assert!(from.is_available_in(&year("2021/2022")));

        let from_academic = Availability::parse("From 2022/2023");
        assert!(!from_academic.is_available_in(&year("2021/2022")));
        assert!(from_academic.is_available_in(&year("2022/2023")));
    }

    #[test]
    fn test_biennial_parity() {
        let even = Availability::parse("Biennial Even");
        let odd = Availability::parse("Biennial Odd");
        assert!(even.is_available_in(&year("2024/2025")));
        assert!(!even.is_available_in(&year("2025/2026")));
        assert!(odd.is_available_in(&year("2025/2026")));
        assert!(!odd.is_available_in(&year("2024/2025")));
    }

    #[test]
    fn test_biennial_without_parity_is_other() {
        assert!(matches!(
            Availability::parse("Biennial"),
            Availability::Other(_)
        ));
    }

    #[test]
    fn test_unrecognised_text_is_available() {
        let other = Availability::parse("ask the secretary");
        assert_eq!(other, Availability::Other("ask the secretary".to_string()));
        assert!(other.is_available_in(&year("2024/2025")));
        assert!(Availability::parse("").is_available_in(&year("2024/2025")));
    }

    #[test]
    fn test_info_none_when_available() {
        assert_eq!(next_availability_info("enabled", &year("2024/2025")), None);
        assert_eq!(next_availability_info("From 2020", &year("2021/2022")), None);
    }

    #[test]
    fn test_info_messages() {
        let from = next_availability_info("From 2020", &year("2018/2019")).unwrap();
        assert_eq!(from, AvailabilityInfo::AvailableFrom("2020".to_string()));
        assert_eq!(from.to_string(), "Available from 2020");
        assert_eq!(from.key(), "availability.from");

        let biennial = next_availability_info("Biennial Odd", &year("2024/2025")).unwrap();
        assert_eq!(biennial.to_string(), "Next activation is in odd years");
        assert_eq!(biennial.key(), "availability.next_odd");

        let disabled = next_availability_info("disabled", &year("2024/2025")).unwrap();
        assert_eq!(disabled, AvailabilityInfo::Unavailable("disabled".to_string()));
    }
}
