//! CSV parser for the exam catalog

use super::ExamCatalog;
use crate::core::error::LoadError;
use crate::core::models::exam::{DEFAULT_CREDITS, DEFAULT_PERIOD};
use crate::core::models::ExamDescriptor;
use crate::debug;
use std::fs;
use std::path::Path;

const NAME_COLUMN: &str = "Name";

/// Parse a catalog CSV file
///
/// # Errors
/// Returns an error if the file cannot be read or has no header with a `Name` column
pub fn parse_catalog_csv<P: AsRef<Path>>(path: P) -> Result<ExamCatalog, LoadError> {
    let content = fs::read_to_string(path)?;
    parse_catalog_str(&content)
}

/// Parse catalog CSV content.
///
/// The first non-empty line is the header. Rows whose column count differs from the
/// header are dropped, as are rows without a name. Later rows repeating an exam id
/// are ignored.
///
/// # Errors
/// Returns an error if there is no header with a `Name` column
pub fn parse_catalog_str(content: &str) -> Result<ExamCatalog, LoadError> {
    let mut lines = content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty());

    let headers = lines
        .next()
        .map(split_csv_line)
        .ok_or(LoadError::MissingColumn(NAME_COLUMN))?;
    if column(&headers, NAME_COLUMN).is_none() {
        return Err(LoadError::MissingColumn(NAME_COLUMN));
    }

    let mut catalog = ExamCatalog::new();
    for (row, line) in lines.enumerate() {
        let fields = split_csv_line(line);
        if fields.len() != headers.len() {
            debug!(
                "Dropping catalog row {}: {} columns, expected {}",
                row + 2,
                fields.len(),
                headers.len()
            );
            continue;
        }
        let Some(exam) = parse_exam_row(&fields, &headers) else {
            debug!("Dropping catalog row {}: missing exam name", row + 2);
            continue;
        };
        let id = exam.id.clone();
        if !catalog.add(exam) {
            debug!("Ignoring duplicate catalog entry '{id}'");
        }
    }

    Ok(catalog)
}

fn parse_exam_row(fields: &[String], headers: &[String]) -> Option<ExamDescriptor> {
    let name = get_field(fields, NAME_COLUMN, headers)?;
    if name.is_empty() {
        return None;
    }

    let credits = get_field(fields, "CFU", headers)
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_CREDITS);
    let period = get_field(fields, "Period", headers)
        .and_then(|v| v.parse::<u8>().ok())
        .filter(|p| (1..=3).contains(p))
        .unwrap_or(DEFAULT_PERIOD);
    let text = |header: &str| get_field(fields, header, headers).unwrap_or_default().to_string();

    let availability = match text("Availability") {
        a if a.is_empty() => "enabled".to_string(),
        a => a,
    };

    Some(ExamDescriptor {
        id: name.to_string(),
        name: name.to_string(),
        credits,
        language: text("Language"),
        period,
        ordinamento: text("Ordinamento")
            .split('|')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect(),
        raw_tables: text("Table"),
        ssd: text("SSD"),
        pillar: text("Pillar"),
        subpillar: text("Subpillar"),
        availability,
        link: text("Link"),
    })
}

fn column(headers: &[String], header_name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(header_name))
}

/// Get a trimmed field value by header name
fn get_field<'a>(fields: &'a [String], header_name: &str, headers: &[String]) -> Option<&'a str> {
    column(headers, header_name)
        .and_then(|idx| fields.get(idx))
        .map(|f| f.trim())
}

/// Split a CSV line into fields.
///
/// Double quotes group a field so it may contain commas; `""` inside a quoted
/// field is a literal quote.
pub(crate) fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Name,Link,CFU,Language,Period,Ordinamento,Table,SSD,Pillar,Subpillar,Availability";

    #[test]
    fn test_split_plain_line() {
        let fields = split_csv_line("Optics, 6 ,A|B");
        assert_eq!(fields, vec!["Optics", "6", "A|B"]);
    }

    #[test]
    fn test_split_quoted_fields() {
        let fields = split_csv_line(r#""Lasers, advanced",6,"say ""hi""""#);
        assert_eq!(fields, vec!["Lasers, advanced", "6", r#"say "hi""#]);
    }

    #[test]
    fn test_split_trailing_empty_field() {
        assert_eq!(split_csv_line("a,b,").len(), 3);
    }

    #[test]
    fn test_defaults_for_unparsable_numbers() {
        let csv = format!("{HEADER}\nPlasma Physics,,six,EN,9,F94,B|C,FIS/03,Matter,Plasma,\n");
        let catalog = parse_catalog_str(&csv).unwrap();
        let exam = catalog.get("Plasma Physics").unwrap();

        assert_eq!(exam.credits, DEFAULT_CREDITS);
        assert_eq!(exam.period, DEFAULT_PERIOD);
        assert_eq!(exam.availability, "enabled");
        assert_eq!(exam.raw_tables, "B|C");
        assert_eq!(exam.ordinamento, vec!["F94"]);
    }

    #[test]
    fn test_drops_rows_with_wrong_column_count() {
        let csv = format!(
            "{HEADER}\nGood,https://x,9,EN,2,FBA,1,FIS/01,P,S,enabled\nBad,https://y,9\n"
        );
        let catalog = parse_catalog_str(&csv).unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("Good").is_some());
        assert!(catalog.get("Bad").is_none());
    }

    #[test]
    fn test_header_is_case_insensitive() {
        let csv = "name,cfu,table\nOptics,9,A\n";
        let catalog = parse_catalog_str(csv).unwrap();
        assert_eq!(catalog.get("Optics").map(|e| e.credits), Some(9));
    }

    #[test]
    fn test_missing_name_column_is_an_error() {
        let result = parse_catalog_str("Exam,CFU\nOptics,6\n");
        assert!(matches!(result, Err(LoadError::MissingColumn("Name"))));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(parse_catalog_str("\n\n").is_err());
    }

    #[test]
    fn test_duplicate_rows_keep_first() {
        let csv = "Name,CFU,Table\nOptics,9,A\nOptics,6,B\n";
        let catalog = parse_catalog_str(csv).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Optics").map(|e| e.credits), Some(9));
    }
}
