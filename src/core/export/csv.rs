//! CSV export of a plan

use super::{export_rows, ExportRow, PlanExporter};
use crate::core::planner::PlanEngine;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const HEADER: &str = "Name,Credits,Period,Table,Pillar,Subpillar,Type,Link";

/// CSV exporter: one row per plan entry
pub struct CsvExporter;

impl PlanExporter for CsvExporter {
    fn export(&self, engine: &PlanEngine<'_>, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let rows = export_rows(engine.plan().entries(), engine.catalog());
        let mut file = BufWriter::new(File::create(output_path)?);
        write_csv(&mut file, &rows)?;
        file.flush()?;
        Ok(())
    }
}

/// Write rows as CSV, header first
///
/// # Errors
/// Returns an error if writing fails
pub fn write_csv<W: Write>(out: &mut W, rows: &[ExportRow]) -> std::io::Result<()> {
    writeln!(out, "{HEADER}")?;
    for row in rows {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            escape(&row.name),
            row.credits,
            row.period.map(|p| p.to_string()).unwrap_or_default(),
            row.table.tag(),
            escape(&row.pillar),
            escape(&row.subpillar),
            row.kind,
            escape(&row.link)
        )?;
    }
    Ok(())
}

/// Quote a field if it contains a delimiter, quote or line break
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::csv_parser::split_csv_line;
    use crate::core::export::EntryKind;
    use crate::core::models::Table;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a, b"), "\"a, b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_write_csv_rows() {
        let rows = vec![ExportRow {
            name: "Lasers, advanced".to_string(),
            credits: 6,
            period: Some(2),
            table: Table::B,
            pillar: "Photonics".to_string(),
            subpillar: String::new(),
            kind: EntryKind::Curricular,
            link: "https://example.org/lasers".to_string(),
        }];
        let mut out = Vec::new();
        write_csv(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some(HEADER));
        let fields = split_csv_line(lines.next().unwrap());
        assert_eq!(
            fields,
            vec![
                "Lasers, advanced",
                "6",
                "2",
                "B",
                "Photonics",
                "",
                "Curricular",
                "https://example.org/lasers"
            ]
        );
    }
}
