//! Machine-readable output of the visible tables

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::table::{Presentation, TableView};
use crate::types::CandidateRow;

/// Output format of the `search` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned text tables
    #[default]
    Table,
    /// Formatted cells as CSV, one section per table
    Csv,
    /// Raw values as JSON
    Json,
}

/// Write one table as CSV: a title record, the header and the formatted rows.
/// Empty tables write only the title.
pub fn write_csv<W: Write>(writer: W, presentation: &Presentation<'_>) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    match presentation {
        Presentation::NoData { title } => {
            wtr.write_record([*title])?;
        }
        Presentation::Table(view) => {
            wtr.write_record([view.title])?;
            wtr.write_record(&view.columns)?;
            for cells in view.formatted_rows() {
                wtr.write_record(&cells)?;
            }
        }
    }
    wtr.flush().context("Failed to write CSV output")?;
    Ok(())
}

#[derive(Serialize)]
struct JsonTables<'a> {
    csp: Vec<&'a CandidateRow>,
    cc: Vec<&'a CandidateRow>,
}

fn visible_rows<'a>(presentation: &Presentation<'a>) -> Vec<&'a CandidateRow> {
    match presentation {
        Presentation::NoData { .. } => Vec::new(),
        Presentation::Table(TableView { rows, .. }) => rows.clone(),
    }
}

/// Write the visible rows of both tables as one JSON document
pub fn write_json<W: Write>(
    mut writer: W,
    csp: &Presentation<'_>,
    cc: &Presentation<'_>,
) -> Result<()> {
    let tables = JsonTables {
        csp: visible_rows(csp),
        cc: visible_rows(cc),
    };
    serde_json::to_writer_pretty(&mut writer, &tables).context("Failed to write JSON output")?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{present, SortState};

    fn rows() -> Vec<CandidateRow> {
        vec![
            CandidateRow::new()
                .with("ticker", "AAPL")
                .with("roi_%", 1.234)
                .with("dte", 14.0),
            CandidateRow::new()
                .with("ticker", "MSFT")
                .with("roi_%", 0.5)
                .with("dte", 21.0),
        ]
    }

    #[test]
    fn test_csv_uses_formatted_cells() {
        let rows = rows();
        let sort = SortState::new();
        let mut out = Vec::new();
        write_csv(&mut out, &present("Cash-Secured Put Ideas", &rows, &sort, 10)).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Cash-Secured Put Ideas");
        assert_eq!(lines[1], "ticker,roi_%,dte");
        assert_eq!(lines[2], "AAPL,1.23,14");
        assert_eq!(lines[3], "MSFT,0.50,21");
    }

    #[test]
    fn test_csv_empty_table_writes_title_only() {
        let sort = SortState::new();
        let mut out = Vec::new();
        write_csv(&mut out, &present("Covered Call Ideas", &[], &sort, 10)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Covered Call Ideas\n");
    }

    #[test]
    fn test_json_respects_truncation() {
        let rows = rows();
        let sort = SortState::new();
        let csp = present("csp", &rows, &sort, 1);
        let cc = present("cc", &[], &sort, 1);
        let mut out = Vec::new();
        write_json(&mut out, &csp, &cc).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["csp"].as_array().unwrap().len(), 1);
        assert_eq!(value["csp"][0]["ticker"], "AAPL");
        assert_eq!(value["csp"][0]["roi_%"], 1.234);
        assert!(value["cc"].as_array().unwrap().is_empty());
    }
}
