//! CSV source for the delivery metrics export

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

/// One data row from the export, keyed by header name.
///
/// `line` is the 1-based file line number (header row = 1), so the first
/// data row reports as line 2 — matching what a spreadsheet user sees.
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub line: usize,
    pub fields: HashMap<String, String>,
}

impl CsvRow {
    /// Cell lookup by header; `None` when the column is missing entirely.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    /// Cell lookup, trimmed, with missing column and blank cell both
    /// collapsing to the empty string.
    pub fn get_trimmed(&self, header: &str) -> &str {
        self.get(header).unwrap_or("").trim()
    }
}

/// Read every data row of the export into memory.
///
/// The file must be UTF-8 with a header row; a leading byte-order mark is
/// stripped before header parsing.
pub fn read_rows(path: &Path) -> Result<Vec<CsvRow>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
    parse_rows(&content).with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

fn parse_rows(content: &str) -> Result<Vec<CsvRow>> {
    let content = content.trim_start_matches('\u{feff}');

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers().context("Failed to read CSV header")?.clone();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV record at line {}", idx + 2))?;
        let fields: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(CsvRow {
            line: idx + 2,
            fields,
        });
    }

    log::info!("Read {} data rows from export", rows.len());
    Ok(rows)
}
