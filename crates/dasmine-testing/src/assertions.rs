//! Custom assertions for dasmine CSV output.

use anyhow::{Context, Result};
use std::path::Path;

/// Parse CSV text into rows of owned fields, header included.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Output is not valid CSV")?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Read and parse a CSV file written by `dasmine convert`.
pub fn read_csv(path: &Path) -> Result<Vec<Vec<String>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_csv(&text)
}

/// Assert every row (header included) has exactly `expected` fields.
pub fn assert_field_count(rows: &[Vec<String>], expected: usize) -> Result<()> {
    for (i, row) in rows.iter().enumerate() {
        if row.len() != expected {
            anyhow::bail!("Row {} has {} fields, expected {}", i, row.len(), expected);
        }
    }
    Ok(())
}

/// Assert every field on every line is wrapped in double quotes.
///
/// Only meaningful for output whose values contain no embedded newlines.
pub fn assert_all_quoted(text: &str) -> Result<()> {
    for (i, line) in text.lines().enumerate() {
        if !(line.starts_with('"') && line.ends_with('"')) {
            anyhow::bail!("Line {} is not fully quoted: {}", i, line);
        }
    }
    Ok(())
}
