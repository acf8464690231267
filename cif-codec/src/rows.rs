//! Row-oriented text file reader/writer.
//!
//! The persisted form of a CIF is one line per row, fields joined with
//! `,`. This module only moves token lists to and from disk; it knows
//! nothing about what the tokens mean.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use cif_core::error::Result;

/// Separator between fields within a line.
pub const FIELD_SEPARATOR: char = ',';

/// Read a file into token lists, one per non-empty line.
///
/// Fields are split on [`FIELD_SEPARATOR`] and trimmed. Missing files
/// and unreadable paths surface as [`cif_core::CifError::Io`].
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(
            line.split(FIELD_SEPARATOR)
                .map(|field| field.trim().to_string())
                .collect(),
        );
    }
    Ok(rows)
}

/// Write token lists to a file, one line per row.
pub fn write_rows(path: impl AsRef<Path>, rows: &[Vec<String>]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for row in rows {
        let mut fields = row.iter();
        if let Some(first) = fields.next() {
            write!(writer, "{first}")?;
        }
        for field in fields {
            write!(writer, "{FIELD_SEPARATOR}{field}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
