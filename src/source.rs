// File: ./src/source.rs
//! Reads one year's semicolon separated listing.
//!
//! Columns are fixed: date, time, organizer, description. Quotes carry no
//! meaning in these files and are kept as literal text. Empty cells and
//! missing trailing columns are read as absent.
use crate::config::Config;
use crate::error::ConvertError;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const COLUMN_COUNT: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEventRow {
    pub date: Option<String>,
    pub time: Option<String>,
    pub organizer: Option<String>,
    pub description: Option<String>,
    /// 1-based line in the source file.
    pub line: u64,
}

impl RawEventRow {
    fn from_record(record: &StringRecord) -> Self {
        let cell = |i: usize| {
            record
                .get(i)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
        };
        Self {
            date: cell(0),
            time: cell(1),
            organizer: cell(2),
            description: cell(3),
            line: record.position().map(|p| p.line()).unwrap_or_default(),
        }
    }

    /// Cells in column order, absent cells as empty strings.
    pub fn cells(&self) -> [&str; COLUMN_COUNT] {
        [
            self.date.as_deref().unwrap_or_default(),
            self.time.as_deref().unwrap_or_default(),
            self.organizer.as_deref().unwrap_or_default(),
            self.description.as_deref().unwrap_or_default(),
        ]
    }
}

/// Reads all rows from `reader`, dropping header rows.
pub fn read_rows<R: Read>(reader: R, config: &Config) -> Result<Vec<RawEventRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.context("Failed to read row")?;
        let row = RawEventRow::from_record(&record);
        if config.is_header(row.date.as_deref(), row.time.as_deref()) {
            log::debug!("Skipping header row at line {}", row.line);
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

pub fn read_rows_from_path(path: &Path, config: &Config) -> Result<Vec<RawEventRow>> {
    if !path.exists() {
        return Err(ConvertError::MissingInput {
            path: path.to_path_buf(),
        }
        .into());
    }
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_rows(file, config).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_empty_cells() {
        let data = "Datum;Uhrzeit;OV;Veranstaltung\n3. Januar;;;\"Neujahrs\"treffen\n5. Mai;19:30\n";
        let rows = read_rows(data.as_bytes(), &Config::default()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].date.as_deref(), Some("3. Januar"));
        assert_eq!(rows[0].time, None);
        assert_eq!(rows[0].organizer, None);
        assert_eq!(rows[0].description.as_deref(), Some("\"Neujahrs\"treffen"));
        assert_eq!(rows[0].line, 2);

        assert_eq!(rows[1].time.as_deref(), Some("19:30"));
        assert_eq!(rows[1].description, None);
        assert_eq!(rows[1].cells(), ["5. Mai", "19:30", "", ""]);
    }
}
