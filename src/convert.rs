// File: ./src/convert.rs
//! Rewrites a semicolon separated file in place as a regular comma separated
//! file, for tools that only understand the standard dialect.
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::io::Read;
use std::path::Path;

/// Converts `reader` to comma separated bytes. Returns the output and the
/// number of rows written.
pub fn semicolon_to_comma<R: Read>(reader: R) -> Result<(Vec<u8>, usize)> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    let mut count = 0;
    for record in csv_reader.records() {
        let record = record.context("Failed to read row")?;
        writer.write_record(&record)?;
        count += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush converted rows: {}", e))?;
    Ok((bytes, count))
}

pub fn convert_file(path: &Path) -> Result<usize> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let (bytes, count) =
        semicolon_to_comma(file).with_context(|| format!("Failed to read {}", path.display()))?;
    LocalStorage::write_output(path, bytes)?;
    log::info!("Written {} rows.", count);
    Ok(count)
}
