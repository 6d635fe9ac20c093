// File: ./src/error.rs
//! Domain errors raised while converting the listing.
//!
//! Only conditions that abort a run live here. Unrecognized dates, times and
//! markup are logged and tolerated by the parsers instead of being surfaced
//! as errors.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// A day/month expression matched structurally but names a month that is
    /// not in the German month table. Usually a typo in the listing.
    #[error("Monat '{month}' nicht gefunden (Datum '{text}')")]
    UnknownMonth { month: String, text: String },

    #[error("input file not found: {}", path.display())]
    MissingInput { path: PathBuf },
}

impl ConvertError {
    pub fn is_unknown_month(&self) -> bool {
        matches!(self, ConvertError::UnknownMonth { .. })
    }
}
