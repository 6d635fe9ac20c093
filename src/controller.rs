// File: src/controller.rs
//! Drives a conversion run.
//!
//! Sources are processed one after another in ascending year order and rows
//! in file order. Every event lands in a single [`CalendarAccumulator`] owned
//! by [`Converter::run`], which serializes it once at the end. A run either
//! writes the complete calendar or, when it aborts, nothing at all.
use crate::accumulator::CalendarAccumulator;
use crate::config::{Config, UnknownMonthPolicy};
use crate::context::AppContext;
use crate::error::ConvertError;
use crate::html;
use crate::model::{
    CalendarEvent, EventBuilder, LinkCollector, MarkupExtractor, parse_date_range,
};
use crate::source::{self, RawEventRow};
use crate::storage::LocalStorage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSummary {
    pub year: i32,
    pub rows: usize,
    pub events: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub sources: Vec<SourceSummary>,
    pub events: usize,
    pub output: PathBuf,
}

pub struct Converter<'a> {
    config: &'a Config,
    ctx: &'a dyn AppContext,
    extractor: MarkupExtractor,
    builder: EventBuilder,
}

impl<'a> Converter<'a> {
    pub fn new(config: &'a Config, ctx: &'a dyn AppContext) -> Self {
        Self::with_now(config, ctx, Utc::now())
    }

    /// Like [`Converter::new`] with a fixed creation timestamp for all events.
    pub fn with_now(config: &'a Config, ctx: &'a dyn AppContext, now: DateTime<Utc>) -> Self {
        Self {
            config,
            ctx,
            extractor: MarkupExtractor::new(config.dialect, config.base_url.clone()),
            builder: EventBuilder::new(config.sequence, now),
        }
    }

    /// Processes every configured year and writes the calendar.
    pub fn run(&self) -> Result<RunSummary> {
        let mut accumulator = CalendarAccumulator::new(self.config.calendar_meta());
        let mut sources = Vec::new();

        for year in self.config.years() {
            sources.push(self.process_source(year, &mut accumulator)?);
        }

        if accumulator.is_empty() {
            log::warn!("No events found. Writing an empty calendar.");
        }
        let events = accumulator.len();
        let output = self.ctx.resolve(&self.config.output)?;
        let ics = accumulator.finalize();
        LocalStorage::write_output(&output, ics)?;
        log::info!("Output written to {}.", output.display());

        Ok(RunSummary {
            sources,
            events,
            output,
        })
    }

    /// Reads one year's file, writes its HTML table and adds its events.
    pub fn process_source(
        &self,
        year: i32,
        accumulator: &mut CalendarAccumulator,
    ) -> Result<SourceSummary> {
        let input = self.ctx.resolve(&self.config.input_file_for(year))?;
        log::info!("Reading {}...", input.display());
        let rows = source::read_rows_from_path(&input, self.config)?;

        let summary = self.process_rows(year, &rows, accumulator)?;

        if let Some(name) = self.config.html_file_for(year) {
            let html_path = self.ctx.resolve(&name)?;
            log::info!("Writing {}...", html_path.display());
            LocalStorage::write_output(&html_path, html::render_table(&rows))?;
        }

        log::info!(
            "{}: {} rows, {} events, {} skipped",
            year,
            summary.rows,
            summary.events,
            summary.skipped
        );
        Ok(summary)
    }

    pub fn process_rows(
        &self,
        year: i32,
        rows: &[RawEventRow],
        accumulator: &mut CalendarAccumulator,
    ) -> Result<SourceSummary> {
        let mut summary = SourceSummary {
            year,
            rows: rows.len(),
            ..SourceSummary::default()
        };

        for row in rows {
            match self.process_row(row, year) {
                Ok(Some(event)) => {
                    accumulator.add(event);
                    summary.events += 1;
                }
                Ok(None) => {
                    log::debug!("{}: line {} produced no event", year, row.line);
                    summary.skipped += 1;
                }
                Err(e) if e.is_unknown_month()
                    && self.config.unknown_month == UnknownMonthPolicy::Skip =>
                {
                    log::warn!("{} (line {} of {}). Line skipped.", e, row.line, year);
                    summary.skipped += 1;
                }
                Err(e) => {
                    log::error!("{} (line {} of {})", e, row.line, year);
                    return Err(e.into());
                }
            }
        }
        Ok(summary)
    }

    /// Parses one row into an event. `Ok(None)` means the row is skipped.
    pub fn process_row(
        &self,
        row: &RawEventRow,
        year: i32,
    ) -> Result<Option<CalendarEvent>, ConvertError> {
        let range = parse_date_range(row.date.as_deref(), row.time.as_deref(), year)?;

        let mut links = LinkCollector::new();
        let description = self.extractor.extract(row.description.as_deref(), &mut links);
        let organizer = self.extractor.extract(row.organizer.as_deref(), &mut links);
        links.dedup();

        Ok(self
            .builder
            .build(range, organizer.as_deref(), description.as_deref(), &links))
    }
}
