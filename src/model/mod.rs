// File: ./src/model/mod.rs
// Aggregates the split model files
pub mod adapter;
pub mod date;
pub mod event;
pub mod markup;

// Re-export types so callers can use `crate::model::CalendarEvent` directly
pub use adapter::{CalendarMeta, to_ics_string};
pub use date::{DateRange, EventDate, MONTHS, parse_date_range};
pub use event::{CalendarEvent, EventBuilder};
pub use markup::{LinkCollector, MarkupDialect, MarkupExtractor};
