// File: src/model/event.rs
// Turns a parsed row into a finished calendar event.
use crate::model::date::{DateRange, EventDate, next_day};
use crate::model::markup::LinkCollector;
use chrono::{DateTime, Duration, NaiveTime, Utc};

pub const LINKS_HEADING: &str = "weitere Informationen:";

/// Length of a timed event that has no explicit end.
pub const DEFAULT_EVENT_HOURS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub start: EventDate,
    pub end: EventDate,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub sequence: u32,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct EventBuilder {
    sequence: u32,
    now: DateTime<Utc>,
}

impl EventBuilder {
    pub fn new(sequence: u32, now: DateTime<Utc>) -> Self {
        Self { sequence, now }
    }

    /// Builds the event for one row. Returns `None` when the row has no
    /// usable date or no title, or when its end falls outside the calendar
    /// range chrono can represent.
    pub fn build(
        &self,
        range: Option<DateRange>,
        organizer: Option<&str>,
        description: Option<&str>,
        links: &LinkCollector,
    ) -> Option<CalendarEvent> {
        let range = range?;
        let description = description?;
        let title = make_title(description, organizer)?;
        let Some(end) = resolve_end(&range) else {
            log::warn!("No end date after {:?} for '{}'. Line skipped.", range.start, title);
            return None;
        };

        Some(CalendarEvent {
            start: range.start,
            end,
            title,
            description: compose_description(description, links),
            url: links.first().map(str::to_string),
            sequence: self.sequence,
            created: self.now,
            last_modified: self.now,
        })
    }
}

/// First line of the description, followed by the organizer in parentheses.
pub fn make_title(description: &str, organizer: Option<&str>) -> Option<String> {
    let first_line = description.split('\n').next().unwrap_or_default().trim();
    if first_line.is_empty() {
        return None;
    }
    match organizer.map(str::trim).filter(|o| !o.is_empty()) {
        Some(org) => Some(format!("{} ({})", first_line, org)),
        None => Some(first_line.to_string()),
    }
}

/// Applies the end defaults:
/// - all-day start with end date: the day after the end (exclusive boundary)
/// - timed start with end date: midnight of the end date
/// - timed start without end: two hours after the start
/// - all-day start without end: the following day
///
/// A timed start whose end date is the start date would end before it
/// begins; such events fall back to the two hour default. `None` when the end
/// is not representable.
pub fn resolve_end(range: &DateRange) -> Option<EventDate> {
    let default_length = Duration::hours(DEFAULT_EVENT_HOURS);
    match (range.start, range.end) {
        (EventDate::AllDay(_), Some(end)) => next_day(end).map(EventDate::AllDay),
        (EventDate::Specific(start), Some(end)) => {
            let end = end.and_time(NaiveTime::MIN);
            if end > start {
                Some(EventDate::Specific(end))
            } else {
                start
                    .checked_add_signed(default_length)
                    .map(EventDate::Specific)
            }
        }
        (EventDate::Specific(start), None) => start
            .checked_add_signed(default_length)
            .map(EventDate::Specific),
        (EventDate::AllDay(start), None) => next_day(start).map(EventDate::AllDay),
    }
}

pub fn compose_description(description: &str, links: &LinkCollector) -> String {
    if links.is_empty() {
        return description.to_string();
    }
    let list: Vec<String> = links.iter().map(|l| format!("  - {}", l)).collect();
    format!("{}\n\n{}\n{}", description, LINKS_HEADING, list.join("\n"))
}
