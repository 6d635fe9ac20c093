// File: src/model/date.rs
// Parses the German date and time expressions used in the listing.
use crate::error::ConvertError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::cmp::Ordering;

pub const MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// A point in local wall-clock time, either a whole day or a specific minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventDate {
    AllDay(NaiveDate),
    Specific(NaiveDateTime),
}

impl EventDate {
    pub fn has_time(&self) -> bool {
        matches!(self, EventDate::Specific(_))
    }

    /// All-day values compare as midnight of their day.
    pub fn to_comparison_time(&self) -> NaiveDateTime {
        match self {
            EventDate::AllDay(d) => d.and_time(NaiveTime::MIN),
            EventDate::Specific(dt) => *dt,
        }
    }
}

impl PartialOrd for EventDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_comparison_time()
            .cmp(&other.to_comparison_time())
            .then_with(|| self.has_time().cmp(&other.has_time()))
    }
}

/// Result of parsing one date cell. The end is always date-only; turning it
/// into a concrete boundary is left to the event builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: EventDate,
    pub end: Option<NaiveDate>,
}

/// Raw tokens captured by one grammar rule, before month lookup.
#[derive(Debug, PartialEq, Eq)]
struct DayMonthTokens<'a> {
    start_day: &'a str,
    start_month: &'a str,
    end: Option<(&'a str, &'a str)>,
}

struct DateRule {
    pattern: Lazy<Regex>,
    extract: for<'h> fn(&Captures<'h>) -> Option<DayMonthTokens<'h>>,
}

fn group<'h>(caps: &Captures<'h>, i: usize) -> Option<&'h str> {
    caps.get(i).map(|m| m.as_str())
}

// "3. Mai bis 5. Juni"
fn two_months<'h>(caps: &Captures<'h>) -> Option<DayMonthTokens<'h>> {
    Some(DayMonthTokens {
        start_day: group(caps, 1)?,
        start_month: group(caps, 2)?,
        end: Some((group(caps, 3)?, group(caps, 4)?)),
    })
}

// "3. bis 5. Mai"
fn shared_month<'h>(caps: &Captures<'h>) -> Option<DayMonthTokens<'h>> {
    let month = group(caps, 3)?;
    Some(DayMonthTokens {
        start_day: group(caps, 1)?,
        start_month: month,
        end: Some((group(caps, 2)?, month)),
    })
}

// "3. Mai"
fn single_day<'h>(caps: &Captures<'h>) -> Option<DayMonthTokens<'h>> {
    Some(DayMonthTokens {
        start_day: group(caps, 1)?,
        start_month: group(caps, 2)?,
        end: None,
    })
}

// Tried top to bottom, first match wins. The month slot accepts any word so
// that a misspelt month is reported instead of silently skipped.
static DATE_RULES: [DateRule; 3] = [
    DateRule {
        pattern: Lazy::new(|| {
            Regex::new(r"^(\d{1,2})\.\s+(\p{L}+)\s+bis\s+(\d{1,2})\.\s+(\p{L}+)$")
                .expect("valid date rule")
        }),
        extract: two_months,
    },
    DateRule {
        pattern: Lazy::new(|| {
            Regex::new(r"^(\d{1,2})\.\s+bis\s+(\d{1,2})\.\s+(\p{L}+)$").expect("valid date rule")
        }),
        extract: shared_month,
    },
    DateRule {
        pattern: Lazy::new(|| Regex::new(r"^(\d{1,2})\.\s+(\p{L}+)$").expect("valid date rule")),
        extract: single_day,
    },
];

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})").expect("valid time pattern"));

/// Maps a German month name to its number (1-based).
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|idx| idx as u32 + 1)
}

fn match_rules(text: &str) -> Option<DayMonthTokens<'_>> {
    DATE_RULES.iter().find_map(|rule| {
        let caps = rule.pattern.captures(text)?;
        (rule.extract)(&caps)
    })
}

fn resolve_month(month: &str, text: &str) -> Result<u32, ConvertError> {
    month_number(month).ok_or_else(|| ConvertError::UnknownMonth {
        month: month.to_string(),
        text: text.to_string(),
    })
}

/// Parses `H:MM` / `HH:MM` at the start of the cell. Anything after the
/// minutes ("19:30 Uhr") is ignored.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let caps = TIME_RE.captures(text.trim())?;
    let hour = group(&caps, 1)?.parse::<u32>().ok()?;
    let minute = group(&caps, 2)?.parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parses a date cell (plus optional time cell) relative to `year`.
///
/// Returns `Ok(None)` when the text matches none of the supported phrasings;
/// the caller skips the row. A phrase that matches but names an unknown month
/// is an error, so typos in month names are not silently dropped.
pub fn parse_date_range(
    date: Option<&str>,
    time: Option<&str>,
    year: i32,
) -> Result<Option<DateRange>, ConvertError> {
    let text = date.map(str::trim).unwrap_or_default();

    let Some(tokens) = match_rules(text) else {
        log::warn!("Unknown date '{}'. Line skipped.", text);
        return Ok(None);
    };

    // "3. bis" alone would otherwise be read as day 3 of month "bis".
    if tokens.start_month == "bis" {
        log::warn!("Unknown date '{}'. Line skipped.", text);
        return Ok(None);
    }

    let start_month = resolve_month(tokens.start_month, text)?;
    let end_tokens = match tokens.end {
        Some((day, month)) => Some((day, resolve_month(month, text)?)),
        None => None,
    };

    let Some(start_day) = calendar_date(year, start_month, tokens.start_day) else {
        log::warn!("Invalid date '{}' in {}. Line skipped.", text, year);
        return Ok(None);
    };

    let end = match end_tokens {
        Some((day, month)) => match calendar_date(year, month, day) {
            Some(d) => Some(d),
            None => {
                log::warn!("Invalid end date '{}' in {}. Line skipped.", text, year);
                return Ok(None);
            }
        },
        None => None,
    };

    if let Some(end_day) = end
        && end_day < start_day
    {
        log::warn!("Date range '{}' ends before it starts. Line skipped.", text);
        return Ok(None);
    }

    let time = time.map(str::trim).filter(|t| !t.is_empty());
    let start = match time {
        Some(t) => match parse_time(t) {
            Some(tod) => EventDate::Specific(start_day.and_time(tod)),
            None => {
                log::warn!("Unknown time '{}'. Used without time.", t);
                EventDate::AllDay(start_day)
            }
        },
        None => EventDate::AllDay(start_day),
    };

    Ok(Some(DateRange { start, end }))
}

fn calendar_date(year: i32, month: u32, day: &str) -> Option<NaiveDate> {
    let day = day.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whole-day step used for exclusive all-day end boundaries. `None` past the
/// last representable date.
pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rule_priority_two_months_first() {
        let tokens = match_rules("30. April bis 2. Mai").unwrap();
        assert_eq!(tokens.start_month, "April");
        assert_eq!(tokens.end, Some(("2", "Mai")));
    }

    #[test]
    fn test_shared_month_rule() {
        let tokens = match_rules("3. bis 5. Mai").unwrap();
        assert_eq!(tokens.start_day, "3");
        assert_eq!(tokens.start_month, "Mai");
        assert_eq!(tokens.end, Some(("5", "Mai")));
    }

    #[test]
    fn test_umlaut_month() {
        let r = parse_date_range(Some("12. März"), None, 2015).unwrap().unwrap();
        assert_eq!(r.start, EventDate::AllDay(ymd(2015, 3, 12)));
    }

    #[test]
    fn test_time_suffix_ignored() {
        assert_eq!(
            parse_time("19:30 Uhr"),
            NaiveTime::from_hms_opt(19, 30, 0)
        );
        assert_eq!(parse_time("7:05"), NaiveTime::from_hms_opt(7, 5, 0));
        assert_eq!(parse_time("19.30"), None);
        assert_eq!(parse_time("19:3"), None);
        assert_eq!(parse_time("25:00"), None);
    }

    #[test]
    fn test_bare_bis_is_not_a_month() {
        assert!(parse_date_range(Some("3. bis"), None, 2014).unwrap().is_none());
    }

    #[test]
    fn test_event_date_ordering() {
        let day = EventDate::AllDay(ymd(2014, 3, 5));
        let timed = EventDate::Specific(ymd(2014, 3, 5).and_hms_opt(19, 0, 0).unwrap());
        assert!(day < timed);
        assert!(timed < EventDate::AllDay(ymd(2014, 3, 6)));
    }
}
