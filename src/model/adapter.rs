// File: ./src/model/adapter.rs
// Handles ICS serialization of calendar events
use crate::model::date::EventDate;
use crate::model::event::CalendarEvent;
use chrono::{DateTime, Utc};
use icalendar::{
    Calendar, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike, Property,
};
use uuid::Uuid;

/// Document-level properties written once per calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMeta {
    pub name: String,
    pub description: String,
}

fn to_ical_date(value: EventDate) -> DatePerhapsTime {
    match value {
        EventDate::AllDay(d) => DatePerhapsTime::Date(d),
        // Local wall-clock time, written without TZID.
        EventDate::Specific(dt) => DatePerhapsTime::DateTime(CalendarDateTime::Floating(dt)),
    }
}

fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

impl CalendarEvent {
    pub fn to_event(&self) -> Event {
        let mut event = Event::new();
        event.uid(&Uuid::new_v4().to_string());
        event.summary(&self.title);
        event.description(&self.description);
        event.starts(to_ical_date(self.start));
        event.ends(to_ical_date(self.end));
        event.timestamp(self.created);

        if let Some(url) = &self.url {
            event.add_property("URL", url);
        }
        event.add_property("SEQUENCE", self.sequence.to_string());
        event.add_property("CREATED", format_utc(&self.created));
        event.add_property("LAST-MODIFIED", format_utc(&self.last_modified));
        event
    }
}

/// Serializes the events, in the given order, into one iCalendar document.
pub fn to_ics_string(events: &[CalendarEvent], meta: &CalendarMeta) -> String {
    let mut calendar = Calendar::new();
    calendar.append_property(Property::new("X-WR-CALNAME", meta.name.as_str()));
    calendar.append_property(Property::new("X-WR-CALDESC", meta.description.as_str()));
    calendar.append_property(Property::new("METHOD", "PUBLISH"));

    for event in events {
        calendar.push(event.to_event());
    }
    calendar.to_string()
}
