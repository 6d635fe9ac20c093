// File: ./src/accumulator.rs
//! Ordered collection of all events produced during one run.
//!
//! The accumulator is created by the driving loop, handed by `&mut` to each
//! source, and consumed by [`CalendarAccumulator::finalize`] once every source
//! has been processed. Events keep their processing order (year, then row);
//! nothing is merged or reordered.
use crate::model::{CalendarEvent, CalendarMeta, to_ics_string};

#[derive(Debug, Clone)]
pub struct CalendarAccumulator {
    meta: CalendarMeta,
    events: Vec<CalendarEvent>,
}

impl CalendarAccumulator {
    pub fn new(meta: CalendarMeta) -> Self {
        Self {
            meta,
            events: Vec::new(),
        }
    }

    pub fn add(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Serializes the whole run into a single iCalendar document.
    pub fn finalize(self) -> String {
        log::debug!("Serializing {} events", self.events.len());
        to_ics_string(&self.events, &self.meta)
    }
}
