//! ICS file generation.

use chrono::NaiveDateTime;
use icalendar::{Calendar, Component, EventLike};

use crate::error::{CalGridError, CalGridResult};
use crate::event::Event;

const ICS_DATETIME: &str = "%Y%m%dT%H%M%S";

/// Generate .ics content for an event
pub fn generate_ics(event: &Event) -> CalGridResult<String> {
    if event.id.trim().is_empty() {
        return Err(CalGridError::IcsGenerate("event has no id".into()));
    }

    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.id);
    ics_event.summary(&event.title);

    // DTSTAMP is required by RFC 5545
    let dtstamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    // Floating times: local wall clock, no Z and no TZID
    ics_event.add_property("DTSTART", floating(event.start_time));
    ics_event.add_property("DTEND", floating(event.end_time));

    if let Some(ref desc) = event.description {
        ics_event.description(desc);
    }

    if let Some(ref loc) = event.location {
        ics_event.location(loc);
    }

    // RFC 7986
    ics_event.add_property("COLOR", &event.color);

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

fn floating(dt: NaiveDateTime) -> String {
    dt.format(ICS_DATETIME).to_string()
}

/// Replace the icalendar crate's PRODID and drop CALSCALE:GREGORIAN (the default).
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:CALGRID\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
