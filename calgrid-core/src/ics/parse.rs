//! ICS file parsing using the icalendar crate's parser.

use chrono::NaiveDateTime;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{read_calendar, unfold},
};

use crate::event::{DEFAULT_EVENT_COLOR, Event};
use crate::layout::range::start_of_day;

/// Parse ICS content into an Event.
///
/// Returns `None` when there is no VEVENT or it lacks UID, DTSTART or DTEND.
pub fn parse_event(content: &str) -> Option<Event> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).ok()?;
    let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;

    let id = vevent.find_prop("UID")?.val.to_string();
    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| "(No title)".to_string());
    let start_time = to_local(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?);
    let end_time = to_local(DatePerhapsTime::try_from(vevent.find_prop("DTEND")?).ok()?);

    let description = vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string());
    let location = vevent.find_prop("LOCATION").map(|p| p.val.to_string());
    let color = vevent
        .find_prop("COLOR")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string());

    Some(Event {
        id,
        title,
        description,
        start_time,
        end_time,
        color,
        location,
    })
}

/// Reduce an ICS time to local wall-clock time.
///
/// UTC times are converted to the machine's zone; zoned times keep their wall
/// clock reading; all-day dates start at midnight.
fn to_local(dpt: DatePerhapsTime) -> NaiveDateTime {
    match dpt {
        DatePerhapsTime::Date(d) => start_of_day(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => dt.with_timezone(&chrono::Local).naive_local(),
            CalendarDateTime::Floating(naive) => naive,
            CalendarDateTime::WithTimezone { date_time, .. } => date_time,
        },
    }
}
