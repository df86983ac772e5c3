//! Event persistence.
//!
//! The store is the only place event invariants are enforced: a stored event
//! always has a non-blank title and `start_time < end_time`. The layout engine
//! trusts that and never re-validates.

mod dir;
mod memory;

pub use dir::{DirStore, base_filename};
pub use memory::MemoryStore;

use chrono::NaiveDateTime;

use crate::error::{CalGridError, CalGridResult};
use crate::event::{Event, EventDraft, EventPatch};

/// CRUD over persisted events. Shared across server tasks.
pub trait EventStore: Send + Sync {
    /// Events intersecting the inclusive range `[start, end]`, sorted by start.
    fn list(&self, start: NaiveDateTime, end: NaiveDateTime) -> CalGridResult<Vec<Event>>;

    fn get(&self, id: &str) -> CalGridResult<Event>;

    fn create(&self, draft: EventDraft) -> CalGridResult<Event>;

    /// Apply `patch` and re-validate the merged record.
    fn update(&self, id: &str, patch: EventPatch) -> CalGridResult<Event>;

    fn delete(&self, id: &str) -> CalGridResult<()>;
}

/// Check the invariants every stored event satisfies.
pub fn validate(event: &Event) -> CalGridResult<()> {
    if event.title.trim().is_empty() {
        return Err(CalGridError::InvalidEvent("Title is required".into()));
    }
    if event.end_time <= event.start_time {
        return Err(CalGridError::InvalidEvent(
            "End time must be after start time".into(),
        ));
    }
    Ok(())
}

/// Inclusive intersection with `[start, end]`.
pub fn intersects(event: &Event, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    event.start_time <= end && event.end_time >= start
}

pub(crate) fn sort_by_start(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn make_event(start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event {
            id: "e".to_string(),
            title: "Gym".to_string(),
            description: None,
            start_time: start,
            end_time: end,
            color: "#1a73e8".to_string(),
            location: None,
        }
    }

    #[test]
    fn test_validate() {
        assert!(validate(&make_event(at(1, 9), at(1, 10))).is_ok());

        let err = validate(&make_event(at(1, 10), at(1, 10))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid event: End time must be after start time"
        );

        let mut untitled = make_event(at(1, 9), at(1, 10));
        untitled.title = "  ".to_string();
        assert!(matches!(
            validate(&untitled),
            Err(CalGridError::InvalidEvent(_))
        ));
    }

    #[test]
    fn test_intersects_is_inclusive() {
        let event = make_event(at(1, 9), at(1, 10));
        assert!(intersects(&event, at(1, 10), at(1, 12)));
        assert!(intersects(&event, at(1, 6), at(1, 9)));
        assert!(!intersects(&event, at(1, 11), at(1, 12)));
    }
}
