use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDateTime;

use super::{EventStore, intersects, sort_by_start, validate};
use crate::error::{CalGridError, CalGridResult};
use crate::event::{Event, EventDraft, EventPatch};

/// Events held in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<BTreeMap<String, Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Event>> {
        self.events.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Event>> {
        self.events.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl EventStore for MemoryStore {
    fn list(&self, start: NaiveDateTime, end: NaiveDateTime) -> CalGridResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .read()
            .values()
            .filter(|e| intersects(e, start, end))
            .cloned()
            .collect();
        sort_by_start(&mut events);
        Ok(events)
    }

    fn get(&self, id: &str) -> CalGridResult<Event> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| CalGridError::EventNotFound(id.to_string()))
    }

    fn create(&self, draft: EventDraft) -> CalGridResult<Event> {
        let event = Event::from_draft(draft);
        validate(&event)?;
        self.write().insert(event.id.clone(), event.clone());
        Ok(event)
    }

    fn update(&self, id: &str, patch: EventPatch) -> CalGridResult<Event> {
        let mut events = self.write();
        let current = events
            .get(id)
            .ok_or_else(|| CalGridError::EventNotFound(id.to_string()))?;

        let mut updated = current.clone();
        updated.apply(patch);
        validate(&updated)?;

        events.insert(id.to_string(), updated.clone());
        Ok(updated)
    }

    fn delete(&self, id: &str) -> CalGridResult<()> {
        self.write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CalGridError::EventNotFound(id.to_string()))
    }
}
