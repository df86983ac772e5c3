//! Events as .ics files in a directory, one file per event.
//!
//! Filenames are human-readable: `2025-03-20T1500__dentist.ics`, with `-2`,
//! `-3` suffixes when two events would share a name. A file is renamed when
//! its event's start time or title changes.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use super::{EventStore, intersects, sort_by_start, validate};
use crate::error::{CalGridError, CalGridResult};
use crate::event::{Event, EventDraft, EventPatch};
use crate::ics;
use crate::utils::slugify;

const MAX_COLLISION_SUFFIX: u32 = 100;

pub struct DirStore {
    dir: PathBuf,
    // Serialises filename allocation between concurrent writers
    write_lock: Mutex<()>,
}

impl DirStore {
    /// Open the store at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> CalGridResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(DirStore {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every parseable event file. Unparseable .ics files are skipped.
    fn entries(&self) -> CalGridResult<Vec<(PathBuf, Event)>> {
        let mut events = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();

            if path.extension().map(|e| e == "ics").unwrap_or(false)
                && let Ok(content) = std::fs::read_to_string(&path)
            {
                match ics::parse_event(&content) {
                    Some(event) => events.push((path, event)),
                    None => warn!(path = %path.display(), "skipping unparseable event file"),
                }
            }
        }

        Ok(events)
    }

    fn find(&self, id: &str) -> CalGridResult<(PathBuf, Event)> {
        self.entries()?
            .into_iter()
            .find(|(_, event)| event.id == id)
            .ok_or_else(|| CalGridError::EventNotFound(id.to_string()))
    }

    fn write_event(&self, event: &Event) -> CalGridResult<PathBuf> {
        let content = ics::generate_ics(event)?;
        let filename = unique_filename(&base_filename(event), &self.dir, &event.id)?;
        let path = self.dir.join(filename);

        std::fs::write(&path, content)?;
        Ok(path)
    }
}

impl EventStore for DirStore {
    fn list(&self, start: NaiveDateTime, end: NaiveDateTime) -> CalGridResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .entries()?
            .into_iter()
            .map(|(_, event)| event)
            .filter(|event| intersects(event, start, end))
            .collect();
        sort_by_start(&mut events);
        Ok(events)
    }

    fn get(&self, id: &str) -> CalGridResult<Event> {
        self.find(id).map(|(_, event)| event)
    }

    fn create(&self, draft: EventDraft) -> CalGridResult<Event> {
        let event = Event::from_draft(draft);
        validate(&event)?;

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let path = self.write_event(&event)?;
        debug!(id = %event.id, path = %path.display(), "created event");

        Ok(event)
    }

    fn update(&self, id: &str, patch: EventPatch) -> CalGridResult<Event> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let (old_path, mut event) = self.find(id)?;

        event.apply(patch);
        validate(&event)?;

        // The old file may be reused when the name did not change
        let new_path = self.write_event(&event)?;
        if new_path != old_path {
            std::fs::remove_file(&old_path)?;
            debug!(id, from = %old_path.display(), to = %new_path.display(), "renamed event file");
        }

        Ok(event)
    }

    fn delete(&self, id: &str) -> CalGridResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let (path, _) = self.find(id)?;
        std::fs::remove_file(&path)?;
        debug!(id, path = %path.display(), "deleted event");
        Ok(())
    }
}

/// Filename for an event, without collision suffix.
pub fn base_filename(event: &Event) -> String {
    let slug = slugify(&event.title);
    let slug = if slug.is_empty() { "event".to_string() } else { slug };
    format!("{}__{}.ics", event.start_time.format("%Y-%m-%dT%H%M"), slug)
}

/// Pick `base_filename` or the first free `-N` variant. A file already holding
/// the same event id counts as free.
fn unique_filename(base_filename: &str, dir: &Path, own_id: &str) -> CalGridResult<String> {
    let base = base_filename.trim_end_matches(".ics");

    let candidates = std::iter::once(base_filename.to_string())
        .chain((2..=MAX_COLLISION_SUFFIX).map(|n| format!("{}-{}.ics", base, n)));

    for candidate in candidates {
        let path = dir.join(&candidate);
        if !path.exists() || holds_event(&path, own_id) {
            return Ok(candidate);
        }
    }

    Err(CalGridError::Io(std::io::Error::other(format!(
        "Too many filename collisions for {}",
        base_filename
    ))))
}

fn holds_event(path: &Path, id: &str) -> bool {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| ics::parse_event(&content))
        .is_some_and(|event| event.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn draft(title: &str, start: NaiveDateTime, end: NaiveDateTime) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            description: None,
            start_time: start,
            end_time: end,
            color: None,
            location: None,
        }
    }

    fn filenames(store: &DirStore) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("events");
        let store = DirStore::open(&dir).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_create_writes_named_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirStore::open(tmp.path()).unwrap();

        let event = store
            .create(draft("Dentist: check-up", at(20, 15, 0), at(20, 16, 0)))
            .unwrap();
        assert_eq!(filenames(&store), vec!["2025-03-20T1500__dentist-check-up.ics"]);
        assert_eq!(store.get(&event.id).unwrap(), event);
    }

    #[test]
    fn test_subsecond_times_are_stored_as_whole_seconds() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirStore::open(tmp.path()).unwrap();
        let nine = at(20, 9, 0);

        // Both ends fall inside the same second
        let err = store
            .create(draft(
                "Blink",
                nine + chrono::Duration::milliseconds(200),
                nine + chrono::Duration::milliseconds(700),
            ))
            .unwrap_err();
        assert!(matches!(err, CalGridError::InvalidEvent(_)));
        assert!(filenames(&store).is_empty());

        let created = store
            .create(draft(
                "Blink",
                nine + chrono::Duration::milliseconds(200),
                nine + chrono::Duration::milliseconds(1_700),
            ))
            .unwrap();
        assert_eq!(created.start_time, nine);
        assert_eq!(created.end_time, nine + chrono::Duration::seconds(1));

        let fetched = store.get(&created.id).unwrap();
        assert_eq!(fetched, created);
        assert!(fetched.start_time < fetched.end_time);

        let err = store
            .update(
                &created.id,
                EventPatch {
                    end_time: Some(nine + chrono::Duration::milliseconds(900)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CalGridError::InvalidEvent(_)));
        assert_eq!(store.get(&created.id).unwrap(), created);
    }

    #[test]
    fn test_collisions_get_numeric_suffixes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirStore::open(tmp.path()).unwrap();

        for _ in 0..3 {
            store
                .create(draft("Standup", at(3, 9, 0), at(3, 9, 15)))
                .unwrap();
        }

        assert_eq!(
            filenames(&store),
            vec![
                "2025-03-03T0900__standup-2.ics",
                "2025-03-03T0900__standup-3.ics",
                "2025-03-03T0900__standup.ics",
            ]
        );
        assert_eq!(store.list(at(3, 0, 0), at(3, 23, 0)).unwrap().len(), 3);
    }

    #[test]
    fn test_update_renames_file_when_title_changes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirStore::open(tmp.path()).unwrap();
        let event = store
            .create(draft("Lunch", at(5, 12, 0), at(5, 13, 0)))
            .unwrap();

        let patch = EventPatch {
            title: Some("Team lunch".to_string()),
            ..Default::default()
        };
        let updated = store.update(&event.id, patch).unwrap();
        assert_eq!(updated.title, "Team lunch");
        assert_eq!(filenames(&store), vec!["2025-03-05T1200__team-lunch.ics"]);

        // Same name: the file is rewritten in place
        let patch = EventPatch {
            color: Some("#00796b".to_string()),
            ..Default::default()
        };
        store.update(&event.id, patch).unwrap();
        assert_eq!(filenames(&store), vec!["2025-03-05T1200__team-lunch.ics"]);
        assert_eq!(store.get(&event.id).unwrap().color, "#00796b");
    }

    #[test]
    fn test_invalid_update_leaves_file_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirStore::open(tmp.path()).unwrap();
        let event = store
            .create(draft("Lunch", at(5, 12, 0), at(5, 13, 0)))
            .unwrap();

        let patch = EventPatch {
            start_time: Some(at(5, 14, 0)),
            ..Default::default()
        };
        assert!(matches!(
            store.update(&event.id, patch),
            Err(CalGridError::InvalidEvent(_))
        ));
        assert_eq!(store.get(&event.id).unwrap(), event);
    }

    #[test]
    fn test_delete_and_missing_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirStore::open(tmp.path()).unwrap();
        let event = store
            .create(draft("Lunch", at(5, 12, 0), at(5, 13, 0)))
            .unwrap();

        store.delete(&event.id).unwrap();
        assert!(filenames(&store).is_empty());
        assert!(matches!(
            store.delete(&event.id),
            Err(CalGridError::EventNotFound(_))
        ));
        assert!(matches!(
            store.update("nope", EventPatch::default()),
            Err(CalGridError::EventNotFound(_))
        ));
    }

    #[test]
    fn test_list_skips_foreign_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirStore::open(tmp.path()).unwrap();
        store
            .create(draft("Lunch", at(5, 12, 0), at(5, 13, 0)))
            .unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "hello").unwrap();
        std::fs::write(tmp.path().join("broken.ics"), "BEGIN:VCALENDAR").unwrap();

        let events = store.list(at(1, 0, 0), at(31, 0, 0)).unwrap();
        assert_eq!(events.len(), 1);
    }
}
