//! Event types.
//!
//! `Event` is the persisted record served by the REST API and consumed by the
//! layout engine. All times are local wall-clock times; calgrid performs no
//! time-zone conversion.

use chrono::{NaiveDateTime, SubsecRound};
use serde::{Deserialize, Deserializer, Serialize};

/// Color applied when a draft does not pick one (the "Blue" palette entry).
pub const DEFAULT_EVENT_COLOR: &str = "#1a73e8";

/// Named colors offered by clients when creating or editing events.
pub const EVENT_COLORS: [(&str, &str); 8] = [
    ("Blue", "#1a73e8"),
    ("Green", "#0b8043"),
    ("Purple", "#8e24aa"),
    ("Red", "#d32f2f"),
    ("Orange", "#f57c00"),
    ("Pink", "#e91e63"),
    ("Teal", "#00796b"),
    ("Gray", "#5f6368"),
];

/// A calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Event {
    /// Build an event from a draft, assigning a fresh id.
    pub fn from_draft(draft: EventDraft) -> Self {
        Event {
            id: uuid::Uuid::new_v4().to_string(),
            title: draft.title.trim().to_string(),
            description: non_blank(draft.description),
            start_time: draft.start_time.trunc_subsecs(0),
            end_time: draft.end_time.trunc_subsecs(0),
            color: draft
                .color
                .and_then(|c| non_blank(Some(c)))
                .unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
            location: non_blank(draft.location),
        }
    }

    /// Apply a partial update in place. Validation happens at the store boundary.
    ///
    /// Times are kept to whole seconds, the precision .ics files store.
    pub fn apply(&mut self, patch: EventPatch) {
        if let Some(title) = patch.title.and_then(|t| non_blank(Some(t))) {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = non_blank(description);
        }
        if let Some(start) = patch.start_time {
            self.start_time = start.trunc_subsecs(0);
        }
        if let Some(end) = patch.end_time {
            self.end_time = end.trunc_subsecs(0);
        }
        if let Some(color) = patch.color.and_then(|c| non_blank(Some(c))) {
            self.color = color;
        }
        if let Some(location) = patch.location {
            self.location = non_blank(location);
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Input for creating an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Partial update for an event.
///
/// `description` and `location` distinguish a missing field (`None`, keep the
/// current value) from an explicit `null` (`Some(None)`, clear it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Option<String>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }
}

/// Resolve a palette name ("teal") or pass a hex value ("#00796b") through.
pub fn color_by_name(input: &str) -> Option<String> {
    let input = input.trim();
    if let Some((_, hex)) = EVENT_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(input))
    {
        return Some(hex.to_string());
    }

    let hex = input.strip_prefix('#')?;
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("#{}", hex.to_ascii_lowercase()))
    } else {
        None
    }
}

/// Palette name for a hex color, if it is one of the named colors.
pub fn color_name(hex: &str) -> Option<&'static str> {
    EVENT_COLORS
        .iter()
        .find(|(_, value)| value.eq_ignore_ascii_case(hex))
        .map(|(name, _)| *name)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn make_draft() -> EventDraft {
        EventDraft {
            title: "  Standup ".to_string(),
            description: Some("   ".to_string()),
            start_time: at(9, 30),
            end_time: at(10, 0),
            color: None,
            location: Some("Room 4".to_string()),
        }
    }

    #[test]
    fn test_from_draft_normalizes_fields() {
        let event = Event::from_draft(make_draft());
        assert_eq!(event.title, "Standup");
        assert_eq!(event.description, None);
        assert_eq!(event.color, DEFAULT_EVENT_COLOR);
        assert_eq!(event.location.as_deref(), Some("Room 4"));
        assert!(!event.id.is_empty());
    }

    #[test]
    fn test_times_truncate_to_whole_seconds() {
        let mut draft = make_draft();
        draft.start_time += chrono::Duration::milliseconds(250);
        let mut event = Event::from_draft(draft.clone());
        assert_eq!(event.start_time, draft.start_time.with_nanosecond(0).unwrap());

        event.apply(EventPatch {
            end_time: Some(draft.end_time + chrono::Duration::microseconds(999_999)),
            ..Default::default()
        });
        assert_eq!(event.end_time, draft.end_time);
    }

    #[test]
    fn test_event_json_uses_camel_case() {
        let event = Event::from_draft(make_draft());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["startTime"], "2025-06-01T09:30:00");
        assert_eq!(json["endTime"], "2025-06-01T10:00:00");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_patch_distinguishes_null_from_missing() {
        let patch: EventPatch = serde_json::from_str(r#"{"location": null}"#).unwrap();
        assert_eq!(patch.location, Some(None));
        assert_eq!(patch.description, None);

        let mut event = Event::from_draft(make_draft());
        event.apply(patch);
        assert_eq!(event.location, None);
    }

    #[test]
    fn test_patch_ignores_blank_title() {
        let mut event = Event::from_draft(make_draft());
        event.apply(EventPatch {
            title: Some(" ".to_string()),
            ..Default::default()
        });
        assert_eq!(event.title, "Standup");
    }

    #[test]
    fn test_color_by_name() {
        assert_eq!(color_by_name("teal").as_deref(), Some("#00796b"));
        assert_eq!(color_by_name("#ABCDEF").as_deref(), Some("#abcdef"));
        assert_eq!(color_by_name("chartreuse"), None);
        assert_eq!(color_by_name("#12345"), None);
        assert_eq!(color_name("#0B8043"), Some("Green"));
    }
}
