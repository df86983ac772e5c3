//! Half-open overlap filtering of entries against day and hour buckets.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::layout::Entry;
use crate::layout::range::start_of_day;

/// A half-open window `[start, end)` entries are tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Bucket {
    /// Local midnight to the following midnight.
    pub fn day(date: NaiveDate) -> Self {
        let start = start_of_day(date);
        Bucket {
            start,
            end: start + Duration::days(1),
        }
    }

    /// `hh:00` to `hh+1:00`. Hours past 23 are clamped to 23.
    pub fn hour(date: NaiveDate, hour: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
        let start = date.and_time(time);
        Bucket {
            start,
            end: start + Duration::hours(1),
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// `[start, end)` overlaps the bucket.
pub fn overlaps(start: NaiveDateTime, end: NaiveDateTime, bucket: &Bucket) -> bool {
    start < bucket.end && end > bucket.start
}

/// Entries overlapping `bucket`, in input order.
pub fn filter<'a>(entries: &[Entry<'a>], bucket: &Bucket) -> Vec<Entry<'a>> {
    entries
        .iter()
        .copied()
        .filter(|entry| overlaps(entry.start_time(), entry.end_time(), bucket))
        .collect()
}

/// Entries shown on `date`: those overlapping the day, plus those starting on it.
///
/// The second clause keeps zero-length and inverted entries, which overlap nothing.
pub fn day_entries<'a>(entries: &[Entry<'a>], date: NaiveDate) -> Vec<Entry<'a>> {
    let bucket = Bucket::day(date);
    entries
        .iter()
        .copied()
        .filter(|entry| {
            overlaps(entry.start_time(), entry.end_time(), &bucket)
                || bucket.contains(entry.start_time())
        })
        .collect()
}

/// Entries that render in the `hour` slot of `date`.
///
/// An entry renders only in the slot holding its start; later slots it merely
/// overlaps never repeat it. The end time plays no part, so malformed entries
/// still get their one slot.
pub fn origin_hour_entries<'a>(entries: &[Entry<'a>], date: NaiveDate, hour: u32) -> Vec<Entry<'a>> {
    let bucket = Bucket::hour(date, hour);
    entries
        .iter()
        .copied()
        .filter(|entry| bucket.contains(entry.start_time()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn make_event(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            start_time: start,
            end_time: end,
            color: "#1a73e8".to_string(),
            location: None,
        }
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        date(d).and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_overlap_is_half_open() {
        let bucket = Bucket::hour(date(1), 9);
        // Ends exactly when the bucket starts
        assert!(!overlaps(at(1, 8, 0), at(1, 9, 0), &bucket));
        // Starts exactly when the bucket ends
        assert!(!overlaps(at(1, 10, 0), at(1, 11, 0), &bucket));
        assert!(overlaps(at(1, 8, 30), at(1, 9, 1), &bucket));
        assert!(overlaps(at(1, 9, 59), at(1, 12, 0), &bucket));
    }

    #[test]
    fn test_day_filter_includes_multi_day_events() {
        let events = vec![
            make_event("overnight", at(1, 22, 0), at(2, 2, 0)),
            make_event("next", at(2, 9, 0), at(2, 10, 0)),
            make_event("other", at(3, 9, 0), at(3, 10, 0)),
        ];
        let entries: Vec<Entry> = events.iter().map(Entry::Event).collect();

        let ids: Vec<&str> = filter(&entries, &Bucket::day(date(2)))
            .iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(ids, vec!["overnight", "next"]);
    }

    #[test]
    fn test_event_renders_only_in_its_origin_hour() {
        let events = vec![make_event("long", at(1, 9, 30), at(1, 12, 15))];
        let entries: Vec<Entry> = events.iter().map(Entry::Event).collect();

        let hours: Vec<u32> = (0..24)
            .filter(|&h| !origin_hour_entries(&entries, date(1), h).is_empty())
            .collect();
        assert_eq!(hours, vec![9]);

        // It still overlaps the later hours
        assert_eq!(filter(&entries, &Bucket::hour(date(1), 11)).len(), 1);
    }

    #[test]
    fn test_event_starting_on_previous_day_has_no_origin_slot() {
        let events = vec![make_event("overnight", at(1, 23, 0), at(2, 1, 0))];
        let entries: Vec<Entry> = events.iter().map(Entry::Event).collect();

        for hour in 0..24 {
            assert!(origin_hour_entries(&entries, date(2), hour).is_empty());
        }
        assert_eq!(origin_hour_entries(&entries, date(1), 23).len(), 1);
    }

    #[test]
    fn test_malformed_events_keep_their_origin_slot() {
        let events = vec![
            make_event("zero", at(1, 9, 0), at(1, 9, 0)),
            make_event("inverted", at(1, 10, 30), at(1, 10, 0)),
            make_event("midnight", at(1, 0, 0), at(1, 0, 0)),
        ];
        let entries: Vec<Entry> = events.iter().map(Entry::Event).collect();

        assert_eq!(origin_hour_entries(&entries, date(1), 9).len(), 1);
        assert_eq!(origin_hour_entries(&entries, date(1), 10).len(), 1);
        assert_eq!(origin_hour_entries(&entries, date(1), 0).len(), 1);

        // The midnight one overlaps no day, yet still belongs to its start day
        assert_eq!(filter(&entries, &Bucket::day(date(1))).len(), 2);
        assert_eq!(day_entries(&entries, date(1)).len(), 3);
        assert!(day_entries(&entries, date(2)).is_empty());
    }

    #[test]
    fn test_hour_bucket_at_end_of_day_crosses_midnight() {
        let bucket = Bucket::hour(date(1), 23);
        assert_eq!(bucket.end, at(2, 0, 0));
    }
}
