//! Positioning of entries inside hour slots (day/week) and day cells (month).
//!
//! # Invariants
//! - `top_fraction` is in `[0, 1)` of one hour slot.
//! - `height_fraction` is never below [`MIN_HEIGHT_FRACTION`] and is never
//!   clipped above 1: multi-hour entries overflow into the following slots.
//! - Holidays never occupy hour slots; they live in the day's header strip.
//!   In month cells they are ranked together with real events.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::layout::Entry;
use crate::layout::filter::{day_entries, origin_hour_entries};

/// Smallest rendered height, in hour slots (1/16 of an hour).
pub const MIN_HEIGHT_FRACTION: f64 = 0.0625;

/// Entries drawn in full inside one month-view day cell.
pub const MONTH_CELL_CAPACITY: usize = 3;

pub const HOURS_PER_DAY: u32 = 24;

/// Offset and height relative to one hour slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotPosition {
    pub top_fraction: f64,
    pub height_fraction: f64,
}

impl SlotPosition {
    pub fn top_minutes(&self) -> f64 {
        self.top_fraction * 60.0
    }

    pub fn height_minutes(&self) -> f64 {
        self.height_fraction * 60.0
    }
}

/// Position of an entry inside the hour slot holding `start`.
///
/// Equal or inverted times collapse to the minimum height.
pub fn slot_position(start: NaiveDateTime, end: NaiveDateTime) -> SlotPosition {
    let minutes_into_hour = f64::from(start.minute()) + f64::from(start.second()) / 60.0;
    let duration_minutes = (end - start).num_milliseconds() as f64 / 60_000.0;

    SlotPosition {
        top_fraction: minutes_into_hour / 60.0,
        height_fraction: (duration_minutes / 60.0).max(MIN_HEIGHT_FRACTION),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub entry: Entry<'a>,
    pub position: SlotPosition,
}

#[derive(Debug, Clone)]
pub struct HourSlot<'a> {
    pub hour: u32,
    pub placements: Vec<Placement<'a>>,
}

/// One day of a day or week grid.
#[derive(Debug, Clone)]
pub struct DayColumn<'a> {
    pub date: NaiveDate,
    pub is_today: bool,
    /// Holidays for the header strip.
    pub holidays: Vec<Entry<'a>>,
    /// Always [`HOURS_PER_DAY`] slots, hour 0 first.
    pub slots: Vec<HourSlot<'a>>,
}

impl DayColumn<'_> {
    pub fn placement_count(&self) -> usize {
        self.slots.iter().map(|s| s.placements.len()).sum()
    }
}

pub fn layout_day_column<'a>(date: NaiveDate, entries: &[Entry<'a>], today: NaiveDate) -> DayColumn<'a> {
    let (holidays, events): (Vec<Entry<'a>>, Vec<Entry<'a>>) = day_entries(entries, date)
        .into_iter()
        .partition(|entry| entry.is_holiday());

    let slots = (0..HOURS_PER_DAY)
        .map(|hour| HourSlot {
            hour,
            placements: origin_hour_entries(&events, date, hour)
                .into_iter()
                .map(|entry| Placement {
                    entry,
                    position: slot_position(entry.start_time(), entry.end_time()),
                })
                .collect(),
        })
        .collect();

    DayColumn {
        date,
        is_today: date == today,
        holidays,
        slots,
    }
}

/// One day of the month grid.
#[derive(Debug, Clone)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// Whether the date belongs to the month being shown (leading/trailing days don't).
    pub in_month: bool,
    pub is_today: bool,
    /// At most [`MONTH_CELL_CAPACITY`] entries, in draw order.
    pub visible: Vec<Entry<'a>>,
    /// Entries collapsed into the "+N more" indicator.
    pub overflow: usize,
}

impl DayCell<'_> {
    pub fn overflow_label(&self) -> Option<String> {
        (self.overflow > 0).then(|| format!("+{} more", self.overflow))
    }

    pub fn total(&self) -> usize {
        self.visible.len() + self.overflow
    }
}

/// Sort entries into month-cell draw order: start ascending, holidays first on ties.
pub fn rank_entries(entries: &mut [Entry<'_>]) {
    entries.sort_by(|a, b| {
        a.start_time()
            .cmp(&b.start_time())
            .then_with(|| b.is_holiday().cmp(&a.is_holiday()))
    });
}

pub fn layout_month_cell<'a>(
    date: NaiveDate,
    month: NaiveDate,
    entries: &[Entry<'a>],
    today: NaiveDate,
) -> DayCell<'a> {
    let mut ranked = day_entries(entries, date);
    rank_entries(&mut ranked);

    let overflow = ranked.len().saturating_sub(MONTH_CELL_CAPACITY);
    ranked.truncate(MONTH_CELL_CAPACITY);

    DayCell {
        date,
        in_month: date.year() == month.year() && date.month() == month.month(),
        is_today: date == today,
        visible: ranked,
        overflow,
    }
}
