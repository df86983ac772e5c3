//! Temporal layout engine.
//!
//! One render pass turns a [`ViewState`] plus an immutable events snapshot into a
//! [`Projection`]: Range -> Holiday merge -> Filter -> Slot layout. Everything
//! here is pure and synchronous except the [`indicator`] ticker.

pub mod filter;
pub mod holidays;
pub mod indicator;
pub mod navigation;
pub mod range;
pub mod slot;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::event::Event;

pub use filter::{Bucket, day_entries, filter, origin_hour_entries, overlaps};
pub use holidays::{
    Holiday, HolidayCategory, HolidayEvent, HolidayTable, holiday_events, holidays_in_range,
};
pub use indicator::{IndicatorState, IndicatorTicker, REFRESH_INTERVAL};
pub use navigation::NavigationState;
pub use range::{
    Granularity, VisibleRange, WeekStart, fetch_window, month_rows, visible_range, week_days,
};
pub use slot::{
    DayCell, DayColumn, HourSlot, Placement, SlotPosition, layout_day_column, layout_month_cell,
    slot_position,
};

/// A stored event or a holiday pseudo-event, borrowed for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<'a> {
    Event(&'a Event),
    Holiday(&'a HolidayEvent),
}

impl<'a> Entry<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            Entry::Event(e) => &e.id,
            Entry::Holiday(h) => &h.id,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            Entry::Event(e) => &e.title,
            Entry::Holiday(h) => &h.title,
        }
    }

    pub fn start_time(&self) -> NaiveDateTime {
        match self {
            Entry::Event(e) => e.start_time,
            Entry::Holiday(h) => h.start_time,
        }
    }

    pub fn end_time(&self) -> NaiveDateTime {
        match self {
            Entry::Event(e) => e.end_time,
            Entry::Holiday(h) => h.end_time,
        }
    }

    pub fn color(&self) -> &'a str {
        match self {
            Entry::Event(e) => &e.color,
            Entry::Holiday(h) => &h.color,
        }
    }

    pub fn location(&self) -> Option<&'a str> {
        match self {
            Entry::Event(e) => e.location.as_deref(),
            Entry::Holiday(_) => None,
        }
    }

    /// Holidays are display-only: never editable, never placed in hour slots.
    pub fn is_holiday(&self) -> bool {
        matches!(self, Entry::Holiday(_))
    }

    pub fn as_event(&self) -> Option<&'a Event> {
        match self {
            Entry::Event(e) => Some(e),
            Entry::Holiday(_) => None,
        }
    }
}

/// Stored events followed by holidays, as one list of entries.
pub fn entries<'a>(events: &'a [Event], holidays: &'a [HolidayEvent]) -> Vec<Entry<'a>> {
    events
        .iter()
        .map(Entry::Event)
        .chain(holidays.iter().map(Entry::Holiday))
        .collect()
}

/// Everything a render pass needs to know about what the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub navigation: NavigationState,
    pub show_holidays: bool,
    pub week_start: WeekStart,
}

impl ViewState {
    pub fn new(navigation: NavigationState) -> Self {
        ViewState {
            navigation,
            show_holidays: true,
            week_start: WeekStart::default(),
        }
    }

    pub fn range(&self) -> VisibleRange {
        self.navigation.range(self.week_start)
    }

    /// Dates drawn by the grid. For months this includes the leading and
    /// trailing days of neighbouring months.
    pub fn grid_dates(&self) -> Vec<NaiveDate> {
        let reference = self.navigation.reference_date;
        match self.navigation.granularity {
            Granularity::Day => vec![reference],
            Granularity::Week => week_days(reference, self.week_start).to_vec(),
            Granularity::Month => month_rows(reference, self.week_start)
                .into_iter()
                .flat_map(|row| week_days(row, self.week_start))
                .collect(),
        }
    }

    /// Days with hour slots, i.e. the days the live indicator can appear on.
    pub fn timed_days(&self) -> Vec<NaiveDate> {
        match self.navigation.granularity {
            Granularity::Month => Vec::new(),
            _ => self.grid_dates(),
        }
    }

    /// Range covering every drawn date, from the first midnight to the last 23:59:59.999.
    pub fn grid_span(&self) -> VisibleRange {
        let dates = self.grid_dates();
        match (dates.first(), dates.last()) {
            (Some(first), Some(last)) => VisibleRange {
                start: range::start_of_day(*first),
                end: range::end_of_day(*last),
            },
            _ => self.range(),
        }
    }

    /// Window of events to request from the store for this view.
    pub fn fetch_range(&self) -> VisibleRange {
        fetch_window(&self.grid_span())
    }

    /// Holiday pseudo-events for every drawn date, honouring `show_holidays`.
    pub fn holidays(&self, table: &HolidayTable) -> Vec<HolidayEvent> {
        holidays_in_range(table, &self.grid_span(), self.show_holidays)
    }
}

#[derive(Debug, Clone)]
pub struct MonthGrid<'a> {
    /// First day of the month shown.
    pub month: NaiveDate,
    /// Calendar weeks, seven cells each.
    pub rows: Vec<Vec<DayCell<'a>>>,
}

#[derive(Debug, Clone)]
pub struct WeekGrid<'a> {
    pub columns: Vec<DayColumn<'a>>,
}

#[derive(Debug, Clone)]
pub enum Grid<'a> {
    Month(MonthGrid<'a>),
    Week(WeekGrid<'a>),
    Day(DayColumn<'a>),
}

/// Read-only result of one render pass.
#[derive(Debug, Clone)]
pub struct Projection<'a> {
    pub range: VisibleRange,
    pub title: String,
    pub grid: Grid<'a>,
}

/// Lay out `events` and `holidays` for `view`. `today` only drives highlighting.
pub fn project<'a>(
    view: &ViewState,
    events: &'a [Event],
    holidays: &'a [HolidayEvent],
    today: NaiveDate,
) -> Projection<'a> {
    let entries = entries(events, holidays);
    let reference = view.navigation.reference_date;

    let grid = match view.navigation.granularity {
        Granularity::Month => {
            let month = range::start_of_month(reference);
            let rows = month_rows(reference, view.week_start)
                .into_iter()
                .map(|row| {
                    week_days(row, view.week_start)
                        .iter()
                        .map(|&date| layout_month_cell(date, month, &entries, today))
                        .collect()
                })
                .collect();
            Grid::Month(MonthGrid { month, rows })
        }
        Granularity::Week => Grid::Week(WeekGrid {
            columns: week_days(reference, view.week_start)
                .iter()
                .map(|&date| layout_day_column(date, &entries, today))
                .collect(),
        }),
        Granularity::Day => Grid::Day(layout_day_column(reference, &entries, today)),
    };

    Projection {
        range: view.range(),
        title: view.navigation.title(view.week_start),
        grid,
    }
}
