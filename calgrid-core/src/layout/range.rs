//! Visible window and grid structure for a reference date and granularity.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Days the client widens a visible range by when fetching events, so events
/// crossing the range edges are part of the snapshot.
pub const FETCH_MARGIN_DAYS: i64 = 7;

/// Calendar view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            other => Err(format!(
                "Unknown view '{}'. Expected day, week or month",
                other
            )),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        };
        write!(f, "{}", label)
    }
}

/// First day of a calendar row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }
}

/// Inclusive window of instants shown by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl VisibleRange {
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Calendar years touched by the range, in order.
    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable millisecond of `date` (23:59:59.999).
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| start_of_day(date))
}

pub fn start_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let today = date.weekday().num_days_from_monday();
    let first = week_start.weekday().num_days_from_monday();
    let offset = (7 + today - first) % 7;
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Inclusive visible window for `reference` at `granularity`.
pub fn visible_range(
    reference: NaiveDate,
    granularity: Granularity,
    week_start: WeekStart,
) -> VisibleRange {
    match granularity {
        Granularity::Day => {
            let start = start_of_day(reference);
            VisibleRange { start, end: start }
        }
        Granularity::Week => {
            let days = week_days(reference, week_start);
            VisibleRange {
                start: start_of_day(days[0]),
                end: end_of_day(days[6]),
            }
        }
        Granularity::Month => VisibleRange {
            start: start_of_day(start_of_month(reference)),
            end: end_of_day(end_of_month(reference)),
        },
    }
}

/// The seven dates of the week containing `reference`.
pub fn week_days(reference: NaiveDate, week_start: WeekStart) -> [NaiveDate; 7] {
    let first = start_of_week(reference, week_start);
    std::array::from_fn(|i| {
        first
            .checked_add_days(Days::new(i as u64))
            .unwrap_or(first)
    })
}

/// Week-start dates of every row of the month grid: from the row holding the
/// 1st through the row holding the month's last day.
pub fn month_rows(reference: NaiveDate, week_start: WeekStart) -> Vec<NaiveDate> {
    let last = end_of_month(reference);
    let mut row = start_of_week(start_of_month(reference), week_start);
    let mut rows = Vec::with_capacity(6);

    while row <= last {
        rows.push(row);
        match row.checked_add_days(Days::new(7)) {
            Some(next) => row = next,
            None => break,
        }
    }

    rows
}

/// Widen a range by [`FETCH_MARGIN_DAYS`] on both sides.
pub fn fetch_window(range: &VisibleRange) -> VisibleRange {
    let margin = Duration::days(FETCH_MARGIN_DAYS);
    VisibleRange {
        start: range.start.checked_sub_signed(margin).unwrap_or(range.start),
        end: range.end.checked_add_signed(margin).unwrap_or(range.end),
    }
}
