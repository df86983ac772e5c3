use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::layout::range::{Granularity, VisibleRange, WeekStart, visible_range, week_days};

/// Reference date plus active granularity. Only explicit navigation changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub reference_date: NaiveDate,
    pub granularity: Granularity,
}

impl NavigationState {
    pub fn new(reference_date: NaiveDate, granularity: Granularity) -> Self {
        NavigationState {
            reference_date,
            granularity,
        }
    }

    pub fn go_to_today(&mut self, clock: &dyn Clock) {
        self.reference_date = clock.today();
    }

    /// Advance one unit. Months keep the day of month, clamped to the target
    /// month's length (Jan 31 -> Feb 28).
    pub fn go_to_next(&mut self) {
        self.reference_date = step(self.reference_date, self.granularity, true);
    }

    pub fn go_to_previous(&mut self) {
        self.reference_date = step(self.reference_date, self.granularity, false);
    }

    /// Apply `go_to_next` (positive) or `go_to_previous` (negative) `|n|` times.
    pub fn shift(&mut self, n: i32) {
        for _ in 0..n.unsigned_abs() {
            if n > 0 {
                self.go_to_next();
            } else {
                self.go_to_previous();
            }
        }
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    pub fn set_reference_date(&mut self, date: NaiveDate) {
        self.reference_date = date;
    }

    pub fn range(&self, week_start: WeekStart) -> VisibleRange {
        visible_range(self.reference_date, self.granularity, week_start)
    }

    /// Header label: `June 2025`, `Jun 1 - Jun 7, 2025` or `Sunday, June 1, 2025`.
    pub fn title(&self, week_start: WeekStart) -> String {
        match self.granularity {
            Granularity::Month => self.reference_date.format("%B %Y").to_string(),
            Granularity::Week => {
                let days = week_days(self.reference_date, week_start);
                format!(
                    "{} - {}",
                    days[0].format("%b %-d"),
                    days[6].format("%b %-d, %Y")
                )
            }
            Granularity::Day => self.reference_date.format("%A, %B %-d, %Y").to_string(),
        }
    }
}

fn step(date: NaiveDate, granularity: Granularity, forward: bool) -> NaiveDate {
    let moved = match (granularity, forward) {
        (Granularity::Month, true) => date.checked_add_months(Months::new(1)),
        (Granularity::Month, false) => date.checked_sub_months(Months::new(1)),
        (Granularity::Week, true) => date.checked_add_days(Days::new(7)),
        (Granularity::Week, false) => date.checked_sub_days(Days::new(7)),
        (Granularity::Day, true) => date.succ_opt(),
        (Granularity::Day, false) => date.pred_opt(),
    };
    moved.unwrap_or(date)
}
