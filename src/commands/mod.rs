pub mod delete;
pub mod edit;
pub mod events;
pub mod holidays;
pub mod new;
pub mod show;
pub mod watch;

use anyhow::{Context, Result};
use calgrid_core::CalgridConfig;
use calgrid_core::clock::Clock;
use calgrid_core::layout::{Granularity, NavigationState, ViewState};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;

/// Flags shared by `show` and `watch`
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// month, week or day
    #[arg(long)]
    pub view: Option<Granularity>,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,

    /// Move this many months/weeks/days from the reference date
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i32,

    /// Hide holidays
    #[arg(long)]
    pub no_holidays: bool,
}

impl ViewArgs {
    pub fn view_state(
        &self,
        config: &CalgridConfig,
        clock: &dyn Clock,
        default_view: Granularity,
    ) -> Result<ViewState> {
        let mut navigation =
            NavigationState::new(clock.today(), self.view.unwrap_or(default_view));

        if let Some(date) = &self.date {
            navigation.set_reference_date(parse_date(date)?);
        }
        navigation.shift(self.offset);

        Ok(ViewState {
            navigation,
            show_holidays: config.show_holidays && !self.no_holidays,
            week_start: config.week_start,
        })
    }
}

/// A date or date-time typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl DateInput {
    /// The instant, with bare dates at `default_time`.
    pub fn at(self, default_time: NaiveTime) -> NaiveDateTime {
        match self {
            DateInput::Date(d) => d.and_time(default_time),
            DateInput::DateTime(dt) => dt,
        }
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Expected YYYY-MM-DD", input))
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS]` (a space works instead of `T`).
pub fn parse_date_input(input: &str) -> Result<DateInput> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(DateInput::Date(date));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(DateInput::DateTime)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid date/time '{}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM",
                input
            )
        })
}

/// Parse an end time: a full date/time, or `HH:MM` on `day`.
pub fn parse_end(input: &str, day: NaiveDate) -> Result<NaiveDateTime> {
    if let Ok(time) = NaiveTime::parse_from_str(input.trim(), "%H:%M") {
        return Ok(day.and_time(time));
    }
    match parse_date_input(input)? {
        DateInput::DateTime(dt) => Ok(dt),
        DateInput::Date(d) => anyhow::bail!(
            "End '{}' needs a time, e.g. {}T17:00",
            input,
            d.format("%Y-%m-%d")
        ),
    }
}
