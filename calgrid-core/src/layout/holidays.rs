//! Static holiday table and its conversion into full-day pseudo-events.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CalGridError, CalGridResult};
use crate::layout::range::{VisibleRange, end_of_day, start_of_day};
use crate::utils::slugify;

/// Color used for every holiday pseudo-event.
pub const HOLIDAY_COLOR: &str = "#0b8043";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayCategory {
    National,
    Festival,
    Holiday,
}

impl fmt::Display for HolidayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HolidayCategory::National => "national",
            HolidayCategory::Festival => "festival",
            HolidayCategory::Holiday => "holiday",
        };
        write!(f, "{}", label)
    }
}

/// One row of the holiday table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    pub category: HolidayCategory,
}

/// Holidays indexed by year.
#[derive(Debug, Clone, Default)]
pub struct HolidayTable {
    years: BTreeMap<i32, Vec<Holiday>>,
}

#[derive(Deserialize)]
struct HolidayFile {
    #[serde(default, rename = "holiday")]
    holidays: Vec<Holiday>,
}

impl HolidayTable {
    pub fn new(holidays: impl IntoIterator<Item = Holiday>) -> Self {
        let mut years: BTreeMap<i32, Vec<Holiday>> = BTreeMap::new();
        for holiday in holidays {
            years.entry(chrono::Datelike::year(&holiday.date)).or_default().push(holiday);
        }
        HolidayTable { years }
    }

    /// The bundled table: national holidays and major festivals, 2024 to 2027.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_HOLIDAYS.iter().filter_map(|&(y, m, d, name, category)| {
            Some(Holiday {
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                name: name.to_string(),
                category,
            })
        }))
    }

    /// Parse a TOML table of `[[holiday]]` entries with `date`, `name` and `category`.
    pub fn from_toml_str(content: &str) -> CalGridResult<Self> {
        let file: HolidayFile =
            toml::from_str(content).map_err(|e| CalGridError::HolidayTable(e.to_string()))?;
        Ok(Self::new(file.holidays))
    }

    pub fn load(path: &Path) -> CalGridResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CalGridError::HolidayTable(format!("Could not read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Entries for `year` in table order; empty for years the table does not cover.
    pub fn holidays_for_year(&self, year: i32) -> &[Holiday] {
        self.years.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A holiday shaped like an event: full day, never persisted, not interactive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayEvent {
    pub id: String,
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub color: String,
    pub category: HolidayCategory,
}

impl HolidayEvent {
    pub fn from_holiday(holiday: &Holiday) -> Self {
        HolidayEvent {
            id: format!("holiday-{}-{}", holiday.date, slugify(&holiday.name)),
            title: holiday.name.clone(),
            start_time: start_of_day(holiday.date),
            end_time: end_of_day(holiday.date),
            color: HOLIDAY_COLOR.to_string(),
            category: holiday.category,
        }
    }
}

/// Pseudo-events for one year. Nothing is yielded when `visible` is false.
pub fn holiday_events(
    table: &HolidayTable,
    year: i32,
    visible: bool,
) -> impl Iterator<Item = HolidayEvent> + '_ {
    let holidays: &[Holiday] = if visible {
        table.holidays_for_year(year)
    } else {
        &[]
    };
    holidays.iter().map(HolidayEvent::from_holiday)
}

/// Pseudo-events for every year a visible range touches.
pub fn holidays_in_range(
    table: &HolidayTable,
    range: &VisibleRange,
    visible: bool,
) -> Vec<HolidayEvent> {
    range
        .years()
        .flat_map(|year| holiday_events(table, year, visible))
        .collect()
}

use HolidayCategory::{Festival, Holiday as Observance, National};

#[rustfmt::skip]
const BUILTIN_HOLIDAYS: &[(i32, u32, u32, &str, HolidayCategory)] = &[
    (2024, 1, 26, "Republic Day", National),
    (2024, 3, 8, "Holi", Festival),
    (2024, 3, 29, "Good Friday", Observance),
    (2024, 4, 11, "Eid ul-Fitr", Festival),
    (2024, 4, 17, "Ram Navami", Festival),
    (2024, 5, 1, "Labour Day", National),
    (2024, 6, 17, "Eid ul-Adha", Festival),
    (2024, 8, 15, "Independence Day", National),
    (2024, 8, 26, "Janmashtami", Festival),
    (2024, 9, 7, "Ganesh Chaturthi", Festival),
    (2024, 10, 2, "Gandhi Jayanti", National),
    (2024, 10, 12, "Dussehra", Festival),
    (2024, 10, 17, "Karva Chauth", Festival),
    (2024, 10, 31, "Diwali", Festival),
    (2024, 11, 1, "Govardhan Puja", Festival),
    (2024, 11, 2, "Bhai Dooj", Festival),
    (2024, 11, 15, "Guru Nanak Jayanti", Festival),
    (2024, 12, 25, "Christmas", Observance),

    (2025, 1, 26, "Republic Day", National),
    (2025, 3, 14, "Holi", Festival),
    (2025, 4, 18, "Good Friday", Observance),
    (2025, 3, 31, "Eid ul-Fitr", Festival),
    (2025, 4, 6, "Ram Navami", Festival),
    (2025, 5, 1, "Labour Day", National),
    (2025, 6, 7, "Eid ul-Adha", Festival),
    (2025, 8, 15, "Independence Day", National),
    (2025, 8, 15, "Janmashtami", Festival),
    (2025, 8, 27, "Ganesh Chaturthi", Festival),
    (2025, 10, 2, "Gandhi Jayanti", National),
    (2025, 10, 2, "Dussehra", Festival),
    (2025, 10, 19, "Karva Chauth", Festival),
    (2025, 10, 20, "Diwali", Festival),
    (2025, 10, 21, "Govardhan Puja", Festival),
    (2025, 10, 22, "Bhai Dooj", Festival),
    (2025, 11, 5, "Guru Nanak Jayanti", Festival),
    (2025, 12, 25, "Christmas", Observance),

    (2026, 1, 26, "Republic Day", National),
    (2026, 3, 3, "Holi", Festival),
    (2026, 4, 3, "Good Friday", Observance),
    (2026, 3, 20, "Eid ul-Fitr", Festival),
    (2026, 3, 28, "Ram Navami", Festival),
    (2026, 5, 1, "Labour Day", National),
    (2026, 5, 27, "Eid ul-Adha", Festival),
    (2026, 8, 15, "Independence Day", National),
    (2026, 8, 3, "Janmashtami", Festival),
    (2026, 8, 16, "Ganesh Chaturthi", Festival),
    (2026, 10, 2, "Gandhi Jayanti", National),
    (2026, 9, 21, "Dussehra", Festival),
    (2026, 10, 8, "Karva Chauth", Festival),
    (2026, 10, 9, "Diwali", Festival),
    (2026, 10, 10, "Govardhan Puja", Festival),
    (2026, 10, 11, "Bhai Dooj", Festival),
    (2026, 10, 25, "Guru Nanak Jayanti", Festival),
    (2026, 12, 25, "Christmas", Observance),

    (2027, 1, 26, "Republic Day", National),
    (2027, 3, 22, "Holi", Festival),
    (2027, 3, 26, "Good Friday", Observance),
    (2027, 3, 10, "Eid ul-Fitr", Festival),
    (2027, 3, 17, "Ram Navami", Festival),
    (2027, 5, 1, "Labour Day", National),
    (2027, 5, 16, "Eid ul-Adha", Festival),
    (2027, 8, 15, "Independence Day", National),
    (2027, 7, 23, "Janmashtami", Festival),
    (2027, 8, 5, "Ganesh Chaturthi", Festival),
    (2027, 10, 2, "Gandhi Jayanti", National),
    (2027, 10, 10, "Dussehra", Festival),
    (2027, 10, 27, "Karva Chauth", Festival),
    (2027, 10, 28, "Diwali", Festival),
    (2027, 10, 29, "Govardhan Puja", Festival),
    (2027, 10, 30, "Bhai Dooj", Festival),
    (2027, 11, 14, "Guru Nanak Jayanti", Festival),
    (2027, 12, 25, "Christmas", Observance),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::range::{Granularity, WeekStart, visible_range};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_builtin_2025_has_eighteen_entries() {
        let table = HolidayTable::builtin();
        assert_eq!(table.holidays_for_year(2025).len(), 18);
        assert_eq!(holiday_events(&table, 2025, true).count(), 18);
    }

    #[test]
    fn test_hidden_holidays_yield_nothing() {
        let table = HolidayTable::builtin();
        for year in [2023, 2024, 2025, 2030] {
            assert_eq!(holiday_events(&table, year, false).count(), 0);
        }
    }

    #[test]
    fn test_unknown_year_is_empty() {
        let table = HolidayTable::builtin();
        assert!(table.holidays_for_year(1999).is_empty());
        assert_eq!(holiday_events(&table, 1999, true).count(), 0);
    }

    #[test]
    fn test_shared_date_keeps_both_holidays() {
        let table = HolidayTable::builtin();
        let on_day: Vec<HolidayEvent> = holiday_events(&table, 2025, true)
            .filter(|h| h.start_time.date() == date(2025, 8, 15))
            .collect();

        let titles: Vec<&str> = on_day.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["Independence Day", "Janmashtami"]);
        assert_ne!(on_day[0].id, on_day[1].id);

        for holiday in &on_day {
            assert_eq!(holiday.start_time, date(2025, 8, 15).and_hms_opt(0, 0, 0).unwrap());
            assert_eq!(
                holiday.end_time,
                date(2025, 8, 15).and_hms_milli_opt(23, 59, 59, 999).unwrap()
            );
            assert_eq!(holiday.color, HOLIDAY_COLOR);
        }
    }

    #[test]
    fn test_merger_is_restartable() {
        let table = HolidayTable::builtin();
        let first: Vec<_> = holiday_events(&table, 2026, true).collect();
        let second: Vec<_> = holiday_events(&table, 2026, true).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_range_spanning_years_merges_both() {
        let table = HolidayTable::builtin();
        let range = visible_range(date(2025, 12, 31), Granularity::Week, WeekStart::Sunday);
        let holidays = holidays_in_range(&table, &range, true);
        assert_eq!(holidays.len(), 36);
    }

    #[test]
    fn test_from_toml_str() {
        let table = HolidayTable::from_toml_str(
            r#"
            [[holiday]]
            date = "2031-07-04"
            name = "Picnic"
            category = "holiday"

            [[holiday]]
            date = "2031-12-31"
            name = "Year End"
            category = "national"
            "#,
        )
        .unwrap();

        let holidays = table.holidays_for_year(2031);
        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[0].category, HolidayCategory::Holiday);
        assert!(table.holidays_for_year(2025).is_empty());
    }

    #[test]
    fn test_from_toml_str_rejects_bad_category() {
        let result = HolidayTable::from_toml_str(
            "[[holiday]]\ndate = \"2031-07-04\"\nname = \"x\"\ncategory = \"party\"\n",
        );
        assert!(matches!(result, Err(CalGridError::HolidayTable(_))));
    }
}
