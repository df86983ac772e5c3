use anyhow::Result;
use calgrid_core::CalgridConfig;
use calgrid_core::layout::holidays::{HOLIDAY_COLOR, Holiday, HolidayTable};
use chrono::Datelike;
use owo_colors::OwoColorize;

use crate::render::{Render, paint};

pub fn run(config: &CalgridConfig, year: Option<i32>) -> Result<()> {
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    let table = config.holiday_table()?;

    print!("{}", render_year(&table, year));
    Ok(())
}

fn render_year(table: &HolidayTable, year: i32) -> String {
    let holidays = table.holidays_for_year(year);
    if holidays.is_empty() {
        return format!("{}\n", format!("No holidays known for {}", year).dimmed());
    }

    let mut out = format!("{}\n", format!("Holidays {}", year).bold());
    for holiday in holidays {
        out.push_str(&format!("  {}\n", render_holiday(holiday)));
    }
    out
}

fn render_holiday(holiday: &Holiday) -> String {
    format!(
        "{} {} {}",
        holiday.date.format("%a %b %-d").dimmed(),
        paint(&holiday.name, HOLIDAY_COLOR),
        holiday.category.render()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_year() {
        let table = HolidayTable::builtin();
        let out = render_year(&table, 2025);
        assert_eq!(out.lines().count(), 19);
        assert!(out.contains("Independence Day"));
        assert!(out.contains("(national)"));

        assert!(render_year(&table, 1990).contains("No holidays known for 1990"));
    }
}
