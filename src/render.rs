//! Terminal rendering for calgrid.
//!
//! Grids are drawn from a `Projection` only; nothing here filters or positions
//! events itself. Event colors are the events' own hex values, drawn as
//! truecolor with owo_colors.

use calgrid_core::Event;
use calgrid_core::layout::{
    DayCell, DayColumn, Entry, Grid, HolidayCategory, IndicatorState, MonthGrid, Projection,
    WeekGrid, slot::MONTH_CELL_CAPACITY,
};
use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

const MONTH_CELL_WIDTH: usize = 14;
const MONTH_CELL_LINES: usize = MONTH_CELL_CAPACITY + 2;
const WEEK_COLUMN_WIDTH: usize = 14;
const GUTTER_WIDTH: usize = 6;

impl Render for Event {
    fn render(&self) -> String {
        let time = format!(
            "{}-{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        );
        let mut line = format!("{} {}", time.dimmed(), paint(&self.title, &self.color));
        if let Some(location) = &self.location {
            line.push_str(&format!(" {}", format!("@ {}", location).dimmed()));
        }
        line
    }
}

impl Render for HolidayCategory {
    fn render(&self) -> String {
        format!("({})", self).dimmed().to_string()
    }
}

/// `#rrggbb` to RGB channels.
pub fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn paint(text: &str, hex: &str) -> String {
    match rgb(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
        None => text.to_string(),
    }
}

/// Pad or cut `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return format!("{:<width$}", text);
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

fn entry_label(entry: &Entry<'_>) -> String {
    if entry.is_holiday() {
        entry.title().to_string()
    } else {
        format!("{} {}", entry.start_time().format("%H:%M"), entry.title())
    }
}

fn day_header(date: NaiveDate, is_today: bool, width: usize) -> String {
    let label = fit(&date.format("%a %-d").to_string(), width);
    if is_today {
        label.reversed().to_string()
    } else {
        label.bold().to_string()
    }
}

pub fn render_projection(projection: &Projection<'_>, indicator: &IndicatorState) -> String {
    let body = match &projection.grid {
        Grid::Month(grid) => render_month(grid),
        Grid::Week(grid) => render_week(grid, indicator),
        Grid::Day(column) => render_day(column, indicator),
    };
    format!("{}\n\n{}", projection.title.bold(), body)
}

fn render_month(grid: &MonthGrid<'_>) -> String {
    let mut lines = Vec::new();

    if let Some(first) = grid.rows.first() {
        let names: Vec<String> = first
            .iter()
            .map(|cell| fit(&cell.date.format("%a").to_string(), MONTH_CELL_WIDTH))
            .collect();
        lines.push(names.join(" ").dimmed().to_string());
    }

    for row in &grid.rows {
        let cells: Vec<Vec<String>> = row.iter().map(month_cell_lines).collect();
        for i in 0..MONTH_CELL_LINES {
            let line: Vec<&str> = cells.iter().map(|c| c[i].as_str()).collect();
            lines.push(line.join(" "));
        }
    }

    lines.join("\n")
}

/// Exactly [`MONTH_CELL_LINES`] lines of [`MONTH_CELL_WIDTH`] visible characters.
fn month_cell_lines(cell: &DayCell<'_>) -> Vec<String> {
    let mut lines = Vec::with_capacity(MONTH_CELL_LINES);

    let day = fit(&cell.date.day().to_string(), MONTH_CELL_WIDTH);
    lines.push(if cell.is_today {
        day.reversed().to_string()
    } else if cell.in_month {
        day.bold().to_string()
    } else {
        day.dimmed().to_string()
    });

    for entry in &cell.visible {
        lines.push(paint(
            &fit(&entry_label(entry), MONTH_CELL_WIDTH),
            entry.color(),
        ));
    }

    if let Some(more) = cell.overflow_label() {
        lines.push(fit(&more, MONTH_CELL_WIDTH).dimmed().to_string());
    }

    while lines.len() < MONTH_CELL_LINES {
        lines.push(" ".repeat(MONTH_CELL_WIDTH));
    }
    lines
}

fn render_week(grid: &WeekGrid<'_>, indicator: &IndicatorState) -> String {
    let mut lines = Vec::new();
    let gutter = " ".repeat(GUTTER_WIDTH);

    let headers: Vec<String> = grid
        .columns
        .iter()
        .map(|c| day_header(c.date, c.is_today, WEEK_COLUMN_WIDTH))
        .collect();
    lines.push(format!("{}{}", gutter, headers.join(" ")));

    let strip_height = grid.columns.iter().map(|c| c.holidays.len()).max().unwrap_or(0);
    for i in 0..strip_height {
        let cells: Vec<String> = grid
            .columns
            .iter()
            .map(|c| match c.holidays.get(i) {
                Some(h) => paint(&fit(h.title(), WEEK_COLUMN_WIDTH), h.color()),
                None => " ".repeat(WEEK_COLUMN_WIDTH),
            })
            .collect();
        lines.push(format!("{}{}", gutter, cells.join(" ")));
    }

    for hour in 0..24 {
        let cells: Vec<String> = grid
            .columns
            .iter()
            .map(|c| slot_cell(c, hour, indicator, WEEK_COLUMN_WIDTH))
            .collect();
        let label = fit(&format!("{:02}:00", hour), GUTTER_WIDTH);
        lines.push(format!("{}{}", label.dimmed(), cells.join(" ")));
    }

    lines.join("\n")
}

/// One hour cell of a week column: a one-character indicator marker then the body.
fn slot_cell(column: &DayColumn<'_>, hour: u32, indicator: &IndicatorState, width: usize) -> String {
    let marker = match indicator.position_on(column.date) {
        Some((now_hour, _)) if now_hour == hour => "▶".red().to_string(),
        _ => " ".to_string(),
    };
    let width = width.saturating_sub(1);

    let body = match column.slots.get(hour as usize) {
        Some(slot) if !slot.placements.is_empty() => {
            let first = slot.placements[0].entry;
            let label = match slot.placements.len() {
                1 => first.title().to_string(),
                n => format!("{} +{}", first.title(), n - 1),
            };
            paint(&fit(&label, width), first.color())
        }
        _ => match continuing_color(column, hour) {
            Some(color) => paint(&fit("┃", width), color),
            None => " ".repeat(width),
        },
    };

    format!("{}{}", marker, body)
}

/// Color of an earlier placement whose height reaches into `hour`.
fn continuing_color<'a>(column: &DayColumn<'a>, hour: u32) -> Option<&'a str> {
    column
        .slots
        .iter()
        .take(hour as usize)
        .flat_map(|slot| slot.placements.iter().map(move |p| (slot.hour, p)))
        .find(|(origin, p)| {
            f64::from(*origin) + p.position.top_fraction + p.position.height_fraction
                > f64::from(hour)
        })
        .map(|(_, p)| p.entry.color())
}

fn render_day(column: &DayColumn<'_>, indicator: &IndicatorState) -> String {
    let mut lines = Vec::new();
    let gutter = " ".repeat(GUTTER_WIDTH);

    for holiday in &column.holidays {
        let category = match holiday {
            Entry::Holiday(h) => h.category.render(),
            Entry::Event(_) => String::new(),
        };
        lines.push(format!(
            "{}{} {}",
            gutter,
            paint(&format!("★ {}", holiday.title()), holiday.color()),
            category
        ));
    }

    for slot in &column.slots {
        let mut items: Vec<(f64, String)> = slot
            .placements
            .iter()
            .map(|p| {
                let time = format!(
                    "{}-{}",
                    p.entry.start_time().format("%H:%M"),
                    p.entry.end_time().format("%H:%M")
                );
                let mut text = format!("{} {}", time, p.entry.title());
                if let Some(location) = p.entry.location() {
                    text.push_str(&format!(" @ {}", location));
                }
                (p.position.top_fraction, paint(&text, p.entry.color()))
            })
            .collect();

        if let Some((hour, top)) = indicator.position_on(column.date)
            && hour == slot.hour
        {
            let minute = ((top * 60.0).floor() as u32).min(59);
            let line = format!("── now {:02}:{:02} ──", hour, minute);
            items.push((top, line.red().to_string()));
        }
        items.sort_by(|a, b| a.0.total_cmp(&b.0));

        let label = fit(&format!("{:02}:00", slot.hour), GUTTER_WIDTH)
            .dimmed()
            .to_string();

        if items.is_empty() {
            let filler = match continuing_color(column, slot.hour) {
                Some(color) => paint("┃", color),
                None => String::new(),
            };
            lines.push(format!("{}{}", label, filler));
            continue;
        }

        for (i, (_, text)) in items.into_iter().enumerate() {
            let prefix = if i == 0 { label.as_str() } else { gutter.as_str() };
            lines.push(format!("{}{}", prefix, text));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use calgrid_core::layout::{
        Granularity, HolidayTable, NavigationState, ViewState, indicator, project,
    };
    use chrono::NaiveDateTime;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn at(m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(m, d).and_hms_opt(h, min, 0).unwrap()
    }

    fn make_event(title: &str, start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: None,
            start_time: start,
            end_time: end,
            color: "#00796b".to_string(),
            location: None,
        }
    }

    #[test]
    fn test_rgb() {
        assert_eq!(rgb("#1a73e8"), Some((0x1a, 0x73, 0xe8)));
        assert_eq!(rgb("1a73e8"), None);
        assert_eq!(rgb("#1a73"), None);
        assert_eq!(rgb("#zz73e8"), None);
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("Gym", 6), "Gym   ");
        assert_eq!(fit("Quarterly review", 8), "Quarter…");
        assert_eq!(fit("Quarterly review", 8).chars().count(), 8);
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn test_event_render() {
        let mut event = make_event("Dentist", at(3, 20, 15, 0), at(3, 20, 16, 0));
        event.location = Some("Main St".to_string());
        let line = event.render();
        assert!(line.contains("15:00-16:00"));
        assert!(line.contains("Dentist"));
        assert!(line.contains("@ Main St"));
    }

    #[test]
    fn test_month_cell_has_fixed_height() {
        let events: Vec<Event> = (0..5)
            .map(|i| make_event(&format!("E{i}"), at(6, 3, 9 + i, 0), at(6, 3, 10 + i, 0)))
            .collect();
        let view = ViewState::new(NavigationState::new(date(6, 3), Granularity::Month));
        let projection = project(&view, &events, &[], date(6, 3));

        let Grid::Month(grid) = &projection.grid else {
            panic!("expected a month grid");
        };
        for cell in grid.rows.iter().flatten() {
            assert_eq!(month_cell_lines(cell).len(), MONTH_CELL_LINES);
        }

        let rendered = render_projection(&projection, &IndicatorState::Inactive);
        assert!(rendered.contains("June 2025"));
        assert!(rendered.contains("+2 more"));
        assert!(rendered.contains("09:00 E0"));
        assert!(!rendered.contains("E3"));
    }

    #[test]
    fn test_week_shows_continuation_and_marker() {
        let events = vec![make_event("Workshop", at(6, 4, 9, 30), at(6, 4, 12, 0))];
        let view = ViewState::new(NavigationState::new(date(6, 4), Granularity::Week));
        let projection = project(&view, &events, &[], date(6, 4));
        let state = indicator::evaluate(&view.timed_days(), at(6, 4, 14, 10));

        let Grid::Week(grid) = &projection.grid else {
            panic!("expected a week grid");
        };
        let column = &grid.columns[3];
        assert_eq!(column.date, date(6, 4));

        assert!(slot_cell(column, 9, &state, WEEK_COLUMN_WIDTH).contains("Workshop"));
        assert!(slot_cell(column, 11, &state, WEEK_COLUMN_WIDTH).contains('┃'));
        assert!(!slot_cell(column, 12, &state, WEEK_COLUMN_WIDTH).contains('┃'));
        assert!(slot_cell(column, 14, &state, WEEK_COLUMN_WIDTH).contains('▶'));
        assert!(!slot_cell(&grid.columns[2], 14, &state, WEEK_COLUMN_WIDTH).contains('▶'));
    }

    #[test]
    fn test_day_orders_now_line_between_events() {
        let events = vec![
            make_event("Early", at(8, 15, 10, 5), at(8, 15, 10, 20)),
            make_event("Late", at(8, 15, 10, 45), at(8, 15, 11, 0)),
        ];
        let table = HolidayTable::builtin();
        let view = ViewState::new(NavigationState::new(date(8, 15), Granularity::Day));
        let holidays = view.holidays(&table);
        let projection = project(&view, &events, &holidays, date(8, 15));
        let state = indicator::evaluate(&view.timed_days(), at(8, 15, 10, 30));

        let rendered = render_projection(&projection, &state);
        assert!(rendered.contains("Independence Day"));

        let early = rendered.find("Early").unwrap();
        let now = rendered.find("now 10:30").unwrap();
        let late = rendered.find("Late").unwrap();
        assert!(early < now && now < late);
    }
}
