use anyhow::Result;
use calgrid_core::CalgridConfig;
use calgrid_core::Event;
use calgrid_core::layout::VisibleRange;
use calgrid_core::layout::range::{end_of_day, start_of_day};
use chrono::{Days, NaiveDate};
use owo_colors::OwoColorize;

use super::parse_date;
use crate::client::Client;
use crate::render::Render;

/// Days listed when no `--to` is given
const DEFAULT_SPAN_DAYS: u64 = 3;

pub async fn run(config: &CalgridConfig, from: Option<String>, to: Option<String>) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let from = from.as_deref().map(parse_date).transpose()?.unwrap_or(today);
    let to = match to.as_deref() {
        Some(to) => parse_date(to)?,
        None => from.checked_add_days(Days::new(DEFAULT_SPAN_DAYS)).unwrap_or(from),
    };
    if to < from {
        anyhow::bail!("--to must not be before --from");
    }

    let client = Client::connect(config).await?;
    let range = VisibleRange {
        start: start_of_day(from),
        end: end_of_day(to),
    };
    let events = client.list_events(&range).await?;

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    print!("{}", render_grouped(&events, today));
    Ok(())
}

/// Events grouped under a label per start day.
fn render_grouped(events: &[Event], today: NaiveDate) -> String {
    let mut out = String::new();
    let mut current_date: Option<NaiveDate> = None;

    for event in events {
        let date = event.start_time.date();

        if current_date != Some(date) {
            if current_date.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("{}\n", date_label(date, today).bold()));
            current_date = Some(date);
        }

        out.push_str(&format!("  {} {}\n", event.render(), event.id.dimmed()));
    }

    out
}

/// Human-readable day label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
    }

    fn make_event(id: &str, d: u32, h: u32) -> Event {
        Event {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: None,
            start_time: date(d).and_hms_opt(h, 0, 0).unwrap(),
            end_time: date(d).and_hms_opt(h + 1, 0, 0).unwrap(),
            color: "#5f6368".to_string(),
            location: None,
        }
    }

    #[test]
    fn test_date_label() {
        assert_eq!(date_label(date(24), date(24)), "Today");
        assert_eq!(date_label(date(25), date(24)), "Tomorrow");
        assert_eq!(date_label(date(26), date(24)), "Wed Feb 26");
        assert_eq!(date_label(date(23), date(24)), "Sun Feb 23");
    }

    #[test]
    fn test_render_grouped() {
        let events = vec![make_event("a", 24, 9), make_event("b", 24, 14), make_event("c", 25, 8)];
        let out = render_grouped(&events, date(24));

        assert_eq!(out.matches("Today").count(), 1);
        assert_eq!(out.matches("Tomorrow").count(), 1);
        assert!(out.find("A").unwrap() < out.find("Tomorrow").unwrap());
        assert!(out.find("Tomorrow").unwrap() < out.find("C").unwrap());
    }
}
