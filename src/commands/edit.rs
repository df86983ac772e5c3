use anyhow::Result;
use calgrid_core::{CalgridConfig, EventPatch};
use owo_colors::OwoColorize;

use super::{DateInput, parse_date_input, parse_end, new::resolve_color};
use crate::client::Client;
use crate::render::Render;

#[derive(Default)]
pub struct EditEvent {
    pub id: String,
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

pub async fn run(config: &CalgridConfig, args: EditEvent) -> Result<()> {
    let client = Client::connect(config).await?;
    let current = client.get_event(&args.id).await?;

    let patch = build_patch(&args, current.start_time.date())?;
    if patch.is_empty() {
        anyhow::bail!("Nothing to change. Pass --title, --start, --end, --color, --location or --description");
    }

    let event = client.update_event(&args.id, &patch).await?;
    println!("{} {}", "Updated".yellow(), event.render());
    Ok(())
}

/// An empty `--location ""` or `--description ""` clears the field.
/// A start given as a bare date keeps its 00:00 time.
fn build_patch(args: &EditEvent, current_day: chrono::NaiveDate) -> Result<EventPatch> {
    let start_time = args
        .start
        .as_deref()
        .map(parse_date_input)
        .transpose()?
        .map(|input| match input {
            DateInput::Date(d) => d.and_time(chrono::NaiveTime::MIN),
            DateInput::DateTime(dt) => dt,
        });

    let end_day = start_time.map(|s| s.date()).unwrap_or(current_day);
    let end_time = args
        .end
        .as_deref()
        .map(|end| parse_end(end, end_day))
        .transpose()?;

    Ok(EventPatch {
        title: args.title.clone(),
        description: args.description.clone().map(Some),
        start_time,
        end_time,
        color: args.color.as_deref().map(resolve_color).transpose()?,
        location: args.location.clone().map(Some),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    #[test]
    fn test_empty_edit() {
        let args = EditEvent {
            id: "x".to_string(),
            ..Default::default()
        };
        assert!(build_patch(&args, day()).unwrap().is_empty());
    }

    #[test]
    fn test_end_time_uses_event_day() {
        let args = EditEvent {
            id: "x".to_string(),
            end: Some("18:00".to_string()),
            location: Some(String::new()),
            ..Default::default()
        };
        let patch = build_patch(&args, day()).unwrap();
        assert_eq!(patch.end_time, day().and_hms_opt(18, 0, 0));
        assert_eq!(patch.start_time, None);
        assert_eq!(patch.location, Some(Some(String::new())));
    }

    #[test]
    fn test_end_time_follows_new_start_day() {
        let args = EditEvent {
            id: "x".to_string(),
            start: Some("2025-03-22T08:00".to_string()),
            end: Some("09:30".to_string()),
            color: Some("gray".to_string()),
            ..Default::default()
        };
        let patch = build_patch(&args, day()).unwrap();
        let next = NaiveDate::from_ymd_opt(2025, 3, 22).unwrap();
        assert_eq!(patch.end_time, next.and_hms_opt(9, 30, 0));
        assert_eq!(patch.color.as_deref(), Some("#5f6368"));
    }
}
