use anyhow::Result;
use calgrid_core::event::{EVENT_COLORS, color_by_name};
use calgrid_core::{CalgridConfig, EventDraft};
use chrono::{Duration, NaiveTime};
use owo_colors::OwoColorize;

use super::{parse_date_input, parse_end};
use crate::client::Client;
use crate::render::Render;

pub struct NewEvent {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

pub async fn run(config: &CalgridConfig, args: NewEvent) -> Result<()> {
    let draft = build_draft(args)?;

    let client = Client::connect(config).await?;
    let event = client.create_event(&draft).await?;

    println!("{} {}", "Created".green(), event.render());
    println!("  {}", event.id.dimmed());
    Ok(())
}

/// A bare start date means 09:00-10:00 that day; a start time without `--end` lasts an hour.
fn build_draft(args: NewEvent) -> Result<EventDraft> {
    let start_input = parse_date_input(&args.start)?;
    let start_time = start_input.at(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN));

    let end_time = match &args.end {
        Some(end) => parse_end(end, start_time.date())?,
        None => start_time + Duration::hours(1),
    };

    let color = args.color.as_deref().map(resolve_color).transpose()?;

    Ok(EventDraft {
        title: args.title,
        description: args.description,
        start_time,
        end_time,
        color,
        location: args.location,
    })
}

pub(crate) fn resolve_color(input: &str) -> Result<String> {
    color_by_name(input).ok_or_else(|| {
        let names: Vec<&str> = EVENT_COLORS.iter().map(|(name, _)| *name).collect();
        anyhow::anyhow!(
            "Unknown color '{}'. Use #rrggbb or one of: {}",
            input,
            names.join(", ")
        )
    })
}
