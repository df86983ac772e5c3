use anyhow::Result;
use calgrid_core::CalgridConfig;
use calgrid_core::clock::{Clock, SystemClock};
use calgrid_core::layout::{Granularity, indicator, project};

use super::ViewArgs;
use crate::client::Client;
use crate::render::render_projection;

pub async fn run(config: &CalgridConfig, args: ViewArgs) -> Result<()> {
    let clock = SystemClock;
    let view = args.view_state(config, &clock, Granularity::Month)?;

    let table = config.holiday_table()?;
    let holidays = view.holidays(&table);

    let client = Client::connect(config).await?;
    let events = client.list_events(&view.fetch_range()).await?;

    let projection = project(&view, &events, &holidays, clock.today());
    let state = indicator::evaluate(&view.timed_days(), clock.now());

    println!("{}", render_projection(&projection, &state));
    Ok(())
}
