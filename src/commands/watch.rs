use std::sync::Arc;

use anyhow::Result;
use calgrid_core::CalgridConfig;
use calgrid_core::clock::{Clock, SystemClock};
use calgrid_core::layout::{Granularity, IndicatorTicker, REFRESH_INTERVAL, project};
use tracing::warn;

use super::ViewArgs;
use crate::client::Client;
use crate::render::render_projection;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Render a week or day view and redraw it every time the "now" indicator moves.
pub async fn run(config: &CalgridConfig, args: ViewArgs) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let view = args.view_state(config, clock.as_ref(), Granularity::Week)?;
    if view.navigation.granularity == Granularity::Month {
        anyhow::bail!("watch needs --view week or --view day");
    }

    let table = config.holiday_table()?;
    let holidays = view.holidays(&table);

    let client = Client::connect(config).await?;
    let fetch_range = view.fetch_range();
    let mut events = client.list_events(&fetch_range).await?;

    let (ticker, mut state_rx) =
        IndicatorTicker::spawn(clock.clone(), view.timed_days(), REFRESH_INTERVAL);

    loop {
        let state = *state_rx.borrow_and_update();
        let projection = project(&view, &events, &holidays, clock.today());
        println!("{}{}", CLEAR_SCREEN, render_projection(&projection, &state));

        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        // Pick up edits made elsewhere; keep the last snapshot if the server is gone
        match client.list_events(&fetch_range).await {
            Ok(fresh) => events = fresh,
            Err(e) => warn!(error = %e, "could not refresh events"),
        }
    }

    ticker.cancel();
    Ok(())
}
