use anyhow::Result;
use calgrid_core::CalgridConfig;
use owo_colors::OwoColorize;

use crate::client::Client;

pub async fn run(config: &CalgridConfig, id: &str) -> Result<()> {
    let client = Client::connect(config).await?;
    let event = client.get_event(id).await?;
    let message = client.delete_event(id).await?;

    println!("{} {} {}", "Deleted".red(), event.title, message.dimmed());
    Ok(())
}
