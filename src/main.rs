mod client;
mod commands;
mod render;

use std::io::IsTerminal;

use anyhow::{Context, Result, anyhow};
use calgrid_core::CalgridConfig;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::ViewArgs;
use commands::edit::EditEvent;
use commands::new::NewEvent;

#[derive(Parser)]
#[command(name = "calgrid")]
#[command(about = "Month, week and day calendar grids in your terminal", version)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a month, week or day grid
    Show(ViewArgs),
    /// Keep a week or day grid on screen with a live "now" line
    Watch(ViewArgs),
    /// List upcoming events grouped by day
    Events {
        /// First day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        from: Option<String>,

        /// Last day (YYYY-MM-DD), defaults to three days after --from
        #[arg(long)]
        to: Option<String>,
    },
    /// Create a new event
    New {
        /// Event title
        title: String,

        /// Start date/time (e.g., "2025-03-20" or "2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End time ("17:00") or date/time
        #[arg(short, long)]
        end: Option<String>,

        /// Palette name (blue, green, purple, ...) or #rrggbb
        #[arg(short, long)]
        color: Option<String>,

        /// Event location
        #[arg(short, long)]
        location: Option<String>,

        /// Event description
        #[arg(long)]
        description: Option<String>,
    },
    /// Change fields of an existing event
    Edit {
        /// Event id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long)]
        color: Option<String>,

        /// Pass "" to clear
        #[arg(short, long)]
        location: Option<String>,

        /// Pass "" to clear
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an event
    Delete {
        /// Event id
        id: String,
    },
    /// List the holidays of a year
    Holidays {
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
}

fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG filter: {e}"))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(verbose > 1)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = CalgridConfig::load().context("Failed to load config")?;

    match cli.command {
        Commands::Show(args) => commands::show::run(&config, args).await,
        Commands::Watch(args) => commands::watch::run(&config, args).await,
        Commands::Events { from, to } => commands::events::run(&config, from, to).await,
        Commands::New {
            title,
            start,
            end,
            color,
            location,
            description,
        } => {
            let args = NewEvent {
                title,
                start,
                end,
                color,
                location,
                description,
            };
            commands::new::run(&config, args).await
        }
        Commands::Edit {
            id,
            title,
            start,
            end,
            color,
            location,
            description,
        } => {
            let args = EditEvent {
                id,
                title,
                start,
                end,
                color,
                location,
                description,
            };
            commands::edit::run(&config, args).await
        }
        Commands::Delete { id } => commands::delete::run(&config, &id).await,
        Commands::Holidays { year } => commands::holidays::run(&config, year),
    }
}
