use std::error::Error;
use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use gridwatch_core::bot::commands::{respond, Command};
use gridwatch_core::{DiscordSink, EventDb, EventFilter, StandingsCache, StandingsClient};

#[derive(Args)]
pub struct ChatArgs {
    /// Command string, e.g. "next race" or "standings constructor"
    input: String,
    /// Events database (defaults to ~/.config/gridwatch/calendar.db)
    #[arg(long)]
    db: Option<PathBuf>,
    /// Also post the response through the configured webhook
    #[arg(long)]
    post: bool,
}

/// Dispatch one free-text command exactly as the running bot would.
pub fn run(args: ChatArgs) -> Result<(), Box<dyn Error>> {
    let command =
        Command::parse(&args.input).ok_or_else(|| format!("unknown command '{}'", args.input))?;

    let now = Utc::now();
    let db = EventDb::open(&super::db_path(args.db)?)?;
    let events = db.upcoming_events(EventFilter::Any, now)?;

    let rt = super::runtime()?;
    let mut cache = StandingsCache::default();
    if matches!(command, Command::Standings(_)) {
        let client = StandingsClient::new();
        rt.block_on(cache.refresh(&client, super::season_year()))?;
    }

    let response = respond(command, &events, &cache, now);
    println!("{response}");

    if args.post {
        let sink = DiscordSink::new();
        rt.block_on(sink.send_text(&response))?;
    }
    Ok(())
}
