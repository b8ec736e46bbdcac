use std::error::Error;
use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use gridwatch_core::{EventDb, EventFilter};

#[derive(Args)]
pub struct NextArgs {
    /// Session type (any, practice, qualifying, shootout, sprint, race)
    #[arg(long, default_value = "any")]
    event: String,
    /// Events database (defaults to ~/.config/gridwatch/calendar.db)
    #[arg(long)]
    db: Option<PathBuf>,
}

pub fn run(args: NextArgs) -> Result<(), Box<dyn Error>> {
    let filter = EventFilter::parse(&args.event)
        .ok_or_else(|| format!("unknown event type '{}'", args.event))?;
    let db = EventDb::open(&super::db_path(args.db)?)?;

    match db.next_event(filter, Utc::now())? {
        Some(event) => println!("Next {}\n{event}", event.event_type.label()),
        None => println!("No upcoming {} on the calendar", filter.label()),
    }
    Ok(())
}
