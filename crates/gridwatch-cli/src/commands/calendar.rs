use std::error::Error;
use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use gridwatch_core::{EventDb, EventFilter};

#[derive(Args)]
pub struct CalendarArgs {
    /// Session type (any, practice, qualifying, shootout, sprint, race)
    #[arg(long, default_value = "any")]
    event: String,
    /// Events database (defaults to ~/.config/gridwatch/calendar.db)
    #[arg(long)]
    db: Option<PathBuf>,
}

pub fn run(args: CalendarArgs) -> Result<(), Box<dyn Error>> {
    let filter = EventFilter::parse(&args.event)
        .ok_or_else(|| format!("unknown event type '{}'", args.event))?;
    let db = EventDb::open(&super::db_path(args.db)?)?;

    let events = db.upcoming_events(filter, Utc::now())?;
    if events.is_empty() {
        println!("No upcoming {} on the calendar", filter.label());
        return Ok(());
    }
    for event in events {
        println!("{event}");
    }
    Ok(())
}
