use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use gridwatch_core::convert_calendar;

#[derive(Args)]
pub struct ConvertArgs {
    /// Input calendar (.ics) file
    #[arg(long)]
    calendar: PathBuf,
    /// Output events database (defaults to ~/.config/gridwatch/calendar.db)
    #[arg(long)]
    db: Option<PathBuf>,
}

pub fn run(args: ConvertArgs) -> Result<(), Box<dyn Error>> {
    let db_path = super::db_path(args.db)?;
    let count = convert_calendar(&args.calendar, &db_path)?;
    println!("Stored {count} events in {}", db_path.display());
    Ok(())
}
