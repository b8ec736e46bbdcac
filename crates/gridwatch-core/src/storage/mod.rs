//! SQLite-backed calendar storage.
//!
//! The events table is a flat copy of the ingested calendar -- nothing more.
//! Query surfaces ("next race", calendar listing) and the bot's startup load
//! read from here so the bot does not have to re-parse the feed on boot.

pub mod events_db;

pub use events_db::EventDb;

use std::path::{Path, PathBuf};

use crate::calendar::load_events;
use crate::error::Result;

/// Returns `~/.config/gridwatch[-dev]/` based on GRIDWATCH_ENV.
///
/// Set GRIDWATCH_ENV=dev to use the development data directory.
///
/// # Errors
/// Fails if the config directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("GRIDWATCH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("gridwatch-dev")
    } else {
        base_dir.join("gridwatch")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Ingest a calendar file into the events database, replacing its contents.
///
/// Returns the number of events stored.
pub fn convert_calendar(calendar: &Path, db: &Path) -> Result<usize> {
    let events = load_events(calendar)?;
    let mut event_db = EventDb::open(db)?;
    event_db.replace_events(&events)?;
    Ok(events.len())
}
