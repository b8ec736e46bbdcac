pub mod auth;
pub mod calendar;
pub mod chat;
pub mod convert;
pub mod next;
pub mod run;
pub mod standings;

use std::error::Error;
use std::path::PathBuf;

use chrono::{Datelike, Utc};
use gridwatch_core::data_dir;

/// Events database location: the flag, or `~/.config/gridwatch/calendar.db`.
pub fn db_path(explicit: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(data_dir()?.join("calendar.db")),
    }
}

/// Alert config location: the flag, or `~/.config/gridwatch/alerts.toml`.
pub fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(data_dir()?.join("alerts.toml")),
    }
}

/// Local copy of the downloaded calendar feed.
pub fn calendar_file(explicit: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(data_dir()?.join("calendar.ics")),
    }
}

/// Runtime for commands that need async I/O.
pub fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn Error>> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

/// The season queried by default.
pub fn season_year() -> i32 {
    Utc::now().year()
}
