//! Daily calendar refresh.
//!
//! Re-downloads the published season calendar and rebuilds the events
//! database, but only when the feed content actually changed (SHA-256
//! compare against the local copy). The downloaded text is parsed before
//! anything on disk is touched, so a truncated or garbled response can
//! never clobber a good calendar.

use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::info;

use crate::calendar::parse_events;
use crate::error::{CalendarError, CoreError};
use crate::storage::EventDb;

/// The published Formula 1 season calendar feed.
pub const DEFAULT_CALENDAR_URL: &str =
    "https://files-f1.motorsportcalendars.com/f1-calendar_p1_p2_p3_qualifying_sprint_gp.ics";

/// Periodic calendar re-downloader.
pub struct CalendarRefresher {
    http: reqwest::Client,
    url: String,
    calendar_path: PathBuf,
    db_path: PathBuf,
}

impl CalendarRefresher {
    pub fn new(
        url: impl Into<String>,
        calendar_path: impl Into<PathBuf>,
        db_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            calendar_path: calendar_path.into(),
            db_path: db_path.into(),
        }
    }

    /// Download the feed; when its content changed, rewrite the local copy
    /// and rebuild the events database. Returns whether anything changed.
    pub async fn refresh(&self) -> Result<bool, CoreError> {
        let body = self
            .http
            .get(&self.url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(CalendarError::DownloadFailed)?
            .text()
            .await
            .map_err(CalendarError::DownloadFailed)?;

        // Validate the download before touching anything on disk.
        let events = parse_events(&body)?;

        if let Ok(existing) = std::fs::read(&self.calendar_path) {
            if content_hash(&existing) == content_hash(body.as_bytes()) {
                return Ok(false);
            }
        }

        std::fs::write(&self.calendar_path, &body)?;
        let mut db = EventDb::open(&self.db_path)?;
        db.replace_events(&events)?;
        info!(count = events.len(), "calendar updated");
        Ok(true)
    }
}

fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
