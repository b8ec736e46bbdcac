//! The events table.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::DatabaseError;
use crate::event::{Event, EventFilter, EventType};

/// SQLite store for the ingested calendar.
///
/// One flat table; rewritten wholesale on every calendar refresh.
pub struct EventDb {
    conn: Connection,
}

impl EventDb {
    /// Open (and migrate) the database at `path`, creating it if needed.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS events (
                event_type  TEXT NOT NULL,
                location    TEXT NOT NULL,
                start_time  TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            );
            CREATE INDEX IF NOT EXISTS idx_events_start ON events(start_time);",
        )?;
        Ok(())
    }

    /// Replace the whole table with a fresh calendar.
    pub fn replace_events(&mut self, events: &[Event]) -> Result<(), DatabaseError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM events", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO events (event_type, location, start_time, description)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for event in events {
                stmt.execute(params![
                    event.event_type.as_str(),
                    event.location,
                    event.start_time.to_rfc3339(),
                    event.description,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Events strictly after `now` matching `filter`, earliest first.
    pub fn upcoming_events(
        &self,
        filter: EventFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>, DatabaseError> {
        // Filter codes are static identifiers, safe to inline.
        let codes = filter
            .type_codes()
            .iter()
            .map(|code| format!("'{code}'"))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT event_type, location, start_time, description FROM events
             WHERE start_time > ?1 AND event_type IN ({codes})
             ORDER BY start_time"
        );

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([now.to_rfc3339()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (type_code, location, start_time, description) = row?;
            events.push(row_to_event(&type_code, location, &start_time, description)?);
        }
        Ok(events)
    }

    /// First event strictly after `now` matching `filter`.
    pub fn next_event(
        &self,
        filter: EventFilter,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>, DatabaseError> {
        Ok(self.upcoming_events(filter, now)?.into_iter().next())
    }

    pub fn count(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn row_to_event(
    type_code: &str,
    location: String,
    start_time: &str,
    description: String,
) -> Result<Event, DatabaseError> {
    let event_type = EventType::parse(type_code)
        .ok_or_else(|| DatabaseError::CorruptRow(format!("unknown event type '{type_code}'")))?;
    let start_time = DateTime::parse_from_rfc3339(start_time)
        .map_err(|e| DatabaseError::CorruptRow(format!("bad start_time '{start_time}': {e}")))?
        .with_timezone(&Utc);
    Ok(Event::new(event_type, location, start_time, description))
}
