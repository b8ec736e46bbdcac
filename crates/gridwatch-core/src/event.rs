//! Session event model.
//!
//! An [`Event`] is one timestamped session on the race calendar: free
//! practice, qualifying, sprint, or the grand prix itself. Events are
//! constructed once at calendar-load time and never mutated; the alert
//! scheduler only reads and compares them.
//!
//! All time comparisons in the crate go through a single reference zone
//! (US Eastern). A timestamp that arrives without zone information is
//! interpreted as already being in the reference zone -- it must not be
//! converted a second time.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use chrono_tz::US::Eastern;
use serde::{Deserialize, Serialize};

/// The timezone every instant is normalized to before comparison or display.
pub const REFERENCE_ZONE: Tz = Eastern;

/// Session type on the race calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Fp1,
    Fp2,
    Fp3,
    /// Practice session without a recognizable ordinal.
    Practice,
    Qualifying,
    SprintQualifying,
    Sprint,
    Race,
}

impl EventType {
    /// Practice session from its zero-based index (0 -> FP1).
    /// Indexes past FP3 collapse to the generic practice type.
    pub fn practice(index: u8) -> EventType {
        match index {
            0 => EventType::Fp1,
            1 => EventType::Fp2,
            2 => EventType::Fp3,
            _ => EventType::Practice,
        }
    }

    /// Zero-based practice ordinal, if this is a numbered practice session.
    pub fn practice_index(&self) -> Option<u8> {
        match self {
            EventType::Fp1 => Some(0),
            EventType::Fp2 => Some(1),
            EventType::Fp3 => Some(2),
            _ => None,
        }
    }

    /// Human display string for this session type.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Fp1 => "FP1",
            EventType::Fp2 => "FP2",
            EventType::Fp3 => "FP3",
            EventType::Practice => "Practice",
            EventType::Qualifying => "Qualifying",
            EventType::SprintQualifying => "Sprint Shootout",
            EventType::Sprint => "Sprint Race",
            EventType::Race => "Grand Prix",
        }
    }

    /// Key used to look up lead times in the alert config.
    /// Numbered practice sessions share the `practice` entry.
    pub fn config_key(&self) -> &'static str {
        match self {
            EventType::Fp1 | EventType::Fp2 | EventType::Fp3 | EventType::Practice => "practice",
            EventType::Qualifying => "qualifying",
            EventType::SprintQualifying => "sprint_qualifying",
            EventType::Sprint => "sprint",
            EventType::Race => "race",
        }
    }

    /// Stable storage code, the inverse of [`EventType::parse`].
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Fp1 => "fp1",
            EventType::Fp2 => "fp2",
            EventType::Fp3 => "fp3",
            EventType::Practice => "practice",
            EventType::Qualifying => "qualifying",
            EventType::SprintQualifying => "sprint_qualifying",
            EventType::Sprint => "sprint",
            EventType::Race => "race",
        }
    }

    pub fn parse(code: &str) -> Option<EventType> {
        match code {
            "fp1" => Some(EventType::Fp1),
            "fp2" => Some(EventType::Fp2),
            "fp3" => Some(EventType::Fp3),
            "practice" => Some(EventType::Practice),
            "qualifying" => Some(EventType::Qualifying),
            "sprint_qualifying" => Some(EventType::SprintQualifying),
            "sprint" => Some(EventType::Sprint),
            "race" => Some(EventType::Race),
            _ => None,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable derived identity of an event: a hash over all immutable fields.
/// The alert dedup set keys on `(lead_time, EventKey)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventKey(u64);

/// One session on the calendar.
///
/// Two events are the same tracking subject iff all stored fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub description: String,
}

impl Event {
    pub fn new(
        event_type: EventType,
        location: impl Into<String>,
        start_time: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            event_type,
            location: location.into(),
            start_time,
            description: description.into(),
        }
    }

    /// True iff `now` is strictly after the session start.
    pub fn already_happened(&self, now: DateTime<Utc>) -> bool {
        now > self.start_time
    }

    /// Start instant in the reference zone. Idempotent; `start_time` itself
    /// is never mutated.
    pub fn start_eastern(&self) -> DateTime<Tz> {
        self.start_time.with_timezone(&REFERENCE_ZONE)
    }

    /// Identity for dedup tracking, derived from every immutable field.
    pub fn key(&self) -> EventKey {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.hash(&mut hasher);
        EventKey(hasher.finish())
    }

    /// Start time rendered in the reference zone for display.
    pub fn time_str(&self) -> String {
        self.start_eastern().format("%Y/%m/%d %H:%M:%S").to_string()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.location,
            self.event_type.label(),
            self.time_str()
        )
    }
}

/// Interpret a zoneless timestamp as reference-zone wall time.
///
/// Calendar feeds occasionally carry floating DTSTART values; those are
/// already reference-zone wall clocks and must not be shifted twice.
pub fn eastern_naive_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match REFERENCE_ZONE.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // Fall-back overlap: the first occurrence wins.
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Spring-forward gap: the skipped hour lands just after the jump.
        LocalResult::None => match REFERENCE_ZONE.from_local_datetime(&(naive + Duration::hours(1)))
        {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => Utc.from_utc_datetime(&naive),
        },
    }
}

/// Session filter for query surfaces ("next race", calendar listing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    Any,
    Practice,
    Qualifying,
    SprintQualifying,
    Sprint,
    Race,
}

impl EventFilter {
    pub fn matches(&self, event_type: EventType) -> bool {
        match self {
            EventFilter::Any => true,
            EventFilter::Practice => event_type.config_key() == "practice",
            EventFilter::Qualifying => event_type == EventType::Qualifying,
            EventFilter::SprintQualifying => event_type == EventType::SprintQualifying,
            EventFilter::Sprint => event_type == EventType::Sprint,
            EventFilter::Race => event_type == EventType::Race,
        }
    }

    /// Storage codes matched by this filter.
    pub fn type_codes(&self) -> &'static [&'static str] {
        match self {
            EventFilter::Any => &[
                "fp1",
                "fp2",
                "fp3",
                "practice",
                "qualifying",
                "sprint_qualifying",
                "sprint",
                "race",
            ],
            EventFilter::Practice => &["fp1", "fp2", "fp3", "practice"],
            EventFilter::Qualifying => &["qualifying"],
            EventFilter::SprintQualifying => &["sprint_qualifying"],
            EventFilter::Sprint => &["sprint"],
            EventFilter::Race => &["race"],
        }
    }

    pub fn parse(input: &str) -> Option<EventFilter> {
        match input.trim().to_ascii_lowercase().as_str() {
            "any" | "all" => Some(EventFilter::Any),
            "practice" | "fp" => Some(EventFilter::Practice),
            "qualifying" | "quali" => Some(EventFilter::Qualifying),
            "sprint_qualifying" | "sprint-qualifying" | "shootout" => {
                Some(EventFilter::SprintQualifying)
            }
            "sprint" => Some(EventFilter::Sprint),
            "race" | "grand_prix" | "grand-prix" => Some(EventFilter::Race),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventFilter::Any => "event",
            EventFilter::Practice => "Practice",
            EventFilter::Qualifying => "Qualifying",
            EventFilter::SprintQualifying => "Sprint Shootout",
            EventFilter::Sprint => "Sprint Race",
            EventFilter::Race => "Grand Prix",
        }
    }
}
