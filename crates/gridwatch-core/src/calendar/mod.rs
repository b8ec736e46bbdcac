//! Calendar ingestion.
//!
//! Reads the published season calendar (iCalendar format) into the event
//! model. Parsing is delegated to the `icalendar` crate; this module only
//! classifies sessions and normalizes timestamps.
//!
//! Classification is strict: a VEVENT whose text matches no known session
//! type fails ingestion with [`CalendarError::UnknownEventType`] rather than
//! being dropped or defaulted.

pub mod refresh;

pub use refresh::{CalendarRefresher, DEFAULT_CALENDAR_URL};

use std::path::Path;

use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, EventLike};
use tracing::warn;

use crate::error::CalendarError;
use crate::event::{eastern_naive_to_utc, Event, EventType};

/// Load and ingest a calendar file.
pub fn load_events(path: &Path) -> Result<Vec<Event>, CalendarError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CalendarError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    parse_events(&raw)
}

/// Ingest calendar text into an ordered event sequence (earliest first).
pub fn parse_events(raw: &str) -> Result<Vec<Event>, CalendarError> {
    let calendar: Calendar = raw.parse().map_err(CalendarError::ParseFailed)?;

    let mut events = Vec::new();
    for component in &calendar.components {
        let CalendarComponent::Event(vevent) = component else {
            continue;
        };
        let summary = vevent
            .get_summary()
            .ok_or(CalendarError::MissingProperty("SUMMARY"))?;
        // The published feed carries one promotional entry; it is not a session.
        if summary.to_ascii_lowercase().contains("in your calendar") {
            continue;
        }

        let event_type = vevent
            .property_value("CATEGORIES")
            .and_then(classify_session)
            .or_else(|| classify_session(summary))
            .ok_or_else(|| CalendarError::UnknownEventType(summary.to_string()))?;

        let start = vevent
            .get_start()
            .ok_or(CalendarError::MissingProperty("DTSTART"))?;
        let location = vevent
            .property_value("LOCATION")
            .unwrap_or_default()
            .trim()
            .to_string();

        events.push(Event::new(event_type, location, resolve_start(start), summary));
    }

    events.sort_by_key(|event| event.start_time);
    Ok(events)
}

/// Map session text (CATEGORIES value or SUMMARY) to an event type.
///
/// Sprint shootout must be checked before plain qualifying and sprint; their
/// names overlap.
fn classify_session(text: &str) -> Option<EventType> {
    let lower = text.to_ascii_lowercase();
    if lower.contains("practice 1") || lower.contains("fp1") {
        Some(EventType::Fp1)
    } else if lower.contains("practice 2") || lower.contains("fp2") {
        Some(EventType::Fp2)
    } else if lower.contains("practice 3") || lower.contains("fp3") {
        Some(EventType::Fp3)
    } else if lower.contains("practice") {
        Some(EventType::Practice)
    } else if lower.contains("sprint shootout") || lower.contains("sprint qualifying") {
        Some(EventType::SprintQualifying)
    } else if lower.contains("qualifying") {
        Some(EventType::Qualifying)
    } else if lower.contains("sprint") {
        Some(EventType::Sprint)
    } else if lower.contains("grand prix") || lower.contains("race") {
        Some(EventType::Race)
    } else {
        None
    }
}

/// Normalize a DTSTART value to UTC.
///
/// Floating and date-only values carry no zone information and are
/// interpreted as reference-zone wall time -- never converted twice.
fn resolve_start(start: DatePerhapsTime) -> DateTime<Utc> {
    match start {
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => dt,
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => eastern_naive_to_utc(naive),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            match tzid.parse::<Tz>() {
                Ok(tz) => zoned_naive_to_utc(tz, date_time),
                Err(_) => {
                    warn!(%tzid, "unrecognized TZID, interpreting as reference zone");
                    eastern_naive_to_utc(date_time)
                }
            }
        }
        // All-day entry: midnight in the reference zone.
        DatePerhapsTime::Date(date) => eastern_naive_to_utc(date.and_time(chrono::NaiveTime::MIN)),
    }
}

fn zoned_naive_to_utc(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => match tz.from_local_datetime(&(naive + Duration::hours(1))) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => Utc.from_utc_datetime(&naive),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wrap_events(body: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//gridwatch tests//EN\n{body}END:VCALENDAR\n"
        )
    }

    fn vevent(summary: &str, categories: &str, dtstart: &str) -> String {
        format!(
            "BEGIN:VEVENT\nUID:{summary}@test\nSUMMARY:{summary}\nCATEGORIES:{categories}\nDTSTART:{dtstart}\nLOCATION:Silverstone\nEND:VEVENT\n"
        )
    }

    #[test]
    fn classifies_session_vocabulary() {
        assert_eq!(classify_session("F1,FP1"), Some(EventType::Fp1));
        assert_eq!(classify_session("Practice 2"), Some(EventType::Fp2));
        assert_eq!(classify_session("Practice"), Some(EventType::Practice));
        assert_eq!(classify_session("Qualifying"), Some(EventType::Qualifying));
        assert_eq!(
            classify_session("Sprint Shootout"),
            Some(EventType::SprintQualifying)
        );
        assert_eq!(
            classify_session("Sprint Qualifying"),
            Some(EventType::SprintQualifying)
        );
        assert_eq!(classify_session("Sprint"), Some(EventType::Sprint));
        assert_eq!(classify_session("Grand Prix"), Some(EventType::Race));
        assert_eq!(classify_session("Race"), Some(EventType::Race));
        assert_eq!(classify_session("Concert"), None);
    }

    #[test]
    fn parses_utc_dtstart() {
        let ics = wrap_events(&vevent("British Grand Prix - Race", "F1,Grand Prix", "20260705T140000Z"));
        let events = parse_events(&ics).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::Race);
        assert_eq!(events[0].location, "Silverstone");
        assert_eq!(
            events[0].start_time,
            NaiveDate::from_ymd_opt(2026, 7, 5)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap()
                .and_utc()
        );
    }

    #[test]
    fn floating_dtstart_is_reference_zone_wall_time() {
        // 10:00 floating in July: EDT is UTC-4, so 14:00 UTC.
        let ics = wrap_events(&vevent("Test Grand Prix - Race", "F1,Grand Prix", "20260705T100000"));
        let events = parse_events(&ics).unwrap();
        assert_eq!(
            events[0].start_time,
            NaiveDate::from_ymd_opt(2026, 7, 5)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap()
                .and_utc()
        );
    }

    #[test]
    fn unknown_session_text_is_a_hard_failure() {
        let ics = wrap_events(&vevent("Pit Lane Walk", "Fan Event", "20260705T100000Z"));
        let err = parse_events(&ics).unwrap_err();
        assert!(matches!(err, CalendarError::UnknownEventType(_)));
    }

    #[test]
    fn promotional_entry_is_skipped() {
        let body = format!(
            "{}{}",
            vevent("Formula 1 in your calendar!", "F1", "20260101T000000Z"),
            vevent("Test Grand Prix - Race", "F1,Grand Prix", "20260705T140000Z"),
        );
        let events = parse_events(&wrap_events(&body)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::Race);
    }

    #[test]
    fn events_come_back_ordered_by_start() {
        let body = format!(
            "{}{}{}",
            vevent("Test Grand Prix - Race", "F1,Grand Prix", "20260705T140000Z"),
            vevent("Test Practice 1", "F1,FP1", "20260703T113000Z"),
            vevent("Test Qualifying", "F1,Qualifying", "20260704T140000Z"),
        );
        let events = parse_events(&wrap_events(&body)).unwrap();
        let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![EventType::Fp1, EventType::Qualifying, EventType::Race]
        );
    }

    #[test]
    fn garbage_input_is_a_parse_error() {
        assert!(matches!(
            parse_events("this is not a calendar"),
            Err(CalendarError::ParseFailed(_))
        ));
    }
}
